// Time utility functions
// Minute arithmetic shared by the grid geometry

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Integer division rounding up. `divisor` must be non-zero.
pub fn ceil_div(value: u32, divisor: u32) -> u32 {
    value.div_ceil(divisor)
}

/// Format a minute offset from midnight as `HH:MM`.
///
/// Unlike `TimeOfDay`, this accepts offsets at or past midnight so that
/// out-of-window candidates (e.g. `24:15`) can still be reported.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
