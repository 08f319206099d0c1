// Timetable Grid
// Demo host: loads settings and a schedule export, prints the week grid

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};

use timetable_grid::grid::conflict_overlay::ConflictOverlay;
use timetable_grid::grid::placement::{GridLayout, SessionPlacementResolver};
use timetable_grid::grid::time_grid::TimeGridModel;
use timetable_grid::models::day::DayKey;
use timetable_grid::models::session::Session;
use timetable_grid::services::settings::SettingsService;
use timetable_grid::services::snapshot::load_snapshot;

const CELL_WIDTH: usize = 10;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(schedule_path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: timetable-grid <schedule.json> [grid.toml]");
        std::process::exit(2);
    };

    let settings_service = match args.next() {
        Some(path) => SettingsService::new(path),
        None => SettingsService::from_default_location(),
    };
    log::info!("Using settings from {}", settings_service.path().display());
    let settings = settings_service.load_or_default();
    let grid = settings
        .to_time_grid()
        .context("settings do not describe a usable grid")?;

    let snapshot = load_snapshot(&schedule_path)?;
    for issue in &snapshot.issues {
        println!(
            "skipped entry #{} ({}): {}",
            issue.index,
            issue.id.as_deref().unwrap_or("no id"),
            issue.message
        );
    }

    let mut overlay = ConflictOverlay::new();
    overlay.replace(snapshot.conflicts);

    let resolver = SessionPlacementResolver::new(&grid);
    let layout = resolver.layout(&snapshot.sessions);

    print!("{}", render(&grid, &resolver, &layout, &snapshot.sessions));

    for issue in &layout.rejected {
        println!("not placed: {} ({})", issue.session_id, issue.error);
    }

    let summary = overlay.summary(&snapshot.sessions);
    if summary.total > 0 {
        println!(
            "{} conflict(s) on {} session(s), highest: {}",
            summary.total,
            summary.sessions_affected,
            summary
                .highest
                .map(|severity| severity.label())
                .unwrap_or("none")
        );
        for session in &snapshot.sessions {
            if let Some(severity) = overlay.display_severity(session) {
                println!("  {:<12} {}", session.id.as_str(), severity);
            }
        }
    }

    Ok(())
}

/// One line per slot; anchored cards show their id, covered rows show `|`.
/// Today's column header is starred.
fn render(
    grid: &TimeGridModel,
    resolver: &SessionPlacementResolver<'_>,
    layout: &GridLayout<'_>,
    sessions: &[Session],
) -> String {
    let mut out = String::new();

    // today's column gets a marker; Sunday has none
    let today = DayKey::from_weekday(Local::now().weekday())
        .and_then(|day| grid.days().position(day));

    out.push_str(&format!("{:>6} ", ""));
    for (index, day) in grid.days().days().iter().enumerate() {
        let header = if today == Some(index) {
            format!("{}*", day.short_label())
        } else {
            day.short_label().to_string()
        };
        out.push_str(&format!("{:<width$}", header, width = CELL_WIDTH));
    }
    out.push('\n');

    for slot in grid.slots() {
        let gutter = slot.label().unwrap_or_default();
        out.push_str(&format!("{:>6} ", gutter));

        for column in &layout.columns {
            let anchored = column
                .placements
                .iter()
                .find(|placement| placement.anchor_slot == slot.index);
            let cell = match anchored {
                Some(placement) => truncate(placement.session_id.as_str()),
                None if !resolver.sessions_at(sessions, column.day, slot.index).is_empty() => {
                    "|".to_string()
                }
                None => ".".to_string(),
            };
            out.push_str(&format!("{:<width$}", cell, width = CELL_WIDTH));
        }
        out.push('\n');
    }

    out
}

fn truncate(id: &str) -> String {
    id.chars().take(CELL_WIDTH - 1).collect()
}
