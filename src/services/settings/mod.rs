// Settings service module
// Grid configuration stored as TOML

mod service;

pub use service::{default_config_path, SettingsService};
