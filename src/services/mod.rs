// Service module exports
// Host-side helpers around the grid: configuration and snapshot files

pub mod settings;
pub mod snapshot;
