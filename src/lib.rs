// Timetable Grid Library
// Headless week-grid scheduling editor for timetable hosts

pub mod error;
pub mod grid;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{GridError, Result};
