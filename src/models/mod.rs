// Module exports for models

pub mod conflict;
pub mod day;
pub mod session;
pub mod settings;
pub mod time_of_day;
