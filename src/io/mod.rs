pub mod csv;
pub mod json;

pub use json::{FlightSummary, RunReport, SweepEntry};
