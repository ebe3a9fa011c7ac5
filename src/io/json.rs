use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::physics::Wind;
use crate::sim::runner::Flight;

/// Summary statistics computed from a flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlightSummary {
    pub duration_s: f64,
    pub steps: usize,
    pub rms_tracking_error_m: f64,
    pub max_tracking_error_m: f64,
    pub max_speed_ms: f64,
    pub max_tilt_deg: f64,
    pub max_rotor_speed: f64,
    pub mean_rotor_speed: f64,
    pub max_wind_force_n: f64,
}

impl FlightSummary {
    /// Tracking error compares each post-step position with the target issued
    /// for that step.
    pub fn from_flight(flight: &Flight) -> Self {
        let samples = &flight.samples;
        if samples.is_empty() {
            return FlightSummary {
                duration_s: flight.duration(),
                ..Default::default()
            };
        }
        let n = samples.len() as f64;

        let errors: Vec<f64> = samples
            .iter()
            .map(|s| (s.state.pos - s.target).norm())
            .collect();
        let rms = (errors.iter().map(|e| e * e).sum::<f64>() / n).sqrt();
        let max_err = errors.iter().copied().fold(0.0_f64, f64::max);

        let max_speed = flight
            .trajectory
            .iter()
            .map(|s| s.vel.norm())
            .fold(0.0_f64, f64::max);

        let max_tilt = flight
            .trajectory
            .iter()
            .map(|s| s.tilt())
            .fold(0.0_f64, f64::max);

        let max_rotor = samples.iter().map(|s| s.rotors.max()).fold(0.0_f64, f64::max);
        let mean_rotor = samples.iter().map(|s| s.rotors.mean()).sum::<f64>() / n;
        let max_wind = samples.iter().map(|s| s.wind.norm()).fold(0.0_f64, f64::max);

        FlightSummary {
            duration_s: flight.duration(),
            steps: samples.len(),
            rms_tracking_error_m: rms,
            max_tracking_error_m: max_err,
            max_speed_ms: max_speed,
            max_tilt_deg: max_tilt.to_degrees(),
            max_rotor_speed: max_rotor,
            mean_rotor_speed: mean_rotor,
            max_wind_force_n: max_wind,
        }
    }
}

/// One run as written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub vehicle: String,
    pub reference: String,
    pub wind: Wind,
    pub performance: FlightSummary,
}

/// One sweep cell in `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct SweepEntry {
    pub amplitude: f64,
    pub omega: f64,
    pub dataset: String,
    pub trajectory: String,
    pub performance: FlightSummary,
}

pub fn write_report<W: Write, T: Serialize>(writer: W, report: &T) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

pub fn write_report_file<T: Serialize>(path: impl AsRef<Path>, report: &T) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_report(std::io::BufWriter::new(file), report)
}
