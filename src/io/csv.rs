use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::dynamics::state::State;
use crate::error::Result;
use crate::sim::runner::{Flight, Sample};
use crate::vehicle::{VehicleParams, FRAME_MARKERS};

// ---------------------------------------------------------------------------
// Training dataset: velocity, attitude, rotor speeds, wind label
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct DatasetRow {
    time: f64,
    vel_x: f64,
    vel_y: f64,
    vel_z: f64,
    quat_w: f64,
    quat_x: f64,
    quat_y: f64,
    quat_z: f64,
    rotor_0: f64,
    rotor_1: f64,
    rotor_2: f64,
    rotor_3: f64,
    wind_x: f64,
    wind_y: f64,
    wind_z: f64,
}

impl From<&Sample> for DatasetRow {
    fn from(s: &Sample) -> Self {
        let q = s.state.quat_wxyz();
        let [r0, r1, r2, r3] = s.rotors.0;
        Self {
            time: s.state.time,
            vel_x: s.state.vel.x,
            vel_y: s.state.vel.y,
            vel_z: s.state.vel.z,
            quat_w: q[0],
            quat_x: q[1],
            quat_y: q[2],
            quat_z: q[3],
            rotor_0: r0,
            rotor_1: r1,
            rotor_2: r2,
            rotor_3: r3,
            wind_x: s.wind.x,
            wind_y: s.wind.y,
            wind_z: s.wind.z,
        }
    }
}

/// One row per tick, stamped with the post-step clock: velocity and attitude
/// after the step, the rotor command that produced them and the wind force
/// applied during the step.
pub fn write_dataset<W: Write>(writer: W, samples: &[Sample]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for s in samples {
        wtr.serialize(DatasetRow::from(s))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_dataset_file(path: impl AsRef<Path>, samples: &[Sample]) -> Result<()> {
    write_dataset(std::fs::File::create(path)?, samples)
}

// ---------------------------------------------------------------------------
// Frame points: rotors m0..m3, origin, vertical marker h
// ---------------------------------------------------------------------------

const MARKER_NAMES: [&str; FRAME_MARKERS] = ["m0", "m1", "m2", "m3", "o", "h"];

fn frame_header() -> Vec<String> {
    let mut header = vec!["time".to_string()];
    for name in MARKER_NAMES {
        for axis in ["x", "y", "z"] {
            header.push(format!("{}_{}", name, axis));
        }
    }
    header
}

/// One row per state with the 18 world-frame marker coordinates.
pub fn write_frames<W: Write>(writer: W, params: &VehicleParams, states: &[State]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(frame_header())?;
    for s in states {
        let pts = params.frame_points(s);
        let mut record = Vec::with_capacity(1 + 3 * FRAME_MARKERS);
        record.push(s.time);
        record.extend(pts.iter().copied()); // column-major: m0_x, m0_y, m0_z, m1_x, ...
        wtr.serialize(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_frames_file(
    path: impl AsRef<Path>,
    params: &VehicleParams,
    states: &[State],
) -> Result<()> {
    write_frames(std::fs::File::create(path)?, params, states)
}

// ---------------------------------------------------------------------------
// Sweep cell: dataset + frame points, row i of both is tick i
// ---------------------------------------------------------------------------

/// Write `data_{tag}.csv` and `trajectory_{tag}.csv` into `dir`; returns the
/// two file names.
pub fn write_cell(
    dir: impl AsRef<Path>,
    tag: &str,
    params: &VehicleParams,
    flight: &Flight,
) -> Result<(String, String)> {
    let dir = dir.as_ref();
    let dataset = format!("data_{}.csv", tag);
    let trajectory = format!("trajectory_{}.csv", tag);
    write_dataset_file(dir.join(&dataset), &flight.samples)?;
    write_frames_file(dir.join(&trajectory), params, flight.ticks())?;
    Ok((dataset, trajectory))
}

// ---------------------------------------------------------------------------
// Full state trajectory
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct StateRow {
    time: f64,
    pos_x: f64,
    pos_y: f64,
    pos_z: f64,
    vel_x: f64,
    vel_y: f64,
    vel_z: f64,
    quat_w: f64,
    quat_x: f64,
    quat_y: f64,
    quat_z: f64,
    omega_x: f64,
    omega_y: f64,
    omega_z: f64,
    tilt_deg: f64,
}

impl From<&State> for StateRow {
    fn from(s: &State) -> Self {
        let q = s.quat_wxyz();
        Self {
            time: s.time,
            pos_x: s.pos.x,
            pos_y: s.pos.y,
            pos_z: s.pos.z,
            vel_x: s.vel.x,
            vel_y: s.vel.y,
            vel_z: s.vel.z,
            quat_w: q[0],
            quat_x: q[1],
            quat_y: q[2],
            quat_z: q[3],
            omega_x: s.omega.x,
            omega_y: s.omega.y,
            omega_z: s.omega.z,
            tilt_deg: s.tilt().to_degrees(),
        }
    }
}

pub fn write_trajectory<W: Write>(writer: W, trajectory: &[State]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for s in trajectory {
        wtr.serialize(StateRow::from(s))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_trajectory_file(path: impl AsRef<Path>, trajectory: &[State]) -> Result<()> {
    write_trajectory(std::fs::File::create(path)?, trajectory)
}
