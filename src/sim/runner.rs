use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::dynamics::state::{RotorSpeeds, SimConfig, State};
use crate::error::{Result, SimError};
use crate::gnc::{CascadeController, CascadeGains, Controller, Reference};
use crate::vehicle::Vehicle;

// ---------------------------------------------------------------------------
// Per-tick record
// ---------------------------------------------------------------------------

/// What happened during one tick: the command issued at `time` and the state
/// it produced at `time + dt`.
#[derive(Debug, Clone)]
pub struct Sample {
    pub time: f64,
    pub target: Vector3<f64>,
    pub rotors: RotorSpeeds,
    pub wind: Vector3<f64>,
    pub state: State,
}

/// A completed run: `trajectory[0]` is the initial state and
/// `samples[i]` is the transition `trajectory[i] → trajectory[i + 1]`.
#[derive(Debug, Clone, Default)]
pub struct Flight {
    pub trajectory: Vec<State>,
    pub samples: Vec<Sample>,
}

impl Flight {
    pub fn final_state(&self) -> Option<&State> {
        self.trajectory.last()
    }

    pub fn duration(&self) -> f64 {
        self.final_state().map_or(0.0, |s| s.time)
    }

    /// Post-step states, one per sample (`trajectory` without the initial state).
    pub fn ticks(&self) -> &[State] {
        self.trajectory.get(1..).unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Single tick
// ---------------------------------------------------------------------------

/// Reference → controller → wind → integrator, in that order.
pub fn step(
    vehicle: &mut Vehicle,
    controller: &mut dyn Controller,
    reference: &Reference,
    dt: f64,
) -> Result<Sample> {
    let time = vehicle.time();
    let target = reference.position(time);
    let rotors = controller.control(&vehicle.state, &target)?;
    let wind = vehicle.advance(&rotors, dt);

    if !vehicle.state.is_finite() {
        warn!(vehicle = %vehicle.name, time, "state diverged");
        return Err(SimError::Diverged { time });
    }

    Ok(Sample {
        time,
        target,
        rotors,
        wind,
        state: vehicle.state.clone(),
    })
}

// ---------------------------------------------------------------------------
// Full run
// ---------------------------------------------------------------------------

/// Fly `vehicle` along `reference` for `config.max_time` with a custom controller.
pub fn simulate_with(
    vehicle: &mut Vehicle,
    controller: &mut dyn Controller,
    reference: &Reference,
    config: &SimConfig,
) -> Result<Flight> {
    let steps = config.steps();
    debug!(
        vehicle = %vehicle.name,
        controller = controller.name(),
        reference = %reference.label(),
        steps,
        dt = config.dt,
        "starting run"
    );

    let cap = steps.min(500_000) + 1;
    let mut trajectory = Vec::with_capacity(cap);
    let mut samples = Vec::with_capacity(cap);
    trajectory.push(vehicle.state.clone());
    controller.reset();

    for _ in 0..steps {
        let sample = step(vehicle, controller, reference, config.dt)?;
        trajectory.push(sample.state.clone());
        samples.push(sample);
    }

    Ok(Flight { trajectory, samples })
}

/// Run with the default cascade controller (convenience wrapper).
pub fn simulate(vehicle: &mut Vehicle, reference: &Reference, config: &SimConfig) -> Result<Flight> {
    let mut controller = CascadeController::new(vehicle.params.clone(), CascadeGains::default())?;
    simulate_with(vehicle, &mut controller, reference, config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
