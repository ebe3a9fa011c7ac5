use nalgebra::Vector3;

use crate::dynamics;
use crate::dynamics::state::{RotorSpeeds, State};
use crate::vehicle::VehicleParams;

// ---------------------------------------------------------------------------
// Explicit Euler integrator, rotor command and external force held over the step
// ---------------------------------------------------------------------------

/// Single first-order step. The undisturbed case passes a zero force.
pub fn euler_step(
    state: &State,
    params: &VehicleParams,
    rotors: &RotorSpeeds,
    external_force: &Vector3<f64>,
    dt: f64,
) -> State {
    let d = dynamics::derivatives(state, params, rotors, external_force);
    state.apply(&d, dt)
}
