use nalgebra::Vector3;

use crate::dynamics::state::{RotorSpeeds, State};
use crate::error::Result;

/// Trait for flight controllers.
///
/// Implement this to plug a custom controller into the simulation loop.
/// The driver calls it once per tick with the current state and the
/// reference position for that tick.
pub trait Controller {
    /// Compute rotor speeds that steer `state` toward `target`.
    fn control(&mut self, state: &State, target: &Vector3<f64>) -> Result<RotorSpeeds>;

    /// Reset controller internal state, if any.
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
