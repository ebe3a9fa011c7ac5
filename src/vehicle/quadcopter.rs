use nalgebra::{UnitQuaternion, Vector3};

use super::params::{VehicleParams, VehicleParamsBuilder};
use crate::dynamics::state::{RotorSpeeds, State};
use crate::physics::Wind;
use crate::sim::integrator::euler_step;

// ---------------------------------------------------------------------------
// Vehicle: airframe + wind + evolving state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub name: String,
    pub params: VehicleParams,
    pub wind: Wind,
    pub state: State,
}

impl Vehicle {
    /// Fully parameterized vehicle at rest at `pos`/`quat`, clock at zero.
    pub fn new(
        name: impl Into<String>,
        params: VehicleParams,
        pos: Vector3<f64>,
        quat: UnitQuaternion<f64>,
        wind: Wind,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            wind,
            state: State::at_rest(pos, quat),
        }
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }

    /// Wind force acting at the current clock.
    pub fn wind_force(&self) -> Vector3<f64> {
        self.wind.force(self.state.time)
    }

    /// Integrate one step under `rotors` and the current wind.
    /// Returns the wind force that was applied.
    pub fn advance(&mut self, rotors: &RotorSpeeds, dt: f64) -> Vector3<f64> {
        let wind = self.wind_force();
        self.state = euler_step(&self.state, &self.params, rotors, &wind, dt);
        wind
    }
}

// ---------------------------------------------------------------------------
// Preset airframes
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;
    use crate::error::Result;

    /// 1 kg, 0.25 m arm research frame; starts level at (1, 0, 0).
    pub fn default_quad(wind: Wind) -> Result<Vehicle> {
        Ok(Vehicle::new(
            "Quad-250",
            VehicleParamsBuilder::new().build()?,
            Vector3::new(1.0, 0.0, 0.0),
            UnitQuaternion::identity(),
            wind,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn advance_applies_wind_at_current_time() {
        let mut v = presets::default_quad(Wind::along_x(1.0, PI)).unwrap();
        let dt = 0.005;
        let first = v.advance(&RotorSpeeds::default(), dt);
        assert_eq!(first, Vector3::zeros()); // sin(0)
        let second = v.advance(&RotorSpeeds::default(), dt);
        assert!((second.x - (PI * dt).sin()).abs() < 1e-12);
        assert!((v.time() - 2.0 * dt).abs() < 1e-12);
    }

    #[test]
    fn default_quad_starts_level_at_unit_x() {
        let v = presets::default_quad(Wind::calm()).unwrap();
        assert_eq!(v.state.pos, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(v.state.tilt(), 0.0);
        assert!(v.params.hover_speed() > 0.0);
    }
}
