use nalgebra::Matrix4;

use crate::dynamics::quadrotor::Wrench;
use crate::dynamics::state::RotorSpeeds;
use crate::error::{Result, SimError};
use crate::vehicle::VehicleParams;

// ---------------------------------------------------------------------------
// Mixer: [T, τx, τy, τz] → rotor speeds
// ---------------------------------------------------------------------------

/// Inverse of the airframe allocation matrix, computed once per vehicle.
#[derive(Debug, Clone)]
pub struct Mixer {
    inverse: Matrix4<f64>,
}

impl Mixer {
    /// Fails if the allocation is singular (zero thrust/drag coefficient or arm).
    pub fn new(params: &VehicleParams) -> Result<Self> {
        let inverse = params
            .allocation()
            .try_inverse()
            .ok_or(SimError::SingularMixer)?;
        Ok(Self { inverse })
    }

    /// Rotor speeds realizing `wrench`; infeasible (negative) squares clip to 0.
    pub fn mix(&self, wrench: &Wrench) -> RotorSpeeds {
        RotorSpeeds::from_squared(&(self.inverse * wrench.as_vector()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::quadrotor::forward_map;
    use crate::vehicle::VehicleParamsBuilder;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn params() -> VehicleParams {
        VehicleParamsBuilder::new().build().unwrap()
    }

    #[test]
    fn mixer_inverts_forward_map() {
        let p = params();
        let mixer = Mixer::new(&p).unwrap();
        let cases = [
            Wrench { thrust: 9.81, torque: Vector3::zeros() },
            Wrench { thrust: 9.81, torque: Vector3::new(0.05, -0.03, 0.001) },
            Wrench { thrust: 15.0, torque: Vector3::new(-0.2, 0.1, -0.002) },
            Wrench { thrust: 4.0, torque: Vector3::new(0.0, 0.0, 0.004) },
        ];
        for w in cases {
            let back = forward_map(&p, &mixer.mix(&w));
            assert_relative_eq!(back.thrust, w.thrust, epsilon = 1e-9);
            assert_relative_eq!(back.torque, w.torque, epsilon = 1e-9);
        }
    }

    #[test]
    fn matrix_is_exact_inverse() {
        let p = params();
        let mixer = Mixer::new(&p).unwrap();
        let prod = p.allocation() * mixer.inverse;
        assert_relative_eq!(prod, Matrix4::identity(), epsilon = 1e-9);
    }

    #[test]
    fn pure_thrust_splits_evenly() {
        let p = params();
        let mixer = Mixer::new(&p).unwrap();
        let r = mixer.mix(&Wrench { thrust: p.hover_thrust(), torque: Vector3::zeros() });
        for w in r.0 {
            assert_relative_eq!(w, p.hover_speed(), epsilon = 1e-9);
        }
    }

    #[test]
    fn infeasible_command_clips_to_zero() {
        let p = params();
        let mixer = Mixer::new(&p).unwrap();
        // Zero thrust with a roll torque needs a negative square on one rotor.
        let r = mixer.mix(&Wrench { thrust: 0.0, torque: Vector3::new(0.1, 0.0, 0.0) });
        assert!(r.0.iter().all(|w| w.is_finite() && *w >= 0.0));
        assert_eq!(r.0[1], 0.0);
    }

    #[test]
    fn zero_arm_is_singular() {
        let p = VehicleParamsBuilder::new().arm_length(0.0).build().unwrap();
        assert!(matches!(Mixer::new(&p), Err(SimError::SingularMixer)));
    }

    #[test]
    fn zero_drag_is_singular() {
        let p = VehicleParamsBuilder::new().k_drag(0.0).build().unwrap();
        assert!(matches!(Mixer::new(&p), Err(SimError::SingularMixer)));
    }
}
