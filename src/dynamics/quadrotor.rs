use nalgebra::{Vector3, Vector4};

use crate::dynamics::quat;
use crate::dynamics::state::{gravity, Deriv, RotorSpeeds, State};
use crate::vehicle::VehicleParams;

// ---------------------------------------------------------------------------
// Rotor forward model
// ---------------------------------------------------------------------------

/// Collective thrust (N, along body +Z) and body torque (N·m).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wrench {
    pub thrust: f64,
    pub torque: Vector3<f64>,
}

impl Wrench {
    pub fn as_vector(&self) -> Vector4<f64> {
        Vector4::new(self.thrust, self.torque.x, self.torque.y, self.torque.z)
    }

    pub fn from_vector(v: &Vector4<f64>) -> Self {
        Self {
            thrust: v[0],
            torque: Vector3::new(v[1], v[2], v[3]),
        }
    }
}

/// Map rotor speeds to thrust and torque through the allocation matrix.
pub fn forward_map(params: &VehicleParams, rotors: &RotorSpeeds) -> Wrench {
    Wrench::from_vector(&(params.allocation() * rotors.squared()))
}

// ---------------------------------------------------------------------------
// 6DOF Equations of motion
// ---------------------------------------------------------------------------

/// Compute rigid-body state derivatives.
///
/// Forces & moments:
///   1. Rotor thrust along body +Z, rotated into the world frame
///   2. External world-frame force (wind), zero when undisturbed
///   3. Gravity
///   4. Rotor torques (differential thrust, drag for yaw)
pub fn derivatives(
    state: &State,
    params: &VehicleParams,
    rotors: &RotorSpeeds,
    external_force: &Vector3<f64>,
) -> Deriv {
    let wrench = forward_map(params, rotors);

    // --- Translational ---
    let f_body = Vector3::new(0.0, 0.0, wrench.thrust);
    let f_world = state.rotation() * f_body;
    let accel = (f_world + external_force) / params.mass + gravity();

    // --- Euler's equation: J * domega = torque - omega × (J * omega) ---
    let j_omega = params.inertia * state.omega;
    let domega = params.inertia_inv * (wrench.torque - state.omega.cross(&j_omega));

    // --- Quaternion kinematics: dq/dt = 0.5 * q ⊗ [0, omega] ---
    let dquat = quat::multiply(state.quat.quaternion(), &quat::pure(&state.omega)) * 0.5;

    Deriv {
        dpos: state.vel,
        dvel: accel,
        dquat,
        domega,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::GRAVITY;
    use crate::vehicle::VehicleParamsBuilder;
    use approx::assert_abs_diff_eq;

    fn params() -> VehicleParams {
        VehicleParamsBuilder::new().build().unwrap()
    }

    #[test]
    fn free_fall_without_rotors() {
        let p = params();
        let d = derivatives(&State::default(), &p, &RotorSpeeds::default(), &Vector3::zeros());
        assert_eq!(d.dvel, Vector3::new(0.0, 0.0, -GRAVITY));
        assert_eq!(d.domega, Vector3::zeros());
    }

    #[test]
    fn hover_speed_cancels_gravity() {
        let p = params();
        let rotors = RotorSpeeds::uniform(p.hover_speed());
        let d = derivatives(&State::default(), &p, &rotors, &Vector3::zeros());
        assert_abs_diff_eq!(d.dvel, Vector3::zeros(), epsilon = 1e-9);
    }

    #[test]
    fn torque_sign_convention() {
        let p = params();
        // rotor 3 (-y) faster than rotor 1 (+y): positive roll torque
        let w = p.hover_speed();
        let roll = forward_map(&p, &RotorSpeeds([w, w, w, w + 5.0]));
        assert!(roll.torque.x > 0.0);
        assert_abs_diff_eq!(roll.torque.y, 0.0);
        // rotor 2 (-x) faster than rotor 0 (+x): positive pitch torque
        let pitch = forward_map(&p, &RotorSpeeds([w, w, w + 5.0, w]));
        assert!(pitch.torque.y > 0.0);
        // rotors 0 and 2 faster: positive yaw torque
        let yaw = forward_map(&p, &RotorSpeeds([w + 5.0, w, w + 5.0, w]));
        assert!(yaw.torque.z > 0.0);
        assert_abs_diff_eq!(yaw.torque.x, 0.0);
        assert_abs_diff_eq!(yaw.torque.y, 0.0);
    }

    #[test]
    fn external_force_scales_with_mass() {
        let p = VehicleParamsBuilder::new().mass(2.0).build().unwrap();
        let wind = Vector3::new(4.0, 0.0, 0.0);
        let d = derivatives(&State::default(), &p, &RotorSpeeds::default(), &wind);
        assert_abs_diff_eq!(d.dvel.x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn gyroscopic_term_couples_axes() {
        let p = VehicleParamsBuilder::new()
            .principal_inertia(0.02, 0.03, 0.05)
            .build()
            .unwrap();
        let mut s = State::default();
        s.omega = Vector3::new(1.0, 2.0, 0.0);
        let d = derivatives(&s, &p, &RotorSpeeds::default(), &Vector3::zeros());
        // domega_z = -(Iyy - Ixx) p q / Izz
        assert_abs_diff_eq!(d.domega.z, -(0.03 - 0.02) * 2.0 / 0.05, epsilon = 1e-12);
    }

    #[test]
    fn quat_deriv_zero_at_rest() {
        let p = params();
        let d = derivatives(&State::default(), &p, &RotorSpeeds::default(), &Vector3::zeros());
        assert!(d.dquat.norm() < 1e-12, "No rotation → zero quat derivative");
    }
}
