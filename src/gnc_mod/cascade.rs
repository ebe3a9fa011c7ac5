use nalgebra::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::mixer::Mixer;
use crate::dynamics::quadrotor::Wrench;
use crate::dynamics::quat;
use crate::dynamics::state::{RotorSpeeds, State, GRAVITY};
use crate::error::Result;
use crate::vehicle::VehicleParams;

// ---------------------------------------------------------------------------
// Gains
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeGains {
    pub k_p: f64,      // position → velocity reference, 1/s
    pub k_d: f64,      // velocity → acceleration, 1/s
    pub k_q: f64,      // attitude error → rate reference, 1/s
    pub k_omega: f64,  // rate error → angular acceleration, 1/s
}

impl Default for CascadeGains {
    fn default() -> Self {
        Self {
            k_p: 1.0,
            k_d: 10.0,
            k_q: 20.0,
            k_omega: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Cascaded position → attitude → mixer controller
// ---------------------------------------------------------------------------

/// Stateless PD cascade: the output depends only on the state and target.
#[derive(Debug, Clone)]
pub struct CascadeController {
    pub params: VehicleParams,
    pub gains: CascadeGains,
    mixer: Mixer,
}

impl CascadeController {
    /// Builds the mixer up front; a singular airframe is rejected here.
    pub fn new(params: VehicleParams, gains: CascadeGains) -> Result<Self> {
        let mixer = Mixer::new(&params)?;
        Ok(Self { params, gains, mixer })
    }

    /// World-frame force the position loop asks for, N.
    pub fn desired_force(&self, state: &State, target: &Vector3<f64>) -> Vector3<f64> {
        let g = &self.gains;
        let v_ref = -g.k_p * (state.pos - target);
        let accel = -g.k_d * (state.vel - v_ref) + Vector3::new(0.0, 0.0, GRAVITY);
        accel * self.params.mass
    }

    /// Attitude that points body +Z along `force`.
    pub fn reference_attitude(force: &Vector3<f64>) -> Result<Quaternion<f64>> {
        quat::from_vectors(&Vector3::z(), &quat::normalize(force)?)
    }

    /// Rotation from body to reference, short way round.
    pub fn attitude_error(q_ref: &Quaternion<f64>, q: &Quaternion<f64>) -> Quaternion<f64> {
        quat::shortest_path(quat::multiply(&quat::conjugate(q_ref), q))
    }

    /// Collective thrust and body torque for this tick.
    pub fn wrench(&self, state: &State, target: &Vector3<f64>) -> Result<Wrench> {
        let g = &self.gains;
        let j = &self.params.inertia;

        // --- Position loop ---
        let f = self.desired_force(state, target);
        let f_body = state.rotation().transpose() * f;
        let thrust = f_body.z.max(0.0);

        // --- Attitude loop ---
        let q_ref = Self::reference_attitude(&f)?;
        let q_err = Self::attitude_error(&q_ref, state.quat.quaternion());
        let omega_ref = -g.k_q * 2.0 * q_err.imag();
        let alpha = -g.k_omega * (state.omega - omega_ref);
        // Feed forward the gyroscopic term the plant will subtract.
        let torque = j * alpha + state.omega.cross(&(j * state.omega));

        Ok(Wrench { thrust, torque })
    }
}

impl super::Controller for CascadeController {
    fn control(&mut self, state: &State, target: &Vector3<f64>) -> Result<RotorSpeeds> {
        let w = self.wrench(state, target)?;
        Ok(self.mixer.mix(&w))
    }

    fn name(&self) -> &str {
        "CascadeController"
    }
}
