use nalgebra::{Quaternion, UnitQuaternion, Vector3, Vector4};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

/// Gravitational acceleration magnitude, m/s^2 (flat earth, constant).
pub const GRAVITY: f64 = 9.81;

/// World-frame gravity vector (z up).
pub fn gravity() -> Vector3<f64> {
    Vector3::new(0.0, 0.0, -GRAVITY)
}

// ---------------------------------------------------------------------------
// Rigid-body state: position, velocity, attitude, angular rate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub time: f64,                      // s, clock stamp of this snapshot
    pub pos: Vector3<f64>,              // m, world frame
    pub vel: Vector3<f64>,              // m/s, world frame
    pub quat: UnitQuaternion<f64>,      // body→world rotation, [w, x, y, z]
    pub omega: Vector3<f64>,            // rad/s, body frame angular velocity
}

impl State {
    /// At rest at `pos` with attitude `quat`, clock at zero.
    pub fn at_rest(pos: Vector3<f64>, quat: UnitQuaternion<f64>) -> Self {
        Self {
            time: 0.0,
            pos,
            vel: Vector3::zeros(),
            quat,
            omega: Vector3::zeros(),
        }
    }

    /// Explicit Euler update `x + dt·ẋ`, quaternion renormalized afterwards.
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        let q_raw = self.quat.quaternion() + d.dquat * dt;
        State {
            time: self.time + dt,
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
            quat: UnitQuaternion::new_normalize(q_raw),
            omega: self.omega + d.domega * dt,
        }
    }

    /// Body→world rotation matrix.
    pub fn rotation(&self) -> nalgebra::Matrix3<f64> {
        self.quat.to_rotation_matrix().into_inner()
    }

    /// Body Z-axis (thrust direction) in world frame.
    pub fn body_z(&self) -> Vector3<f64> {
        self.quat * Vector3::z()
    }

    /// Angle between body Z and world up (rad).
    pub fn tilt(&self) -> f64 {
        self.body_z().z.clamp(-1.0, 1.0).acos()
    }

    /// Orientation as scalar-first `[w, x, y, z]`.
    pub fn quat_wxyz(&self) -> Vector4<f64> {
        let q = self.quat.quaternion();
        Vector4::new(q.w, q.i, q.j, q.k)
    }

    /// All 13 rigid-body components (and the clock) are finite.
    pub fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.pos.iter().all(|x| x.is_finite())
            && self.vel.iter().all(|x| x.is_finite())
            && self.quat.coords.iter().all(|x| x.is_finite())
            && self.omega.iter().all(|x| x.is_finite())
    }
}

impl Default for State {
    fn default() -> Self {
        Self::at_rest(Vector3::zeros(), UnitQuaternion::identity())
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Deriv {
    pub dpos: Vector3<f64>,
    pub dvel: Vector3<f64>,
    pub dquat: Quaternion<f64>,   // NOT unit — raw quaternion derivative
    pub domega: Vector3<f64>,     // angular acceleration, body frame
}

// ---------------------------------------------------------------------------
// Control command: four rotor angular speeds
// ---------------------------------------------------------------------------

/// Rotor angular speeds (rad/s) in layout order `{+x, +y, -x, -y}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotorSpeeds(pub [f64; 4]);

impl RotorSpeeds {
    /// Equal speed on every rotor.
    pub fn uniform(speed: f64) -> Self {
        Self([speed; 4])
    }

    /// Square roots of the squared speeds, negatives clipped to zero first.
    pub fn from_squared(squared: &Vector4<f64>) -> Self {
        Self([
            squared[0].max(0.0).sqrt(),
            squared[1].max(0.0).sqrt(),
            squared[2].max(0.0).sqrt(),
            squared[3].max(0.0).sqrt(),
        ])
    }

    pub fn squared(&self) -> Vector4<f64> {
        Vector4::from_iterator(self.0.iter().map(|w| w * w))
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(0.0_f64, f64::max)
    }

    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / 4.0
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,
    pub max_time: f64,
}

impl SimConfig {
    /// Number of fixed steps needed to cover `max_time`.
    pub fn steps(&self) -> usize {
        (self.max_time / self.dt).round() as usize
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 200.0,  // 200 Hz control loop
            max_time: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn apply_renormalizes_quaternion() {
        let s = State::default();
        let d = Deriv {
            dpos: Vector3::zeros(),
            dvel: Vector3::zeros(),
            dquat: Quaternion::new(0.3, 2.0, -1.0, 0.5),
            domega: Vector3::zeros(),
        };
        let next = s.apply(&d, 0.1);
        assert_relative_eq!(next.quat.quaternion().norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(next.time, 0.1);
    }

    #[test]
    fn rotor_speeds_clip_negative_squares() {
        let r = RotorSpeeds::from_squared(&Vector4::new(4.0, -1e-9, 9.0, 0.0));
        assert_eq!(r.0, [2.0, 0.0, 3.0, 0.0]);
        assert_eq!(r.max(), 3.0);
    }

    #[test]
    fn non_finite_state_detected() {
        let mut s = State::default();
        assert!(s.is_finite());
        s.vel.y = f64::NAN;
        assert!(!s.is_finite());
    }

    #[test]
    fn level_attitude_has_zero_tilt() {
        let s = State::default();
        assert_relative_eq!(s.tilt(), 0.0);
        assert_eq!(s.quat_wxyz(), Vector4::new(1.0, 0.0, 0.0, 0.0));
    }
}
