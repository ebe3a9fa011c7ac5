use nalgebra::{Matrix3, Matrix3x6, Matrix4, Vector3};

use crate::dynamics::state::State;
use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Airframe parameters (constant for a run)
// ---------------------------------------------------------------------------

/// Number of frame markers: four rotors, body origin, vertical marker.
pub const FRAME_MARKERS: usize = 6;

#[derive(Debug, Clone)]
pub struct VehicleParams {
    pub mass: f64,                 // kg
    pub arm_length: f64,           // m, rotor hub to body origin
    pub height: f64,               // m, vertical marker offset
    pub inertia: Matrix3<f64>,     // kg·m^2, body frame
    pub inertia_inv: Matrix3<f64>,
    pub k_thrust: f64,             // N/(rad/s)^2
    pub k_drag: f64,               // N·m/(rad/s)^2
}

impl VehicleParams {
    /// Body-frame markers in column order m0 m1 m2 m3 origin h.
    pub fn body_frame(&self) -> Matrix3x6<f64> {
        let l = self.arm_length;
        Matrix3x6::from_columns(&[
            Vector3::new(l, 0.0, 0.0),
            Vector3::new(0.0, l, 0.0),
            Vector3::new(-l, 0.0, 0.0),
            Vector3::new(0.0, -l, 0.0),
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, self.height),
        ])
    }

    /// World-frame marker positions for `state`: rows x, y, z.
    pub fn frame_points(&self, state: &State) -> Matrix3x6<f64> {
        let mut pts = state.rotation() * self.body_frame();
        for i in 0..FRAME_MARKERS {
            let col = pts.column(i) + state.pos;
            pts.set_column(i, &col);
        }
        pts
    }

    /// Forward allocation matrix: squared rotor speeds → [T, τx, τy, τz].
    ///
    /// Rows follow the layout `{+x, +y, -x, -y}`:
    ///   T  = k_t (w0² + w1² + w2² + w3²)
    ///   τx = k_t L (w3² - w1²)
    ///   τy = k_t L (w2² - w0²)
    ///   τz = k_d (w0² - w1² + w2² - w3²)
    pub fn allocation(&self) -> Matrix4<f64> {
        let kt = self.k_thrust;
        let lk = self.arm_length * kt;
        let kd = self.k_drag;
        Matrix4::new(
            kt,  kt,  kt,  kt,
            0.0, -lk, 0.0, lk,
            -lk, 0.0, lk,  0.0,
            kd,  -kd, kd,  -kd,
        )
    }

    /// Total thrust needed to hover, N.
    pub fn hover_thrust(&self) -> f64 {
        self.mass * crate::dynamics::state::GRAVITY
    }

    /// Per-rotor speed that balances gravity, rad/s.
    pub fn hover_speed(&self) -> f64 {
        (self.hover_thrust() / (4.0 * self.k_thrust)).sqrt()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

pub struct VehicleParamsBuilder {
    mass: f64,
    arm_length: f64,
    height: f64,
    inertia: Matrix3<f64>,
    k_thrust: f64,
    k_drag: f64,
}

impl VehicleParamsBuilder {
    pub fn new() -> Self {
        Self {
            mass: 1.0,
            arm_length: 0.25,
            height: 0.05,
            inertia: Matrix3::identity() * 0.025,
            k_thrust: 1e-3,
            k_drag: 1e-5,
        }
    }

    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    pub fn arm_length(mut self, v: f64) -> Self { self.arm_length = v; self }
    pub fn height(mut self, v: f64) -> Self { self.height = v; self }
    pub fn inertia(mut self, v: Matrix3<f64>) -> Self { self.inertia = v; self }
    pub fn k_thrust(mut self, v: f64) -> Self { self.k_thrust = v; self }
    pub fn k_drag(mut self, v: f64) -> Self { self.k_drag = v; self }

    /// Diagonal inertia from principal moments.
    pub fn principal_inertia(self, ixx: f64, iyy: f64, izz: f64) -> Self {
        self.inertia(Matrix3::from_diagonal(&Vector3::new(ixx, iyy, izz)))
    }

    pub fn build(self) -> Result<VehicleParams> {
        if !(self.mass > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        let inertia_inv = self.inertia.try_inverse().ok_or_else(|| {
            SimError::InvalidConfig("inertia tensor is not invertible".into())
        })?;
        Ok(VehicleParams {
            mass: self.mass,
            arm_length: self.arm_length,
            height: self.height,
            inertia: self.inertia,
            inertia_inv,
            k_thrust: self.k_thrust,
            k_drag: self.k_drag,
        })
    }
}

impl Default for VehicleParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
