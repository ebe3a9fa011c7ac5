use std::f64::consts::PI;
use std::path::Path;

use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::dynamics::state::{SimConfig, GRAVITY};
use crate::error::{Result, SimError};
use crate::gnc::{CascadeController, CascadeGains, Reference};
use crate::physics::Wind;
use crate::vehicle::{Vehicle, VehicleParams, VehicleParamsBuilder};

// ---------------------------------------------------------------------------
// Airframe section
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub name: String,
    pub mass: f64,
    pub arm_length: f64,
    pub height: f64,
    pub inertia: Matrix3<f64>,
    pub k_thrust: f64,
    pub k_drag: f64,
}

impl VehicleConfig {
    pub fn build(&self) -> Result<VehicleParams> {
        VehicleParamsBuilder::new()
            .mass(self.mass)
            .arm_length(self.arm_length)
            .height(self.height)
            .inertia(self.inertia)
            .k_thrust(self.k_thrust)
            .k_drag(self.k_drag)
            .build()
    }
}

impl VehicleConfig {
    /// Crazyflie 2.x class micro quad (rotor coefficients in (rad/s)^2).
    pub fn crazyflie() -> Self {
        Self {
            name: "Crazyflie".into(),
            mass: 0.027,
            arm_length: 0.046,
            height: 0.02,
            inertia: Matrix3::from_diagonal(&Vector3::new(1.4e-5, 1.4e-5, 2.17e-5)),
            k_thrust: 2.88e-8,
            k_drag: 7.24e-10,
        }
    }
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            name: "Quad-250".into(),
            mass: 1.0,
            arm_length: 0.25,
            height: 0.05,
            inertia: Matrix3::identity() * 0.025,
            k_thrust: 1e-3,
            k_drag: 1e-5,
        }
    }
}

// ---------------------------------------------------------------------------
// Sweep grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub amplitudes: Vec<f64>,       // N
    pub omegas: Vec<f64>,           // rad/s
    pub direction: Vector3<f64>,    // world-frame gust direction
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            amplitudes: vec![0.0, 1.0, 2.0],
            omegas: vec![PI, 2.0 * PI, 3.0 * PI],
            direction: Vector3::x(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario: everything needed to fly one vehicle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub sim: SimConfig,
    pub vehicle: VehicleConfig,
    pub gains: CascadeGains,
    pub wind: Wind,
    pub reference: Reference,
    pub initial_position: Vector3<f64>,
    pub sweep: SweepConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            vehicle: VehicleConfig::default(),
            gains: CascadeGains::default(),
            wind: Wind::calm(),
            reference: Reference::default(),
            initial_position: Vector3::new(1.0, 0.0, 0.0),
            sweep: SweepConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// Read a JSON scenario; missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg: ScenarioConfig = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SimError::InvalidConfig(msg));
        if !(self.sim.dt > 0.0) {
            return invalid(format!("sim.dt must be positive, got {}", self.sim.dt));
        }
        if !(self.sim.max_time > 0.0) {
            return invalid(format!("sim.max_time must be positive, got {}", self.sim.max_time));
        }
        if !(self.vehicle.mass > 0.0) {
            return invalid(format!("vehicle.mass must be positive, got {}", self.vehicle.mass));
        }
        if self.vehicle.inertia.diagonal().iter().any(|&i| !(i > 0.0)) {
            return invalid("vehicle.inertia diagonal must be positive".into());
        }
        match self.reference {
            Reference::FigureEight { period } => {
                if !(period > 0.0) {
                    return invalid(format!("reference.period must be positive, got {}", period));
                }
            }
            Reference::Hover { point } => {
                // Desired acceleration at t = 0, starting from rest.
                let offset = point - self.initial_position;
                let accel = offset * (self.gains.k_p * self.gains.k_d) + Vector3::z() * GRAVITY;
                if accel.z <= 0.0 && accel.xy().norm() <= 1e-9 * accel.z.abs() {
                    return invalid(format!(
                        "hover point ({}, {}, {}) is straight below the start and needs downward thrust",
                        point.x, point.y, point.z
                    ));
                }
            }
        }
        Ok(())
    }

    /// Fresh vehicle at the initial position, level, with `wind`.
    pub fn vehicle_with_wind(&self, wind: Wind) -> Result<Vehicle> {
        Ok(Vehicle::new(
            self.vehicle.name.clone(),
            self.vehicle.build()?,
            self.initial_position,
            UnitQuaternion::identity(),
            wind,
        ))
    }

    pub fn vehicle(&self) -> Result<Vehicle> {
        self.vehicle_with_wind(self.wind)
    }

    pub fn controller(&self) -> Result<CascadeController> {
        CascadeController::new(self.vehicle.build()?, self.gains)
    }
}
