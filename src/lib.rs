pub mod error;
pub mod config;
pub mod physics;
pub mod dynamics;
pub mod vehicle;
mod gnc_mod;
pub mod sim;
pub mod io;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub use error::{Result, SimError};

pub mod types {
    pub use crate::dynamics::state::{Deriv, RotorSpeeds, SimConfig, State, GRAVITY};
    pub use crate::physics::Wind;
    pub use crate::vehicle::{Vehicle, VehicleParams};
}
