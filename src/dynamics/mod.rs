pub mod quat;
pub mod state;
pub mod quadrotor;

pub use quadrotor::{derivatives, forward_map, Wrench};
pub use state::{Deriv, RotorSpeeds, SimConfig, State, GRAVITY};
