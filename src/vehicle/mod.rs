pub mod params;
pub mod quadcopter;

pub use params::{VehicleParams, VehicleParamsBuilder, FRAME_MARKERS};
pub use quadcopter::{presets, Vehicle};
