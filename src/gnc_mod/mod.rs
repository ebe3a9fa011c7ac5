pub mod controller;
pub mod cascade;
pub mod mixer;
pub mod guidance;

pub use controller::Controller;
pub use cascade::{CascadeController, CascadeGains};
pub use mixer::Mixer;
pub use guidance::Reference;
