pub mod wind;

pub use wind::Wind;
