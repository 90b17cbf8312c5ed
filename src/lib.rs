pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod math;
pub mod placement;
pub mod rand;
pub mod sample;
pub mod script;
pub mod session;
pub mod stroke;

pub use error::PaintError;
