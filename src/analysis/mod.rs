pub mod ratios;
pub mod yoy;

pub use ratios::*;
pub use yoy::*;
