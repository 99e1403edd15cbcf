pub mod gain;
pub mod settings;

pub use gain::*;
pub use settings::*;
