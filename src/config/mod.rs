//! Configuration: environment-driven settings and fixed limits.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
