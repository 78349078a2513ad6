//! Option registration, overrides, and value resolution.

mod env;
mod error;
mod nest;
mod option;
mod overrides;
mod registry;

pub use error::ConfigError;
pub use option::{ConfigOption, Namespace};
pub use overrides::{Overrides, OverridesBuilder};
pub use registry::ConfigRegistry;
