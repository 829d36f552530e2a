//! Configuration loading and schema definitions
//!
//! Settings for the dataset location, map scene, risk thresholds and logging.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
