//! Core library for the supplier risk map
//!
//! This crate ties the distance engine in `riskmap-geo` to the risk map domain:
//!
//! - **Model**: distribution centers, supplier shops and risk levels
//! - **Repository**: read-only access to a validated dataset
//! - **Resolver**: nearest center for a shop, single or batch
//! - **Statistics**: risk distribution and high-risk alerting
//! - **Rendering**: renderer-agnostic map scenes and a GeoJSON sink
//! - **Configuration**: TOML-based configuration with defaults
//! - **Error handling**: errors with codes, context, and recovery suggestions
//!
//! # Example
//!
//! ```rust,no_run
//! use riskmap_core::repository::InMemoryRepository;
//! use riskmap_core::resolver::resolve_by_id;
//!
//! let repo = InMemoryRepository::open("data/sample.json").expect("dataset");
//! if let Some(result) = resolve_by_id(&repo, 1).expect("resolution") {
//!     println!("{} -> {}: {}", result.shop.name, result.center.name, result.label());
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod render;
pub mod repository;
pub mod resolver;
pub mod stats;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::filter::RiskFilter;
    pub use crate::model::{Center, RiskLevel, Shop};
    pub use crate::render::{GeoJsonRenderer, MapRenderer, MapScene};
    pub use crate::repository::{Dataset, InMemoryRepository, Repository};
    pub use crate::resolver::{
        rank_centers, resolve, resolve_all, resolve_by_id, shops_within_radius, NearestResult,
    };
    pub use crate::stats::{AlertLevel, RiskStats};
    pub use riskmap_geo::{DistanceLabel, GeoPoint};
}
