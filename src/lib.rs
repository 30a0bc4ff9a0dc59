#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod config;
pub mod errors;
pub mod manifest;
pub mod models;

pub use builder::{PrecacheArtifacts, PrecacheBuilder};
pub use config::{PrecacheConfig, SizeBudget};
pub use errors::{ManifestError, ManifestResult};
pub use manifest::{ManifestBuild, build_manifest, scan_pattern};
pub use models::{FileRecord, Manifest, ManifestEntry, SizeDecision, SizeOutcome, SizeReport};
