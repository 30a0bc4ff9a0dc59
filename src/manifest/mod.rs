//! Precache manifest generation broken into focused submodules for easier testing.

mod generation;
mod scanning;

pub use generation::{ManifestBuild, build_manifest};
pub use scanning::{content_hash, scan_pattern};
