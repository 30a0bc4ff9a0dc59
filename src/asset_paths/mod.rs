//! Path helpers shared by the scanner and manifest generation.
//!
//! Pattern compilation and relative path formatting live in separate submodules so that
//! both can be tested without touching the filesystem.

mod patterns;
mod relative;

pub use patterns::GlobPattern;
pub use relative::relative_posix_path;
