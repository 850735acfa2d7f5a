//! Version tables and resolution.
//!
//! Maps exact framework version strings to collector implementation
//! generations, per operation, and loads those tables from manifests.

pub mod manifest;

mod resolver;
mod table;

pub use manifest::{FallbackSpec, GenerationSpec, ManifestError, OperationSpec, TableManifest};
pub use resolver::{FallbackPolicy, LatestTag, Resolution, ResolveError, VersionResolver};
pub use table::{Generation, GenerationTag, OperationTable, TableBuilder, TableError, VersionTable};
