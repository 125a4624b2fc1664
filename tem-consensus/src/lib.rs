#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/**
 * The market itself: registration of curves and clearing of offers.
 */
mod market;
pub use market::*;

/**
 * The composite curve and the clearing rule applied to it.
 */
mod aggregate;
pub use aggregate::*;

mod cache;
pub use cache::Cached;

mod clearing;
pub use clearing::*;

mod response;
pub use response::*;

mod schedule;
pub use schedule::*;

/// Reading building definitions and remote curves from documents.
#[cfg(feature = "io")]
pub mod io;
#[cfg(feature = "io")]
pub use io::{BuildingDef, BuildingSet, BuildingSetError, RemoteCurves};

// We use non-std collections here for their ordering semantics and performance
/// An insertion-ordered map with a fast, deterministic hasher
pub type Map<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
