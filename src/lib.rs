//! Layered image collection generator using weighted trait sampling
//!
//! The system resolves declarative layer descriptors into weighted trait
//! catalogs, draws one trait per layer according to each layer's rarity
//! distribution, composites the selected assets into rasters, and finalizes
//! the collection by removing exact-duplicate trait combinations and
//! renumbering the survivors contiguously.

#![forbid(unsafe_code)]

/// Layer catalog construction, asset discovery, and weight normalization
pub mod catalog;
/// Collection assembly, duplicate removal, renumbering, and metadata export
pub mod collection;
/// Sequential alpha-overlay rendering of sampled trait layers
pub mod compositor;
/// Input/output operations and error handling
pub mod io;
/// Trait vector sampling with per-layer skip and link rules
pub mod sampler;

pub use io::error::{GenerateError, Result};
