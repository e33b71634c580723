//! Trait vector sampling with per-layer skip and link rules
//!
//! One draw resolves every layer in declaration order. A layer either copies
//! an earlier layer's resolved choice (`linked_to`), sits the sample out
//! (`skip_probability`), or selects a trait index by searching its cumulative
//! rarity distribution with the half-open bucket rule.

/// Injectable uniform random sources
pub mod random;

use crate::catalog::{LayerCatalog, LayerSpec};
use crate::io::error::{GenerateError, Result};
use random::UnitSource;
use std::path::PathBuf;

/// The resolved outcome for one layer within one sample
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TraitChoice {
    /// A concrete trait asset was selected (filename with extension)
    Selected(String),
    /// The sentinel entry of an optional layer was selected
    NoTrait,
    /// The layer's skip rule fired; it is absent from this sample
    Skipped,
}

/// One choice per layer, in declaration order; immutable once drawn
pub type TraitVector = Vec<TraitChoice>;

/// A drawn trait vector with the asset paths it composites from
#[derive(Debug, Clone)]
pub struct Sample {
    /// Resolved choice per layer, in declaration order
    pub choices: TraitVector,
    /// Asset paths relative to the assets root, background first;
    /// sentinel and skipped layers contribute no entry
    pub paths: Vec<PathBuf>,
}

/// Draw one trait vector across all catalog layers
///
/// Consumes one draw per independently sampled layer, plus one more for each
/// layer with a skip rule; linked layers consume none.
///
/// # Errors
///
/// Returns [`GenerateError::SamplingInvariant`] if the cumulative bucket
/// search fails for a valid draw, which indicates broken normalization
pub fn draw_sample(catalog: &LayerCatalog, source: &mut dyn UnitSource) -> Result<Sample> {
    let layers = catalog.layers();
    let mut choices: TraitVector = Vec::with_capacity(layers.len());
    let mut paths = Vec::new();

    for layer in layers {
        let choice = match layer.linked_index() {
            Some(target) => resolve_link(layer, target, &choices)?,
            None => resolve_independent(layer, source)?,
        };

        if let TraitChoice::Selected(file) = &choice {
            paths.push(PathBuf::from(&layer.directory).join(file));
        }
        choices.push(choice);
    }

    Ok(Sample { choices, paths })
}

/// Smallest index whose cumulative bucket contains `u`
///
/// Buckets are half-open: index `i` covers `[cumulative[i-1], cumulative[i])`
/// with an implicit 0 before the first entry, so a draw exactly on a boundary
/// belongs to the bucket above it.
pub fn select_index(cumulative: &[f64], u: f64) -> Option<usize> {
    let mut lower = 0.0;
    for (index, &upper) in cumulative.iter().enumerate() {
        if lower <= u && u < upper {
            return Some(index);
        }
        lower = upper;
    }
    None
}

fn resolve_independent(layer: &LayerSpec, source: &mut dyn UnitSource) -> Result<TraitChoice> {
    let u = source.next_unit();

    if layer.skip_probability > 0.0 && source.next_unit() < layer.skip_probability {
        return Ok(TraitChoice::Skipped);
    }

    let index = select_index(layer.cumulative(), u).ok_or_else(|| {
        GenerateError::SamplingInvariant {
            layer: layer.name.clone(),
            value: u,
        }
    })?;

    match layer.traits().get(index) {
        Some(Some(file)) => Ok(TraitChoice::Selected(file.clone())),
        Some(None) => Ok(TraitChoice::NoTrait),
        None => Err(GenerateError::SamplingInvariant {
            layer: layer.name.clone(),
            value: u,
        }),
    }
}

/// Copy the referenced layer's already-resolved choice
///
/// A copied concrete trait keeps the trait filename but composites from the
/// linking layer's own directory. The catalog validates that link targets
/// resolve earlier in the pass, so the lookup failing means the catalog was
/// bypassed.
fn resolve_link(layer: &LayerSpec, target: usize, resolved: &[TraitChoice]) -> Result<TraitChoice> {
    resolved.get(target).cloned().ok_or_else(|| {
        crate::io::error::invalid_layer(
            &layer.name,
            &format!("link target at position {target} is not resolved yet"),
        )
    })
}
