//! Layer catalog: validated, weighted, ordered trait lists per layer
//!
//! The catalog is built once per run from the declarative configuration and
//! is immutable afterwards. Each layer pairs its discovered trait assets with
//! a normalized rarity distribution and the cumulative sums the sampler's
//! half-open bucket search runs against.

/// Stable trait asset enumeration
pub mod discovery;

use crate::io::config::{CollectionConfig, LayerDescriptor};
use crate::io::error::{Result, invalid_layer};
use std::path::Path;

/// One validated layer with its weighted, ordered trait list
///
/// For optional layers the trait list starts with a sentinel entry
/// (`None`) meaning "no trait selected"; the sentinel takes part in the
/// rarity distribution like any concrete trait.
#[derive(Debug, Clone)]
pub struct LayerSpec {
    /// Stable identifier from the configuration
    pub id: u32,
    /// Layer name, used as the metadata column header
    pub name: String,
    /// Asset subdirectory under the assets root
    pub directory: String,
    /// Whether the sentinel entry is absent from the trait list
    pub required: bool,
    /// Probability that the layer is absent from a sample entirely
    pub skip_probability: f64,
    /// Id of the earlier layer this layer copies, if any
    pub linked_to: Option<u32>,
    /// Position of the linked layer in declaration order, resolved at build time
    linked_index: Option<usize>,
    /// Trait asset filenames in sorted order; `None` is the sentinel
    traits: Vec<Option<String>>,
    /// Normalized rarity weights, aligned 1:1 with `traits`
    weights: Vec<f64>,
    /// Non-decreasing partial sums of `weights`, last element exactly 1
    cumulative: Vec<f64>,
}

impl LayerSpec {
    /// Trait asset filenames in selection-index order (`None` = sentinel)
    pub fn traits(&self) -> &[Option<String>] {
        &self.traits
    }

    /// Normalized rarity weights aligned with [`traits`](Self::traits)
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Cumulative weight sums the sampler searches against
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Number of selectable entries, sentinel included
    pub fn trait_count(&self) -> usize {
        self.traits.len()
    }

    /// Position of the linked layer in declaration order, if any
    pub const fn linked_index(&self) -> Option<usize> {
        self.linked_index
    }
}

/// All validated layers for one collection, in declaration order
#[derive(Debug, Clone)]
pub struct LayerCatalog {
    layers: Vec<LayerSpec>,
}

impl LayerCatalog {
    /// Build and validate the catalog from configuration and an assets root
    ///
    /// Asset files under each layer's directory are enumerated in sorted
    /// order; that order is the index space explicit `rarity_weights` must
    /// align with.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer id repeats, a layer directory cannot be
    /// read, a required layer has no traits, explicit weights mismatch the
    /// trait count or sum to zero, a `linked_to` reference does not point at
    /// an earlier layer, a `skip_probability` lies outside `[0, 1)`, or the
    /// first layer cannot serve as the base canvas (optional, skippable, or
    /// linked)
    pub fn from_config(config: &CollectionConfig, assets_root: &Path) -> Result<Self> {
        let mut layers: Vec<LayerSpec> = Vec::with_capacity(config.layers.len());

        for (position, descriptor) in config.layers.iter().enumerate() {
            // Link targets resolve by id, so ids must be unique
            if layers.iter().any(|layer| layer.id == descriptor.id) {
                return Err(invalid_layer(
                    &descriptor.name,
                    &format!("duplicate layer id {}", descriptor.id),
                ));
            }
            let layer = build_layer(descriptor, assets_root, position, &layers)?;
            layers.push(layer);
        }

        Ok(Self { layers })
    }

    /// Validated layers in declaration order
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    /// Number of layers in the catalog
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Metadata column headers, one per layer in declaration order
    pub fn column_names(&self) -> Vec<String> {
        self.layers.iter().map(|layer| layer.name.clone()).collect()
    }

    /// Total distinct trait combinations, sentinel entries included
    ///
    /// Informational only; sampling correctness does not depend on it.
    pub fn total_combinations(&self) -> u128 {
        self.layers
            .iter()
            .map(|layer| layer.trait_count() as u128)
            .product()
    }
}

fn build_layer(
    descriptor: &LayerDescriptor,
    assets_root: &Path,
    position: usize,
    earlier: &[LayerSpec],
) -> Result<LayerSpec> {
    let layer_dir = assets_root.join(&descriptor.directory);
    let assets = discovery::list_trait_assets(&layer_dir).map_err(|e| {
        invalid_layer(
            &descriptor.name,
            &format!("cannot enumerate '{}': {e}", layer_dir.display()),
        )
    })?;

    if descriptor.required && assets.is_empty() {
        return Err(invalid_layer(
            &descriptor.name,
            &format!("required layer has no traits under '{}'", layer_dir.display()),
        ));
    }

    let mut traits: Vec<Option<String>> = Vec::with_capacity(assets.len() + 1);
    if !descriptor.required {
        traits.push(None);
    }
    traits.extend(assets.into_iter().map(Some));

    let raw_weights = match &descriptor.rarity_weights {
        // Uniform share for every entry, sentinel included
        None => vec![1.0; traits.len()],
        Some(explicit) => {
            if explicit.len() != traits.len() {
                return Err(invalid_layer(
                    &descriptor.name,
                    &format!(
                        "{} rarity weights given for {} trait entries (sentinel included)",
                        explicit.len(),
                        traits.len()
                    ),
                ));
            }
            if explicit.iter().any(|&w| w < 0.0) {
                return Err(invalid_layer(
                    &descriptor.name,
                    &"rarity weights must be non-negative",
                ));
            }
            explicit.clone()
        }
    };

    let weights = normalize(&raw_weights)
        .ok_or_else(|| invalid_layer(&descriptor.name, &"rarity weights sum to zero"))?;
    let cumulative = cumulative_sums(&weights);

    if !(0.0..1.0).contains(&descriptor.skip_probability) {
        return Err(invalid_layer(
            &descriptor.name,
            &format!(
                "skip_probability {} lies outside [0, 1)",
                descriptor.skip_probability
            ),
        ));
    }

    let linked_index = match descriptor.linked_to {
        None => None,
        Some(target) => {
            let index = earlier.iter().position(|layer| layer.id == target);
            match index {
                Some(i) => Some(i),
                None => {
                    return Err(invalid_layer(
                        &descriptor.name,
                        &format!("linked_to {target} does not reference an earlier layer"),
                    ));
                }
            }
        }
    };

    // The first layer opens as the base canvas, so it must always resolve
    // to a concrete asset
    if position == 0
        && (!descriptor.required
            || descriptor.skip_probability > 0.0
            || descriptor.linked_to.is_some())
    {
        return Err(invalid_layer(
            &descriptor.name,
            &"the first layer is the background and must be required, unskippable, and unlinked",
        ));
    }

    Ok(LayerSpec {
        id: descriptor.id,
        name: descriptor.name.clone(),
        directory: descriptor.directory.clone(),
        required: descriptor.required,
        skip_probability: descriptor.skip_probability,
        linked_to: descriptor.linked_to,
        linked_index,
        traits,
        weights,
        cumulative,
    })
}

/// Scale weights so they sum to 1; `None` when the total is not positive
fn normalize(weights: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }
    Some(weights.iter().map(|w| w / total).collect())
}

/// Running partial sums, with the final entry pinned to exactly 1 so a
/// uniform draw in [0, 1) always lands inside the last bucket
fn cumulative_sums(weights: &[f64]) -> Vec<f64> {
    let mut running = 0.0;
    let mut sums: Vec<f64> = weights
        .iter()
        .map(|w| {
            running += w;
            running
        })
        .collect();
    if let Some(last) = sums.last_mut() {
        *last = 1.0;
    }
    sums
}
