//! Declarative layer configuration loading
//!
//! A configuration file is an ordered list of layer descriptors. Declaration
//! order is the stacking order (background first) and the order in which the
//! sampler resolves layers, so a `linked_to` reference is only valid when it
//! points at a layer declared earlier in the list.

use crate::io::error::{GenerateError, Result, file_system};
use serde::Deserialize;
use std::path::Path;

/// One declarative layer entry as it appears in the configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct LayerDescriptor {
    /// Stable identifier, used as the target of `linked_to` references
    pub id: u32,
    /// Layer name, used as the metadata column header
    pub name: String,
    /// Asset subdirectory under the assets root
    pub directory: String,
    /// Whether every sample must select a concrete trait from this layer
    pub required: bool,
    /// Relative probability mass per trait, aligned with the sorted asset
    /// listing (sentinel entry first for optional layers); uniform when omitted
    #[serde(default)]
    pub rarity_weights: Option<Vec<f64>>,
    /// Probability that the layer is absent from a sample entirely
    #[serde(default)]
    pub skip_probability: f64,
    /// Id of an earlier layer whose resolved trait this layer copies
    #[serde(default)]
    pub linked_to: Option<u32>,
}

/// Ordered layer descriptors for one collection
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// Layers in stacking order, background first
    pub layers: Vec<LayerDescriptor>,
}

impl CollectionConfig {
    /// Load and deserialize a JSON configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// declares no layers
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| file_system(path, "read configuration", e))?;
        let config: Self =
            serde_json::from_str(&raw).map_err(|e| GenerateError::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        if config.layers.is_empty() {
            return Err(GenerateError::InvalidLayer {
                layer: "<none>".to_string(),
                reason: "configuration declares no layers".to_string(),
            });
        }

        Ok(config)
    }
}
