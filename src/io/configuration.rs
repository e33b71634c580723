//! Runtime defaults and output layout constants

// Default values for configurable parameters
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Default number of images to generate
pub const DEFAULT_COUNT: usize = 10;

/// Default layer configuration file
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Default root directory holding per-layer asset folders
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Default root directory for generated editions
pub const DEFAULT_OUTPUT_DIR: &str = "output";

// Output layout
/// Prefix of the per-edition directory under the output root
pub const EDITION_DIR_PREFIX: &str = "edition ";

/// Subdirectory of an edition holding the numbered rasters
pub const IMAGES_SUBDIR: &str = "images";

/// Filename of the per-edition rarity metadata table
pub const METADATA_FILENAME: &str = "metadata.csv";

/// Subdirectory of the output root for one-off preview renders
pub const SINGLE_IMAGES_SUBDIR: &str = "single_images";

/// Extension used for every generated raster
pub const OUTPUT_EXTENSION: &str = "png";

/// Metadata label written for a sentinel (no-trait) selection
pub const SENTINEL_LABEL: &str = "none";
