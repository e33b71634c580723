//! Error types and propagation helpers for collection generation

use std::fmt;
use std::path::PathBuf;

/// Main error type for all collection generation operations
#[derive(Debug)]
pub enum GenerateError {
    /// Layer configuration file could not be parsed
    ConfigParse {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying deserialization error
        source: serde_json::Error,
    },

    /// A layer descriptor failed validation
    InvalidLayer {
        /// Name of the offending layer
        layer: String,
        /// Description of what is wrong with the layer
        reason: String,
    },

    /// Cumulative-distribution search failed to locate an index
    ///
    /// Indicates broken weight normalization, not a configuration mistake.
    /// Cannot occur for a catalog whose cumulative sums end at exactly 1.
    SamplingInvariant {
        /// Name of the layer being sampled
        layer: String,
        /// The uniform draw that found no bucket
        value: f64,
    },

    /// Failed to load a trait asset as an image
    ImageLoad {
        /// Path to the asset file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a composited image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// A sample path entry is not a recognized raster format
    ///
    /// Only raised under [`OverlayPolicy::Strict`](crate::compositor::OverlayPolicy);
    /// the lenient policy skips such entries.
    UnsupportedAsset {
        /// Path to the unrecognized entry
        path: PathBuf,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Run parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse { path, source } => {
                write!(f, "Failed to parse config '{}': {source}", path.display())
            }
            Self::InvalidLayer { layer, reason } => {
                write!(f, "Invalid layer '{layer}': {reason}")
            }
            Self::SamplingInvariant { layer, value } => {
                write!(
                    f,
                    "No cumulative bucket for draw {value} in layer '{layer}' (normalization bug)"
                )
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::UnsupportedAsset { path } => {
                write!(
                    f,
                    "Asset '{}' is not a recognized raster format",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerateError>;

impl From<image::ImageError> for GenerateError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for GenerateError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerateError {
    GenerateError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid layer error
pub fn invalid_layer(layer: &impl ToString, reason: &impl ToString) -> GenerateError {
    GenerateError::InvalidLayer {
        layer: layer.to_string(),
        reason: reason.to_string(),
    }
}

/// Wrap an I/O error with the path and operation it occurred on
pub fn file_system(
    path: &std::path::Path,
    operation: &'static str,
    source: std::io::Error,
) -> GenerateError {
    GenerateError::FileSystem {
        path: path.to_path_buf(),
        operation,
        source,
    }
}
