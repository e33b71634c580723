//! Sequential alpha-overlay rendering of sampled trait layers
//!
//! The first sample path opens as the base canvas; every later path is
//! alpha-composited onto it at the origin using its own per-pixel alpha.
//! Assets are expected to be pre-sized to the canvas frame, no scaling is
//! performed. Rendering is deterministic: the same ordered paths always
//! produce a pixel-identical raster.

use crate::io::configuration::SINGLE_IMAGES_SUBDIR;
use crate::io::error::{GenerateError, Result, file_system, invalid_parameter};
use image::{ImageFormat, RgbaImage, imageops};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Handling of sample path entries that are not a recognized raster format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlayPolicy {
    /// Skip unrecognized entries silently
    ///
    /// Matches the historical behavior, but masks configuration mistakes
    /// such as stray non-image files in a layer directory.
    #[default]
    Lenient,
    /// Fail with [`GenerateError::UnsupportedAsset`] on unrecognized entries
    Strict,
}

/// Composite the given sample paths into a single raster
///
/// Paths are relative to `assets_root`, background first. Entries whose
/// extension is not a recognized raster format are handled per `policy`;
/// entries that are recognized but missing or corrupt are always fatal.
///
/// # Errors
///
/// Returns an error if no paths are given, an image fails to load, or a
/// non-raster entry is encountered under [`OverlayPolicy::Strict`]
pub fn compose(
    assets_root: &Path,
    sample_paths: &[PathBuf],
    policy: OverlayPolicy,
) -> Result<RgbaImage> {
    let (background, overlays) = sample_paths.split_first().ok_or_else(|| {
        invalid_parameter(
            "sample_paths",
            &"[]",
            &"at least a background layer is required",
        )
    })?;

    let mut canvas = open_rgba(&assets_root.join(background))?;

    for relative in overlays {
        let path = assets_root.join(relative);
        if ImageFormat::from_path(&path).is_err() {
            match policy {
                OverlayPolicy::Lenient => continue,
                OverlayPolicy::Strict => return Err(GenerateError::UnsupportedAsset { path }),
            }
        }
        let layer_image = open_rgba(&path)?;
        imageops::overlay(&mut canvas, &layer_image, 0, 0);
    }

    Ok(canvas)
}

/// Composite the sample paths and write the result to `output_path`
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error on any [`compose`] failure, or if the directory cannot
/// be created or the raster cannot be saved
pub fn compose_to(
    assets_root: &Path,
    sample_paths: &[PathBuf],
    policy: OverlayPolicy,
    output_path: &Path,
) -> Result<()> {
    let canvas = compose(assets_root, sample_paths, policy)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| file_system(parent, "create directory", e))?;
    }

    canvas
        .save(output_path)
        .map_err(|e| GenerateError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}

/// Render a one-off stack into the preview directory, returning its path
///
/// The raster lands under `<output_root>/single_images/` named by the
/// current Unix timestamp.
///
/// # Errors
///
/// Returns an error on any [`compose_to`] failure
pub fn compose_preview(
    assets_root: &Path,
    sample_paths: &[PathBuf],
    policy: OverlayPolicy,
    output_root: &Path,
) -> Result<PathBuf> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    let output_path = output_root
        .join(SINGLE_IMAGES_SUBDIR)
        .join(format!("{stamp}.png"));
    compose_to(assets_root, sample_paths, policy, &output_path)?;
    Ok(output_path)
}

fn open_rgba(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| GenerateError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })
}
