//! Collection assembly: sampling orchestration, dedup, renumbering, metadata
//!
//! A build runs as `Validating → Sampling → Deduping → Renumbering → Done`.
//! Validation happens in the constructor, so a builder in hand has already
//! passed it. Any failure after that point marks the build `Failed` and
//! aborts with no rollback: consistency across the output directory is only
//! guaranteed for an uninterrupted successful run.

/// Rarity table and CSV metadata export
pub mod rarity;

use crate::catalog::LayerCatalog;
use crate::compositor::{self, OverlayPolicy};
use crate::io::config::CollectionConfig;
use crate::io::configuration::{
    EDITION_DIR_PREFIX, IMAGES_SUBDIR, METADATA_FILENAME, OUTPUT_EXTENSION,
};
use crate::io::error::{Result, file_system, invalid_parameter};
use crate::sampler::{self, random::UnitSource};
use rarity::RarityTable;
use std::path::{Path, PathBuf};

/// Observable stage of a collection build
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildPhase {
    /// Drawing samples and compositing rasters
    Sampling,
    /// Detecting exact-duplicate trait vectors and deleting their files
    Deduping,
    /// Relabeling surviving files into a contiguous sequence
    Renumbering,
    /// Build finished successfully
    Done,
    /// A fatal error aborted the build
    Failed,
}

/// Parameters for one edition build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Number of samples to draw
    pub count: usize,
    /// Edition identifier used in the output directory layout
    pub edition: String,
    /// Root directory holding per-layer asset folders
    pub assets_root: PathBuf,
    /// Root directory for generated editions
    pub output_root: PathBuf,
    /// Handling of non-raster asset entries during compositing
    pub policy: OverlayPolicy,
    /// Whether exact duplicates are removed and survivors renumbered
    pub drop_duplicates: bool,
}

/// Outcome of a finished build
#[derive(Debug, Clone)]
pub struct CollectionSummary {
    /// Samples drawn and rendered
    pub generated: usize,
    /// Distinct trait vectors remaining after dedup
    pub distinct: usize,
    /// Duplicate images deleted
    pub removed: usize,
    /// Directory holding the renumbered rasters
    pub images_dir: PathBuf,
    /// Path of the written metadata table
    pub metadata_path: PathBuf,
}

/// Orchestrates sampling, compositing, dedup, and renumbering for one edition
#[derive(Debug)]
pub struct CollectionBuilder {
    catalog: LayerCatalog,
    options: BuildOptions,
    table: RarityTable,
    phase: BuildPhase,
    next_index: usize,
    pad_width: usize,
    edition_dir: PathBuf,
    images_dir: PathBuf,
}

impl CollectionBuilder {
    /// Validate the configuration and prepare a build
    ///
    /// This is the `Validating` stage: any configuration error surfaces here,
    /// before a single sample is drawn or file written.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog fails validation or `count` is zero
    pub fn new(config: &CollectionConfig, options: BuildOptions) -> Result<Self> {
        if options.count == 0 {
            return Err(invalid_parameter(
                "count",
                &options.count,
                &"at least one sample is required",
            ));
        }

        let catalog = LayerCatalog::from_config(config, &options.assets_root)?;
        Ok(Self::from_catalog(catalog, options))
    }

    /// Prepare a build from an already-validated catalog
    ///
    /// Callers constructing the catalog themselves are responsible for the
    /// `Validating` stage.
    pub fn from_catalog(catalog: LayerCatalog, options: BuildOptions) -> Self {
        let table = RarityTable::new(catalog.column_names());
        // Width of the largest original index, so filenames sort correctly
        let pad_width = options.count.saturating_sub(1).to_string().len();
        let edition_dir = options
            .output_root
            .join(format!("{EDITION_DIR_PREFIX}{}", options.edition));
        let images_dir = edition_dir.join(IMAGES_SUBDIR);

        Self {
            catalog,
            options,
            table,
            phase: BuildPhase::Sampling,
            next_index: 0,
            pad_width,
            edition_dir,
            images_dir,
        }
    }

    /// Current build stage
    pub const fn phase(&self) -> BuildPhase {
        self.phase
    }

    /// The validated catalog backing this build
    pub const fn catalog(&self) -> &LayerCatalog {
        &self.catalog
    }

    /// Samples still to be drawn
    pub const fn remaining(&self) -> usize {
        self.options.count.saturating_sub(self.next_index)
    }

    /// Draw, composite, and record one sample
    ///
    /// Returns `true` while more samples remain. Rasters land in the edition
    /// image directory under zero-padded original indices.
    ///
    /// # Errors
    ///
    /// Returns an error on sampling invariant violations or any compositing
    /// or file system failure; the build is marked `Failed`
    pub fn generate_next(&mut self, source: &mut dyn UnitSource) -> Result<bool> {
        if self.phase != BuildPhase::Sampling || self.next_index >= self.options.count {
            return Ok(false);
        }

        let outcome = self.generate_one(source);
        if outcome.is_err() {
            self.phase = BuildPhase::Failed;
        }
        outcome?;

        self.next_index += 1;
        Ok(self.next_index < self.options.count)
    }

    /// Dedup, renumber, and write metadata, finishing the build
    ///
    /// Duplicate detection is exact trait-vector equality; the first
    /// occurrence survives and survivors keep their relative order. With
    /// `drop_duplicates` disabled every row survives and files keep their
    /// original numbering.
    ///
    /// # Errors
    ///
    /// Returns an error on any file removal, rename, or metadata write
    /// failure; the build is marked `Failed` and files already renamed stay
    /// renamed
    pub fn finalize(&mut self) -> Result<CollectionSummary> {
        let outcome = self.finalize_inner();
        if outcome.is_err() {
            self.phase = BuildPhase::Failed;
        }
        outcome
    }

    fn generate_one(&mut self, source: &mut dyn UnitSource) -> Result<()> {
        let sample = sampler::draw_sample(&self.catalog, source)?;
        let output_path = self.image_path(self.next_index);
        compositor::compose_to(
            &self.options.assets_root,
            &sample.paths,
            self.options.policy,
            &output_path,
        )?;
        self.table.push(sample.choices);
        Ok(())
    }

    fn finalize_inner(&mut self) -> Result<CollectionSummary> {
        let generated = self.table.len();

        self.phase = BuildPhase::Deduping;
        let survivors = if self.options.drop_duplicates {
            self.table.distinct_indices()
        } else {
            (0..generated).collect()
        };
        self.remove_duplicates(&survivors)?;

        self.phase = BuildPhase::Renumbering;
        self.renumber(&survivors)?;
        self.table.retain_indices(&survivors);

        let metadata_path = self.edition_dir.join(METADATA_FILENAME);
        self.table.write_csv(&metadata_path)?;

        self.phase = BuildPhase::Done;
        Ok(CollectionSummary {
            generated,
            distinct: survivors.len(),
            removed: generated - survivors.len(),
            images_dir: self.images_dir.clone(),
            metadata_path,
        })
    }

    /// Delete the image files of rows that did not survive dedup
    fn remove_duplicates(&self, survivors: &[usize]) -> Result<()> {
        let mut keep = survivors.iter().copied().peekable();
        for index in 0..self.table.len() {
            if keep.peek() == Some(&index) {
                keep.next();
                continue;
            }
            let path = self.image_path(index);
            std::fs::remove_file(&path)
                .map_err(|e| file_system(&path, "remove duplicate", e))?;
        }
        Ok(())
    }

    /// Relabel surviving files to contiguous indices in ascending order
    ///
    /// A survivor's new index never exceeds its original index, so renames
    /// cannot collide with files yet to be moved.
    fn renumber(&self, survivors: &[usize]) -> Result<()> {
        for (new_index, &old_index) in survivors.iter().enumerate() {
            if new_index == old_index {
                continue;
            }
            let from = self.image_path(old_index);
            let to = self.image_path(new_index);
            std::fs::rename(&from, &to).map_err(|e| file_system(&from, "renumber image", e))?;
        }
        Ok(())
    }

    fn image_path(&self, index: usize) -> PathBuf {
        self.images_dir.join(format!(
            "{index:0width$}.{OUTPUT_EXTENSION}",
            width = self.pad_width
        ))
    }
}

/// The edition directory a build with these parameters writes into
pub fn edition_dir(output_root: &Path, edition: &str) -> PathBuf {
    output_root.join(format!("{EDITION_DIR_PREFIX}{edition}"))
}
