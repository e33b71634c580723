//! Command-line interface for collection generation runs

use crate::collection::{BuildOptions, CollectionBuilder};
use crate::compositor::OverlayPolicy;
use crate::io::config::CollectionConfig;
use crate::io::configuration::{
    DEFAULT_ASSETS_DIR, DEFAULT_CONFIG_FILE, DEFAULT_COUNT, DEFAULT_OUTPUT_DIR, DEFAULT_SEED,
};
use crate::io::error::Result;
use crate::io::progress::ProgressManager;
use crate::sampler::random::SeededSource;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "traitstack")]
#[command(
    author,
    version,
    about = "Generate layered image collections with weighted trait rarities"
)]
/// Command-line arguments for the collection generator
pub struct Cli {
    /// Number of images to generate
    #[arg(short, long, default_value_t = DEFAULT_COUNT)]
    pub count: usize,

    /// Edition name used in the output directory layout
    #[arg(short, long, default_value = "1")]
    pub edition: String,

    /// Random seed for reproducible sampling
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Layer configuration file (JSON)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Root directory holding per-layer asset folders
    #[arg(long, default_value = DEFAULT_ASSETS_DIR)]
    pub assets: PathBuf,

    /// Root directory for generated editions
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Fail on non-raster asset entries instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Keep exact-duplicate images instead of removing and renumbering
    #[arg(short, long)]
    pub keep_duplicates: bool,

    /// Suppress progress and summary output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Compositing policy implied by the `--strict` flag
    pub const fn overlay_policy(&self) -> OverlayPolicy {
        if self.strict {
            OverlayPolicy::Strict
        } else {
            OverlayPolicy::Lenient
        }
    }
}

/// Orchestrates one full generation run with progress tracking
pub struct CollectionRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl CollectionRunner {
    /// Create a runner with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run validation, generation, and finalization end to end
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, catalog validation,
    /// sampling, compositing, or finalization fails
    // Allow print for user feedback on combinatorics and the final summary
    #[allow(clippy::print_stderr)]
    pub fn run(&mut self) -> Result<()> {
        let config = CollectionConfig::from_json_file(&self.cli.config)?;

        let options = BuildOptions {
            count: self.cli.count,
            edition: self.cli.edition.clone(),
            assets_root: self.cli.assets.clone(),
            output_root: self.cli.output.clone(),
            policy: self.cli.overlay_policy(),
            drop_duplicates: !self.cli.keep_duplicates,
        };

        let mut builder = CollectionBuilder::new(&config, options)?;

        if !self.cli.quiet {
            eprintln!(
                "{} distinct combinations available across {} layers",
                builder.catalog().total_combinations(),
                builder.catalog().layer_count()
            );
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.start(self.cli.count);
        }

        let mut source = SeededSource::new(self.cli.seed);
        loop {
            let more = builder.generate_next(&mut source)?;
            if let Some(ref pm) = self.progress_manager {
                pm.advance();
            }
            if !more {
                break;
            }
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        let summary = builder.finalize()?;

        if !self.cli.quiet {
            eprintln!(
                "Generated {} images, {} are distinct ({} removed)",
                summary.generated, summary.distinct, summary.removed
            );
            eprintln!("Metadata written to '{}'", summary.metadata_path.display());
        }

        Ok(())
    }
}
