//! Validates collection assembly end to end: generation, duplicate removal,
//! contiguous renumbering, and metadata correspondence

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use traitstack::GenerateError;
use traitstack::collection::{BuildOptions, BuildPhase, CollectionBuilder, edition_dir};
use traitstack::compositor::OverlayPolicy;
use traitstack::io::config::{CollectionConfig, LayerDescriptor};
use traitstack::sampler::random::SeededSource;

fn descriptor(id: u32, name: &str, directory: &str, required: bool) -> LayerDescriptor {
    LayerDescriptor {
        id,
        name: name.to_string(),
        directory: directory.to_string(),
        required,
        rarity_weights: None,
        skip_probability: 0.0,
        linked_to: None,
    }
}

fn write_png(root: &Path, directory: &str, file: &str, color: [u8; 4]) {
    let dir = root.join(directory);
    fs::create_dir_all(&dir).unwrap();
    RgbaImage::from_pixel(2, 2, Rgba(color))
        .save(dir.join(file))
        .unwrap();
}

/// Two backgrounds and an optional one-trait body: four distinct combinations
fn small_config(root: &Path) -> CollectionConfig {
    write_png(root, "Background", "blue.png", [0, 0, 255, 255]);
    write_png(root, "Background", "red.png", [255, 0, 0, 255]);
    write_png(root, "Body", "dot.png", [0, 255, 0, 128]);

    CollectionConfig {
        layers: vec![
            descriptor(0, "Background", "Background", true),
            descriptor(1, "Body", "Body", false),
        ],
    }
}

fn options(root: &Path, count: usize, edition: &str, drop_duplicates: bool) -> BuildOptions {
    BuildOptions {
        count,
        edition: edition.to_string(),
        assets_root: root.to_path_buf(),
        output_root: root.join("output"),
        policy: OverlayPolicy::Lenient,
        drop_duplicates,
    }
}

fn run_build(config: &CollectionConfig, opts: BuildOptions, seed: u64) -> (CollectionBuilder, traitstack::collection::CollectionSummary) {
    let mut builder = CollectionBuilder::new(config, opts).unwrap();
    let mut source = SeededSource::new(seed);
    while builder.generate_next(&mut source).unwrap() {}
    let summary = builder.finalize().unwrap();
    (builder, summary)
}

fn sorted_image_names(images_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(images_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_oversampled_space_dedups_to_distinct_combinations() {
    let temp = TempDir::new().unwrap();
    let config = small_config(temp.path());

    let (_, summary) = run_build(&config, options(temp.path(), 100, "1", true), 42);

    assert_eq!(summary.generated, 100);
    // Four distinct combinations exist; 100 draws saturate them
    assert!(summary.distinct <= 4);
    assert_eq!(summary.removed, 100 - summary.distinct);

    let names = sorted_image_names(&summary.images_dir);
    assert_eq!(names.len(), summary.distinct);

    // Contiguous zero-padded sequence at the original pad width
    for (index, name) in names.iter().enumerate() {
        assert_eq!(name, &format!("{index:02}.png"));
    }
}

#[test]
fn test_metadata_rows_match_image_files() {
    let temp = TempDir::new().unwrap();
    let config = small_config(temp.path());

    let (_, summary) = run_build(&config, options(temp.path(), 20, "1", true), 7);

    let metadata = fs::read_to_string(&summary.metadata_path).unwrap();
    let mut lines = metadata.lines();
    assert_eq!(lines.next(), Some("Background,Body"));

    let row_count = lines.count();
    assert_eq!(row_count, summary.distinct);
    assert_eq!(sorted_image_names(&summary.images_dir).len(), row_count);
}

#[test]
fn test_metadata_cells_use_stems_and_sentinel_label() {
    let temp = TempDir::new().unwrap();
    let config = small_config(temp.path());

    let (_, summary) = run_build(&config, options(temp.path(), 30, "1", true), 11);

    let metadata = fs::read_to_string(&summary.metadata_path).unwrap();
    for line in metadata.lines().skip(1) {
        let mut cells = line.split(',');
        let background = cells.next().unwrap();
        let body = cells.next().unwrap();
        assert!(background == "blue" || background == "red");
        assert!(body == "dot" || body == "none");
    }
}

#[test]
fn test_keep_duplicates_preserves_original_numbering() {
    let temp = TempDir::new().unwrap();
    let config = small_config(temp.path());

    let (_, summary) = run_build(&config, options(temp.path(), 6, "keep", false), 42);

    assert_eq!(summary.generated, 6);
    assert_eq!(summary.removed, 0);
    assert_eq!(sorted_image_names(&summary.images_dir).len(), 6);
}

#[test]
fn test_phases_progress_to_done() {
    let temp = TempDir::new().unwrap();
    let config = small_config(temp.path());

    let mut builder =
        CollectionBuilder::new(&config, options(temp.path(), 3, "phases", true)).unwrap();
    assert_eq!(builder.phase(), BuildPhase::Sampling);
    assert_eq!(builder.remaining(), 3);

    let mut source = SeededSource::new(1);
    while builder.generate_next(&mut source).unwrap() {}
    assert_eq!(builder.remaining(), 0);

    builder.finalize().unwrap();
    assert_eq!(builder.phase(), BuildPhase::Done);
}

#[test]
fn test_seeded_builds_are_reproducible() {
    let temp = TempDir::new().unwrap();
    let config = small_config(temp.path());

    let (_, first) = run_build(&config, options(temp.path(), 25, "a", true), 42);
    let (_, second) = run_build(&config, options(temp.path(), 25, "b", true), 42);

    let first_metadata = fs::read_to_string(&first.metadata_path).unwrap();
    let second_metadata = fs::read_to_string(&second.metadata_path).unwrap();
    assert_eq!(first_metadata, second_metadata);
    assert_eq!(first.distinct, second.distinct);
}

#[test]
fn test_invalid_weights_abort_before_any_file_is_written() {
    let temp = TempDir::new().unwrap();
    let mut config = small_config(temp.path());
    // Two files in Background, three weights
    config.layers.get_mut(0).unwrap().rarity_weights = Some(vec![1.0, 2.0, 3.0]);

    let err = CollectionBuilder::new(&config, options(temp.path(), 10, "bad", true)).unwrap_err();
    assert!(matches!(err, GenerateError::InvalidLayer { .. }));

    assert!(!edition_dir(&temp.path().join("output"), "bad").exists());
}

#[test]
fn test_zero_count_rejected() {
    let temp = TempDir::new().unwrap();
    let config = small_config(temp.path());

    let err = CollectionBuilder::new(&config, options(temp.path(), 0, "zero", true)).unwrap_err();
    assert!(matches!(err, GenerateError::InvalidParameter { .. }));
}

#[test]
fn test_single_digit_count_pads_to_one_character() {
    let temp = TempDir::new().unwrap();
    let config = small_config(temp.path());

    let (_, summary) = run_build(&config, options(temp.path(), 3, "pad", false), 9);

    let names = sorted_image_names(&summary.images_dir);
    assert_eq!(names, vec!["0.png", "1.png", "2.png"]);
}
