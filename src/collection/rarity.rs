//! Rarity table accumulation, exact-duplicate detection, and CSV export

use crate::io::configuration::SENTINEL_LABEL;
use crate::io::error::{Result, file_system};
use crate::sampler::{TraitChoice, TraitVector};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// Ordered trait vectors for every generated sample
///
/// Columns are layer names in declaration order; rows are appended in
/// generation order and keyed by original sample index until
/// [`retain_indices`](Self::retain_indices) rewrites them.
#[derive(Debug, Clone)]
pub struct RarityTable {
    columns: Vec<String>,
    rows: Vec<TraitVector>,
}

impl RarityTable {
    /// Create an empty table with one column per layer name
    pub const fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append one sample's trait vector
    pub fn push(&mut self, row: TraitVector) {
        self.rows.push(row);
    }

    /// Number of recorded rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows have been recorded
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Recorded rows in generation order
    pub fn rows(&self) -> &[TraitVector] {
        &self.rows
    }

    /// Column headers in declaration order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Original indices surviving exact-duplicate removal
    ///
    /// The first occurrence of each distinct trait vector survives; the
    /// result is ascending, preserving relative generation order.
    pub fn distinct_indices(&self) -> Vec<usize> {
        let mut seen: HashSet<&TraitVector> = HashSet::with_capacity(self.rows.len());
        self.rows
            .iter()
            .enumerate()
            .filter(|&(_, row)| seen.insert(row))
            .map(|(index, _)| index)
            .collect()
    }

    /// Keep only the rows at `survivors`, renumbering them to `0..m`
    ///
    /// `survivors` must be ascending original indices, as produced by
    /// [`distinct_indices`](Self::distinct_indices); unknown indices are
    /// ignored.
    pub fn retain_indices(&mut self, survivors: &[usize]) {
        let rows = std::mem::take(&mut self.rows);
        let mut kept = Vec::with_capacity(survivors.len());
        for &index in survivors {
            if let Some(row) = rows.get(index) {
                kept.push(row.clone());
            }
        }
        self.rows = kept;
    }

    /// Write the table as CSV, one row per surviving image in file order
    ///
    /// Cells hold the trait identifier without extension, the literal
    /// `none` for sentinel selections, or an empty cell for skipped layers.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path).map_err(|e| file_system(path, "create metadata", e))?;
        let mut writer = std::io::BufWriter::new(file);

        let header: Vec<String> = self.columns.iter().map(|name| csv_field(name)).collect();
        writeln!(writer, "{}", header.join(","))
            .map_err(|e| file_system(path, "write metadata", e))?;

        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|choice| csv_field(&cell_label(choice))).collect();
            writeln!(writer, "{}", cells.join(","))
                .map_err(|e| file_system(path, "write metadata", e))?;
        }

        writer
            .flush()
            .map_err(|e| file_system(path, "write metadata", e))?;
        Ok(())
    }
}

/// Metadata label for one resolved choice
fn cell_label(choice: &TraitChoice) -> String {
    match choice {
        TraitChoice::Selected(file) => trait_label(file),
        TraitChoice::NoTrait => SENTINEL_LABEL.to_string(),
        TraitChoice::Skipped => String::new(),
    }
}

/// Trait identifier with the asset extension stripped
fn trait_label(file: &str) -> String {
    Path::new(file)
        .file_stem()
        .map_or_else(|| file.to_string(), |stem| stem.to_string_lossy().into_owned())
}

/// Quote a CSV field when it contains a delimiter, quote, or newline
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
