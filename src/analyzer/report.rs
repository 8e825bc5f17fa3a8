use std::collections::HashSet;

use crate::hardware::HardwareProfile;
use crate::hub::RemoteFile;
use super::consolidate::{consolidate_files, qualifying_files, ModelVariant};
use super::fit::{bytes_to_gb, classify, recommend, required_memory_gb, Fit};

/// One line of the analysis table.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRow {
    pub variant: ModelVariant,
    pub size_gb: f64,
    pub required_gb: f64,
    pub fit: Fit,
    /// Every constituent file is in the local cache
    pub local: bool,
}

impl VariantRow {
    pub fn score(&self) -> f64 {
        self.fit.score(self.size_gb)
    }
}

/// Result of analyzing one repository against one machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub repo_id: String,
    pub hardware: HardwareProfile,
    /// Sorted by total size, smallest first
    pub rows: Vec<VariantRow>,
    /// Index into `rows`
    pub recommendation: Option<usize>,
}

impl Report {
    pub fn recommended(&self) -> Option<&VariantRow> {
        self.recommendation.and_then(|i| self.rows.get(i))
    }
}

/// A variant counts as local only when all of its files are cached.
pub fn is_fully_local(variant: &ModelVariant, local_files: &HashSet<String>) -> bool {
    variant.files.iter().all(|f| local_files.contains(f))
}

/// Builds the report for a repository listing.
///
/// Returns `None` when no model file is left after filtering, so callers can
/// show a notice instead of an empty table.
pub fn build_report(
    repo_id: &str,
    files: &[RemoteFile],
    hardware: &HardwareProfile,
    local_files: &HashSet<String>,
) -> Option<Report> {
    let mut variants = consolidate_files(&qualifying_files(files));
    if variants.is_empty() {
        return None;
    }
    // stable, so equal sizes keep listing order
    variants.sort_by_key(|v| v.total_size);

    let rows: Vec<VariantRow> = variants
        .into_iter()
        .map(|variant| {
            let size_gb = bytes_to_gb(variant.total_size);
            let required_gb = required_memory_gb(size_gb);
            let fit = classify(required_gb, hardware);
            let local = is_fully_local(&variant, local_files);
            VariantRow { variant, size_gb, required_gb, fit, local }
        })
        .collect();

    let scores: Vec<f64> = rows.iter().map(VariantRow::score).collect();
    let recommendation = recommend(&scores);

    Some(Report {
        repo_id: repo_id.to_string(),
        hardware: *hardware,
        rows,
        recommendation,
    })
}
