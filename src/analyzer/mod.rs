// File grouping, memory fit and the printed report
mod consolidate;
mod display;
mod fit;
mod report;

use std::collections::HashSet;
use tracing::info;

use crate::hardware::HardwareProfile;
use crate::hub::{HubClient, HubError};

pub use consolidate::{consolidate_files, is_auxiliary, qualifying_files, ModelVariant, MODEL_EXTENSION, SPLIT_MARKER};
pub use display::{print_no_qualifying_files, print_report, report_table};
pub use fit::{bytes_to_gb, classify, recommend, required_memory_gb, Fit, MEMORY_OVERHEAD, NO_FIT_SCORE};
pub use report::{build_report, is_fully_local, Report, VariantRow};

/// Fetches the listing for `repo_id` and builds its report.
///
/// `Ok(None)` means the repository has no model files after filtering.
pub async fn analyze(
    hub: &HubClient,
    repo_id: &str,
    hardware: &HardwareProfile,
    local_files: &HashSet<String>,
) -> Result<Option<Report>, HubError> {
    let files = hub.model_files(repo_id).await?;
    let report = build_report(repo_id, &files, hardware, local_files);
    match &report {
        Some(r) => info!(
            "{}: {} variants ({} split), recommended {:?}",
            repo_id,
            r.rows.len(),
            r.rows.iter().filter(|row| row.variant.is_split()).count(),
            r.recommended().map(|row| row.variant.display_name.as_str())
        ),
        None => info!("{}: no qualifying model files", repo_id),
    }
    Ok(report)
}
