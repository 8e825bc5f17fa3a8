use std::collections::HashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::hub::RemoteFile;

/// Extension of loadable model files.
pub const MODEL_EXTENSION: &str = ".gguf";

/// Marker appended to the name of a variant assembled from shards.
pub const SPLIT_MARKER: &str = " (Split)";

/// Path fragments of auxiliary files that ship next to models but are not models.
const AUXILIARY_MARKERS: [&str; 2] = ["imatrix", "mmproj"];

/// `<prefix>-00001-of-00003.gguf`
static SHARD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*)-\d{5}-of-\d{5}\.gguf$").expect("shard pattern is a valid regex")
});

/// A loadable model made of one file or of several shards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelVariant {
    /// Last path segment of the group key
    pub display_name: String,
    /// Original paths of the constituent files, in listing order
    pub files: Vec<String>,
    /// Sum of the constituent sizes in bytes
    pub total_size: u64,
}

impl ModelVariant {
    pub fn is_split(&self) -> bool {
        self.display_name.ends_with(SPLIT_MARKER)
    }
}

/// Files with the model extension, as listed by the registry.
pub fn qualifying_files(files: &[RemoteFile]) -> Vec<RemoteFile> {
    files
        .iter()
        .filter(|f| f.path.ends_with(MODEL_EXTENSION))
        .cloned()
        .collect()
}

/// True for calibration and projector files that must never be offered.
pub fn is_auxiliary(path: &str) -> bool {
    let lower = path.to_lowercase();
    AUXILIARY_MARKERS.iter().any(|m| lower.contains(m))
}

/// Grouping key for a path: the shard prefix plus extension and split marker,
/// or the full path for a standalone file.
fn group_key(path: &str) -> String {
    match SHARD_PATTERN.captures(path) {
        Some(caps) => format!("{}{}{}", &caps[1], MODEL_EXTENSION, SPLIT_MARKER),
        None => path.to_string(),
    }
}

fn display_name(key: &str) -> String {
    key.rsplit('/').next().unwrap_or(key).to_string()
}

/// Collapses a flat file listing into logical variants.
///
/// Auxiliary files are dropped; shards sharing a prefix become one variant.
/// Variants come out in the order their key was first seen.
pub fn consolidate_files(files: &[RemoteFile]) -> Vec<ModelVariant> {
    let mut variants: Vec<ModelVariant> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for file in files.iter().filter(|f| !is_auxiliary(&f.path)) {
        let key = group_key(&file.path);
        let slot = *by_key.entry(key).or_insert_with_key(|key| {
            variants.push(ModelVariant {
                display_name: display_name(key),
                files: Vec::new(),
                total_size: 0,
            });
            variants.len() - 1
        });

        let variant = &mut variants[slot];
        if !variant.files.contains(&file.path) {
            variant.files.push(file.path.clone());
            variant.total_size += file.size;
        }
    }

    variants
}
