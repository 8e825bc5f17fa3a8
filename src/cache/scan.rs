use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Directory prefix the hub cache uses for model repositories.
const MODEL_REPO_PREFIX: &str = "models--";

/// Files present in the local hub cache, grouped by repository identifier.
#[derive(Debug, Clone, Default)]
pub struct LocalCache {
    repos: HashMap<String, HashSet<String>>,
}

impl LocalCache {
    /// Paths (relative to the repository root) cached for `repo_id`.
    pub fn files_for(&self, repo_id: &str) -> HashSet<String> {
        self.repos.get(repo_id).cloned().unwrap_or_default()
    }

    /// Identifiers that hold at least one GGUF file locally.
    pub fn repos_with_model_files(&self) -> HashSet<String> {
        self.repos
            .iter()
            .filter(|(_, files)| files.iter().any(|f| f.to_lowercase().ends_with(".gguf")))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn repo_count(&self) -> usize {
        self.repos.len()
    }
}

/// Works out where the hub cache lives.
///
/// An explicit override wins, then `HF_HUB_CACHE`, the legacy
/// `HUGGINGFACE_HUB_CACHE`, `HF_HOME/hub` and finally `~/.cache/huggingface/hub`.
pub fn resolve_cache_dir(override_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = override_dir {
        return Some(dir.to_path_buf());
    }
    for var in ["HF_HUB_CACHE", "HUGGINGFACE_HUB_CACHE"] {
        if let Some(cache) = std::env::var_os(var).filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(cache));
        }
    }
    if let Some(home) = std::env::var_os("HF_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(home).join("hub"));
    }
    dirs::home_dir().map(|home| home.join(".cache").join("huggingface").join("hub"))
}

/// `models--owner--name` becomes `owner/name`; other repo kinds yield `None`.
fn repo_id_from_dir_name(name: &str) -> Option<String> {
    let rest = name.strip_prefix(MODEL_REPO_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.replace("--", "/"))
}

/// Collects the files of every snapshot revision below `repo_dir`.
fn snapshot_files(repo_dir: &Path) -> HashSet<String> {
    let mut files = HashSet::new();
    let Ok(revisions) = fs::read_dir(repo_dir.join("snapshots")) else {
        return files;
    };

    for revision in revisions.filter_map(Result::ok) {
        let revision_dir = revision.path();
        if !revision_dir.is_dir() {
            continue;
        }
        // Dangling links are incomplete downloads and surface as walk errors
        for entry in WalkDir::new(&revision_dir).follow_links(true).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&revision_dir) {
                let joined = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                files.insert(joined);
            }
        }
    }
    files
}

/// Scans the hub cache rooted at `root`.
///
/// Fails only when `root` itself cannot be read; unreadable repositories are
/// skipped.
pub fn scan_cache_dir(root: &Path) -> io::Result<LocalCache> {
    info!("Scanning hub cache at {}", root.display());
    let mut repos = HashMap::new();

    for entry in fs::read_dir(root)?.filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().to_string();
        let Some(repo_id) = repo_id_from_dir_name(&name) else {
            continue;
        };
        let files = snapshot_files(&entry.path());
        debug!("Cached repo {} holds {} files", repo_id, files.len());
        repos.insert(repo_id, files);
    }

    let cache = LocalCache { repos };
    info!("Hub cache scan found {} model repositories", cache.repo_count());
    Ok(cache)
}

/// Files cached for one repository. Any scan failure yields an empty set.
pub fn local_files_for_repo(root: Option<&Path>, repo_id: &str) -> HashSet<String> {
    let Some(root) = root else {
        return HashSet::new();
    };
    match scan_cache_dir(root) {
        Ok(cache) => cache.files_for(repo_id),
        Err(e) => {
            warn!("Could not scan hub cache at {}: {}", root.display(), e);
            HashSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_id_from_model_directory() {
        assert_eq!(repo_id_from_dir_name("models--TheBloke--Llama-2-7B-GGUF").as_deref(), Some("TheBloke/Llama-2-7B-GGUF"));
        assert_eq!(repo_id_from_dir_name("models--gpt2").as_deref(), Some("gpt2"));
    }

    #[test]
    fn other_repo_kinds_are_ignored() {
        assert_eq!(repo_id_from_dir_name("datasets--squad--v2"), None);
        assert_eq!(repo_id_from_dir_name("spaces--user--demo"), None);
        assert_eq!(repo_id_from_dir_name(".locks"), None);
        assert_eq!(repo_id_from_dir_name("models--"), None);
    }

    #[test]
    fn override_wins_over_environment() {
        let dir = PathBuf::from("/srv/hf");
        assert_eq!(resolve_cache_dir(Some(&dir)), Some(dir));
    }
}
