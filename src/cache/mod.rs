mod index;
mod scan;

pub use index::{spawn_scanner, CacheIndex};
pub use scan::{local_files_for_repo, resolve_cache_dir, scan_cache_dir, LocalCache};
