mod client;
mod types;

pub use client::{normalize_repo_id, HubClient};
pub use types::{HubError, ModelInfo, RemoteFile, SearchHit, Sibling};
