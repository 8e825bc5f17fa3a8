use std::error::Error;
use std::fmt;
use serde::Deserialize;

/// A file entry reported by the registry for a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Path relative to the repository root
    pub path: String,
    /// Size in bytes
    pub size: u64,
}

impl RemoteFile {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self { path: path.into(), size }
    }
}

/// One entry of `siblings` in the model info payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Sibling {
    pub rfilename: String,
    /// Only present when the request asks for blob metadata
    #[serde(default)]
    pub size: Option<u64>,
}

/// Repository metadata returned by `/api/models/{repo_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub siblings: Option<Vec<Sibling>>,
}

impl ModelInfo {
    /// Flattens the sibling list into remote files. Missing sizes count as 0.
    pub fn into_files(self) -> Vec<RemoteFile> {
        self.siblings
            .unwrap_or_default()
            .into_iter()
            .map(|s| RemoteFile { path: s.rfilename, size: s.size.unwrap_or(0) })
            .collect()
    }
}

/// One hit of `/api/models?search=...`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: String,
    #[serde(rename = "modelId", default)]
    pub model_id: Option<String>,
}

impl SearchHit {
    pub fn into_repo_id(self) -> String {
        self.model_id.unwrap_or(self.id)
    }
}

/// Errors raised while talking to the registry
#[derive(Debug)]
pub enum HubError {
    /// Transport failure: DNS, TLS, timeout, connection reset
    Http(reqwest::Error),
    /// The registry answered with a non-success status
    Status { status: reqwest::StatusCode, body: String },
    /// The payload did not have the expected shape
    Decode(serde_json::Error),
    /// The identifier is empty after normalization
    InvalidRepoId(String),
}

impl fmt::Display for HubError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HubError::Http(e) => write!(f, "connection error: {}", e),
            HubError::Status { status, body } => {
                if body.is_empty() {
                    write!(f, "registry returned {}", status)
                } else {
                    write!(f, "registry returned {}: {}", status, body)
                }
            }
            HubError::Decode(e) => write!(f, "unexpected registry response: {}", e),
            HubError::InvalidRepoId(input) => write!(f, "invalid model identifier: {:?}", input),
        }
    }
}

impl Error for HubError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HubError::Http(e) => Some(e),
            HubError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HubError {
    fn from(err: reqwest::Error) -> Self {
        HubError::Http(err)
    }
}

impl From<serde_json::Error> for HubError {
    fn from(err: serde_json::Error) -> Self {
        HubError::Decode(err)
    }
}
