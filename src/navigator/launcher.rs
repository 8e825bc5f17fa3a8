use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::Settings;

/// File name of the analyzer binary, without platform suffix.
pub const ANALYZER_BIN: &str = "ggufscout-check";

#[derive(Debug)]
pub enum LaunchError {
    /// No analyzer executable at the expected location
    NotFound(PathBuf),
    /// Spawning or waiting on the child failed
    Io(std::io::Error),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LaunchError::NotFound(path) => write!(f, "analyzer not found at {}", path.display()),
            LaunchError::Io(e) => write!(f, "failed to run analyzer: {}", e),
        }
    }
}

impl Error for LaunchError {}

impl From<std::io::Error> for LaunchError {
    fn from(err: std::io::Error) -> Self {
        LaunchError::Io(err)
    }
}

/// Runs the analyzer as a child process sharing this terminal.
#[derive(Debug, Clone)]
pub struct AnalyzerLauncher {
    executable: PathBuf,
}

impl AnalyzerLauncher {
    /// Uses `path` as-is, checking only that it exists.
    pub fn at(path: impl Into<PathBuf>) -> Result<Self, LaunchError> {
        let executable = path.into();
        if !executable.is_file() {
            return Err(LaunchError::NotFound(executable));
        }
        Ok(Self { executable })
    }

    /// Configured executable, or the analyzer next to the running binary.
    pub fn locate(settings: &Settings) -> Result<Self, LaunchError> {
        if let Some(path) = &settings.analyzer.executable {
            return Self::at(path);
        }
        let current = std::env::current_exe()?;
        let dir = current.parent().unwrap_or_else(|| Path::new("."));
        Self::at(dir.join(format!("{}{}", ANALYZER_BIN, std::env::consts::EXE_SUFFIX)))
    }

    /// Runs the analyzer for `repo_id` and waits for it to exit.
    pub async fn launch(&self, repo_id: &str) -> Result<ExitStatus, LaunchError> {
        info!("Launching {} {}", self.executable.display(), repo_id);
        let status = Command::new(&self.executable)
            .arg(repo_id)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        if status.success() {
            info!("Analyzer finished for {}", repo_id);
        } else {
            warn!("Analyzer for {} exited with {}", repo_id, status);
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_executable_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        match AnalyzerLauncher::at(&missing) {
            Err(LaunchError::NotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn directory_is_not_an_executable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(AnalyzerLauncher::at(dir.path()), Err(LaunchError::NotFound(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn child_exit_status_is_returned() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-check");
        std::fs::write(&script, "#!/bin/sh\ntest \"$1\" = \"owner/model\" || exit 9\nexit 3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let launcher = AnalyzerLauncher::at(&script).unwrap();
        let status = launcher.launch("owner/model").await.unwrap();
        assert_eq!(status.code(), Some(3));
    }
}
