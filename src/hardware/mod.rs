//! Hardware probe
//!
//! Reads total system memory and the memory of the first accelerator.

use std::process::Command;
use sysinfo::System;
use tracing::{debug, info};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Memory capacity of the current machine, in gigabytes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HardwareProfile {
    pub system_memory_gb: f64,
    /// Zero when no accelerator is present or readable
    pub accelerator_memory_gb: f64,
}

impl HardwareProfile {
    pub fn new(system_memory_gb: f64, accelerator_memory_gb: f64) -> Self {
        Self { system_memory_gb, accelerator_memory_gb }
    }

    /// Probes the machine. Never fails: an absent accelerator reports 0.
    pub fn detect() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        let system_memory_gb = sys.total_memory() as f64 / BYTES_PER_GB;
        let accelerator_memory_gb = detect_accelerator_memory_gb().unwrap_or(0.0);

        info!(
            "Detected {:.1} GB system memory, {:.1} GB accelerator memory",
            system_memory_gb, accelerator_memory_gb
        );
        Self { system_memory_gb, accelerator_memory_gb }
    }

    /// Replaces detected values with user-supplied ones where given.
    pub fn with_overrides(self, system_memory_gb: Option<f64>, accelerator_memory_gb: Option<f64>) -> Self {
        Self {
            system_memory_gb: system_memory_gb.unwrap_or(self.system_memory_gb),
            accelerator_memory_gb: accelerator_memory_gb.unwrap_or(self.accelerator_memory_gb),
        }
    }
}

/// Parses a user-supplied memory amount in GB. Used as a clap value parser.
pub fn parse_memory_gb(input: &str) -> Result<f64, String> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number", input))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("`{}` must be a finite, non-negative amount of GB", input));
    }
    Ok(value)
}

/// Total memory of the first NVIDIA GPU, via nvidia-smi.
fn detect_accelerator_memory_gb() -> Option<f64> {
    let output = Command::new("nvidia-smi")
        .args(["--query-gpu=memory.total", "--format=csv,noheader,nounits"])
        .output()
        .ok()?;

    if !output.status.success() {
        debug!("nvidia-smi exited with {}", output.status);
        return None;
    }

    parse_nvidia_smi_memory(&String::from_utf8_lossy(&output.stdout))
}

/// Parses nvidia-smi CSV output (one MiB value per GPU) and returns the first GPU in GB.
fn parse_nvidia_smi_memory(stdout: &str) -> Option<f64> {
    let first = stdout.lines().map(str::trim).find(|l| !l.is_empty())?;
    let mib = first.parse::<f64>().ok()?;
    Some(mib / 1024.0)
}
