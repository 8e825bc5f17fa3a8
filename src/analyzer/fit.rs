use std::fmt;

use crate::hardware::HardwareProfile;

/// Runtime allowance on top of the file size for context and working buffers.
pub const MEMORY_OVERHEAD: f64 = 1.15;

/// Bonus that lifts every accelerator fit above any hybrid fit.
const ACCELERATOR_BONUS: f64 = 100.0;

/// Score of a variant that cannot be loaded; below anything reachable otherwise.
pub const NO_FIT_SCORE: f64 = -1.0;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// How a variant fits the detected hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Loads entirely into accelerator memory
    Accelerator,
    /// Split between accelerator and system memory; percentage on the accelerator
    Hybrid { offload_pct: u32 },
    DoesNotFit,
}

impl Fit {
    /// Ranking score used to pick the recommendation.
    pub fn score(&self, size_gb: f64) -> f64 {
        match self {
            Fit::Accelerator => size_gb + ACCELERATOR_BONUS,
            Fit::Hybrid { .. } => size_gb,
            Fit::DoesNotFit => NO_FIT_SCORE,
        }
    }

    pub fn fits(&self) -> bool {
        !matches!(self, Fit::DoesNotFit)
    }
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Fit::Accelerator => write!(f, "GPU (fast)"),
            Fit::Hybrid { offload_pct } => write!(f, "Hybrid ({}% GPU)", offload_pct),
            Fit::DoesNotFit => write!(f, "Does not fit (slow)"),
        }
    }
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Memory needed to load and run a model of `size_gb`.
pub fn required_memory_gb(size_gb: f64) -> f64 {
    size_gb * MEMORY_OVERHEAD
}

/// Classifies a memory requirement against the hardware, accelerator first.
pub fn classify(required_gb: f64, hardware: &HardwareProfile) -> Fit {
    let vram = hardware.accelerator_memory_gb;
    if vram >= required_gb {
        Fit::Accelerator
    } else if vram + hardware.system_memory_gb >= required_gb {
        // required_gb > vram >= 0 here, so the division is safe
        let offload_pct = (vram / required_gb * 100.0) as u32;
        Fit::Hybrid { offload_pct }
    } else {
        Fit::DoesNotFit
    }
}

/// Index of the strictly highest score; the first one wins ties.
/// Variants that do not fit are never chosen.
pub fn recommend(scores: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut best_score = NO_FIT_SCORE;
    for (i, &score) in scores.iter().enumerate() {
        if score > best_score {
            best_score = score;
            best = Some(i);
        }
    }
    best
}
