//! Discover GGUF models on the Hugging Face hub and check which quantization
//! fits the local machine.
//!
//! The `ggufscout` binary is the interactive navigator; `ggufscout-check`
//! analyzes a single repository.

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod hardware;
pub mod hub;
pub mod logging;
pub mod navigator;
pub mod progress;
