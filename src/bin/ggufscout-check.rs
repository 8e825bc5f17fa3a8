use std::error::Error;
use std::process::ExitCode;
use clap::Parser;
use colored::*;
use tracing::{error, info};

use ggufscout::analyzer::{analyze, print_no_qualifying_files, print_report};
use ggufscout::cache::{local_files_for_repo, resolve_cache_dir};
use ggufscout::config::Settings;
use ggufscout::hardware::{parse_memory_gb, HardwareProfile};
use ggufscout::hub::{normalize_repo_id, HubClient};
use ggufscout::logging;
use ggufscout::progress::spinner;

/// Estimate the memory needed by each GGUF variant of a repository and
/// recommend the best fit for this machine.
#[derive(Parser, Debug)]
#[command(name = "ggufscout-check", version, about)]
struct Cli {
    /// Model identifier (owner/name) or full model URL
    model: String,

    /// Use this much system memory (GB) instead of the detected amount
    #[arg(long = "ram-gb", value_name = "GB", value_parser = parse_memory_gb)]
    ram_gb: Option<f64>,

    /// Use this much accelerator memory (GB) instead of the detected amount
    #[arg(long = "vram-gb", value_name = "GB", value_parser = parse_memory_gb)]
    vram_gb: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let settings = Settings::new()?;
    let _guard = logging::init(&settings, "ggufscout-check")?;

    let repo_id = match normalize_repo_id(&cli.model) {
        Ok(id) => id,
        Err(e) => {
            println!("{} {}", "Error:".red().bold(), e);
            return Ok(ExitCode::from(2));
        }
    };
    info!("Analyzing {}", repo_id);

    let hub = HubClient::new(&settings.hub)?;
    let hardware = HardwareProfile::detect().with_overrides(cli.ram_gb, cli.vram_gb);
    let cache_dir = resolve_cache_dir(settings.cache.directory.as_deref());
    let local_files = local_files_for_repo(cache_dir.as_deref(), &repo_id);

    let pb = spinner(format!("Fetching file list for {}...", repo_id));
    let outcome = analyze(&hub, &repo_id, &hardware, &local_files).await;
    pb.finish_and_clear();

    match outcome {
        Ok(Some(report)) => {
            print_report(&report);
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => {
            print_no_qualifying_files(&repo_id);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Registry lookup for {} failed: {}", repo_id, e);
            println!("{} {}", "Error contacting the registry:".red().bold(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}
