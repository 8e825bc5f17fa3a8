use std::error::Error;
use clap::Parser;
use tracing::{info, warn};

use ggufscout::cache::{resolve_cache_dir, spawn_scanner, CacheIndex};
use ggufscout::config::Settings;
use ggufscout::hardware::HardwareProfile;
use ggufscout::hub::HubClient;
use ggufscout::logging;
use ggufscout::navigator::{Navigator, FAREWELL};

/// Browse GGUF models on the Hugging Face hub by category and check how they
/// fit this machine.
#[derive(Parser, Debug)]
#[command(name = "ggufscout", version, about)]
struct Cli {}

/// Entry point of the navigator.
///
/// Starts the background cache scan, probes the hardware once and hands over
/// to the interactive menu. Selecting a model runs `ggufscout-check` as a
/// child process.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let _cli = Cli::parse();

    let settings = Settings::new()?;
    let _guard = logging::init(&settings, "ggufscout")?;

    // Ctrl-C outside of a prompt (searches, the child analyzer) ends the session
    if let Err(e) = ctrlc::set_handler(|| {
        println!("\n{}", FAREWELL);
        std::process::exit(130);
    }) {
        warn!("Could not install interrupt handler: {}", e);
    }

    let index = CacheIndex::new();
    let cache_dir = resolve_cache_dir(settings.cache.directory.as_deref());
    if let Err(e) = spawn_scanner(index.clone(), cache_dir) {
        warn!("Could not start cache scanner: {}", e);
        index.publish(Default::default());
    }

    let hardware = HardwareProfile::detect();
    let hub = HubClient::new(&settings.hub)?;
    info!("Settings loaded, registry endpoint {}", settings.hub.endpoint);

    let mut navigator = Navigator::new(settings, hub, index, hardware)?;
    navigator.run().await?;

    info!("Navigator exiting");
    Ok(())
}
