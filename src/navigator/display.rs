use std::io::Write;
use colored::*;

use crate::cache::CacheIndex;
use crate::hardware::HardwareProfile;

pub fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
    let _ = std::io::stdout().flush();
}

/// Banner with the detected hardware and the state of the cache scan.
pub fn print_header(hardware: &HardwareProfile, index: &CacheIndex) {
    let rule = "=".repeat(60);
    println!("{}", rule.bright_cyan());
    println!(
        "   🚀 {}  |  RAM: {:.1}GB  VRAM: {:.1}GB",
        "GGUF SCOUT".bold(),
        hardware.system_memory_gb,
        hardware.accelerator_memory_gb
    );
    if index.is_ready() {
        println!("   💾 Local cache: {} models detected", index.len().to_string().green());
    } else {
        println!("   💾 Local cache: {}", "scanning in background...".bright_black());
    }
    println!("{}\n", rule.bright_cyan());
}

/// Menu entry for a repository: house when cached, globe otherwise.
pub fn result_label(url: &str, is_local: bool) -> String {
    let marker = if is_local { "🏠" } else { "🌐" };
    format!("{} {}", marker, url)
}

pub fn print_error(context: &str, err: &dyn std::fmt::Display) {
    println!("{} {}", format!("{}:", context).red().bold(), err);
}

pub fn print_notice(message: &str) {
    println!("{}", message.yellow());
}
