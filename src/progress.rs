use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a registry call is in flight. Clear it with
/// `finish_and_clear` before printing results.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{prefix:.bold.dim} {spinner} {wide_msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(message.into());
    pb
}
