mod display;
mod launcher;
mod menu;
mod navigator;
mod prompt;

pub use display::{clear_screen, print_header, result_label};
pub use launcher::{AnalyzerLauncher, LaunchError, ANALYZER_BIN};
pub use menu::{Category, MenuState, Pager, ResultSource, Results, ResultsAction};
pub use navigator::{Navigator, FAREWELL};
pub use prompt::{parse_choice, Answer, Prompter};
