pub mod progress;
pub mod prompt;
pub mod report;

pub use progress::ScanProgress;
pub use prompt::Prompter;
