//! Collect numeric results from xtb log files spread over a folder tree into
//! one CSV table, labelling each row from the folder names on its path.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod decode;
pub mod error;
pub mod extract;
pub mod metadata;
pub mod pipeline;
pub mod scanner;
pub mod ui;

pub use config::{Preset, ScanConfig, ScanProfile};
pub use error::ScanError;
pub use pipeline::{Pipeline, RunSummary};
