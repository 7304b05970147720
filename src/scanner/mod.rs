pub mod discover;

pub use discover::{check_root, discover, FileFilter, LogFile};
