use std::path::{Path, PathBuf};
use log::{debug, warn};
use walkdir::WalkDir;
use crate::error::{Result, ScanError};

/// Name-based selection rules for log files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub suffix: String,
    pub exclude_substrings: Vec<String>,
    pub exclude_names: Vec<String>,
}

impl FileFilter {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            exclude_substrings: Vec::new(),
            exclude_names: Vec::new(),
        }
    }

    pub fn exclude_substring(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_substrings.push(pattern.into());
        self
    }

    pub fn exclude_name(mut self, name: impl Into<String>) -> Self {
        self.exclude_names.push(name.into());
        self
    }

    /// Exclusions always win over the suffix match.
    pub fn accepts(&self, filename: &str) -> bool {
        if !filename.ends_with(&self.suffix) {
            return false;
        }

        if self.exclude_substrings.iter().any(|s| filename.contains(s.as_str())) {
            return false;
        }

        !self.exclude_names.iter().any(|n| n == filename)
    }
}

/// A log file found under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    pub file_name: String,
    pub relative_path: PathBuf,
}

impl LogFile {
    fn new(root: &Path, path: PathBuf) -> Self {
        let file_name = path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let relative_path = path.strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(&file_name));

        Self {
            path,
            file_name,
            relative_path,
        }
    }

    /// Directory names between the scan root and the file, outermost first.
    pub fn folders(&self) -> Vec<String> {
        self.relative_path
            .parent()
            .map(|parent| {
                parent.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn relative_display(&self) -> String {
        self.relative_path.to_string_lossy().into_owned()
    }
}

/// Fail fast unless `root` is an existing directory.
pub fn check_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }

    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    Ok(())
}

/// Recursively collect the files under `root` that pass `filter`.
///
/// Entries are visited sorted by file name within each directory. Directories
/// that cannot be read are logged and skipped. Symlinked files are kept, and a
/// dangling link is kept too so the read fails and the file is reported as
/// skipped. Symlinked directories are not descended into.
pub fn discover(root: &Path, filter: &FileFilter) -> Result<Vec<LogFile>> {
    check_root(root)?;

    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let is_file = if entry.path_is_symlink() {
            !entry.path().is_dir()
        } else {
            entry.file_type().is_file()
        };
        if !is_file {
            continue;
        }

        let accepted = filter.accepts(&entry.file_name().to_string_lossy());
        if accepted {
            debug!("Found log: {}", entry.path().display());
            files.push(LogFile::new(root, entry.into_path()));
        }
    }

    Ok(files)
}
