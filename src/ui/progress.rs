use indicatif::{ProgressBar, ProgressStyle};

/// Per-file progress for a scan. Hidden when disabled so callers never branch.
pub struct ScanProgress {
    bar: ProgressBar,
}

impl ScanProgress {
    pub fn new(total: usize, visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("[{pos}/{len}] {bar:30.cyan/blue} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        Self { bar }
    }

    pub fn start_file(&self, relative_path: &str) {
        self.bar.set_message(format!("Processing: {}", relative_path));
    }

    pub fn finish_file(&self) {
        self.bar.inc(1);
    }

    /// Run `f` with the bar cleared so log output is not torn.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
