use std::path::PathBuf;
use log::{debug, info, warn};
use crate::aggregate::{Record, ResultTable};
use crate::config::ScanConfig;
use crate::decode::TextDecoder;
use crate::error::{Result, ScanError};
use crate::scanner::{self, LogFile};
use crate::ui::ScanProgress;

/// A file that could not be read and was left out of the table.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug)]
pub struct RunSummary {
    pub discovered: usize,
    pub table: ResultTable,
    pub skipped: Vec<SkippedFile>,
    /// `None` when nothing was extracted and no file was written.
    pub output: Option<PathBuf>,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.table.len()
    }
}

/// Discover, decode, extract and aggregate, one file at a time.
pub struct Pipeline {
    config: ScanConfig,
    decoder: TextDecoder,
    root_name: Option<String>,
}

impl Pipeline {
    pub fn new(config: ScanConfig) -> Self {
        let decoder = TextDecoder::new(config.profile.encoding);
        let root_name = config.root_name();
        debug!("Decoding with the {} strategy", decoder.strategy_name());

        Self {
            config,
            decoder,
            root_name,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn discover(&self) -> Result<Vec<LogFile>> {
        scanner::discover(&self.config.root, &self.config.profile.filter)
    }

    /// Build the row for a single file.
    pub fn process_file(&self, file: &LogFile) -> Result<Record> {
        let decoded = self.decoder.read(&file.path)?;
        let profile = &self.config.profile;

        let fields = profile.fields.extract(&decoded.text);
        let labels = profile.metadata.infer(self.root_name.as_deref(), &file.folders());

        let found = fields.iter().filter(|(_, v)| v.is_some()).count();
        debug!("{}: {}/{} fields found", file.relative_display(), found, fields.len());

        Ok(Record::build(file, labels, fields))
    }

    /// Process every discovered file without writing anything.
    pub fn collect(&self) -> Result<(ResultTable, Vec<SkippedFile>, usize)> {
        let files = self.discover()?;
        info!("Found {} valid log files to process in {}", files.len(), self.config.root.display());

        let mut table = ResultTable::new(self.config.profile.columns.clone());
        let mut skipped = Vec::new();
        let progress = ScanProgress::new(files.len(), self.config.show_progress);

        for (idx, file) in files.iter().enumerate() {
            let relative = file.relative_display();
            progress.start_file(&relative);
            debug!("[{}/{}] Processing: {}", idx + 1, files.len(), relative);

            match self.process_file(file) {
                Ok(record) => table.push(record),
                Err(e) if !e.is_fatal() => {
                    progress.suspend(|| warn!("{}", e));
                    skipped.push(e.into());
                }
                Err(e) => {
                    progress.finish();
                    return Err(e);
                }
            }

            progress.finish_file();
        }

        progress.finish();
        Ok((table, skipped, files.len()))
    }

    /// Full run: collect rows, then write the CSV unless there are none.
    pub fn run(&self) -> Result<RunSummary> {
        let (table, skipped, discovered) = self.collect()?;

        let output = if table.write_csv(&self.config.output_path)? {
            info!("Wrote {} rows to {}", table.len(), self.config.output_path.display());
            Some(self.config.output_path.clone())
        } else {
            warn!("No data extracted; {} not written", self.config.output_path.display());
            None
        };

        Ok(RunSummary {
            discovered,
            table,
            skipped,
            output,
        })
    }
}

/// Convenience entry point for library users.
pub fn run(config: ScanConfig) -> Result<RunSummary> {
    scanner::check_root(&config.root)?;
    Pipeline::new(config).run()
}

impl From<ScanError> for SkippedFile {
    fn from(e: ScanError) -> Self {
        let path = match &e {
            ScanError::Read { path, .. } => path.clone(),
            _ => PathBuf::new(),
        };
        SkippedFile {
            path,
            reason: e.to_string(),
        }
    }
}
