pub mod strategy;

use std::fmt;
use std::fs;
use std::path::Path;
use clap::ValueEnum;
use encoding_rs::UTF_8;
use log::info;
use serde::Deserialize;
use crate::error::{Result, ScanError};

pub use encoding_rs::Encoding;
pub use strategy::{ByteStatistics, EncodingStrategy, NullSniff};

/// Decode `bytes`, replacing anything unmappable with U+FFFD. A leading
/// byte-order mark for `encoding` is dropped.
pub fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, _had_errors) = encoding.decode_with_bom_removal(bytes);
    text.into_owned()
}

/// Which encoding strategy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EncodingKind {
    #[default]
    NullSniff,
    Statistical,
}

impl EncodingKind {
    pub fn strategy(self) -> Box<dyn EncodingStrategy> {
        match self {
            EncodingKind::NullSniff => Box::new(NullSniff),
            EncodingKind::Statistical => Box::new(ByteStatistics::default()),
        }
    }
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingKind::NullSniff => f.write_str("null-sniff"),
            EncodingKind::Statistical => f.write_str("statistical"),
        }
    }
}

/// Text content of one log file.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
}

pub struct TextDecoder {
    strategy: Box<dyn EncodingStrategy>,
}

impl TextDecoder {
    pub fn new(kind: EncodingKind) -> Self {
        Self::with_strategy(kind.strategy())
    }

    pub fn with_strategy(strategy: Box<dyn EncodingStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn decode(&self, bytes: &[u8]) -> DecodedText {
        let encoding = self.strategy.detect(bytes);
        DecodedText {
            text: decode_with(encoding, bytes),
            encoding,
        }
    }

    /// Read and decode a whole file. Only I/O can fail here.
    pub fn read(&self, path: &Path) -> Result<DecodedText> {
        let bytes = fs::read(path).map_err(|source| ScanError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let decoded = self.decode(&bytes);
        if decoded.encoding != UTF_8 {
            info!("{} encoding detected: {}", decoded.encoding.name(), path.display());
        }

        Ok(decoded)
    }
}

impl Default for TextDecoder {
    fn default() -> Self {
        Self::new(EncodingKind::default())
    }
}
