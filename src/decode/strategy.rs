use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Bytes inspected by the statistical guesser.
pub const SAMPLE_LEN: usize = 100_000;

/// Chooses the encoding for a file from its raw bytes.
pub trait EncodingStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, bytes: &[u8]) -> &'static Encoding;
}

/// Try UTF-8 first and fall back to UTF-16 when the bytes are not valid UTF-8
/// or decode to text containing NUL characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSniff;

impl EncodingStrategy for NullSniff {
    fn name(&self) -> &'static str {
        "null-sniff"
    }

    fn detect(&self, bytes: &[u8]) -> &'static Encoding {
        match std::str::from_utf8(bytes) {
            Ok(text) if !text.contains('\0') => UTF_8,
            _ => utf16_byte_order(bytes),
        }
    }
}

/// Guess the encoding from a leading sample with `chardetng`. A byte-order
/// mark wins outright, and NUL-heavy samples are taken as BOM-less UTF-16,
/// which `chardetng` never reports.
#[derive(Debug, Clone, Copy)]
pub struct ByteStatistics {
    sample_len: usize,
}

impl Default for ByteStatistics {
    fn default() -> Self {
        Self { sample_len: SAMPLE_LEN }
    }
}

impl ByteStatistics {
    pub fn with_sample_len(sample_len: usize) -> Self {
        Self { sample_len: sample_len.max(2) }
    }
}

impl EncodingStrategy for ByteStatistics {
    fn name(&self) -> &'static str {
        "statistical"
    }

    fn detect(&self, bytes: &[u8]) -> &'static Encoding {
        let sample = &bytes[..bytes.len().min(self.sample_len)];

        if let Some((encoding, _)) = Encoding::for_bom(sample) {
            return encoding;
        }

        let stats = NullStats::count(sample);
        // UTF-16 text in a Latin script is roughly half NUL bytes
        if stats.total() * 10 > sample.len() {
            return stats.byte_order();
        }

        // ASCII decodes the same under every candidate
        if sample.is_ascii() {
            return UTF_8;
        }

        let mut detector = EncodingDetector::new();
        detector.feed(sample, sample.len() == bytes.len());
        detector.guess(None, true)
    }
}

pub(crate) const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
pub(crate) const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

#[derive(Debug, Default)]
struct NullStats {
    even: usize,
    odd: usize,
}

impl NullStats {
    fn count(bytes: &[u8]) -> Self {
        let mut stats = NullStats::default();
        for (i, b) in bytes.iter().enumerate() {
            if *b == 0 {
                if i % 2 == 0 {
                    stats.even += 1;
                } else {
                    stats.odd += 1;
                }
            }
        }
        stats
    }

    fn total(&self) -> usize {
        self.even + self.odd
    }

    /// ASCII in little-endian UTF-16 puts the zero high byte at odd offsets.
    fn byte_order(&self) -> &'static Encoding {
        if self.even > self.odd {
            UTF_16BE
        } else {
            UTF_16LE
        }
    }
}

/// Byte order for bytes already judged to be UTF-16; little-endian unless a
/// BOM or the NUL layout says otherwise.
fn utf16_byte_order(bytes: &[u8]) -> &'static Encoding {
    if bytes.starts_with(&UTF16_BE_BOM) {
        return UTF_16BE;
    }
    if bytes.starts_with(&UTF16_LE_BOM) {
        return UTF_16LE;
    }

    NullStats::count(&bytes[..bytes.len().min(SAMPLE_LEN)]).byte_order()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn utf16be(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect()
    }

    #[test]
    fn test_null_sniff_plain_utf8() {
        assert_eq!(NullSniff.detect(b"TOTAL ENERGY -1.0 Eh"), UTF_8);
        assert_eq!(NullSniff.detect("Eh/α".as_bytes()), UTF_8);
        assert_eq!(NullSniff.detect(b""), UTF_8);
    }

    #[test]
    fn test_null_sniff_detects_utf16() {
        // Valid UTF-8, but full of NULs
        assert_eq!(NullSniff.detect(&utf16le("TOTAL ENERGY")), UTF_16LE);
        assert_eq!(NullSniff.detect(&utf16be("TOTAL ENERGY")), UTF_16BE);

        let mut with_bom = UTF16_LE_BOM.to_vec();
        with_bom.extend(utf16le("GAP α"));
        assert_eq!(NullSniff.detect(&with_bom), UTF_16LE);
    }

    #[test]
    fn test_statistics_boms() {
        let stats = ByteStatistics::default();

        assert_eq!(stats.detect(&[0xEF, 0xBB, 0xBF, b'a']), UTF_8);
        assert_eq!(stats.detect(&[0xFF, 0xFE, b'a', 0]), UTF_16LE);
        assert_eq!(stats.detect(&[0xFE, 0xFF, 0, b'a']), UTF_16BE);
    }

    #[test]
    fn test_statistics_null_layout() {
        let stats = ByteStatistics::default();

        assert_eq!(stats.detect(&utf16le("HOMO-LUMO GAP 1.5 eV")), UTF_16LE);
        assert_eq!(stats.detect(&utf16be("HOMO-LUMO GAP 1.5 eV")), UTF_16BE);
    }

    #[test]
    fn test_statistics_guesses_text_encodings() {
        let stats = ByteStatistics::default();

        assert_eq!(stats.detect(b"TOTAL ENERGY -1.0 Eh"), UTF_8);
        assert_eq!(stats.detect("Gradient norm in Eh/α, café crème".as_bytes()), UTF_8);
        assert_eq!(stats.detect(b"R\xe9sultats: caf\xe9 cr\xe8me, \xe9nergie totale"), WINDOWS_1252);
    }
}
