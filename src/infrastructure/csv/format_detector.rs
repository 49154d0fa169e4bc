// ============================================================
// FORMAT DETECTOR
// ============================================================
// Detect text encoding and field delimiter, read delimited files
// into a RawTable

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::table::RawTable;

/// Candidate text encodings, tried in order: the BOM-aware UTF-8 variant
/// first, then strict UTF-8, then Windows-1252, which maps every byte and
/// acts as the permissive fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextEncoding {
    Utf8Bom,
    Utf8,
    Windows1252,
}

const ENCODING_CANDIDATES: [TextEncoding; 3] = [
    TextEncoding::Utf8Bom,
    TextEncoding::Utf8,
    TextEncoding::Windows1252,
];

impl TextEncoding {
    fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8Bom => "utf-8 (bom)",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1252 => "windows-1252",
        }
    }

    /// Decode strictly; `None` when the bytes are not valid under this
    /// encoding. Windows-1252 never returns `None`.
    fn decode(&self, bytes: &[u8]) -> Option<String> {
        let (text, had_errors) = match self {
            TextEncoding::Utf8Bom => UTF_8.decode_with_bom_removal(bytes),
            TextEncoding::Utf8 => UTF_8.decode_without_bom_handling(bytes),
            TextEncoding::Windows1252 => WINDOWS_1252.decode_without_bom_handling(bytes),
        };

        if had_errors {
            None
        } else {
            Some(text.into_owned())
        }
    }
}

/// Reads delimited text files with no prior knowledge of their encoding
/// or delimiter.
///
/// Detection is a best-effort heuristic: an ordered list of candidate
/// encodings, then a semicolon-vs-comma count on the header line. It is
/// not guaranteed correct for every locale or payload; a miss surfaces
/// downstream when the required columns fail to resolve.
pub struct FormatDetector;

impl FormatDetector {
    /// Detect encoding and delimiter for the file at `path` and read it
    /// into a [`RawTable`]. Pure read, no side effects.
    pub fn detect_and_read(path: &Path) -> Result<RawTable> {
        let bytes = fs::read(path)
            .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;

        Self::read_bytes(&bytes)
    }

    /// Same as [`Self::detect_and_read`], starting from raw bytes.
    pub fn read_bytes(bytes: &[u8]) -> Result<RawTable> {
        let (encoding, content, header) = Self::detect_encoding(bytes)?;
        let delimiter = Self::infer_delimiter(&header);
        debug!(
            encoding = encoding.name(),
            delimiter = %(delimiter as char),
            "detected input format"
        );

        Self::parse_with_fallback(&content, delimiter)
    }

    /// Try each candidate encoding until one decodes the bytes and yields
    /// a non-blank line (the header candidate).
    fn detect_encoding(bytes: &[u8]) -> Result<(TextEncoding, String, String)> {
        for encoding in ENCODING_CANDIDATES {
            let Some(content) = encoding.decode(bytes) else {
                continue;
            };

            let header = content
                .lines()
                .find(|line| !line.trim().is_empty())
                .map(|line| line.to_string());

            if let Some(header) = header {
                return Ok((encoding, content, header));
            }
        }

        Err(AppError::EncodingError(
            "no candidate encoding yielded a non-blank header line".to_string(),
        ))
    }

    /// Semicolon wins when it appears in the header at least as often as
    /// the comma; comma otherwise.
    pub fn infer_delimiter(header: &str) -> u8 {
        let semicolons = header.matches(';').count();
        let commas = header.matches(',').count();

        if semicolons > 0 && semicolons >= commas {
            b';'
        } else {
            b','
        }
    }

    /// Parse, then re-parse forcing semicolon if the result collapsed to a
    /// single column whose name still contains one. That shape is the
    /// symptom of a misdetected delimiter.
    fn parse_with_fallback(content: &str, delimiter: u8) -> Result<RawTable> {
        let table = Self::parse(content, delimiter)?;

        if delimiter != b';' && table.column_count() == 1 && table.columns[0].contains(';') {
            debug!("single column containing ';', re-parsing with semicolon");
            return Self::parse(content, b';');
        }

        Ok(table)
    }

    /// Tokenize the decoded content into a table. Every cell is text.
    /// Rows that cannot be tokenized or are wider than the header are
    /// skipped; short rows are padded with empty cells.
    fn parse(content: &str, delimiter: u8) -> Result<RawTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read header row: {}", e)))?;
        let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

        let mut table = RawTable::new(columns);
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    debug!(error = %err, "skipping unparseable row");
                    skipped += 1;
                    continue;
                }
            };

            if record.len() > table.column_count() {
                skipped += 1;
                continue;
            }

            table.push_row(record.iter().map(|cell| cell.to_string()).collect());
        }

        if skipped > 0 {
            debug!(skipped, "skipped malformed rows");
        }

        Ok(table)
    }
}
