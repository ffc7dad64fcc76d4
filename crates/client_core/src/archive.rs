use std::io::{Cursor, Read};

use shared::{constants::file_name, protocol::OutputFormat};
use tracing::{debug, warn};
use zip::{result::ZipError, ZipArchive};

use crate::error::ArchiveError;

/// Decoded contents of one projection result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultArchive {
    pub error_lines: Vec<String>,
    pub log_lines: Vec<String>,
    pub debug_lines: Option<Vec<String>>,
    /// CSV yield table rows, blank lines removed.
    pub yield_csv_lines: Vec<String>,
    /// Text report lines, blank lines kept for layout.
    pub yield_report_lines: Vec<String>,
    pub raw: Vec<u8>,
    pub file_name: String,
}

impl ResultArchive {
    /// Whether the service reported anything in its error log.
    pub fn has_errors(&self) -> bool {
        self.error_lines.iter().any(|line| !line.trim().is_empty())
    }
}

/// Splits on `\r?\n`, keeping empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

fn filters_blank_lines(format: OutputFormat) -> bool {
    matches!(
        format,
        OutputFormat::CsvYieldTable | OutputFormat::Dcsv | OutputFormat::Plotsy
    )
}

fn read_entry(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<String>, ArchiveError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => {
            return Err(ArchiveError::UnreadableEntry {
                name: name.to_string(),
                reason: err.to_string(),
            })
        }
    };
    let mut bytes = Vec::with_capacity(initial_capacity(entry.size()));
    entry
        .read_to_end(&mut bytes)
        .map_err(|err| ArchiveError::UnreadableEntry {
            name: name.to_string(),
            reason: err.to_string(),
        })?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Largest buffer reserved up front for one entry. Entry headers are not trusted.
const MAX_PREALLOCATION: u64 = 1 << 20;

fn initial_capacity(claimed_size: u64) -> usize {
    claimed_size.min(MAX_PREALLOCATION) as usize
}

/// Unpacks a result archive produced for `format`.
///
/// Fails without producing anything when the container is corrupt or when any
/// required entry is absent; the error then names every missing entry.
pub fn decode(
    bytes: &[u8],
    archive_name: &str,
    format: OutputFormat,
) -> Result<ResultArchive, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| ArchiveError::InvalidArchive(err.to_string()))?;
    let yield_name = format.yield_entry_name();

    let error_log = read_entry(&mut archive, file_name::ERROR_LOG)?;
    let progress_log = read_entry(&mut archive, file_name::PROGRESS_LOG)?;
    let yield_text = read_entry(&mut archive, yield_name)?;
    let debug_log = read_entry(&mut archive, file_name::DEBUG_LOG)?;

    let (Some(error_log), Some(progress_log), Some(yield_text)) =
        (error_log.as_ref(), progress_log.as_ref(), yield_text.as_ref())
    else {
        let missing: Vec<String> = [
            (file_name::ERROR_LOG, error_log.is_none()),
            (file_name::PROGRESS_LOG, progress_log.is_none()),
            (yield_name, yield_text.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| name.to_string())
        .collect();
        warn!(archive = archive_name, missing = ?missing, "result archive incomplete");
        return Err(ArchiveError::MissingEntries(missing));
    };

    let mut result = ResultArchive {
        error_lines: split_lines(error_log),
        log_lines: split_lines(progress_log),
        debug_lines: debug_log.as_deref().map(split_lines),
        raw: bytes.to_vec(),
        file_name: archive_name.to_string(),
        ..ResultArchive::default()
    };
    if filters_blank_lines(format) {
        result.yield_csv_lines = split_lines(yield_text)
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect();
    } else {
        result.yield_report_lines = split_lines(yield_text);
    }

    debug!(
        archive = archive_name,
        entries = archive.len(),
        error_lines = result.error_lines.len(),
        yield_lines = result.yield_csv_lines.len() + result.yield_report_lines.len(),
        "result archive decoded"
    );
    Ok(result)
}

/// Holds the most recent decoded report. A failed decode leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct ReportState {
    current: Option<ResultArchive>,
}

impl ReportState {
    pub fn current(&self) -> Option<&ResultArchive> {
        self.current.as_ref()
    }

    pub fn replace_with(
        &mut self,
        bytes: &[u8],
        archive_name: &str,
        format: OutputFormat,
    ) -> Result<&ResultArchive, ArchiveError> {
        let decoded = decode(bytes, archive_name, format)?;
        Ok(self.current.insert(decoded))
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
#[path = "tests/archive_tests.rs"]
mod tests;
