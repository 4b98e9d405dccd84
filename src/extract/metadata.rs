use std::path::Path;

use tracing::{info, warn};

use crate::corpus::write_transcript;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped_lines: usize,
}

/// Split ground-truth transcripts out of a pipe-delimited metadata file
/// (`<id>|<transcript>|...` per line, LJSpeech convention) into numbered
/// per-item files `1.txt`, `2.txt`, ...
///
/// Blank lines and lines without a second column are logged and skipped.
pub fn import_metadata(
    metadata_file: &Path,
    output_dir: &Path,
    max_lines: Option<usize>,
) -> AppResult<ImportSummary> {
    if !metadata_file.is_file() {
        return Err(AppError::InputMissing {
            path: metadata_file.to_path_buf(),
        });
    }

    let raw = std::fs::read_to_string(metadata_file)?;
    let mut imported = 0usize;
    let mut skipped_lines = 0usize;

    for (line_number, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split('|');
        let transcript = match (parts.next(), parts.next()) {
            (Some(_), Some(transcript)) => transcript.trim(),
            _ => {
                warn!(line = line_number + 1, "metadata line has no transcript column");
                skipped_lines += 1;
                continue;
            }
        };

        imported += 1;
        write_transcript(output_dir, &imported.to_string(), transcript)?;

        if max_lines.is_some_and(|cap| imported >= cap) {
            break;
        }
    }

    info!(
        imported,
        skipped_lines,
        output = %output_dir.display(),
        "metadata import finished"
    );

    Ok(ImportSummary {
        imported,
        skipped_lines,
    })
}
