use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::corpus::write_transcript;
use crate::error::{AppError, AppResult};
use crate::extract::audio::load_wav_mono;
use crate::extract::engine::SpeechEngine;

#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub max_files: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Transcribed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    pub id: String,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionManifest {
    pub run_id: String,
    pub model: String,
    pub started_at_rfc3339: String,
    pub finished_at_rfc3339: String,
    pub transcribed: usize,
    pub skipped: usize,
    pub items: Vec<ItemOutcome>,
}

/// Transcribe every WAV file under the input directory, one transcript file
/// per item, then write a run manifest next to them.
///
/// Files are visited in lexicographic order and capped at `max_files` when
/// given. A failing item is logged by id and skipped; the batch continues.
pub fn run_extraction(
    engine: &mut impl SpeechEngine,
    request: &ExtractRequest,
    model_label: &str,
) -> AppResult<ExtractionManifest> {
    let wav_paths = collect_wavs(&request.input_dir, request.max_files)?;
    if wav_paths.is_empty() {
        warn!(input = %request.input_dir.display(), "no wav files found");
    }

    let started_at = Utc::now().to_rfc3339();
    let mut items = Vec::with_capacity(wav_paths.len());

    for path in &wav_paths {
        let id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_owned();

        match transcribe_one(engine, path) {
            Ok(text) => {
                write_transcript(&request.output_dir, &id, &text)?;
                info!(id = %id, "transcribed");
                items.push(ItemOutcome {
                    id,
                    status: ItemStatus::Transcribed,
                    detail: None,
                });
            }
            Err(error) => {
                warn!(id = %id, error = %error, "skipping item");
                items.push(ItemOutcome {
                    id,
                    status: ItemStatus::Skipped,
                    detail: Some(error.to_string()),
                });
            }
        }
    }

    let transcribed = items
        .iter()
        .filter(|item| item.status == ItemStatus::Transcribed)
        .count();
    let manifest = ExtractionManifest {
        run_id: Uuid::new_v4().to_string(),
        model: model_label.to_owned(),
        started_at_rfc3339: started_at,
        finished_at_rfc3339: Utc::now().to_rfc3339(),
        transcribed,
        skipped: items.len() - transcribed,
        items,
    };

    write_manifest(&request.output_dir, &manifest)?;
    info!(
        transcribed = manifest.transcribed,
        skipped = manifest.skipped,
        output = %request.output_dir.display(),
        "extraction finished"
    );

    Ok(manifest)
}

fn collect_wavs(input_dir: &Path, max_files: Option<usize>) -> AppResult<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(AppError::InputMissing {
            path: input_dir.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("wav") {
            paths.push(path);
        }
    }
    paths.sort();

    if let Some(cap) = max_files {
        paths.truncate(cap);
    }
    Ok(paths)
}

fn transcribe_one(engine: &mut impl SpeechEngine, path: &Path) -> AppResult<String> {
    let samples = load_wav_mono(path)?;
    engine.transcribe(&samples)
}

fn write_manifest(output_dir: &Path, manifest: &ExtractionManifest) -> AppResult<()> {
    std::fs::create_dir_all(output_dir)?;
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    std::fs::write(output_dir.join("extraction_manifest.json"), json)?;
    Ok(())
}
