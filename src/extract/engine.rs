use std::path::Path;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, WhisperState};

use crate::config::TranscriptionConfig;
use crate::error::{AppError, AppResult};

/// Speech-to-text seam. The batch runner only sees this trait, so tests can
/// drive it with a fake engine and no model file.
pub trait SpeechEngine {
    /// Transcribe 16 kHz mono samples to text.
    fn transcribe(&mut self, samples: &[f32]) -> AppResult<String>;
}

/// whisper.cpp engine via whisper-rs.
///
/// The context is leaked to `'static` so the state can borrow it without a
/// self-referential struct; the model stays loaded for the rest of the
/// process, which ends when the batch does.
pub struct WhisperEngine {
    state: WhisperState,
    language: Option<String>,
    threads: Option<u32>,
}

impl WhisperEngine {
    pub fn load(model_path: &Path, config: &TranscriptionConfig) -> AppResult<Self> {
        if !model_path.is_file() {
            return Err(AppError::InputMissing {
                path: model_path.to_path_buf(),
            });
        }

        info!(model = %model_path.display(), "loading speech model");

        let model_path = model_path
            .to_str()
            .ok_or_else(|| AppError::Config("model path is not valid UTF-8".to_owned()))?;
        let context =
            WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
                .map_err(|error| AppError::Transcription(format!("model load failed: {error}")))?;

        let context: &'static WhisperContext = Box::leak(Box::new(context));
        let state = context
            .create_state()
            .map_err(|error| AppError::Transcription(format!("state init failed: {error}")))?;

        Ok(Self {
            state,
            language: config.language.clone(),
            threads: config.threads,
        })
    }
}

impl SpeechEngine for WhisperEngine {
    fn transcribe(&mut self, samples: &[f32]) -> AppResult<String> {
        debug!(samples = samples.len(), "running inference");

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(self.language.as_deref());
        if let Some(threads) = self.threads {
            params.set_n_threads(threads as i32);
        }
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        self.state
            .full(params, samples)
            .map_err(|error| AppError::Transcription(format!("inference failed: {error}")))?;

        let num_segments = self.state.full_n_segments();
        let mut text = String::new();
        for index in 0..num_segments {
            if let Some(segment) = self.state.get_segment(index) {
                if let Ok(piece) = segment.to_str_lossy() {
                    text.push_str(&piece);
                }
            }
        }

        Ok(text.trim().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::WhisperEngine;
    use crate::config::TranscriptionConfig;
    use crate::error::AppError;
    use std::path::Path;

    #[test]
    fn missing_model_file_fails_before_touching_whisper() {
        let error = WhisperEngine::load(
            Path::new("/nonexistent/ggml-base.en.bin"),
            &TranscriptionConfig::default(),
        )
        .expect_err("must fail");
        assert!(matches!(error, AppError::InputMissing { .. }));
    }
}
