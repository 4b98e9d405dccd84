use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("toml serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input path not found: {path}")]
    InputMissing { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("audio decode failed: {0}")]
    Audio(String),

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("evaluation failed: {0}")]
    Evaluation(String),

    #[error("malformed table: {0}")]
    Table(String),

    #[error("analysis failed: {0}")]
    Analysis(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;
    use serde::ser::Error as _;
    use std::path::PathBuf;

    #[test]
    fn display_messages_cover_all_variants() {
        let cases = vec![
            (
                AppError::Io(std::io::Error::other("disk gone")),
                "io error: disk gone",
            ),
            (
                AppError::TomlParse(toml::from_str::<toml::Value>("not= [valid").unwrap_err()),
                "toml parse error: ",
            ),
            (
                AppError::TomlSerialize(toml::ser::Error::custom("serialize failed")),
                "toml serialize error: serialize failed",
            ),
            (
                AppError::Json(serde_json::from_str::<serde_json::Value>("{bad").unwrap_err()),
                "json error: ",
            ),
            (
                AppError::InputMissing {
                    path: PathBuf::from("/tmp/missing"),
                },
                "input path not found: /tmp/missing",
            ),
            (
                AppError::Config("bad config".to_owned()),
                "invalid configuration: bad config",
            ),
            (
                AppError::Audio("truncated wav".to_owned()),
                "audio decode failed: truncated wav",
            ),
            (
                AppError::Transcription("tx failed".to_owned()),
                "transcription failed: tx failed",
            ),
            (
                AppError::Evaluation("no ground truth items".to_owned()),
                "evaluation failed: no ground truth items",
            ),
            (
                AppError::Table("ragged row".to_owned()),
                "malformed table: ragged row",
            ),
            (
                AppError::Analysis("no tables found".to_owned()),
                "analysis failed: no tables found",
            ),
        ];

        for (error, expected_prefix) in cases {
            let display = format!("{error}");
            let debug = format!("{error:?}");
            assert!(
                display.starts_with(expected_prefix),
                "display message `{display}` did not start with `{expected_prefix}`"
            );
            assert!(!display.trim().is_empty());
            assert!(!debug.trim().is_empty());
        }
    }
}
