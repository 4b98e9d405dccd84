use std::path::PathBuf;

use crate::bootstrap::AppPaths;
use crate::config::schema::AppConfig;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub model_path: Option<PathBuf>,
    pub language: Option<String>,
}

pub fn load_config(paths: &AppPaths, overrides: &CliOverrides) -> AppResult<AppConfig> {
    let config_path = overrides
        .config_path
        .clone()
        .unwrap_or_else(|| paths.config_file.clone());

    let mut config = if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)?;
        toml::from_str::<AppConfig>(&raw)?
    } else {
        let defaults = AppConfig::default();
        write_default_config(&config_path, &defaults)?;
        defaults
    };

    apply_cli_overrides(&mut config, overrides);

    validate(&config)?;
    Ok(config)
}

fn write_default_config(path: &PathBuf, defaults: &AppConfig) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let data = toml::to_string_pretty(defaults)?;
    std::fs::write(path, data)?;
    Ok(())
}

fn validate(config: &AppConfig) -> AppResult<()> {
    if let Some(threads) = config.transcription.threads {
        if threads == 0 {
            return Err(AppError::Config(
                "transcription.threads must be > 0".to_owned(),
            ));
        }
    }

    if let Some(language) = &config.transcription.language {
        if language.trim().is_empty() {
            return Err(AppError::Config(
                "transcription.language must not be blank".to_owned(),
            ));
        }
    }

    Ok(())
}

fn apply_cli_overrides(config: &mut AppConfig, overrides: &CliOverrides) {
    if let Some(value) = &overrides.model_path {
        config.transcription.model_path = Some(value.clone());
    }
    if let Some(value) = &overrides.language {
        config.transcription.language = Some(value.clone());
    }
}
