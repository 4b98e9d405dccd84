use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::analyze::AnalyzeRequest;
use crate::config::CliOverrides;
use crate::error::{AppError, AppResult};
use crate::evaluate::{EvaluateRequest, ModelSpec};
use crate::extract::ExtractRequest;

#[derive(Debug, Parser)]
#[command(name = "werbench")]
#[command(about = "TTS evaluation toolkit: transcript extraction, WER scoring, statistics")]
pub struct Cli {
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Extract(ExtractArgs),
    Evaluate(EvaluateArgs),
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    #[arg(
        long,
        short = 'i',
        conflicts_with = "from_metadata",
        required_unless_present = "from_metadata"
    )]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub from_metadata: Option<PathBuf>,

    #[arg(long, short = 'o')]
    pub output: PathBuf,

    #[arg(long, short = 'n')]
    pub max_files: Option<usize>,

    #[arg(long)]
    pub model: Option<PathBuf>,

    #[arg(long)]
    pub language: Option<String>,
}

#[derive(Debug)]
pub enum ExtractMode {
    Audio(ExtractRequest),
    Metadata {
        metadata_file: PathBuf,
        output_dir: PathBuf,
        max_lines: Option<usize>,
    },
}

impl ExtractArgs {
    pub fn mode(&self) -> AppResult<ExtractMode> {
        if let Some(metadata_file) = &self.from_metadata {
            return Ok(ExtractMode::Metadata {
                metadata_file: metadata_file.clone(),
                output_dir: self.output.clone(),
                max_lines: self.max_files,
            });
        }
        let Some(input) = &self.input else {
            return Err(AppError::Config(
                "either --input or --from-metadata is required".to_owned(),
            ));
        };
        Ok(ExtractMode::Audio(ExtractRequest {
            input_dir: input.clone(),
            output_dir: self.output.clone(),
            max_files: self.max_files,
        }))
    }
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    #[arg(long, short = 'g')]
    pub ground_truth: PathBuf,

    #[arg(long = "model-dir", short = 'm', required = true)]
    pub model_dirs: Vec<PathBuf>,

    #[arg(long = "model-name", short = 'n', required = true)]
    pub model_names: Vec<String>,

    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

impl EvaluateArgs {
    pub fn to_request(&self) -> AppResult<EvaluateRequest> {
        if self.model_dirs.len() != self.model_names.len() {
            return Err(AppError::Config(format!(
                "{} model dir(s) but {} model name(s); counts must match",
                self.model_dirs.len(),
                self.model_names.len()
            )));
        }

        Ok(EvaluateRequest {
            ground_truth_dir: self.ground_truth.clone(),
            models: self
                .model_names
                .iter()
                .zip(&self.model_dirs)
                .map(|(name, dir)| ModelSpec {
                    name: name.clone(),
                    dir: dir.clone(),
                })
                .collect(),
            output_dir: self.output.clone(),
        })
    }
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

impl AnalyzeArgs {
    pub fn to_request(&self) -> AnalyzeRequest {
        AnalyzeRequest {
            input_dir: self.input.clone(),
            output_dir: self.output.clone(),
        }
    }
}

impl Cli {
    pub fn to_overrides(&self) -> CliOverrides {
        let (model_path, language) = match &self.command {
            Command::Extract(args) => (args.model.clone(), args.language.clone()),
            _ => (None, None),
        };
        CliOverrides {
            config_path: self.config.clone(),
            model_path,
            language,
        }
    }
}
