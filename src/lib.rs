pub mod analyze;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluate;
pub mod extract;
pub mod table;

use clap::Parser;

use crate::cli::{AnalyzeArgs, Cli, Command, EvaluateArgs, ExtractArgs, ExtractMode};
use crate::config::{load_config, AppConfig};
use crate::error::{AppError, AppResult};
use crate::extract::WhisperEngine;

trait CommandExecutor {
    fn extract(&self, config: &AppConfig, args: &ExtractArgs) -> AppResult<()>;
    fn evaluate(&self, args: &EvaluateArgs) -> AppResult<()>;
    fn analyze(&self, args: &AnalyzeArgs) -> AppResult<()>;
}

struct DefaultCommandExecutor;

impl CommandExecutor for DefaultCommandExecutor {
    fn extract(&self, config: &AppConfig, args: &ExtractArgs) -> AppResult<()> {
        match args.mode()? {
            ExtractMode::Metadata {
                metadata_file,
                output_dir,
                max_lines,
            } => {
                let summary = extract::import_metadata(&metadata_file, &output_dir, max_lines)?;
                println!(
                    "Imported {} transcript(s) into {}",
                    summary.imported,
                    output_dir.display()
                );
                if summary.skipped_lines > 0 {
                    println!("Skipped {} malformed line(s)", summary.skipped_lines);
                }
            }
            ExtractMode::Audio(request) => {
                let model_path = config.transcription.model_path.clone().ok_or_else(|| {
                    AppError::Config(
                        "no speech model configured; pass --model or set transcription.model_path"
                            .to_owned(),
                    )
                })?;
                let mut engine = WhisperEngine::load(&model_path, &config.transcription)?;
                let manifest = extract::run_extraction(
                    &mut engine,
                    &request,
                    &model_path.display().to_string(),
                )?;
                println!(
                    "Transcribed {} file(s), skipped {}, output in {}",
                    manifest.transcribed,
                    manifest.skipped,
                    request.output_dir.display()
                );
            }
        }
        Ok(())
    }

    fn evaluate(&self, args: &EvaluateArgs) -> AppResult<()> {
        let request = args.to_request()?;
        let summary = evaluate::run_evaluation(&request)?;
        println!("Wrote {}", summary.table_path.display());
        for model in &summary.models {
            match model.mean_wer {
                Some(mean) => println!(
                    "{}: mean WER {mean:.4} over {} item(s), {} missing",
                    model.name, model.scored, model.missing
                ),
                None => println!(
                    "{}: no scored items ({} missing)",
                    model.name, model.missing
                ),
            }
        }
        Ok(())
    }

    fn analyze(&self, args: &AnalyzeArgs) -> AppResult<()> {
        let summary = analyze::run_analysis(&args.to_request())?;
        println!(
            "Analyzed {} model column(s) from {} table(s)",
            summary.models, summary.tables
        );
        if summary.skipped_tables > 0 {
            println!("Skipped {} malformed table(s)", summary.skipped_tables);
        }
        println!("Comparison table: {}", summary.comparison_path.display());
        println!("Text report:      {}", summary.report_path.display());
        println!("JSON statistics:  {}", summary.json_path.display());
        Ok(())
    }
}

fn execute_command<E: CommandExecutor>(
    command: Command,
    config: AppConfig,
    executor: &E,
) -> AppResult<()> {
    match command {
        Command::Extract(args) => executor.extract(&config, &args),
        Command::Evaluate(args) => executor.evaluate(&args),
        Command::Analyze(args) => executor.analyze(&args),
    }
}

pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let paths = bootstrap::AppPaths::resolve()?;
    paths.ensure_dirs()?;
    let config = load_config(&paths, &cli.to_overrides())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&config.diagnostics.log_level)
            }),
        )
        .with_target(false)
        .with_level(true)
        .compact()
        .init();

    execute_command(cli.command, config, &DefaultCommandExecutor)
}
