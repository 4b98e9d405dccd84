use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::corpus::load_transcript_dir;
use crate::error::{AppError, AppResult};
use crate::evaluate::wer::wer;
use crate::table::write_table;

#[derive(Debug, Clone)]
pub struct ModelSpec {
    pub name: String,
    pub dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct EvaluateRequest {
    pub ground_truth_dir: PathBuf,
    pub models: Vec<ModelSpec>,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ModelSummary {
    pub name: String,
    pub scored: usize,
    pub missing: usize,
    pub mean_wer: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct EvaluationSummary {
    pub table_path: PathBuf,
    pub rows: usize,
    pub models: Vec<ModelSummary>,
}

/// Score every ground-truth item against each model's transcript set and
/// write one WER table.
///
/// Rows follow ground-truth identifier order (lexicographic). An identifier
/// absent from a model's directory produces empty text and WER cells for that
/// model, logged by id; it never aborts the run. Missing directories do.
pub fn run_evaluation(request: &EvaluateRequest) -> AppResult<EvaluationSummary> {
    if request.models.is_empty() {
        return Err(AppError::Evaluation("no models given".to_owned()));
    }
    for (index, model) in request.models.iter().enumerate() {
        if request.models[..index]
            .iter()
            .any(|other| other.name == model.name)
        {
            return Err(AppError::Evaluation(format!(
                "duplicate model name `{}`",
                model.name
            )));
        }
    }

    let ground_truth = load_transcript_dir(&request.ground_truth_dir)?;
    if ground_truth.is_empty() {
        return Err(AppError::Evaluation(format!(
            "no ground truth items in {}",
            request.ground_truth_dir.display()
        )));
    }

    let mut outputs = Vec::with_capacity(request.models.len());
    for model in &request.models {
        let items = load_transcript_dir(&model.dir)?;
        info!(model = %model.name, items = items.len(), "loaded model output");
        outputs.push(items);
    }

    let header = build_header(&request.models);
    let mut rows = Vec::with_capacity(ground_truth.len());
    let mut scored = vec![0usize; request.models.len()];
    let mut missing = vec![0usize; request.models.len()];
    let mut wer_sums = vec![0.0f64; request.models.len()];

    for (id, reference) in &ground_truth {
        let row = build_row(id, reference, &outputs, |index, value| match value {
            Some(value) => {
                scored[index] += 1;
                wer_sums[index] += value;
            }
            None => {
                warn!(
                    id = %id,
                    model = %request.models[index].name,
                    "model output missing for ground-truth item"
                );
                missing[index] += 1;
            }
        });
        rows.push(row);
    }

    let table_path = request.output_dir.join(table_file_name(&request.models));
    write_table(&table_path, &header, &rows)?;

    let models = request
        .models
        .iter()
        .enumerate()
        .map(|(index, model)| {
            let mean_wer = (scored[index] > 0)
                .then(|| round4(wer_sums[index] / scored[index] as f64));
            if let Some(mean) = mean_wer {
                info!(model = %model.name, mean_wer = mean, "model evaluated");
            }
            ModelSummary {
                name: model.name.clone(),
                scored: scored[index],
                missing: missing[index],
                mean_wer,
            }
        })
        .collect();

    Ok(EvaluationSummary {
        table_path,
        rows: rows.len(),
        models,
    })
}

fn build_header(models: &[ModelSpec]) -> Vec<String> {
    let mut header = vec!["id".to_owned(), "ground_truth".to_owned()];
    for model in models {
        header.push(model.name.clone());
    }
    if models.len() == 1 {
        header.push("wer".to_owned());
    } else {
        for model in models {
            header.push(format!("wer_{}", model.name));
        }
    }
    header
}

fn build_row(
    id: &str,
    reference: &str,
    outputs: &[BTreeMap<String, String>],
    mut record: impl FnMut(usize, Option<f64>),
) -> Vec<String> {
    let mut texts = Vec::with_capacity(outputs.len());
    let mut scores = Vec::with_capacity(outputs.len());

    for (index, output) in outputs.iter().enumerate() {
        match output.get(id) {
            Some(text) => {
                let value = round4(wer(reference, text));
                record(index, Some(value));
                texts.push(text.clone());
                scores.push(format!("{value}"));
            }
            None => {
                record(index, None);
                texts.push(String::new());
                scores.push(String::new());
            }
        }
    }

    let mut row = vec![id.to_owned(), reference.to_owned()];
    row.extend(texts);
    row.extend(scores);
    row
}

fn table_file_name(models: &[ModelSpec]) -> String {
    if models.len() == 1 {
        format!("{}_wer.csv", models[0].name)
    } else {
        "combined_wer.csv".to_owned()
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
