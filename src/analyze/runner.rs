use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::analyze::report::AnalysisReport;
use crate::analyze::stats::{summarize, ModelStatistics};
use crate::error::{AppError, AppResult};
use crate::table::{read_table, write_table, Table};

#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    pub comparison_path: PathBuf,
    pub report_path: PathBuf,
    pub json_path: PathBuf,
    pub models: usize,
    pub tables: usize,
    pub skipped_tables: usize,
}

/// Load every WER table under the input directory and write the comparison
/// table, the text report, and the JSON document.
///
/// Tables are visited in file-name order and models keep table order then
/// column order, so identical inputs produce identical bytes. A table that
/// fails to parse is reported and skipped; the rest continue.
pub fn run_analysis(request: &AnalyzeRequest) -> AppResult<AnalysisSummary> {
    let table_paths = collect_tables(&request.input_dir)?;
    if table_paths.is_empty() {
        return Err(AppError::Analysis(format!(
            "no csv tables in {}",
            request.input_dir.display()
        )));
    }

    let mut models: Vec<ModelStatistics> = Vec::new();
    let mut skipped_tables = 0usize;

    for path in &table_paths {
        let source = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_owned();
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();

        let columns = read_table(path).and_then(|table| extract_model_columns(&table, stem));
        match columns {
            Ok(columns) => {
                for column in columns {
                    info!(
                        table = %source,
                        model = %column.name,
                        values = column.values.len(),
                        missing = column.missing,
                        "analyzed model column"
                    );
                    models.push(summarize(&column.name, &source, &column.values));
                }
            }
            Err(err) => {
                error!(table = %source, error = %err, "skipping malformed table");
                skipped_tables += 1;
            }
        }
    }

    if models.is_empty() {
        return Err(AppError::Analysis(
            "no usable tables; every input was malformed".to_owned(),
        ));
    }

    let report = AnalysisReport { models };

    std::fs::create_dir_all(&request.output_dir)?;
    let comparison_path = request.output_dir.join("model_comparison.csv");
    write_table(
        &comparison_path,
        &AnalysisReport::comparison_header(),
        &report.comparison_rows(),
    )?;

    let report_path = request.output_dir.join("wer_analysis_report.txt");
    std::fs::write(&report_path, report.render_text())?;

    let json_path = request.output_dir.join("statistics.json");
    std::fs::write(&json_path, report.render_json()?)?;

    Ok(AnalysisSummary {
        comparison_path,
        report_path,
        json_path,
        models: report.models.len(),
        tables: table_paths.len() - skipped_tables,
        skipped_tables,
    })
}

fn collect_tables(input_dir: &Path) -> AppResult<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(AppError::InputMissing {
            path: input_dir.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("csv") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

struct ModelColumn {
    name: String,
    values: Vec<f64>,
    missing: usize,
}

/// Locate the WER columns in a table. Multi-model tables carry one
/// `wer_<name>` column per model; single-model tables carry a plain `wer`
/// column, with the model name taken from the text column between
/// `ground_truth` and `wer`, or from the file stem as a fallback.
fn extract_model_columns(table: &Table, file_stem: &str) -> AppResult<Vec<ModelColumn>> {
    let multi: Vec<(usize, String)> = table
        .header
        .iter()
        .enumerate()
        .filter_map(|(index, column)| {
            column
                .strip_prefix("wer_")
                .map(|name| (index, name.to_owned()))
        })
        .collect();

    if !multi.is_empty() {
        return multi
            .into_iter()
            .map(|(index, name)| parse_column(table, index, name))
            .collect();
    }

    let Some(index) = table.column_index("wer") else {
        return Err(AppError::Table("no wer column in header".to_owned()));
    };
    let name = single_model_name(&table.header, index, file_stem);
    Ok(vec![parse_column(table, index, name)?])
}

fn single_model_name(header: &[String], wer_index: usize, file_stem: &str) -> String {
    if wer_index >= 3 && header[0] == "id" && header[1] == "ground_truth" {
        return header[wer_index - 1].clone();
    }
    file_stem
        .strip_suffix("_wer")
        .unwrap_or(file_stem)
        .to_owned()
}

fn parse_column(table: &Table, index: usize, name: String) -> AppResult<ModelColumn> {
    let mut values = Vec::with_capacity(table.rows.len());
    let mut missing = 0usize;

    for (row_number, row) in table.rows.iter().enumerate() {
        let cell = row[index].trim();
        if cell.is_empty() {
            missing += 1;
            continue;
        }
        let value: f64 = cell.parse().map_err(|_| {
            AppError::Table(format!(
                "row {}: `{cell}` is not a number in column `{}`",
                row_number + 1,
                table.header[index]
            ))
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::Table(format!(
                "row {}: wer value {value} out of range",
                row_number + 1
            )));
        }
        values.push(value);
    }

    Ok(ModelColumn {
        name,
        values,
        missing,
    })
}
