use serde::Serialize;

use crate::analyze::stats::{Metrics, ModelStatistics, Rating};
use crate::error::AppResult;

const RULE: &str =
    "================================================================================";
const SECTION_RULE: &str = "----------------------------------------";

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub models: Vec<ModelStatistics>,
}

impl AnalysisReport {
    pub fn comparison_header() -> Vec<String> {
        [
            "model",
            "source",
            "count",
            "rating",
            "mean",
            "median",
            "std",
            "variance",
            "min",
            "max",
            "range",
            "q1",
            "q3",
            "iqr",
            "p5",
            "p95",
            "skewness",
            "kurtosis",
            "cv",
            "sem",
            "ci_95_lower",
            "ci_95_upper",
            "excellent_count",
            "good_count",
            "fair_count",
            "poor_count",
            "excellent_pct",
            "good_pct",
            "fair_pct",
            "poor_pct",
        ]
        .iter()
        .map(|name| (*name).to_owned())
        .collect()
    }

    /// One row per model; no-data models keep empty metric cells so the
    /// column layout never changes.
    pub fn comparison_rows(&self) -> Vec<Vec<String>> {
        self.models
            .iter()
            .map(|stats| {
                let mut row = vec![
                    stats.model.clone(),
                    stats.source.clone(),
                    stats.count.to_string(),
                    stats.rating.label().to_owned(),
                ];
                match &stats.metrics {
                    Some(metrics) => {
                        for value in [
                            metrics.mean,
                            metrics.median,
                            metrics.std,
                            metrics.variance,
                            metrics.min,
                            metrics.max,
                            metrics.range,
                            metrics.q1,
                            metrics.q3,
                            metrics.iqr,
                            metrics.p5,
                            metrics.p95,
                            metrics.skewness,
                            metrics.kurtosis,
                            metrics.cv,
                            metrics.sem,
                            metrics.ci_95_lower,
                            metrics.ci_95_upper,
                        ] {
                            row.push(format!("{value}"));
                        }
                        row.push(metrics.buckets.excellent_count.to_string());
                        row.push(metrics.buckets.good_count.to_string());
                        row.push(metrics.buckets.fair_count.to_string());
                        row.push(metrics.buckets.poor_count.to_string());
                        for pct in [
                            metrics.buckets.excellent_pct,
                            metrics.buckets.good_pct,
                            metrics.buckets.fair_pct,
                            metrics.buckets.poor_pct,
                        ] {
                            row.push(format!("{pct}"));
                        }
                    }
                    None => row.extend((0..26).map(|_| String::new())),
                }
                row
            })
            .collect()
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(RULE);
        out.push_str("\nWER ANALYSIS REPORT\n");
        out.push_str(RULE);
        out.push('\n');

        for stats in &self.models {
            out.push('\n');
            out.push_str(RULE);
            out.push_str(&format!(
                "\nMODEL: {} (source: {})\n",
                stats.model, stats.source
            ));
            out.push_str(RULE);
            out.push('\n');

            match &stats.metrics {
                Some(metrics) => {
                    render_model_sections(&mut out, stats.count, stats.rating, metrics);
                }
                None => out.push_str("\nNo usable WER samples for this model.\n"),
            }
        }

        if self.models.len() > 1 {
            render_ranking(&mut out, &self.models);
        }

        out
    }

    pub fn render_json(&self) -> AppResult<String> {
        let mut json = serde_json::to_string_pretty(&self.models)?;
        json.push('\n');
        Ok(json)
    }
}

fn render_model_sections(out: &mut String, count: usize, rating: Rating, metrics: &Metrics) {
    out.push_str("\nBASIC STATISTICS:\n");
    out.push_str(SECTION_RULE);
    out.push('\n');
    out.push_str(&format!("  {:<24}{}\n", "Sample size:", count));
    out.push_str(&format!("  {:<24}{:.4}\n", "Mean WER:", metrics.mean));
    out.push_str(&format!("  {:<24}{:.4}\n", "Median WER:", metrics.median));
    out.push_str(&format!("  {:<24}{:.4}\n", "Std deviation:", metrics.std));
    out.push_str(&format!("  {:<24}{:.4}\n", "Variance:", metrics.variance));
    out.push_str(&format!("  {:<24}{:.4}\n", "Min WER:", metrics.min));
    out.push_str(&format!("  {:<24}{:.4}\n", "Max WER:", metrics.max));
    out.push_str(&format!("  {:<24}{:.4}\n", "Range:", metrics.range));

    out.push_str("\nDISTRIBUTION:\n");
    out.push_str(SECTION_RULE);
    out.push('\n');
    out.push_str(&format!("  {:<24}{:.4}\n", "Q1 (25th pct):", metrics.q1));
    out.push_str(&format!("  {:<24}{:.4}\n", "Q3 (75th pct):", metrics.q3));
    out.push_str(&format!("  {:<24}{:.4}\n", "IQR:", metrics.iqr));
    out.push_str(&format!("  {:<24}{:.4}\n", "5th percentile:", metrics.p5));
    out.push_str(&format!("  {:<24}{:.4}\n", "95th percentile:", metrics.p95));
    out.push_str(&format!("  {:<24}{:.4}\n", "Skewness:", metrics.skewness));
    out.push_str(&format!("  {:<24}{:.4}\n", "Kurtosis:", metrics.kurtosis));

    out.push_str("\nRELIABILITY:\n");
    out.push_str(SECTION_RULE);
    out.push('\n');
    out.push_str(&format!(
        "  {:<24}{:.2}%\n",
        "Coeff. of variation:", metrics.cv
    ));
    out.push_str(&format!("  {:<24}{:.4}\n", "Std error of mean:", metrics.sem));
    out.push_str(&format!(
        "  {:<24}[{:.4}, {:.4}]\n",
        "95% CI for mean:", metrics.ci_95_lower, metrics.ci_95_upper
    ));

    out.push_str("\nPERFORMANCE BREAKDOWN:\n");
    out.push_str(SECTION_RULE);
    out.push('\n');
    let buckets = &metrics.buckets;
    out.push_str(&format!(
        "  Excellent (wer <= 0.10):  {:>5} items ({:.1}%)\n",
        buckets.excellent_count, buckets.excellent_pct
    ));
    out.push_str(&format!(
        "  Good (0.10 - 0.20):       {:>5} items ({:.1}%)\n",
        buckets.good_count, buckets.good_pct
    ));
    out.push_str(&format!(
        "  Fair (0.20 - 0.30):       {:>5} items ({:.1}%)\n",
        buckets.fair_count, buckets.fair_pct
    ));
    out.push_str(&format!(
        "  Poor (wer > 0.30):        {:>5} items ({:.1}%)\n",
        buckets.poor_count, buckets.poor_pct
    ));

    out.push_str("\nINTERPRETATION:\n");
    out.push_str(SECTION_RULE);
    out.push('\n');
    out.push_str(&format!("  Consistency: {}\n", cv_interpretation(metrics.cv)));
    out.push_str(&format!(
        "  Shape: {}\n",
        skewness_interpretation(metrics.skewness)
    ));
    out.push_str(&format!(
        "  Overall rating: {}\n",
        rating.label().to_uppercase()
    ));
}

fn render_ranking(out: &mut String, models: &[ModelStatistics]) {
    out.push('\n');
    out.push_str(RULE);
    out.push_str("\nMODEL COMPARISON (ranked by mean WER)\n");
    out.push_str(RULE);
    out.push_str("\n\n");

    let mut ranked: Vec<&ModelStatistics> = models.iter().collect();
    ranked.sort_by(|a, b| match (&a.metrics, &b.metrics) {
        (Some(left), Some(right)) => left
            .mean
            .partial_cmp(&right.mean)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.model.cmp(&b.model)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.model.cmp(&b.model),
    });

    for (rank, stats) in ranked.iter().enumerate() {
        match &stats.metrics {
            Some(metrics) => out.push_str(&format!(
                "{}. {:<20} mean WER {:.4} (+/- {:.4})\n",
                rank + 1,
                stats.model,
                metrics.mean,
                metrics.std
            )),
            None => out.push_str(&format!(
                "{}. {:<20} no data\n",
                rank + 1,
                stats.model
            )),
        }
    }
}

fn cv_interpretation(cv: f64) -> &'static str {
    if cv < 15.0 {
        "low variability, consistent across items"
    } else if cv < 30.0 {
        "moderate variability"
    } else {
        "high variability, inconsistent across items"
    }
}

fn skewness_interpretation(skewness: f64) -> &'static str {
    if skewness.abs() < 0.5 {
        "approximately symmetric distribution"
    } else if skewness > 0.0 {
        "right-skewed, a tail of high-WER items"
    } else {
        "left-skewed, a tail of low-WER items"
    }
}
