//! Descriptive statistics over a model's WER sample.
//!
//! Conventions are fixed so outputs stay reproducible: sample standard
//! deviation (n-1), linear interpolation between closest ranks for
//! percentiles, adjusted Fisher-Pearson skewness, sample-adjusted excess
//! kurtosis. Dispersion and shape metrics degrade to 0.0 when the sample is
//! too small to define them, so every field stays finite.

use serde::Serialize;

/// Mean-WER cutoffs for the performance buckets. Lower is better; the bands
/// are monotonic: excellent <= 0.10 < good <= 0.20 < fair <= 0.30 < poor.
pub const EXCELLENT_MAX_MEAN_WER: f64 = 0.10;
pub const GOOD_MAX_MEAN_WER: f64 = 0.20;
pub const FAIR_MAX_MEAN_WER: f64 = 0.30;

const CI_95_Z: f64 = 1.96;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
    NoData,
}

impl Rating {
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::NoData => "no_data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketBreakdown {
    pub excellent_count: usize,
    pub good_count: usize,
    pub fair_count: usize,
    pub poor_count: usize,
    pub excellent_pct: f64,
    pub good_pct: f64,
    pub fair_pct: f64,
    pub poor_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub p5: f64,
    pub p95: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub cv: f64,
    pub sem: f64,
    pub ci_95_lower: f64,
    pub ci_95_upper: f64,
    pub buckets: BucketBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelStatistics {
    pub model: String,
    pub source: String,
    pub count: usize,
    pub rating: Rating,
    pub metrics: Option<Metrics>,
}

/// Summarize one model's WER values. An empty sample yields the defined
/// no-data state rather than an error, so the model still shows up in every
/// output.
pub fn summarize(model: &str, source: &str, values: &[f64]) -> ModelStatistics {
    let metrics = (!values.is_empty()).then(|| compute_metrics(values));
    let rating = metrics
        .as_ref()
        .map_or(Rating::NoData, |metrics| rating_for_mean(metrics.mean));

    ModelStatistics {
        model: model.to_owned(),
        source: source.to_owned(),
        count: values.len(),
        rating,
        metrics,
    }
}

pub fn rating_for_mean(mean: f64) -> Rating {
    if mean <= EXCELLENT_MAX_MEAN_WER {
        Rating::Excellent
    } else if mean <= GOOD_MAX_MEAN_WER {
        Rating::Good
    } else if mean <= FAIR_MAX_MEAN_WER {
        Rating::Fair
    } else {
        Rating::Poor
    }
}

fn compute_metrics(values: &[f64]) -> Metrics {
    let n = values.len();
    let count = n as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean = values.iter().sum::<f64>() / count;
    let min = sorted[0];
    let max = sorted[n - 1];

    let variance = if n >= 2 {
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1.0)
    } else {
        0.0
    };
    let std = variance.sqrt();

    let skewness = if n >= 3 && std > 0.0 {
        let cubed = values.iter().map(|v| ((v - mean) / std).powi(3)).sum::<f64>();
        count / ((count - 1.0) * (count - 2.0)) * cubed
    } else {
        0.0
    };

    let kurtosis = if n >= 4 && std > 0.0 {
        let fourth = values.iter().map(|v| ((v - mean) / std).powi(4)).sum::<f64>();
        count * (count + 1.0) / ((count - 1.0) * (count - 2.0) * (count - 3.0)) * fourth
            - 3.0 * (count - 1.0).powi(2) / ((count - 2.0) * (count - 3.0))
    } else {
        0.0
    };

    let cv = if mean > 0.0 { std / mean * 100.0 } else { 0.0 };
    let sem = std / count.sqrt();

    let buckets = bucket_breakdown(values);

    Metrics {
        mean: round4(mean),
        median: round4(percentile_sorted(&sorted, 0.5)),
        std: round4(std),
        variance: round4(variance),
        min: round4(min),
        max: round4(max),
        range: round4(max - min),
        q1: round4(percentile_sorted(&sorted, 0.25)),
        q3: round4(percentile_sorted(&sorted, 0.75)),
        iqr: round4(percentile_sorted(&sorted, 0.75) - percentile_sorted(&sorted, 0.25)),
        p5: round4(percentile_sorted(&sorted, 0.05)),
        p95: round4(percentile_sorted(&sorted, 0.95)),
        skewness: round4(skewness),
        kurtosis: round4(kurtosis),
        cv: round4(cv),
        sem: round4(sem),
        ci_95_lower: round4(mean - CI_95_Z * sem),
        ci_95_upper: round4(mean + CI_95_Z * sem),
        buckets,
    }
}

fn bucket_breakdown(values: &[f64]) -> BucketBreakdown {
    let count = values.len() as f64;
    let mut excellent = 0usize;
    let mut good = 0usize;
    let mut fair = 0usize;
    let mut poor = 0usize;

    for value in values {
        match rating_for_mean(*value) {
            Rating::Excellent => excellent += 1,
            Rating::Good => good += 1,
            Rating::Fair => fair += 1,
            _ => poor += 1,
        }
    }

    let pct = |n: usize| round4(n as f64 / count * 100.0);
    BucketBreakdown {
        excellent_count: excellent,
        good_count: good,
        fair_count: fair,
        poor_count: poor,
        excellent_pct: pct(excellent),
        good_pct: pct(good),
        fair_pct: pct(fair),
        poor_pct: pct(poor),
    }
}

fn percentile_sorted(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.len() == 1 {
        return sorted_values[0];
    }

    let clamped = percentile.clamp(0.0, 1.0);
    let max_index = (sorted_values.len() - 1) as f64;
    let rank = clamped * max_index;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted_values[lower]
    } else {
        let weight = rank - lower as f64;
        sorted_values[lower] * (1.0 - weight) + sorted_values[upper] * weight
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
