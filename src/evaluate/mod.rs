pub mod runner;
pub mod wer;

pub use runner::{run_evaluation, EvaluateRequest, EvaluationSummary, ModelSpec};
pub use wer::wer;
