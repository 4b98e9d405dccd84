pub mod report;
pub mod runner;
pub mod stats;

pub use report::AnalysisReport;
pub use runner::{run_analysis, AnalysisSummary, AnalyzeRequest};
pub use stats::{summarize, ModelStatistics, Rating};
