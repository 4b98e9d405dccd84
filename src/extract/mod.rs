pub mod audio;
pub mod batch;
pub mod engine;
pub mod metadata;

pub use batch::{run_extraction, ExtractRequest, ExtractionManifest};
pub use engine::{SpeechEngine, WhisperEngine};
pub use metadata::{import_metadata, ImportSummary};
