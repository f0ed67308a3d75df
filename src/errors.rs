use std::path::PathBuf;
use thiserror::Error;

use crate::labeler::Category;

/// Failure taxonomy for the generation pipeline.
///
/// Only `UnsupportedInputFormat`, `EmptyCorpus` and `UntrainedModel` abort a
/// run. The remaining variants describe conditions the pipeline recovers from
/// in place (column fallback, constant classifier, non-stratified split); they
/// exist so callers and tests can name the condition precisely.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Unsupported file format: {0}. Use CSV, Excel or DOCX.")]
    UnsupportedInputFormat(String),

    #[error("No 'requirement_text' column found in {}", .path.display())]
    MissingRequiredField { path: PathBuf },

    #[error("The input contains no valid requirements after cleaning")]
    EmptyCorpus,

    #[error("Training corpus contains only one category ({0}); real training skipped")]
    InsufficientLabelDiversity(Category),

    #[error("Classes with fewer than 2 examples prevent a stratified split: {0:?}")]
    StratificationInfeasible(Vec<Category>),

    #[error("Classifier was never trained; generation requires a fitted model")]
    UntrainedModel,

    #[error("No valid requirement pattern (R#: text) found in DOCX")]
    NoRequirementPattern,
}
