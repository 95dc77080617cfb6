// Error taxonomy for the analysis pipeline.
//
// Every variant is fatal to the current run. Messages carry the offending
// value so the caller can fix the configuration and rerun.

use thiserror::Error;

/// Errors raised by the text-to-topics pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The input table has no usable titles.
    #[error("Input data error: {0}")]
    InputData(String),

    /// Nothing survived tokenization, stop-word removal and frequency filters.
    #[error(
        "Empty vocabulary: no terms remain across {n_documents} documents after stop-word and frequency filtering"
    )]
    EmptyVocabulary { n_documents: usize },

    /// Topic count outside 1..=number of documents.
    #[error("Invalid topic count {requested}: must be between 1 and the number of documents ({n_documents})")]
    InvalidTopicCount { requested: usize, n_documents: usize },

    /// Topic weights and vocabulary disagree on the number of terms.
    #[error("Dimension mismatch: model has {found} terms but the vocabulary has {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Asked for zero top words.
    #[error("Invalid top word count {0}: must be at least 1")]
    InvalidTopWordCount(usize),

    /// A model hyperparameter outside its valid range.
    #[error("Invalid hyperparameter: {0}")]
    InvalidParameter(String),

    /// Stop-word language tag not recognised.
    #[error("Unknown stop-word language: {0}")]
    UnknownStopWordLanguage(String),
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, AnalysisError>;
