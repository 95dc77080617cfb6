// papertrends: topic trends in research-paper titles
//
// This is the library root. Each module corresponds to a stage of the
// title analysis pipeline.

pub mod config;
pub mod corpus;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod text;
pub mod topics;

pub use error::{AnalysisError, Result};
