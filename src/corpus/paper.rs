// Paper records: the rows the pipeline consumes.
//
// Only `year` and `title` are kept from the source table; ids, file names and
// event types carry no text worth analysing.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// One research paper's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub year: i32,
    pub title: String,
}

impl Paper {
    pub fn new(year: i32, title: impl Into<String>) -> Self {
        Self {
            year,
            title: title.into(),
        }
    }
}

/// A paper title before and after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub raw_title: String,
    pub normalized_title: String,
}

/// Collect the titles of a table, failing when no row has any title text.
pub fn titles(papers: &[Paper]) -> Result<Vec<&str>> {
    if papers.is_empty() {
        return Err(AnalysisError::InputData("the paper table has no rows".to_string()));
    }
    if papers.iter().all(|p| p.title.trim().is_empty()) {
        return Err(AnalysisError::InputData(format!(
            "all {} rows have an empty title",
            papers.len()
        )));
    }
    Ok(papers.iter().map(|p| p.title.as_str()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_in_row_order() {
        let papers = vec![Paper::new(1990, "B"), Paper::new(1987, "A")];
        assert_eq!(titles(&papers).unwrap(), vec!["B", "A"]);
    }

    #[test]
    fn test_blank_titles_rejected() {
        let papers = vec![Paper::new(1990, ""), Paper::new(1991, "  ")];
        assert!(matches!(titles(&papers), Err(AnalysisError::InputData(_))));
        assert!(matches!(titles(&[]), Err(AnalysisError::InputData(_))));
    }

    #[test]
    fn test_some_blank_titles_allowed() {
        let papers = vec![Paper::new(1990, ""), Paper::new(1991, "Kernels")];
        assert_eq!(titles(&papers).unwrap().len(), 2);
    }
}
