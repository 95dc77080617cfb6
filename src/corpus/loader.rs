// CSV ingestion for the paper table.
//
// The source file has more columns (id, event_type, pdf_name, abstract,
// paper_text); deserializing into `Paper` projects them away.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::info;

use super::paper::Paper;

/// Load papers from a CSV file with a header row containing `year` and `title`.
pub fn load_papers<P: AsRef<Path>>(path: P) -> Result<Vec<Paper>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open paper table: {}", path.display()))?;
    let papers = read_papers(file).with_context(|| format!("Failed to parse {}", path.display()))?;

    info!(rows = papers.len(), path = %path.display(), "Loaded paper table");
    Ok(papers)
}

/// Read papers from any CSV source.
pub fn read_papers<R: Read>(reader: R) -> Result<Vec<Paper>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut papers = Vec::new();

    for (row, result) in reader.deserialize().enumerate() {
        // Header is line 1, so data row 0 sits on line 2
        let paper: Paper = result.with_context(|| format!("Bad paper record on line {}", row + 2))?;
        papers.push(paper);
    }

    Ok(papers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
id,year,title,event_type,pdf_name,abstract,paper_text
1,1987,\"Self-Organization of Associative Database and Its Applications\",,1-self-organization.pdf,Abstract Missing,\"long text, with commas\"
10,1987,A Mean Field Theory of Layer IV of Visual Cortex,,10-a-mean-field.pdf,Abstract Missing,text
5941,2017,\"Deep Learning, Fast and Slow!\",Poster,5941-deep.pdf,abstract,text
";

    #[test]
    fn test_read_projects_columns() {
        let papers = read_papers(SAMPLE.as_bytes()).unwrap();
        assert_eq!(papers.len(), 3);
        assert_eq!(papers[0].year, 1987);
        assert_eq!(papers[2], Paper::new(2017, "Deep Learning, Fast and Slow!"));
    }

    #[test]
    fn test_missing_title_column_fails() {
        let result = read_papers("id,year\n1,1999\n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let papers = load_papers(file.path()).unwrap();
        assert_eq!(papers.len(), 3);
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = load_papers("/definitely/not/here.csv").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
