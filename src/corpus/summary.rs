// Corpus-level counts: how many papers were published each year.

use std::collections::BTreeMap;

use super::paper::Paper;

/// Number of papers per year, in ascending year order.
pub fn papers_per_year(papers: &[Paper]) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for paper in papers {
        *counts.entry(paper.year).or_insert(0) += 1;
    }
    counts
}
