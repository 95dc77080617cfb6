// Colored terminal output for the analysis report.
//
// Stands in for the plotting layer: papers per year and the most common words
// become horizontal bar charts, and each topic prints as a ranked word list.

use std::collections::BTreeMap;

use colored::Colorize;

use super::text_bar;
use crate::pipeline::analysis::AnalysisReport;
use crate::topics::report::{TopicTerms, WordCount};

const BAR_WIDTH: usize = 40;

/// Display the full report.
pub fn display_report(report: &AnalysisReport) {
    println!(
        "\n{}",
        format!(
            "=== Title analysis ({} papers, {} distinct terms) ===",
            report.paper_count, report.vocabulary_size
        )
        .bold()
    );
    display_papers_per_year(&report.papers_per_year);
    display_most_common_words(&report.most_common_words);
    display_topics(&report.topics);
}

/// Bar chart of papers published per year.
pub fn display_papers_per_year(counts: &BTreeMap<i32, usize>) {
    if counts.is_empty() {
        return;
    }
    println!("\n{}", "Papers per year".bold());
    let max = counts.values().copied().max().unwrap_or(0) as f64;
    for (year, &count) in counts {
        println!(
            "  {:>4} {} {}",
            year,
            text_bar(count as f64, max, BAR_WIDTH).bright_blue(),
            count
        );
    }
}

/// Bar chart of the most frequent words.
pub fn display_most_common_words(words: &[WordCount]) {
    if words.is_empty() {
        return;
    }
    println!(
        "\n{}",
        format!("{} most common words", words.len()).bold()
    );
    let max = words.iter().map(|w| w.count).max().unwrap_or(0) as f64;
    let label_width = words.iter().map(|w| w.word.chars().count()).max().unwrap_or(0);
    for word in words {
        println!(
            "  {:<width$} {} {}",
            word.word,
            text_bar(word.count as f64, max, BAR_WIDTH).bright_green(),
            word.count,
            width = label_width
        );
    }
}

/// Ranked words of every topic.
pub fn display_topics(topics: &[TopicTerms]) {
    println!("\n{}", "Topics found via LDA:".bold());
    for topic in topics {
        println!("\n  {}", format!("Topic #{}:", topic.topic).bright_yellow());
        println!("    {}", topic.words().join(" "));
    }
    println!();
}
