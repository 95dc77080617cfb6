// Title analysis: the full pipeline from paper table to ranked topics.
//
// Stages run strictly in order:
//   titles -> normalize -> count vectors -> LDA -> top terms per topic
// with the most-common-words summary and per-year counts computed alongside.
// Each stage hands its output to the next explicitly; nothing is cached
// between runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::corpus::paper::{self, Document, Paper};
use crate::corpus::summary::papers_per_year;
use crate::error::Result;
use crate::text::normalize::normalize_titles;
use crate::text::stopwords::StopWords;
use crate::text::vectorizer::{CountModel, CountVectorizer};
use crate::topics::lda::{LatentDirichletAllocation, LdaConfig, LdaModel};
use crate::topics::report::{most_common_words, topic_terms, TopicTerms, WordCount};

/// Knobs for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Number of LDA topics K (useful range 1-15 for conference titles)
    pub number_of_topics: usize,
    /// How many terms to report per topic and for the frequency summary
    pub number_of_top_words: usize,
    pub stop_words: StopWords,
    /// Fix for reproducible topics
    pub random_seed: Option<u64>,
    /// Cap on LDA variational passes
    pub max_iter: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            number_of_topics: 10,
            number_of_top_words: 10,
            stop_words: StopWords::default(),
            random_seed: None,
            max_iter: LdaConfig::default().max_iter,
        }
    }
}

impl AnalysisConfig {
    fn lda_config(&self) -> LdaConfig {
        let mut config = LdaConfig::new(self.number_of_topics).max_iter(self.max_iter);
        if let Some(seed) = self.random_seed {
            config = config.random_seed(seed);
        }
        config
    }
}

/// Everything one run produces, ready for rendering or JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub paper_count: usize,
    pub vocabulary_size: usize,
    pub papers_per_year: BTreeMap<i32, usize>,
    pub most_common_words: Vec<WordCount>,
    pub topics: Vec<TopicTerms>,
    pub lda_iterations: usize,
}

impl AnalysisReport {
    /// Topic index -> top terms, without weights.
    pub fn topic_words(&self) -> BTreeMap<usize, Vec<String>> {
        self.topics
            .iter()
            .map(|t| (t.topic, t.terms.iter().map(|r| r.term.clone()).collect()))
            .collect()
    }

    /// Word -> count for the most frequent corpus terms.
    pub fn word_counts(&self) -> BTreeMap<String, u64> {
        self.most_common_words
            .iter()
            .map(|w| (w.word.clone(), w.count))
            .collect()
    }
}

/// Normalize every paper title, keeping the raw title alongside.
pub fn prepare_documents(papers: &[Paper]) -> Result<Vec<Document>> {
    let raw = paper::titles(papers)?;
    let normalized = normalize_titles(&raw);
    Ok(raw
        .into_iter()
        .zip(normalized)
        .map(|(raw_title, normalized_title)| Document {
            raw_title: raw_title.to_string(),
            normalized_title,
        })
        .collect())
}

/// Vectorize normalized documents with the configured stop words.
pub fn vectorize(documents: &[Document], stop_words: &StopWords) -> Result<CountModel> {
    let texts: Vec<&str> = documents.iter().map(|d| d.normalized_title.as_str()).collect();
    CountVectorizer::new(stop_words.clone()).fit_transform(&texts)
}

/// Fit the topic model on a count model's matrix.
pub fn fit_topics(counts: &CountModel, config: &AnalysisConfig) -> Result<LdaModel> {
    LatentDirichletAllocation::new(config.lda_config()).fit(counts.matrix())
}

/// Run the whole pipeline on an in-memory paper table.
pub fn analyze(papers: &[Paper], config: &AnalysisConfig) -> Result<AnalysisReport> {
    let documents = prepare_documents(papers)?;
    let counts = vectorize(&documents, &config.stop_words)?;
    let common = most_common_words(&counts, config.number_of_top_words)?;
    let model = fit_topics(&counts, config)?;
    let topics = topic_terms(&model, counts.vocabulary(), config.number_of_top_words)?;

    info!(
        papers = papers.len(),
        vocabulary = counts.vocabulary().len(),
        topics = topics.len(),
        "Title analysis complete"
    );

    Ok(AnalysisReport {
        paper_count: papers.len(),
        vocabulary_size: counts.vocabulary().len(),
        papers_per_year: papers_per_year(papers),
        most_common_words: common,
        topics,
        lda_iterations: model.n_iter(),
    })
}
