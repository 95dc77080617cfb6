// Ranked term extraction: top terms per topic and most common corpus words.
//
// Ordering is fully deterministic: higher score first, equal scores ordered by
// ascending vocabulary index (which, with a sorted vocabulary, is also
// alphabetical).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::traits::TopicModel;
use crate::error::{AnalysisError, Result};
use crate::text::vectorizer::{CountModel, Vocabulary};

/// One ranked term with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTerm {
    pub term: String,
    pub weight: f64,
}

/// The top terms of a single topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicTerms {
    pub topic: usize,
    /// Highest weight first
    pub terms: Vec<RankedTerm>,
}

impl TopicTerms {
    /// Just the term strings, in rank order.
    pub fn words(&self) -> Vec<&str> {
        self.terms.iter().map(|t| t.term.as_str()).collect()
    }
}

/// Indices of the `n` largest scores, descending, ties by ascending index.
pub fn rank_indices(scores: &[f64], n: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    order.truncate(n);
    order
}

/// Top `n` terms of every topic, weights included.
///
/// Fails with `DimensionMismatch` when the model was fitted on a matrix of a
/// different width than `vocabulary`, and with `InvalidTopWordCount` when `n`
/// is 0.
pub fn topic_terms<M: TopicModel + ?Sized>(
    model: &M,
    vocabulary: &Vocabulary,
    n: usize,
) -> Result<Vec<TopicTerms>> {
    if n == 0 {
        return Err(AnalysisError::InvalidTopWordCount(n));
    }
    if model.n_terms() != vocabulary.len() {
        return Err(AnalysisError::DimensionMismatch {
            expected: vocabulary.len(),
            found: model.n_terms(),
        });
    }

    (0..model.n_topics())
        .map(|topic| -> Result<TopicTerms> {
            let weights = model.topic_weights(topic).to_vec();
            let terms = rank_indices(&weights, n)
                .into_iter()
                .map(|idx| -> Result<RankedTerm> {
                    let term = vocabulary.term(idx).ok_or(AnalysisError::DimensionMismatch {
                        expected: vocabulary.len(),
                        found: weights.len(),
                    })?;
                    Ok(RankedTerm {
                        term: term.to_string(),
                        weight: weights[idx],
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(TopicTerms { topic, terms })
        })
        .collect()
}

/// Mapping from topic index to its `n` top terms.
pub fn top_terms_per_topic<M: TopicModel + ?Sized>(
    model: &M,
    vocabulary: &Vocabulary,
    n: usize,
) -> Result<BTreeMap<usize, Vec<String>>> {
    Ok(topic_terms(model, vocabulary, n)?
        .into_iter()
        .map(|t| (t.topic, t.terms.into_iter().map(|r| r.term).collect()))
        .collect())
}

/// A corpus-wide word count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

/// The `n` most frequent vocabulary terms across the whole corpus.
pub fn most_common_words(counts: &CountModel, n: usize) -> Result<Vec<WordCount>> {
    if n == 0 {
        return Err(AnalysisError::InvalidTopWordCount(n));
    }
    let vocabulary = counts.vocabulary();
    let totals = counts.matrix().column_sums();
    if totals.len() != vocabulary.len() {
        return Err(AnalysisError::DimensionMismatch {
            expected: vocabulary.len(),
            found: totals.len(),
        });
    }

    let mut order: Vec<usize> = (0..totals.len()).collect();
    order.sort_by(|&a, &b| totals[b].cmp(&totals[a]).then(a.cmp(&b)));

    Ok(order
        .into_iter()
        .take(n)
        .filter_map(|idx| {
            vocabulary.term(idx).map(|word| WordCount {
                word: word.to_string(),
                count: totals[idx],
            })
        })
        .collect())
}
