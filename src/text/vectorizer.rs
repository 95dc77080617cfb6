// Bag-of-words count vectorizer.
//
// Fitting turns normalized titles into a sorted vocabulary and a sparse
// document-term count matrix. The two are returned bound together as a
// `CountModel` so the same term indices are used for counting, frequency
// summaries and topic decoding.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info};

use super::stopwords::StopWords;
use crate::error::{AnalysisError, Result};

/// Split a document into lowercase-agnostic tokens: maximal runs of
/// alphanumeric characters.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
}

/// Count vectorizer settings.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    /// Words excluded from the vocabulary
    pub stop_words: StopWords,
    /// Minimum number of documents a term has to appear in (default 1)
    pub min_df: usize,
    /// Keep only the most frequent terms across the corpus
    pub max_features: Option<usize>,
    /// Tokens shorter than this many characters are dropped (default 1)
    pub min_token_len: usize,
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self {
            stop_words: StopWords::default(),
            min_df: 1,
            max_features: None,
            min_token_len: 1,
        }
    }
}

impl CountVectorizer {
    /// A vectorizer with the given stop words and no other filtering.
    pub fn new(stop_words: StopWords) -> Self {
        Self {
            stop_words,
            ..Self::default()
        }
    }

    /// Learn the vocabulary from `documents` and count every document over it.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<CountModel> {
        let stop_words = self.stop_words.to_set();

        let tokenized: Vec<Vec<&str>> = documents
            .iter()
            .map(|doc| self.eligible_tokens(doc.as_ref(), &stop_words).collect())
            .collect();

        // Corpus-wide statistics per candidate term: (total count, document count)
        let mut stats: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
        for tokens in &tokenized {
            let mut seen: HashSet<&str> = HashSet::new();
            for &token in tokens {
                let entry = stats.entry(token).or_insert((0, 0));
                entry.0 += 1;
                if seen.insert(token) {
                    entry.1 += 1;
                }
            }
        }
        let candidates = stats.len();

        let mut kept: Vec<(&str, u64)> = stats
            .into_iter()
            .filter(|(_, (_, df))| *df >= self.min_df)
            .map(|(term, (total, _))| (term, total))
            .collect();

        if let Some(max) = self.max_features {
            if kept.len() > max {
                // Most frequent first; stable sort keeps lexicographic order among ties
                kept.sort_by(|a, b| b.1.cmp(&a.1));
                kept.truncate(max);
            }
        }

        let vocabulary = Vocabulary::from_terms(kept.into_iter().map(|(term, _)| term.to_string()));

        if vocabulary.is_empty() {
            return Err(AnalysisError::EmptyVocabulary {
                n_documents: documents.len(),
            });
        }

        let rows = tokenized
            .iter()
            .map(|tokens| count_row(&vocabulary, tokens.iter().copied()))
            .collect();
        let matrix = DocumentTermMatrix::from_counted_rows(rows, vocabulary.len());

        info!(
            documents = documents.len(),
            candidates,
            vocabulary = vocabulary.len(),
            "Built document-term matrix"
        );

        Ok(CountModel {
            vocabulary,
            matrix,
            stop_words,
            min_token_len: self.min_token_len,
        })
    }

    fn eligible_tokens<'a>(
        &self,
        doc: &'a str,
        stop_words: &'a HashSet<String>,
    ) -> impl Iterator<Item = &'a str> + 'a {
        let min_len = self.min_token_len;
        tokenize(doc)
            .filter(move |t| t.chars().count() >= min_len)
            .filter(move |t| !stop_words.contains(*t))
    }
}

/// Count the vocabulary terms of one document into a sparse row sorted by
/// term index. Tokens outside the vocabulary are ignored.
fn count_row<'a>(vocabulary: &Vocabulary, tokens: impl Iterator<Item = &'a str>) -> Vec<(usize, u32)> {
    let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
    for token in tokens {
        if let Some(idx) = vocabulary.index_of(token) {
            *counts.entry(idx).or_insert(0) += 1;
        }
    }
    counts.into_iter().collect()
}

/// Ordered, duplicate-free list of terms. Index positions never change once
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from terms, sorted lexicographically and deduplicated.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        terms.sort();
        terms.dedup();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Term at a column index.
    pub fn term(&self, idx: usize) -> Option<&str> {
        self.terms.get(idx).map(String::as_str)
    }

    /// Column index of a term.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Sparse documents × terms count matrix. Each row holds `(term index, count)`
/// pairs sorted by term index with zero counts omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTermMatrix {
    rows: Vec<Vec<(usize, u32)>>,
    n_terms: usize,
}

impl DocumentTermMatrix {
    /// Assemble a matrix from sparse rows.
    ///
    /// Fails with `DimensionMismatch` when a term index is not below `n_terms`.
    pub fn from_rows(rows: Vec<Vec<(usize, u32)>>, n_terms: usize) -> Result<Self> {
        if let Some(&(idx, _)) = rows.iter().flatten().find(|&&(idx, _)| idx >= n_terms) {
            return Err(AnalysisError::DimensionMismatch {
                expected: n_terms,
                found: idx + 1,
            });
        }
        Ok(Self { rows, n_terms })
    }

    // Rows counted against a fitted vocabulary are in range by construction
    fn from_counted_rows(rows: Vec<Vec<(usize, u32)>>, n_terms: usize) -> Self {
        Self { rows, n_terms }
    }

    /// Build from a dense row-major layout, mostly useful in tests.
    pub fn from_dense(dense: &[Vec<u32>]) -> Result<Self> {
        let n_terms = dense.first().map(Vec::len).unwrap_or(0);
        let mut rows = Vec::with_capacity(dense.len());
        for row in dense {
            if row.len() != n_terms {
                return Err(AnalysisError::DimensionMismatch {
                    expected: n_terms,
                    found: row.len(),
                });
            }
            rows.push(
                row.iter()
                    .enumerate()
                    .filter(|(_, &c)| c > 0)
                    .map(|(i, &c)| (i, c))
                    .collect(),
            );
        }
        Ok(Self { rows, n_terms })
    }

    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    /// Matrix width; equals the vocabulary size it was built against.
    pub fn n_terms(&self) -> usize {
        self.n_terms
    }

    /// Sparse entries of one document.
    pub fn row(&self, doc: usize) -> &[(usize, u32)] {
        &self.rows[doc]
    }

    pub fn rows(&self) -> &[Vec<(usize, u32)>] {
        &self.rows
    }

    /// Count of a single cell.
    pub fn get(&self, doc: usize, term: usize) -> u32 {
        self.rows[doc]
            .binary_search_by_key(&term, |&(idx, _)| idx)
            .map(|pos| self.rows[doc][pos].1)
            .unwrap_or(0)
    }

    /// Total number of counted tokens in one document.
    pub fn row_sum(&self, doc: usize) -> u64 {
        self.rows[doc].iter().map(|&(_, c)| u64::from(c)).sum()
    }

    /// Corpus-wide total per term.
    pub fn column_sums(&self) -> Vec<u64> {
        let mut sums = vec![0u64; self.n_terms];
        for row in &self.rows {
            for &(idx, count) in row {
                sums[idx] += u64::from(count);
            }
        }
        sums
    }

    /// Dense copy of one row.
    pub fn dense_row(&self, doc: usize) -> Vec<u32> {
        let mut dense = vec![0; self.n_terms];
        for &(idx, count) in &self.rows[doc] {
            dense[idx] = count;
        }
        dense
    }
}

/// A fitted vectorizer: the vocabulary and the counts built against it.
#[derive(Debug, Clone)]
pub struct CountModel {
    vocabulary: Vocabulary,
    matrix: DocumentTermMatrix,
    stop_words: HashSet<String>,
    min_token_len: usize,
}

impl CountModel {
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn matrix(&self) -> &DocumentTermMatrix {
        &self.matrix
    }

    /// Count new documents against the fitted vocabulary. Terms the
    /// vocabulary does not know are ignored.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> DocumentTermMatrix {
        let rows = documents
            .iter()
            .map(|doc| {
                let tokens = tokenize(doc.as_ref())
                    .filter(|t| t.chars().count() >= self.min_token_len)
                    .filter(|t| !self.stop_words.contains(*t));
                count_row(&self.vocabulary, tokens)
            })
            .collect();
        debug!(documents = documents.len(), "Transformed documents with fitted vocabulary");
        DocumentTermMatrix::from_counted_rows(rows, self.vocabulary.len())
    }
}
