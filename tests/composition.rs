// Composition tests: verifying that the stages chain together correctly.
//
// These tests exercise the data flow between modules:
//   CSV -> Papers -> Normalize -> Count vectors -> LDA -> Reports
// without touching the network; the CSV test writes to a temp file.

use std::collections::HashSet;
use std::io::Write;

use papertrends::corpus::loader::load_papers;
use papertrends::corpus::paper::Paper;
use papertrends::output::write_json_report;
use papertrends::pipeline::analysis::{analyze, prepare_documents, vectorize, AnalysisConfig, AnalysisReport};
use papertrends::text::normalize::normalize_titles;
use papertrends::text::stopwords::StopWords;
use papertrends::text::vectorizer::CountVectorizer;
use papertrends::topics::lda::{LatentDirichletAllocation, LdaConfig};
use papertrends::topics::report::{most_common_words, top_terms_per_topic, WordCount};
use papertrends::AnalysisError;

fn papers(titles: &[&str]) -> Vec<Paper> {
    titles.iter().map(|t| Paper::new(2017, *t)).collect()
}

// ============================================================
// Chain: Normalize -> Vectorize -> Frequency report
// ============================================================

#[test]
fn most_common_word_across_near_duplicate_titles() {
    let docs = normalize_titles(&["Deep Learning Methods.", "deep learning methods!", "Kernel methods for SVM"]);
    let counts = CountVectorizer::new(StopWords::custom(["for"]))
        .fit_transform(&docs)
        .unwrap();

    let vocab: HashSet<&str> = counts.vocabulary().terms().iter().map(String::as_str).collect();
    assert_eq!(
        vocab,
        HashSet::from(["deep", "kernel", "learning", "methods", "svm"])
    );

    let top = most_common_words(&counts, 1).unwrap();
    assert_eq!(
        top,
        vec![WordCount {
            word: "methods".to_string(),
            count: 3
        }]
    );
}

#[test]
fn stop_word_only_corpus_aborts_before_fitting() {
    let config = AnalysisConfig {
        number_of_topics: 1,
        stop_words: StopWords::custom(["the", "a", "an", "of"]),
        ..Default::default()
    };
    let err = analyze(&papers(&["The a", "An of."]), &config).unwrap_err();
    assert_eq!(err, AnalysisError::EmptyVocabulary { n_documents: 2 });
}

// ============================================================
// Chain: Vectorize -> LDA -> Topic report
// ============================================================

const NEURAL_TITLES: [&str; 2] = [
    "Neural networks: deep learning with backpropagation in neural networks",
    "Deep neural networks, learning by backpropagation and deep learning",
];
const SVM_TITLES: [&str; 2] = [
    "Support vector machines with kernel margin and support vectors",
    "Kernel support vector machines maximise the margin of kernel machines",
];

/// Fit two topics on the neural/SVM titles and return each topic's top 5.
fn two_topic_split(seed: u64) -> (HashSet<String>, HashSet<String>) {
    let titles: Vec<&str> = NEURAL_TITLES.iter().chain(&SVM_TITLES).copied().collect();
    let stop_words = StopWords::custom(["with", "in", "by", "and", "the", "of", "maximise", "vectors"]);

    let documents = prepare_documents(&papers(&titles)).unwrap();
    let counts = vectorize(&documents, &stop_words).unwrap();
    assert_eq!(counts.vocabulary().len(), 10);

    let model = LatentDirichletAllocation::new(LdaConfig::new(2).random_seed(seed).max_iter(300).tol(0.0))
        .fit(counts.matrix())
        .unwrap();
    let mut top = top_terms_per_topic(&model, counts.vocabulary(), 5).unwrap();
    let topic0 = top.remove(&0).unwrap().into_iter().collect();
    let topic1 = top.remove(&1).unwrap().into_iter().collect();
    (topic0, topic1)
}

fn assert_domain_split(seed: u64) {
    let neural: HashSet<String> = ["neural", "networks", "deep", "learning", "backpropagation"]
        .map(String::from)
        .into();
    let svm: HashSet<String> = ["support", "vector", "machines", "kernel", "margin"]
        .map(String::from)
        .into();

    let (topic0, topic1) = two_topic_split(seed);
    assert!(
        topic0.is_disjoint(&topic1),
        "seed {seed}: topics overlap: {topic0:?} / {topic1:?}"
    );
    assert!(
        (topic0 == neural && topic1 == svm) || (topic0 == svm && topic1 == neural),
        "seed {seed}: unexpected topics: {topic0:?} / {topic1:?}"
    );
}

#[test]
fn disjoint_vocabularies_split_into_two_topics() {
    assert_domain_split(2024);
}

#[test]
fn disjoint_vocabularies_split_for_every_seed() {
    // A single random start collapses onto one topic for some seeds
    for seed in 0..40 {
        assert_domain_split(seed);
    }
}

#[test]
fn analysis_is_reproducible_with_seed() {
    let titles = [
        "Gaussian processes for regression",
        "Sparse Gaussian processes",
        "Reinforcement learning with policy gradients",
        "Policy search in reinforcement learning",
        "Variational inference for Gaussian mixtures",
    ];
    let config = AnalysisConfig {
        number_of_topics: 2,
        number_of_top_words: 4,
        random_seed: Some(99),
        ..Default::default()
    };
    let a = analyze(&papers(&titles), &config).unwrap();
    let b = analyze(&papers(&titles), &config).unwrap();
    assert_eq!(a.topic_words(), b.topic_words());
    assert_eq!(a.word_counts(), b.word_counts());
    assert_eq!(a.word_counts()["gaussian"], 3);
}

// ============================================================
// Chain: CSV -> Analysis -> JSON report
// ============================================================

#[test]
fn csv_table_to_json_report() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "id,year,title,event_type,pdf_name,abstract,paper_text").unwrap();
    writeln!(csv, "1,1987,\"Learning in neural networks.\",,1.pdf,Abstract Missing,text").unwrap();
    writeln!(csv, "2,1987,Neural network learning rules,,2.pdf,Abstract Missing,text").unwrap();
    writeln!(csv, "3,2016,\"Kernel methods, revisited!\",Poster,3.pdf,abstract,text").unwrap();
    writeln!(csv, "4,2017,Kernel methods for structured outputs,Oral,4.pdf,abstract,text").unwrap();

    let papers = load_papers(csv.path()).unwrap();
    let config = AnalysisConfig {
        number_of_topics: 2,
        number_of_top_words: 3,
        random_seed: Some(7),
        ..Default::default()
    };
    let report = analyze(&papers, &config).unwrap();
    assert_eq!(report.paper_count, 4);
    assert_eq!(report.papers_per_year.get(&1987), Some(&2));
    assert_eq!(report.topics.len(), 2);

    let out = tempfile::NamedTempFile::new().unwrap();
    write_json_report(&report, out.path()).unwrap();
    let json = std::fs::read_to_string(out.path()).unwrap();
    let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.topic_words(), report.topic_words());
    assert_eq!(parsed.most_common_words, report.most_common_words);
}
