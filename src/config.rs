use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::pipeline::analysis::AnalysisConfig;
use crate::text::stopwords::StopWords;

/// Default location of the paper table, relative to the working directory.
pub const DEFAULT_PAPERS_CSV: &str = "datasets/papers.csv";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// variable is optional; unset ones fall back to the defaults below.
#[derive(Debug, Clone)]
pub struct Config {
    /// Paper table to analyse (PAPERTRENDS_CSV)
    pub papers_csv: PathBuf,
    /// Where to write the JSON report, if anywhere (PAPERTRENDS_JSON_OUT)
    pub json_out: Option<PathBuf>,
    /// Topic count, top words, stop words and seed
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup. `load` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AnalysisConfig::default();

        let number_of_topics = parse_var(&lookup, "PAPERTRENDS_TOPICS")?.unwrap_or(defaults.number_of_topics);
        let number_of_top_words =
            parse_var(&lookup, "PAPERTRENDS_TOP_WORDS")?.unwrap_or(defaults.number_of_top_words);
        let max_iter = parse_var(&lookup, "PAPERTRENDS_MAX_ITER")?.unwrap_or(defaults.max_iter);
        let random_seed = parse_var(&lookup, "PAPERTRENDS_SEED")?;

        let stop_words = match lookup("PAPERTRENDS_STOP_WORDS") {
            Some(tag) => StopWords::from_tag(&tag).context("PAPERTRENDS_STOP_WORDS is not a known language")?,
            None => defaults.stop_words,
        };

        if number_of_topics == 0 {
            anyhow::bail!("PAPERTRENDS_TOPICS must be at least 1");
        }
        if number_of_top_words == 0 {
            anyhow::bail!("PAPERTRENDS_TOP_WORDS must be at least 1");
        }
        if max_iter == 0 {
            anyhow::bail!("PAPERTRENDS_MAX_ITER must be at least 1");
        }

        Ok(Self {
            papers_csv: lookup("PAPERTRENDS_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PAPERS_CSV)),
            json_out: lookup("PAPERTRENDS_JSON_OUT")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            analysis: AnalysisConfig {
                number_of_topics,
                number_of_top_words,
                stop_words,
                random_seed,
                max_iter,
            },
        })
    }
}

/// Parse an optional numeric variable. Unset or blank means `None`; anything
/// unparseable is an error naming the variable.
fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("{key} must be a number, got {raw:?}"))?;
            Ok(Some(value))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.papers_csv, PathBuf::from(DEFAULT_PAPERS_CSV));
        assert_eq!(config.analysis.number_of_topics, 10);
        assert_eq!(config.analysis.number_of_top_words, 10);
        assert_eq!(config.analysis.stop_words, StopWords::default());
        assert!(config.analysis.random_seed.is_none());
        assert!(config.json_out.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PAPERTRENDS_CSV", "/data/nips.csv"),
            ("PAPERTRENDS_TOPICS", "5"),
            ("PAPERTRENDS_TOP_WORDS", " 8 "),
            ("PAPERTRENDS_SEED", "42"),
            ("PAPERTRENDS_STOP_WORDS", "none"),
            ("PAPERTRENDS_JSON_OUT", "report.json"),
        ]))
        .unwrap();
        assert_eq!(config.papers_csv, PathBuf::from("/data/nips.csv"));
        assert_eq!(config.analysis.number_of_topics, 5);
        assert_eq!(config.analysis.number_of_top_words, 8);
        assert_eq!(config.analysis.random_seed, Some(42));
        assert_eq!(config.analysis.stop_words, StopWords::None);
        assert_eq!(config.json_out, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_bad_number_names_variable() {
        let err = Config::from_lookup(lookup(&[("PAPERTRENDS_TOPICS", "ten")])).unwrap_err();
        assert!(err.to_string().contains("PAPERTRENDS_TOPICS"));
    }

    #[test]
    fn test_zero_topics_rejected() {
        assert!(Config::from_lookup(lookup(&[("PAPERTRENDS_TOPICS", "0")])).is_err());
    }

    #[test]
    fn test_zero_max_iter_rejected() {
        let err = Config::from_lookup(lookup(&[("PAPERTRENDS_MAX_ITER", "0")])).unwrap_err();
        assert!(err.to_string().contains("PAPERTRENDS_MAX_ITER"));
    }

    #[test]
    fn test_unknown_language_rejected() {
        assert!(Config::from_lookup(lookup(&[("PAPERTRENDS_STOP_WORDS", "elvish")])).is_err());
    }
}
