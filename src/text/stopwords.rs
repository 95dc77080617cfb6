// Stop-word sets used by the vectorizer.
//
// Language lists come from the `stop-words` crate, the same source the
// keyword extraction used before. Callers can also supply their own set,
// which is what the tests do to keep vocabularies predictable.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

use crate::error::{AnalysisError, Result};

/// Which words to drop before building a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopWords {
    /// No stop-word filtering at all.
    None,
    /// A built-in language list.
    Language(StopWordLanguage),
    /// An explicit set of lowercase words.
    Custom(HashSet<String>),
}

/// Languages with a built-in list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopWordLanguage {
    English,
    French,
    German,
    Spanish,
}

impl Default for StopWords {
    fn default() -> Self {
        StopWords::Language(StopWordLanguage::English)
    }
}

impl StopWords {
    /// Build an explicit set from any list of words (lowercased).
    pub fn custom<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        StopWords::Custom(words.into_iter().map(|w| w.as_ref().to_lowercase()).collect())
    }

    /// Parse a configuration tag: a language name or `none`.
    pub fn from_tag(tag: &str) -> Result<Self> {
        let lang = match tag.trim().to_lowercase().as_str() {
            "none" | "" => return Ok(StopWords::None),
            "english" | "en" => StopWordLanguage::English,
            "french" | "fr" => StopWordLanguage::French,
            "german" | "de" => StopWordLanguage::German,
            "spanish" | "es" => StopWordLanguage::Spanish,
            other => return Err(AnalysisError::UnknownStopWordLanguage(other.to_string())),
        };
        Ok(StopWords::Language(lang))
    }

    /// Materialize the set of words to exclude.
    pub fn to_set(&self) -> HashSet<String> {
        match self {
            StopWords::None => HashSet::new(),
            StopWords::Custom(words) => words.clone(),
            StopWords::Language(lang) => {
                let words: Vec<String> = get(lang.as_stop_words_language());
                words.into_iter().map(|w| w.to_lowercase()).collect()
            }
        }
    }
}

impl StopWordLanguage {
    fn as_stop_words_language(self) -> LANGUAGE {
        match self {
            StopWordLanguage::English => LANGUAGE::English,
            StopWordLanguage::French => LANGUAGE::French,
            StopWordLanguage::German => LANGUAGE::German,
            StopWordLanguage::Spanish => LANGUAGE::Spanish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_contains_common_words() {
        let set = StopWords::default().to_set();
        assert!(set.contains("the"));
        assert!(set.contains("for"));
        assert!(!set.contains("learning"));
    }

    #[test]
    fn test_custom_is_lowercased() {
        let set = StopWords::custom(["The", "OF"]).to_set();
        assert!(set.contains("the"));
        assert!(set.contains("of"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(StopWords::from_tag("none").unwrap(), StopWords::None);
        assert_eq!(
            StopWords::from_tag("English").unwrap(),
            StopWords::Language(StopWordLanguage::English)
        );
        assert!(matches!(
            StopWords::from_tag("klingon"),
            Err(AnalysisError::UnknownStopWordLanguage(_))
        ));
    }
}
