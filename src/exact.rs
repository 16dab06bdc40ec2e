use std::collections::HashMap;

use crate::config::ResolverConfig;
use crate::model::{EXACT_PHRASE_CONFIDENCE, MAX_SUGGESTIONS, Response};
use crate::normalize::normalize;

/// Constant-time lookup for the highest-frequency intents (greetings, contact, help, pricing).
#[derive(Debug, Clone, Default)]
pub struct ExactPhraseMatcher {
    phrases: HashMap<String, String>,
    suggestions: Vec<String>,
}

impl ExactPhraseMatcher {
    pub fn new<I, K, V>(phrases: I, suggestions: Vec<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let phrases = phrases
            .into_iter()
            .map(|(phrase, message)| (normalize(phrase.as_ref()), message.into()))
            // A blank key would answer whitespace-only queries.
            .filter(|(phrase, _): &(String, String)| !phrase.is_empty())
            .collect();
        Self {
            phrases,
            suggestions: suggestions.into_iter().take(MAX_SUGGESTIONS).collect(),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(
            config
                .exact_phrases
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
            config.generic_suggestions.clone(),
        )
    }

    /// `query` must already be normalized.
    pub fn match_exact(&self, query: &str) -> Option<Response> {
        let message = self.phrases.get(query)?;
        Some(Response::faq(
            message.clone(),
            EXACT_PHRASE_CONFIDENCE,
            None,
            self.suggestions.clone(),
        ))
    }
}
