use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ResolverError, Result};
use crate::model::MAX_SUGGESTIONS;

pub const TOPIC_PLACEHOLDER: &str = "{topic}";

pub const WELCOME_MESSAGE: &str = "Hi there! I'm the SAP Business One assistant. Ask me about \
     implementation, pricing, licensing, support or anything else you'd like to know.";

const CONTACT_MESSAGE: &str = "You can reach our team through the contact form on this site or \
     by email at info@example.com. We usually reply within one business day.";

const HELP_MESSAGE: &str = "I can answer questions about SAP Business One, our implementation \
     services, pricing and support. Try one of the suggested questions below.";

const PRICING_MESSAGE: &str = "SAP Business One pricing depends on the number of users, the \
     license type and whether you deploy on-premise or in the cloud. Book a free consultation \
     for a tailored quote.";

const THANKS_MESSAGE: &str = "You're welcome! Let me know if there is anything else I can help with.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub escalation_message: String,
    pub exact_phrases: BTreeMap<String, String>,
    pub generic_suggestions: Vec<String>,
    pub related: RelatedConfig,
    pub rules: Vec<RuleConfig>,
}

/// Static table driving follow-up question generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedConfig {
    pub priority_keywords: Vec<String>,
    pub templates: Vec<String>,
    pub default_questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    pub all_of: Vec<String>,
    pub response: String,
    pub confidence: f64,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub suggested_questions: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let exact_phrases = [
            ("hi", WELCOME_MESSAGE),
            ("hello", WELCOME_MESSAGE),
            ("hey", WELCOME_MESSAGE),
            ("good morning", WELCOME_MESSAGE),
            ("contact", CONTACT_MESSAGE),
            ("contact us", CONTACT_MESSAGE),
            ("help", HELP_MESSAGE),
            ("pricing", PRICING_MESSAGE),
            ("price", PRICING_MESSAGE),
            ("thanks", THANKS_MESSAGE),
            ("thank you", THANKS_MESSAGE),
        ]
        .into_iter()
        .map(|(phrase, message)| (phrase.to_string(), message.to_string()))
        .collect();

        Self {
            escalation_message: "Let me look into that for you. I'm passing your question on for \
                 a detailed answer."
                .into(),
            exact_phrases,
            generic_suggestions: vec![
                "What is SAP Business One?".into(),
                "How long does an implementation take?".into(),
                "How much does SAP Business One cost?".into(),
            ],
            related: RelatedConfig::default(),
            rules: Vec::new(),
        }
    }
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            priority_keywords: [
                "sap business one",
                "erp",
                "implementation",
                "migration",
                "integration",
                "cloud",
                "licensing",
                "support",
                "training",
                "reporting",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            templates: vec![
                "Tell me more about {topic}".into(),
                "What are the benefits of {topic}?".into(),
                "How does {topic} work?".into(),
            ],
            default_questions: vec![
                "What services do you offer?".into(),
                "How much does SAP Business One cost?".into(),
                "How can I contact your team?".into(),
            ],
        }
    }
}

impl ResolverConfig {
    /// Load from a TOML file, or fall back to the built-in tables when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let contents = fs::read_to_string(path)?;
                let config: ResolverConfig = toml::from_str(&contents)?;
                tracing::debug!(path = %path.display(), "loaded resolver config");
                config
            }
            None => ResolverConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.exact_phrases.keys().any(|k| k.trim().is_empty()) {
            return Err(ResolverError::InvalidConfig(
                "exact_phrases keys must not be blank".into(),
            ));
        }
        if self.generic_suggestions.len() > MAX_SUGGESTIONS {
            return Err(ResolverError::InvalidConfig(format!(
                "generic_suggestions holds {} questions, at most {MAX_SUGGESTIONS} allowed",
                self.generic_suggestions.len()
            )));
        }
        if self.related.templates.is_empty() {
            return Err(ResolverError::InvalidConfig(
                "related.templates must not be empty".into(),
            ));
        }
        if let Some(template) = self
            .related
            .templates
            .iter()
            .find(|t| !t.contains(TOPIC_PLACEHOLDER))
        {
            return Err(ResolverError::InvalidConfig(format!(
                "template {template:?} has no {TOPIC_PLACEHOLDER} placeholder"
            )));
        }
        for rule in &self.rules {
            if rule.all_of.iter().all(|k| k.trim().is_empty()) {
                return Err(ResolverError::InvalidConfig(format!(
                    "rule {} has no keywords",
                    rule.name
                )));
            }
            if !(0.0..=1.0).contains(&rule.confidence) {
                return Err(ResolverError::InvalidConfig(format!(
                    "rule {} confidence {} is outside [0, 1]",
                    rule.name, rule.confidence
                )));
            }
        }
        Ok(())
    }
}
