use serde::{Deserialize, Serialize};

/// Confidence attached to exact-phrase dictionary hits.
pub const EXACT_PHRASE_CONFIDENCE: f64 = 0.99;
/// Confidence attached to tier-1 (exact trigger) knowledge-base hits.
pub const EXACT_TRIGGER_CONFIDENCE: f64 = 0.96;
/// Confidence attached to tier-2 (substring) knowledge-base hits.
pub const SUBSTRING_TRIGGER_CONFIDENCE: f64 = 0.92;
/// Confidence attached to escalation responses.
pub const ESCALATION_CONFIDENCE: f64 = 0.4;
/// Upper bound on suggested questions in any response.
pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub triggers: Vec<String>,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl KnowledgeEntry {
    pub fn first_trigger(&self) -> Option<&str> {
        self.triggers.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub message: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_faq: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_questions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_full_processing: Option<bool>,
}

impl Response {
    pub fn faq(
        message: impl Into<String>,
        confidence: f64,
        source: Option<String>,
        suggested_questions: Vec<String>,
    ) -> Self {
        Self {
            message: message.into(),
            confidence,
            is_faq: Some(true),
            source,
            suggested_questions: Some(suggested_questions),
            needs_full_processing: None,
        }
    }

    pub fn escalation(message: impl Into<String>, suggested_questions: Vec<String>) -> Self {
        Self {
            message: message.into(),
            confidence: ESCALATION_CONFIDENCE,
            is_faq: None,
            source: None,
            suggested_questions: Some(suggested_questions),
            needs_full_processing: Some(true),
        }
    }

    pub fn needs_full_processing(&self) -> bool {
        self.needs_full_processing.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Substring,
}

impl MatchTier {
    pub fn confidence(self) -> f64 {
        match self {
            MatchTier::Exact => EXACT_TRIGGER_CONFIDENCE,
            MatchTier::Substring => SUBSTRING_TRIGGER_CONFIDENCE,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            MatchTier::Exact => 1,
            MatchTier::Substring => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    pub entry: &'a KnowledgeEntry,
    pub tier: MatchTier,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredEntry<'a> {
    pub entry: &'a KnowledgeEntry,
    pub score: u32,
}

/// Which pipeline stage produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    ExactPhrase,
    KnowledgeBaseExact,
    KnowledgeBaseSubstring,
    Rule,
    Escalation,
}

impl From<MatchTier> for Outcome {
    fn from(tier: MatchTier) -> Self {
        match tier {
            MatchTier::Exact => Outcome::KnowledgeBaseExact,
            MatchTier::Substring => Outcome::KnowledgeBaseSubstring,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub response: Response,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn escalation_serializes_empty_suggestions_and_flag() {
        let response = Response::escalation("handing off", Vec::new());
        let value = serde_json::to_value(&response).expect("serialize");

        assert_eq!(value["confidence"], json!(0.4));
        assert_eq!(value["needsFullProcessing"], Value::Bool(true));
        assert_eq!(value["suggestedQuestions"], json!([]));
        assert!(value.get("isFaq").is_none());
        assert!(value.get("source").is_none());
    }

    #[test]
    fn faq_response_uses_camel_case_fields() {
        let response = Response::faq("answer", 0.96, Some("docs".into()), vec!["q".into()]);
        let value = serde_json::to_value(&response).expect("serialize");

        assert_eq!(value["isFaq"], Value::Bool(true));
        assert_eq!(value["source"], "docs");
        assert_eq!(value["suggestedQuestions"], json!(["q"]));
        assert!(value.get("needsFullProcessing").is_none());
    }

    #[test]
    fn entry_defaults_optional_fields() {
        let entry: KnowledgeEntry =
            serde_json::from_str(r#"{"triggers":["hours"],"response":"9 to 5"}"#).expect("parse");
        assert!(entry.source.is_none());
        assert!(entry.keywords.is_empty());
        assert_eq!(entry.first_trigger(), Some("hours"));
    }

    #[test]
    fn tier_confidence_and_level() {
        assert_eq!(MatchTier::Exact.level(), 1);
        assert_eq!(MatchTier::Substring.level(), 2);
        assert!(MatchTier::Exact.confidence() > MatchTier::Substring.confidence());
    }
}
