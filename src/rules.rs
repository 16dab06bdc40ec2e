use serde_json::Value;
use thiserror::Error;

use crate::config::RuleConfig;
use crate::model::{MAX_SUGGESTIONS, Response};
use crate::normalize::normalize;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("rule engine unavailable: {0}")]
    Unavailable(String),

    #[error("rule evaluation failed: {0}")]
    Failed(String),
}

/// Structured-answer tier consulted after both matchers miss.
///
/// `Ok(None)` means no rule applied. Errors and panics are treated as `Ok(None)`
/// by the resolver and never surface to the caller.
pub trait RuleEngine {
    fn evaluate(
        &self,
        query: &str,
        context: Option<&Value>,
    ) -> std::result::Result<Option<Response>, RuleError>;
}

impl<R: RuleEngine + ?Sized> RuleEngine for &R {
    fn evaluate(
        &self,
        query: &str,
        context: Option<&Value>,
    ) -> std::result::Result<Option<Response>, RuleError> {
        (**self).evaluate(query, context)
    }
}

impl<R: RuleEngine + ?Sized> RuleEngine for Box<R> {
    fn evaluate(
        &self,
        query: &str,
        context: Option<&Value>,
    ) -> std::result::Result<Option<Response>, RuleError> {
        (**self).evaluate(query, context)
    }
}

impl<R: RuleEngine + ?Sized> RuleEngine for std::sync::Arc<R> {
    fn evaluate(
        &self,
        query: &str,
        context: Option<&Value>,
    ) -> std::result::Result<Option<Response>, RuleError> {
        (**self).evaluate(query, context)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoRules;

impl RuleEngine for NoRules {
    fn evaluate(
        &self,
        _query: &str,
        _context: Option<&Value>,
    ) -> std::result::Result<Option<Response>, RuleError> {
        Ok(None)
    }
}

#[derive(Debug, Clone)]
struct KeywordRule {
    name: String,
    all_of: Vec<String>,
    response: Response,
}

/// Table-driven rules: the first rule whose keywords all occur in the query wins.
#[derive(Debug, Clone, Default)]
pub struct KeywordRuleEngine {
    rules: Vec<KeywordRule>,
}

impl KeywordRuleEngine {
    pub fn new(rules: &[RuleConfig]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| KeywordRule {
                name: rule.name.clone(),
                all_of: rule
                    .all_of
                    .iter()
                    .map(|k| normalize(k))
                    .filter(|k| !k.is_empty())
                    .collect(),
                response: Response {
                    message: rule.response.clone(),
                    confidence: rule.confidence,
                    is_faq: Some(false),
                    source: rule.source.clone(),
                    suggested_questions: Some(
                        rule.suggested_questions
                            .iter()
                            .take(MAX_SUGGESTIONS)
                            .cloned()
                            .collect(),
                    ),
                    needs_full_processing: None,
                },
            })
            .collect();
        Self { rules }
    }
}

impl RuleEngine for KeywordRuleEngine {
    fn evaluate(
        &self,
        query: &str,
        _context: Option<&Value>,
    ) -> std::result::Result<Option<Response>, RuleError> {
        let matched = self.rules.iter().find(|rule| {
            !rule.all_of.is_empty() && rule.all_of.iter().all(|k| query.contains(k.as_str()))
        });
        if let Some(rule) = matched {
            tracing::debug!(rule = %rule.name, "keyword rule matched");
        }
        Ok(matched.map(|rule| rule.response.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, all_of: &[&str], confidence: f64) -> RuleConfig {
        RuleConfig {
            name: name.to_string(),
            all_of: all_of.iter().map(|k| k.to_string()).collect(),
            response: format!("rule-{name}"),
            confidence,
            source: None,
            suggested_questions: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        }
    }

    #[test]
    fn requires_every_keyword() {
        let engine = KeywordRuleEngine::new(&[rule("hours", &["Opening", "hours"], 0.8)]);
        assert!(engine.evaluate("opening times", None).expect("ok").is_none());

        let response = engine
            .evaluate("what are your opening hours", None)
            .expect("ok")
            .expect("hit");
        assert_eq!(response.message, "rule-hours");
        assert_eq!(response.confidence, 0.8);
        assert_eq!(response.is_faq, Some(false));
        assert_eq!(response.suggested_questions.map(|q| q.len()), Some(3));
    }

    #[test]
    fn first_matching_rule_wins() {
        let engine = KeywordRuleEngine::new(&[
            rule("first", &["demo"], 0.7),
            rule("second", &["demo", "book"], 0.9),
        ]);
        let response = engine.evaluate("book a demo", None).expect("ok").expect("hit");
        assert_eq!(response.message, "rule-first");
    }

    #[test]
    fn no_rules_never_answers() {
        assert!(NoRules.evaluate("anything", None).expect("ok").is_none());
    }
}
