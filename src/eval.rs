use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::model::Outcome;
use crate::pipeline::Resolver;
use crate::rules::RuleEngine;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    pub case_id: String,
    pub query: String,
    pub expected_outcome: Outcome,
    #[serde(default)]
    pub expected_message: Option<String>,
    #[serde(default)]
    pub min_confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOutcome {
    pub case_id: String,
    pub passed: bool,
    pub actual_outcome: Option<Outcome>,
    pub actual_message: Option<String>,
    pub confidence: f64,
    pub error: Option<String>,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    pub outcomes: Vec<EvalOutcome>,
}

impl EvalSummary {
    pub fn meets(&self, required_pass_rate: f64) -> bool {
        self.pass_rate >= required_pass_rate
    }
}

pub fn load_cases(path: &Path) -> Result<Vec<EvalCase>> {
    let file = File::open(path)?;
    let cases: Vec<EvalCase> = serde_json::from_reader(BufReader::new(file))?;
    Ok(cases)
}

fn case_matches(case: &EvalCase, outcome: Outcome, message: &str, confidence: f64) -> bool {
    if case.expected_outcome != outcome {
        return false;
    }

    if let Some(expected) = &case.expected_message {
        if expected != message {
            return false;
        }
    }

    if let Some(min) = case.min_confidence {
        if confidence < min {
            return false;
        }
    }

    true
}

/// Run every case through the resolver. A case whose query is rejected counts as failed.
pub fn evaluate_cases<K, R>(resolver: &Resolver<K, R>, cases: &[EvalCase]) -> EvalSummary
where
    K: KnowledgeBase,
    R: RuleEngine,
{
    let mut outcomes = Vec::with_capacity(cases.len());

    for case in cases {
        let start = Instant::now();
        let result = resolver.resolve_traced(&case.query, None);
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let outcome = match result {
            Ok(resolution) => EvalOutcome {
                case_id: case.case_id.clone(),
                passed: case_matches(
                    case,
                    resolution.outcome,
                    &resolution.response.message,
                    resolution.response.confidence,
                ),
                actual_outcome: Some(resolution.outcome),
                actual_message: Some(resolution.response.message),
                confidence: resolution.response.confidence,
                error: None,
                latency_ms,
            },
            Err(err) => EvalOutcome {
                case_id: case.case_id.clone(),
                passed: false,
                actual_outcome: None,
                actual_message: None,
                confidence: 0.0,
                error: Some(err.to_string()),
                latency_ms,
            },
        };
        outcomes.push(outcome);
    }

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed).count();
    let failed = total.saturating_sub(passed);
    let pass_rate = if total == 0 {
        0.0
    } else {
        passed as f64 / total as f64
    };

    EvalSummary {
        total,
        passed,
        failed,
        pass_rate,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::knowledge::StaticKnowledgeBase;
    use crate::model::KnowledgeEntry;

    fn resolver() -> Resolver<StaticKnowledgeBase> {
        let base = StaticKnowledgeBase::new(vec![KnowledgeEntry {
            triggers: vec!["support plans".into()],
            response: "Three tiers.".into(),
            source: None,
            keywords: vec!["support".into()],
        }])
        .expect("valid");
        Resolver::without_rules(base, ResolverConfig::default())
    }

    fn case(id: &str, query: &str, expected: Outcome) -> EvalCase {
        EvalCase {
            case_id: id.into(),
            query: query.into(),
            expected_outcome: expected,
            expected_message: None,
            min_confidence: None,
        }
    }

    #[test]
    fn summarizes_pass_rate() {
        let mut exact = case("c1", "support plans", Outcome::KnowledgeBaseExact);
        exact.expected_message = Some("Three tiers.".into());
        let cases = vec![
            exact,
            case("c2", "hello", Outcome::ExactPhrase),
            case("c3", "quantum widget", Outcome::KnowledgeBaseSubstring),
            case("c4", "", Outcome::Escalation),
        ];

        let summary = evaluate_cases(&resolver(), &cases);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 2);
        assert!((summary.pass_rate - 0.5).abs() < 1e-9);
        assert!(summary.meets(0.5));
        assert!(!summary.meets(0.75));
        assert!(summary.outcomes[3].error.is_some());
        assert_eq!(
            summary.outcomes[2].actual_outcome,
            Some(Outcome::Escalation)
        );
    }

    #[test]
    fn min_confidence_is_enforced() {
        let mut strict = case("c1", "what about support plans", Outcome::KnowledgeBaseSubstring);
        strict.min_confidence = Some(0.95);
        let summary = evaluate_cases(&resolver(), &[strict]);
        assert_eq!(summary.passed, 0);
        assert!((summary.outcomes[0].confidence - 0.92).abs() < 1e-9);
    }

    #[test]
    fn parses_case_files() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join("cases.json");
        std::fs::write(
            &path,
            r#"[{"case_id":"greet","query":"hi","expected_outcome":"exact_phrase","min_confidence":0.9}]"#,
        )
        .expect("write");

        let cases = load_cases(&path).expect("load");
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].expected_outcome, Outcome::ExactPhrase);
        assert_eq!(cases[0].min_confidence, Some(0.9));
    }

    #[test]
    fn empty_case_list_has_zero_pass_rate() {
        let summary = evaluate_cases(&resolver(), &[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pass_rate, 0.0);
    }
}
