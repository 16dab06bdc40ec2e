use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::error::{ResolverError, Result};
use crate::exact::ExactPhraseMatcher;
use crate::fallback::rank_fallback;
use crate::knowledge::KnowledgeBase;
use crate::matcher::match_knowledge_base;
use crate::model::{Outcome, Resolution, Response};
use crate::normalize::normalize;
use crate::related::generate_related;
use crate::rules::{NoRules, RuleEngine};

/// Inbound request body as sent by the chat widget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub context: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    ExactCheck,
    KbCheck,
    RuleCheck,
    Escalate,
}

/// Runs a query through the exact-phrase table, the knowledge base, the rule
/// engine and finally the fallback ranker, stopping at the first stage that answers.
pub struct Resolver<K, R = NoRules> {
    knowledge: K,
    rules: R,
    exact: ExactPhraseMatcher,
    config: ResolverConfig,
}

impl<K: KnowledgeBase> Resolver<K, NoRules> {
    pub fn without_rules(knowledge: K, config: ResolverConfig) -> Self {
        Self::new(knowledge, NoRules, config)
    }
}

impl<K: KnowledgeBase, R: RuleEngine> Resolver<K, R> {
    pub fn new(knowledge: K, rules: R, config: ResolverConfig) -> Self {
        let exact = ExactPhraseMatcher::from_config(&config);
        Self {
            knowledge,
            rules,
            exact,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn knowledge(&self) -> &K {
        &self.knowledge
    }

    pub fn resolve(&self, query: &str, context: Option<&Value>) -> Result<Response> {
        self.resolve_traced(query, context).map(|r| r.response)
    }

    pub fn resolve_request(&self, request: &ResolveRequest) -> Result<Resolution> {
        match &request.message {
            Some(Value::String(message)) => self.resolve_traced(message, request.context.as_ref()),
            Some(_) => Err(ResolverError::InvalidQuery("message must be a string".into())),
            None => Err(ResolverError::InvalidQuery("message is required".into())),
        }
    }

    /// Like [`Resolver::resolve`], also reporting which stage answered.
    pub fn resolve_traced(&self, query: &str, context: Option<&Value>) -> Result<Resolution> {
        let normalized = normalize(query);
        let mut stage = Stage::Start;

        loop {
            debug!(?stage, query = %normalized, "resolver stage");
            stage = match stage {
                Stage::Start => {
                    if query.is_empty() {
                        return Err(ResolverError::InvalidQuery("message is required".into()));
                    }
                    Stage::ExactCheck
                }
                Stage::ExactCheck => match self.exact.match_exact(&normalized) {
                    Some(response) => return Ok(done(Outcome::ExactPhrase, response)),
                    None => Stage::KbCheck,
                },
                Stage::KbCheck => match match_knowledge_base(&normalized, self.knowledge.entries()) {
                    Some(hit) => {
                        let response = Response::faq(
                            hit.entry.response.clone(),
                            hit.confidence,
                            hit.entry.source.clone(),
                            generate_related(&hit.entry.keywords, &self.config.related),
                        );
                        return Ok(done(hit.tier.into(), response));
                    }
                    None => Stage::RuleCheck,
                },
                Stage::RuleCheck => {
                    let evaluated = panic::catch_unwind(AssertUnwindSafe(|| {
                        self.rules.evaluate(&normalized, context)
                    }));
                    match evaluated {
                        Ok(Ok(Some(response))) => return Ok(done(Outcome::Rule, response)),
                        Ok(Ok(None)) => Stage::Escalate,
                        Ok(Err(err)) => {
                            warn!(error = %err, "rule engine failed; escalating");
                            Stage::Escalate
                        }
                        Err(_) => {
                            warn!("rule engine panicked; escalating");
                            Stage::Escalate
                        }
                    }
                }
                Stage::Escalate => {
                    let suggestions = rank_fallback(&normalized, self.knowledge.entries());
                    let response =
                        Response::escalation(self.config.escalation_message.clone(), suggestions);
                    return Ok(done(Outcome::Escalation, response));
                }
            };
        }
    }
}

fn done(outcome: Outcome, response: Response) -> Resolution {
    debug!(?outcome, confidence = response.confidence, "resolved");
    Resolution { outcome, response }
}
