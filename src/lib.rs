pub mod config;
pub mod error;
pub mod eval;
pub mod exact;
pub mod fallback;
pub mod knowledge;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod related;
pub mod rules;
pub mod usage;

pub use config::{RelatedConfig, ResolverConfig, RuleConfig, WELCOME_MESSAGE};
pub use error::{CLIENT_ERROR_BODY, ResolverError, Result};
pub use eval::{EvalCase, EvalOutcome, EvalSummary, evaluate_cases, load_cases};
pub use exact::ExactPhraseMatcher;
pub use fallback::{rank_fallback, score_entries};
pub use knowledge::{KnowledgeBase, StaticKnowledgeBase, load_entries_json, load_entries_jsonl};
pub use matcher::match_knowledge_base;
pub use model::{
    KnowledgeEntry, MatchResult, MatchTier, Outcome, Resolution, Response, ScoredEntry,
};
pub use normalize::normalize;
pub use pipeline::{ResolveRequest, Resolver};
pub use related::generate_related;
pub use rules::{KeywordRuleEngine, NoRules, RuleEngine, RuleError};
pub use usage::{JsonlUsageLog, UsageLogger, UsageRecord, record_usage};
