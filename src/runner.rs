use serde_json::Value;

use crate::cli::{Cli, Commands};
use faq_resolver::{
    EvalSummary, JsonlUsageLog, KeywordRuleEngine, Resolution, ResolveRequest, Resolver,
    ResolverConfig, ResolverError, Result, StaticKnowledgeBase, UsageRecord, evaluate_cases,
    load_cases, record_usage,
};

pub enum RunReport {
    Answer {
        query: String,
        resolution: Resolution,
    },
    Eval {
        summary: EvalSummary,
        required_pass_rate: f64,
    },
    Check {
        entries: usize,
        exact_phrases: usize,
        rules: usize,
    },
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        match self {
            RunReport::Eval {
                summary,
                required_pass_rate,
            } => summary.meets(*required_pass_rate),
            _ => true,
        }
    }
}

pub fn run_command(cli: &Cli) -> Result<RunReport> {
    cli.validate().map_err(ResolverError::InvalidArg)?;

    let config = ResolverConfig::load(cli.config.as_deref())?;
    let knowledge = match &cli.knowledge_base {
        Some(path) => StaticKnowledgeBase::load(path)?,
        None => {
            tracing::warn!("no knowledge base given; every query past the phrase table escalates");
            StaticKnowledgeBase::empty()
        }
    };
    let rules = KeywordRuleEngine::new(&config.rules);
    let resolver = Resolver::new(knowledge, rules, config);

    match &cli.command {
        Commands::Ask {
            query,
            context,
            usage_log,
        } => {
            let request = ResolveRequest {
                message: Some(Value::String(query.clone())),
                context: context.as_deref().map(parse_context).transpose()?,
            };
            let resolution = resolver.resolve_request(&request)?;
            tracing::info!(
                outcome = ?resolution.outcome,
                confidence = resolution.response.confidence,
                "query resolved"
            );

            if let Some(path) = usage_log {
                record_usage(
                    &JsonlUsageLog::new(path),
                    &UsageRecord::new(query, &resolution),
                );
            }

            Ok(RunReport::Answer {
                query: query.clone(),
                resolution,
            })
        }
        Commands::Eval {
            cases,
            min_pass_rate,
        } => {
            let cases = load_cases(cases)?;
            let summary = evaluate_cases(&resolver, &cases);
            Ok(RunReport::Eval {
                summary,
                required_pass_rate: *min_pass_rate,
            })
        }
        Commands::Check => Ok(RunReport::Check {
            entries: resolver.knowledge().len(),
            exact_phrases: resolver.config().exact_phrases.len(),
            rules: resolver.config().rules.len(),
        }),
    }
}

fn parse_context(raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(ResolverError::InvalidArg(
            "context must be a JSON object".to_string(),
        ));
    }
    Ok(value)
}
