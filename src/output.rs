use std::io::{self, Write};

use serde::Serialize;

use crate::runner::RunReport;
use faq_resolver::{EvalSummary, Resolution, ResolverError, Result};

pub fn print_report(format: &str, report: &RunReport) -> Result<()> {
    match format {
        "text" => print_text(report),
        "json" => print_json(report),
        other => Err(ResolverError::InvalidArg(format!(
            "Unknown output format: {other}"
        ))),
    }
}

fn print_text(report: &RunReport) -> Result<()> {
    let mut out = io::stdout();
    match report {
        RunReport::Answer { query, resolution } => print_answer(&mut out, query, resolution),
        RunReport::Eval {
            summary,
            required_pass_rate,
        } => print_eval(&mut out, summary, *required_pass_rate),
        RunReport::Check {
            entries,
            exact_phrases,
            rules,
        } => {
            writeln!(out, "Knowledge base entries: {entries}")?;
            writeln!(out, "Exact phrases:          {exact_phrases}")?;
            writeln!(out, "Keyword rules:          {rules}")?;
            Ok(())
        }
    }
}

fn print_answer(out: &mut impl Write, query: &str, resolution: &Resolution) -> Result<()> {
    let response = &resolution.response;
    writeln!(out, "Query:      {query}")?;
    writeln!(out, "Outcome:    {:?}", resolution.outcome)?;
    writeln!(out, "Confidence: {:.2}", response.confidence)?;
    if let Some(source) = &response.source {
        writeln!(out, "Source:     {source}")?;
    }
    if response.needs_full_processing() {
        writeln!(out, "Escalate:   yes")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", response.message)?;

    let suggestions = response.suggested_questions.as_deref().unwrap_or_default();
    if !suggestions.is_empty() {
        writeln!(out)?;
        writeln!(out, "Suggested questions:")?;
        for question in suggestions {
            writeln!(out, "  - {question}")?;
        }
    }
    Ok(())
}

fn print_eval(out: &mut impl Write, summary: &EvalSummary, required: f64) -> Result<()> {
    for o in &summary.outcomes {
        let actual = o
            .actual_outcome
            .map(|outcome| format!("{outcome:?}"))
            .unwrap_or_else(|| "error".to_string());
        writeln!(
            out,
            "case={} passed={} outcome={} confidence={:.2} latency={:.3}ms",
            o.case_id, o.passed, actual, o.confidence, o.latency_ms
        )?;
        if let Some(err) = &o.error {
            writeln!(out, "  error: {err}")?;
        }
    }
    writeln!(
        out,
        "total={} passed={} failed={} pass_rate={:.4} required={:.4} meets_threshold={}",
        summary.total,
        summary.passed,
        summary.failed,
        summary.pass_rate,
        required,
        summary.meets(required)
    )?;
    Ok(())
}

#[derive(Serialize)]
struct JsonEval<'a> {
    #[serde(flatten)]
    summary: &'a EvalSummary,
    required_pass_rate: f64,
    meets_threshold: bool,
}

#[derive(Serialize)]
struct JsonCheck {
    entries: usize,
    exact_phrases: usize,
    rules: usize,
}

fn print_json(report: &RunReport) -> Result<()> {
    let out = match report {
        RunReport::Answer { resolution, .. } => serde_json::to_string_pretty(&resolution.response)?,
        RunReport::Eval {
            summary,
            required_pass_rate,
        } => serde_json::to_string_pretty(&JsonEval {
            summary,
            required_pass_rate: *required_pass_rate,
            meets_threshold: summary.meets(*required_pass_rate),
        })?,
        RunReport::Check {
            entries,
            exact_phrases,
            rules,
        } => serde_json::to_string_pretty(&JsonCheck {
            entries: *entries,
            exact_phrases: *exact_phrases,
            rules: *rules,
        })?,
    };
    println!("{out}");
    Ok(())
}
