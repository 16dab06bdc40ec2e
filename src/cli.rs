use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "faq-resolver",
    version,
    about = "Resolve chat queries against an FAQ knowledge base"
)]
pub struct Cli {
    /// TOML file overriding the built-in phrase, template and rule tables.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Knowledge base as a JSON array (.json) or one entry per line (.jsonl).
    #[arg(long = "knowledge-base", global = true)]
    pub knowledge_base: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub output: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a single query.
    Ask {
        query: String,

        /// JSON object passed to the rule engine.
        #[arg(long)]
        context: Option<String>,

        /// Append a usage record to this JSONL file.
        #[arg(long)]
        usage_log: Option<PathBuf>,
    },
    /// Run expectation cases and report the pass rate.
    Eval {
        #[arg(long)]
        cases: PathBuf,

        #[arg(long, default_value_t = 1.0)]
        min_pass_rate: f64,
    },
    /// Load and validate the config and knowledge base.
    Check,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if !matches!(self.output.as_str(), "text" | "json") {
            return Err(format!("unknown output format: {}", self.output));
        }

        if let Commands::Eval { min_pass_rate, .. } = &self.command {
            if !(0.0..=1.0).contains(min_pass_rate) {
                return Err("min-pass-rate must be within [0, 1]".to_string());
            }
        }

        Ok(())
    }
}
