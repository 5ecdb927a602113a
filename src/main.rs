mod calc;
mod catalog;
mod cli;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::calc::pipeline::Snapshot;
use crate::calc::rank::SortKey;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "llmcost",
    about = "Estimate LLM API costs from text, per-token pricing, and a call count",
    version = env!("CARGO_PKG_VERSION"),
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a cost table (one-shot or interactive)
    Calc {
        /// Input text to tokenize and cost
        text: Option<String>,

        /// Expected output text to tokenize and cost
        #[arg(short, long)]
        output_text: Option<String>,

        /// Select a model by name (repeatable; overrides the default selection)
        #[arg(short, long)]
        model: Vec<String>,

        /// Select every model in the catalogue
        #[arg(long, conflicts_with = "model")]
        all: bool,

        /// Number of API calls to scale the total by
        #[arg(short, long)]
        calls: Option<u32>,

        /// Input token count, bypassing the tokenizer
        #[arg(long)]
        input_tokens: Option<u64>,

        /// Output token count, bypassing the tokenizer
        #[arg(long)]
        output_tokens: Option<u64>,

        /// Sort column: provider, model, input, output, per-call, total
        #[arg(short, long)]
        sort: Option<String>,

        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Add a session custom model: "name, provider, $in/M, $out/M, context"
        #[arg(long, value_name = "SPEC")]
        add: Vec<String>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Interactive REPL mode
        #[arg(short, long)]
        interactive: bool,
    },
    /// Model catalogue management
    Models {
        #[command(subcommand)]
        action: ModelsAction,
    },
}

#[derive(Subcommand)]
enum ModelsAction {
    /// List the built-in model catalogue
    List,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = config::load_config()?;
    config.validate()?;

    match cli.command {
        Commands::Calc {
            text,
            output_text,
            model,
            all,
            calls,
            input_tokens,
            output_tokens,
            sort,
            desc,
            add,
            json,
            interactive,
        } => {
            let mut snapshot = Snapshot::from_config(&config);

            if let Some(t) = text {
                snapshot.input_text = t;
            }
            if let Some(t) = output_text {
                snapshot.output_text = t;
            }
            if let Some(n) = calls {
                if n == 0 {
                    anyhow::bail!("--calls must be at least 1");
                }
                snapshot.call_count = n;
            }
            snapshot.input_tokens_override = input_tokens;
            snapshot.output_tokens_override = output_tokens;

            for spec in &add {
                let custom = cli::parse_custom_model(spec)?;
                snapshot
                    .add_custom(custom)
                    .map_err(|e| anyhow::anyhow!("invalid custom model '{}': {}", spec, e))?;
            }

            if !model.is_empty() {
                snapshot.selected = model;
            } else if all {
                snapshot.select_all();
            }

            if let Some(ref key) = sort {
                let key = SortKey::parse(key).ok_or_else(|| {
                    anyhow::anyhow!(
                        "unknown sort key '{}', expected one of: provider, model, input, output, per-call, total",
                        key
                    )
                })?;
                snapshot.sort.toggle(key);
                if desc {
                    snapshot.sort.toggle(key);
                }
            }

            if interactive {
                cli::run_repl(&mut snapshot)
            } else {
                let rows = snapshot.recompute();
                if json {
                    cli::render_json(&rows, &snapshot)
                } else {
                    cli::render_table(&rows, &snapshot);
                    Ok(())
                }
            }
        }
        Commands::Models { action } => match action {
            ModelsAction::List => {
                let snapshot = Snapshot::from_config(&config);
                cli::render_catalog(&snapshot);
                Ok(())
            }
        },
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("llmcost=warn".parse().unwrap()),
        )
        .with_target(false)
        .init();
}
