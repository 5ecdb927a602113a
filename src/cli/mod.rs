use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde::Serialize;

use crate::calc::cost::CostResult;
use crate::calc::pipeline::Snapshot;
use crate::calc::rank::{SortDirection, SortKey};
use crate::catalog::Model;

/// Resolve the history file path (~/.llmcost/history).
fn history_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|h| h.join(".llmcost").join("history"))
}

// ---------------------------------------------------------------------------
// Cost formatting
// ---------------------------------------------------------------------------

/// Format a dollar amount: six decimals below one cent, four otherwise.
///
/// Small per-call costs would collapse to "0.0000" at four decimals, so the
/// precision switches at the 0.01 threshold.
pub(crate) fn format_cost(cost: f64) -> String {
    if cost < 0.01 {
        format!("${:.6}", cost)
    } else {
        format!("${:.4}", cost)
    }
}

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

/// Render the cost table. The displayed total is the per-call cost times the
/// call count — the single place call-count scaling happens.
pub(crate) fn render_table(rows: &[CostResult], snapshot: &Snapshot) {
    if rows.is_empty() {
        println!("No models selected. Use /select or --model to pick some.");
        return;
    }

    let input_tokens = snapshot.input_tokens();
    let output_tokens = snapshot.output_tokens();
    println!(
        "\x1b[2m{} input / {} output tokens, {} call{}\x1b[0m",
        input_tokens,
        output_tokens,
        snapshot.call_count,
        if snapshot.call_count == 1 { "" } else { "s" },
    );
    if let Some(key) = snapshot.sort.key {
        println!(
            "\x1b[2msorted by {} ({})\x1b[0m",
            key.label(),
            match snapshot.sort.direction {
                SortDirection::Ascending => "asc",
                SortDirection::Descending => "desc",
            }
        );
    }

    let name_width = rows
        .iter()
        .map(|r| r.model_name.len())
        .chain(std::iter::once("Model".len()))
        .max()
        .unwrap_or(5);
    let provider_width = rows
        .iter()
        .map(|r| r.provider.len())
        .chain(std::iter::once("Provider".len()))
        .max()
        .unwrap_or(8);

    println!(
        "\x1b[1m{:<pw$}  {:<nw$}  {:>11}  {:>11}  {:>12}  {:>12}\x1b[0m",
        "Provider",
        "Model",
        "$/M in",
        "$/M out",
        "Per call",
        "Total",
        pw = provider_width,
        nw = name_width,
    );
    for row in rows {
        let total = row.total_cost * snapshot.call_count as f64;
        println!(
            "{:<pw$}  {:<nw$}  {:>11}  {:>11}  {:>12}  {:>12}",
            row.provider,
            row.model_name,
            format_cost(row.input_cost),
            format_cost(row.output_cost),
            format_cost(row.total_cost),
            format_cost(total),
            pw = provider_width,
            nw = name_width,
        );
    }
}

/// JSON rendering for scripting (`--json`).
#[derive(Serialize)]
struct JsonReport<'a> {
    input_tokens: u64,
    output_tokens: u64,
    call_count: u32,
    results: &'a [CostResult],
}

pub(crate) fn render_json(rows: &[CostResult], snapshot: &Snapshot) -> Result<()> {
    let report = JsonReport {
        input_tokens: snapshot.input_tokens(),
        output_tokens: snapshot.output_tokens(),
        call_count: snapshot.call_count,
        results: rows,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Print the merged catalogue with a selection marker per row.
pub(crate) fn render_catalog(snapshot: &Snapshot) {
    for model in snapshot.catalog() {
        let marker = if snapshot.selected.contains(&model.name) {
            "\x1b[32m*\x1b[0m"
        } else {
            " "
        };
        println!(
            "{} {:<10}  {:<20}  ${:>7.3}/M in  ${:>7.3}/M out  {:>9} ctx",
            marker,
            model.provider,
            model.name,
            model.input_price,
            model.output_price,
            model.context_window,
        );
    }
}

// ---------------------------------------------------------------------------
// Custom-model argument parsing
// ---------------------------------------------------------------------------

/// Parse `name, provider, input_price, output_price, context_window`.
///
/// Comma-separated so model names may contain spaces. Validation proper
/// happens in the catalogue; this only gets the fields into shape.
pub(crate) fn parse_custom_model(args: &str) -> Result<Model> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 5 {
        anyhow::bail!(
            "expected: name, provider, input price, output price, context window (got {} fields)",
            parts.len()
        );
    }
    let input_price: f64 = parts[2]
        .parse()
        .map_err(|_| anyhow::anyhow!("input price '{}' is not a number", parts[2]))?;
    let output_price: f64 = parts[3]
        .parse()
        .map_err(|_| anyhow::anyhow!("output price '{}' is not a number", parts[3]))?;
    let context_window: u64 = parts[4]
        .parse()
        .map_err(|_| anyhow::anyhow!("context window '{}' is not a positive integer", parts[4]))?;
    Ok(Model {
        name: parts[0].to_string(),
        provider: parts[1].to_string(),
        input_price,
        output_price,
        context_window,
    })
}

// ---------------------------------------------------------------------------
// REPL
// ---------------------------------------------------------------------------

/// Run the interactive REPL loop.
///
/// Uses rustyline for line editing (arrow keys, history, Ctrl+A/E, etc.).
/// History is persisted to ~/.llmcost/history across sessions. Bare text
/// becomes the input text; slash commands mutate the rest of the snapshot.
/// Every edit re-runs the whole pipeline and re-renders the table.
pub(crate) fn run_repl(snapshot: &mut Snapshot) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    // Load history from disk (ignore errors -- file may not exist yet)
    if let Some(ref path) = history_path() {
        let _ = rl.load_history(path);
    }

    eprintln!(
        "\x1b[1mllmcost\x1b[0m \x1b[2mv{}\x1b[0m  \x1b[2m({} models selected)\x1b[0m",
        env!("CARGO_PKG_VERSION"),
        snapshot.selected.len(),
    );
    eprintln!("\x1b[2mType text to cost it, /help for commands, exit or Ctrl+D to quit.\x1b[0m\n");

    loop {
        let readline = rl.readline("\x1b[1;32m>\x1b[0m ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "exit" || trimmed == "quit" {
                    break;
                }

                rl.add_history_entry(trimmed)?;

                if let Some(cmd) = trimmed.strip_prefix('/') {
                    handle_slash_command(cmd, snapshot);
                } else {
                    // Bare text is the input prompt being costed.
                    snapshot.input_text = trimmed.to_string();
                    snapshot.input_tokens_override = None;
                    render_table(&snapshot.recompute(), snapshot);
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C: cancel current input, don't exit
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D: exit
                println!();
                break;
            }
            Err(e) => {
                eprintln!("\x1b[31mInput error: {e}\x1b[0m");
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let _ = rl.save_history(path);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Slash command handler
// ---------------------------------------------------------------------------

fn handle_slash_command(cmd: &str, snapshot: &mut Snapshot) {
    // Split command and arguments
    let mut parts = cmd.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    let mut rerender = true;
    match command {
        // -----------------------------------------------------------------
        "help" | "h" => {
            eprintln!(
                "\n\x1b[1m  Commands:\x1b[0m\n\
                 \x20   /help, /h                 Show this help\n\
                 \x20   /input [text]             Set (or clear) the input text\n\
                 \x20   /output [text]            Set (or clear) the expected output text\n\
                 \x20   /tokens <in> <out>        Manually override token counts (bypasses tokenizer)\n\
                 \x20   /tokens clear             Drop the overrides, tokenize text again\n\
                 \x20   /calls <n>                Set the call count\n\
                 \x20   /overhead <n>             Set per-text token overhead (default 7)\n\
                 \x20   /models                   List the catalogue (* = selected)\n\
                 \x20   /select <name>            Toggle a model in or out of the selection\n\
                 \x20   /all, /none               Select everything / clear the selection\n\
                 \x20   /add n, p, in, out, ctx   Add a session custom model\n\
                 \x20   /remove <name>            Remove a custom model\n\
                 \x20   /sort <key>               Sort by column; repeat to flip direction\n\
                 \x20                             (provider, model, input, output, per-call, total)\n\
                 \x20   /show                     Re-render the table\n\
                 \x20   exit, quit, Ctrl+D        Quit\n"
            );
            rerender = false;
        }

        // -----------------------------------------------------------------
        "input" => {
            snapshot.input_text = args.to_string();
            snapshot.input_tokens_override = None;
        }

        // -----------------------------------------------------------------
        "output" => {
            snapshot.output_text = args.to_string();
            snapshot.output_tokens_override = None;
        }

        // -----------------------------------------------------------------
        "tokens" => {
            if args == "clear" {
                snapshot.input_tokens_override = None;
                snapshot.output_tokens_override = None;
            } else {
                let mut fields = args.split_whitespace();
                match (
                    fields.next().and_then(|s| s.parse::<u64>().ok()),
                    fields.next().and_then(|s| s.parse::<u64>().ok()),
                ) {
                    (Some(input), Some(output)) => {
                        snapshot.input_tokens_override = Some(input);
                        snapshot.output_tokens_override = Some(output);
                    }
                    _ => {
                        eprintln!("\x1b[33m  Usage: /tokens <in> <out>  or  /tokens clear\x1b[0m");
                        rerender = false;
                    }
                }
            }
        }

        // -----------------------------------------------------------------
        "calls" => match args.parse::<u32>() {
            Ok(n) if n >= 1 => snapshot.call_count = n,
            _ => {
                eprintln!("\x1b[33m  Call count must be a positive integer.\x1b[0m");
                rerender = false;
            }
        },

        // -----------------------------------------------------------------
        "overhead" => match args.parse::<u64>() {
            Ok(n) => snapshot.token_overhead = n,
            Err(_) => {
                eprintln!("\x1b[33m  Overhead must be a non-negative integer.\x1b[0m");
                rerender = false;
            }
        },

        // -----------------------------------------------------------------
        "models" => {
            render_catalog(snapshot);
            rerender = false;
        }

        // -----------------------------------------------------------------
        "select" | "deselect" => {
            let catalog = snapshot.catalog();
            if crate::catalog::find_by_name(&catalog, args).is_none()
                && !snapshot.selected.iter().any(|n| n == args)
            {
                eprintln!("\x1b[33m  Unknown model '{}'. See /models.\x1b[0m", args);
                rerender = false;
            } else {
                snapshot.toggle_selected(args);
            }
        }

        // -----------------------------------------------------------------
        "all" => snapshot.select_all(),
        "none" => snapshot.clear_selection(),

        // -----------------------------------------------------------------
        "add" => match parse_custom_model(args) {
            Ok(model) => {
                let name = model.name.clone();
                match snapshot.add_custom(model) {
                    Ok(()) => eprintln!("  Added custom model '{}'.", name),
                    Err(e) => {
                        eprintln!("\x1b[33m  Rejected: {e}\x1b[0m");
                        rerender = false;
                    }
                }
            }
            Err(e) => {
                eprintln!("\x1b[33m  {e}\x1b[0m");
                rerender = false;
            }
        },

        // -----------------------------------------------------------------
        "remove" => {
            if snapshot.remove_custom(args) {
                eprintln!("  Removed custom model '{}'.", args);
            } else {
                eprintln!("\x1b[33m  No custom model named '{}'.\x1b[0m", args);
                rerender = false;
            }
        }

        // -----------------------------------------------------------------
        "sort" => match SortKey::parse(args) {
            Some(key) => snapshot.sort.toggle(key),
            None => {
                eprintln!(
                    "\x1b[33m  Unknown sort key '{}'. Use: provider, model, input, output, per-call, total\x1b[0m",
                    args
                );
                rerender = false;
            }
        },

        // -----------------------------------------------------------------
        "show" => {}

        // -----------------------------------------------------------------
        _ => {
            eprintln!(
                "\x1b[33mUnknown command: /{}. Type /help for available commands.\x1b[0m",
                command
            );
            rerender = false;
        }
    }

    if rerender {
        render_table(&snapshot.recompute(), snapshot);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    // -- Cost formatting ----------------------------------------------------

    #[test]
    fn format_small_uses_six_decimals() {
        assert_eq!(format_cost(0.0075), "$0.007500");
        assert_eq!(format_cost(0.0), "$0.000000");
    }

    #[test]
    fn format_large_uses_four_decimals() {
        assert_eq!(format_cost(1.2345), "$1.2345");
        assert_eq!(format_cost(0.0225), "$0.0225");
    }

    #[test]
    fn format_threshold_at_one_cent() {
        assert_eq!(format_cost(0.009999), "$0.009999");
        assert_eq!(format_cost(0.01), "$0.0100");
    }

    // -- Custom-model parsing -----------------------------------------------

    #[test]
    fn parse_custom_model_well_formed() {
        let m = parse_custom_model("My Model, Acme, 1.5, 3.0, 32768").unwrap();
        assert_eq!(m.name, "My Model");
        assert_eq!(m.provider, "Acme");
        assert_eq!(m.input_price, 1.5);
        assert_eq!(m.output_price, 3.0);
        assert_eq!(m.context_window, 32_768);
    }

    #[test]
    fn parse_custom_model_wrong_arity() {
        assert!(parse_custom_model("just-a-name").is_err());
        assert!(parse_custom_model("a, b, 1, 2").is_err());
    }

    #[test]
    fn parse_custom_model_bad_numbers() {
        assert!(parse_custom_model("a, b, cheap, 2, 100").is_err());
        assert!(parse_custom_model("a, b, 1, 2, many").is_err());
        assert!(parse_custom_model("a, b, 1, 2, -5").is_err());
    }

    // -- Slash commands drive the snapshot ----------------------------------

    #[test]
    fn slash_tokens_sets_overrides() {
        let mut snap = Snapshot::from_config(&Config::default());
        handle_slash_command("tokens 1000 500", &mut snap);
        assert_eq!(snap.input_tokens(), 1_000);
        assert_eq!(snap.output_tokens(), 500);
        handle_slash_command("tokens clear", &mut snap);
        assert_eq!(snap.input_tokens(), 0);
    }

    #[test]
    fn slash_calls_rejects_zero() {
        let mut snap = Snapshot::from_config(&Config::default());
        handle_slash_command("calls 0", &mut snap);
        assert_eq!(snap.call_count, 1);
        handle_slash_command("calls 3", &mut snap);
        assert_eq!(snap.call_count, 3);
    }

    #[test]
    fn slash_sort_toggles_direction() {
        let mut snap = Snapshot::from_config(&Config::default());
        handle_slash_command("sort total", &mut snap);
        assert_eq!(snap.sort.key, Some(SortKey::TotalCost));
        assert_eq!(snap.sort.direction, SortDirection::Ascending);
        handle_slash_command("sort total", &mut snap);
        assert_eq!(snap.sort.direction, SortDirection::Descending);
    }

    #[test]
    fn slash_select_unknown_name_is_rejected() {
        let mut snap = Snapshot::from_config(&Config::default());
        let before = snap.selected.clone();
        handle_slash_command("select No Such Model", &mut snap);
        assert_eq!(snap.selected, before);
    }

    #[test]
    fn slash_add_rejects_invalid_model() {
        let mut snap = Snapshot::from_config(&Config::default());
        handle_slash_command("add , Acme, 1, 2, 100", &mut snap);
        assert!(snap.custom_models.is_empty());
        handle_slash_command("add Mine, Acme, 1, 2, 100", &mut snap);
        assert_eq!(snap.custom_models.len(), 1);
    }
}
