//! alias-expand - apply `alias_method!` / `remove_method!` to a source file
//!
//! Runs the same expansion as `#[method_aliases]`, treating the whole file as
//! the namespace root.
//!
//! # Usage
//!
//! ```bash
//! # Print the rewritten file
//! alias-expand expand --file src/shapes.rs
//!
//! # Summarise what each directive did
//! cat src/shapes.rs | alias-expand report -o json
//! ```

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use alias_method_core::{expand_file, ExpandConfig, ExpandedFile, ExpansionReport};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use quote::ToTokens;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "alias-expand")]
#[command(version)]
#[command(about = "Expand method alias and removal directives in a Rust source file")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for `report`: json, text, or pretty (default)
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Path to the alias_method crate used by suppressed bodies
    #[arg(long, global = true, env = "ALIAS_METHOD_CRATE")]
    crate_path: Option<String>,

    /// Prefix for hidden copies of aliased methods
    #[arg(long, global = true, env = "ALIAS_METHOD_HIDDEN_PREFIX")]
    hidden_prefix: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the expanded source
    Expand {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List every directive and the overloads it rewrote
    Report {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alias_expand=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let result = build_config(&cli).and_then(|config| match &cli.command {
        Commands::Expand { file } => cmd_expand(file.clone(), &config),
        Commands::Report { file } => cmd_report(file.clone(), &config, cli.format),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                let output = serde_json::json!({ "error": format!("{e:#}") });
                println!("{output}");
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> Result<ExpandConfig> {
    let mut config = ExpandConfig::default();
    if let Some(path) = &cli.crate_path {
        config = config
            .with_crate_path(path)
            .with_context(|| format!("invalid crate path '{path}'"))?;
    }
    if let Some(prefix) = &cli.hidden_prefix {
        config = config.with_hidden_prefix(prefix)?;
    }
    Ok(config)
}

// =============================================================================
// COMMANDS
// =============================================================================

fn cmd_expand(file: Option<PathBuf>, config: &ExpandConfig) -> Result<()> {
    let expanded = run(file, config)?;
    print!("{}", render(&expanded));

    let report = &expanded.report;
    let misses = report.misses().count();
    tracing::info!(
        directives = report.directives.len(),
        misses,
        "expanded source"
    );
    Ok(())
}

fn cmd_report(file: Option<PathBuf>, config: &ExpandConfig, format: OutputFormat) -> Result<()> {
    let expanded = run(file, config)?;
    print_report(&expanded.report, format)
}

fn run(file: Option<PathBuf>, config: &ExpandConfig) -> Result<ExpandedFile> {
    let source = read_input(file)?;
    expand_source(&source, config)
}

fn expand_source(source: &str, config: &ExpandConfig) -> Result<ExpandedFile> {
    let parsed = syn::parse_file(source).context("failed to parse input as Rust source")?;
    Ok(expand_file(parsed, config)?)
}

/// The expanded file as source text. `syn::File` does not print its
/// shebang, so it goes first on its own line.
fn render(expanded: &ExpandedFile) -> String {
    let mut out = String::new();
    if let Some(shebang) = &expanded.file.shebang {
        out.push_str(shebang);
        out.push('\n');
    }
    out.push_str(&expanded.file.to_token_stream().to_string());
    out.push('\n');
    out
}

fn print_report(report: &ExpansionReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            for d in &report.directives {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    d.kind.as_str(),
                    d.enclosing,
                    d.from,
                    d.to.as_deref().unwrap_or("-"),
                    d.overloads
                );
            }
        }
        OutputFormat::Pretty => {
            if report.directives.is_empty() {
                println!("{} no directives found", "OK".green());
                return Ok(());
            }
            for d in &report.directives {
                let target = match &d.to {
                    Some(to) => format!("{} -> {}", d.from, to),
                    None => d.from.clone(),
                };
                let status = if d.overloads == 0 {
                    "skipped (no match)".yellow().to_string()
                } else {
                    format!("{} overload(s)", d.overloads).green().to_string()
                };
                println!(
                    "  {:<14} {:<24} {}  [{}]",
                    d.kind.as_str().cyan(),
                    target,
                    status,
                    d.enclosing.dimmed()
                );
            }
        }
    }
    Ok(())
}

fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read '{}'", path.display())),
        None => {
            if io::stdin().is_terminal() {
                bail!("no input provided. Use --file or pipe input via stdin.");
            }
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_shebang_and_inner_attributes() {
        let source = "#!/usr/bin/env run-cargo-script\n\
                      #![allow(dead_code)]\n\
                      #![cfg_attr(docsrs, feature(doc_cfg))]\n\
                      struct T;\n\
                      impl T {\n\
                          fn add(x: i32, y: i32) -> i32 { x + y }\n\
                          alias_method!(\"sum\", \"self.add\");\n\
                      }\n";
        let expanded = expand_source(source, &ExpandConfig::default()).unwrap();
        let text = render(&expanded);

        assert!(text.starts_with("#!/usr/bin/env run-cargo-script\n"), "{text}");
        let allow = text.find("# ! [allow (dead_code)]").unwrap();
        let cfg_attr = text.find("# ! [cfg_attr (docsrs , feature (doc_cfg))]").unwrap();
        let item = text.find("struct T").unwrap();
        assert!(allow < cfg_attr && cfg_attr < item, "{text}");
        assert!(text.contains("fn sum"));

        // the rendered file parses back with its attributes
        let reparsed = syn::parse_file(text.trim_start_matches("#!/usr/bin/env run-cargo-script\n")).unwrap();
        assert_eq!(reparsed.attrs.len(), 2);
    }

    #[test]
    fn test_report_counts_overloads() {
        let source = "struct T;\nimpl T { fn add(&self) {} alias_method!(\"plus\", \"add\"); remove_method!(\"gone\"); }";
        let expanded = expand_source(source, &ExpandConfig::default()).unwrap();
        let overloads: Vec<usize> = expanded.report.directives.iter().map(|d| d.overloads).collect();
        assert_eq!(overloads, vec![1, 0]);
    }
}
