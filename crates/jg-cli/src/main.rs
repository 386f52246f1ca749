//! `jg` — build a JSON graph from the command line.
//!
//! Reads a JSON document from a file (or stdin when no path or `-` is
//! given), lays it out, and prints `{nodes, edges, relations}` as JSON.
//! Set `RUST_LOG=debug` to see build statistics.

use clap::Parser;
use jg_core::LayoutPolicy;
use jg_core::build_with_policy;
use jg_core::layout::{ROW_HEIGHT, SPACING};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Lay out a JSON document as a node/edge graph
#[derive(Parser, Debug)]
#[command(name = "jg", version)]
#[command(about = "Lay out a JSON document as a node/edge graph")]
struct Cli {
    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,

    /// Vertical distance between depth rows
    #[arg(long, default_value_t = ROW_HEIGHT, value_parser = positive)]
    row_height: f64,

    /// Horizontal slot width per sibling entry
    #[arg(long, default_value_t = SPACING, value_parser = positive)]
    spacing: f64,

    /// JSON file to read; stdin when omitted or `-`
    path: Option<PathBuf>,
}

impl Cli {
    fn policy(&self) -> LayoutPolicy {
        LayoutPolicy {
            row_height: self.row_height,
            spacing: self.spacing,
            ..LayoutPolicy::default()
        }
    }

    fn input(&self) -> Option<&Path> {
        self.path.as_deref().filter(|p| *p != Path::new("-"))
    }
}

fn positive(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(format!("`{s}` is not a positive number")),
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {0}: {1}")]
    Read(String, #[source] io::Error),
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| CliError::Read(path.display().to_string(), e))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::Read("stdin".to_string(), e))?;
            Ok(buf)
        }
    }
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let text = read_input(cli.input())?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let graph = build_with_policy(&value, &cli.policy());
    log::info!(
        "{} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    let out = if cli.pretty {
        serde_json::to_string_pretty(&graph)?
    } else {
        serde_json::to_string(&graph)?
    };
    Ok(out)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("jg: {e}");
            ExitCode::FAILURE
        }
    }
}
