//! Command-line wrapper that compiles a model directory and prints it as JSON.

use anyhow::Context;
use clap::Parser;
use dynconf::config::MissingVariablePolicy;
use dynconf::{CompilerOptions, compile_dir};
use log::info;
use std::path::PathBuf;

/// Command-line options for the compiler.
#[derive(Parser)]
#[command(name = "dynconf", version)]
struct Cli {
    /// Model directory holding variables, security, and table configs
    base: PathBuf,
    /// Optional JSON5 file with compiler options
    #[arg(long)]
    options: Option<PathBuf>,
    /// Override the table subdirectory name
    #[arg(long)]
    tables_dir: Option<String>,
    /// Substitute an empty string for undefined variables instead of failing
    #[arg(long)]
    lenient_variables: bool,
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let mut options = match &cli.options {
        Some(path) => CompilerOptions::load_from_path(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => CompilerOptions::default(),
    };
    if let Some(tables_dir) = cli.tables_dir {
        options = options.with_table_dir(tables_dir);
    }
    if cli.lenient_variables {
        options = options.with_missing_variables(MissingVariablePolicy::Empty);
    }
    info!(
        "compiling (base={}, table_dir={}, missing_variables={:?})",
        cli.base.display(),
        options.table_dir,
        options.missing_variables
    );

    let model = compile_dir(&cli.base, options)
        .with_context(|| format!("compiling {}", cli.base.display()))?;
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}
