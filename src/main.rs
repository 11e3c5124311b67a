// src/main.rs

use anyhow::{Context, Result};
use bazelbp::{Converter, ConverterConfig};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "bazelbp")]
#[command(author, version, about = "Generate Android.bp from a Bazel query result", long_about = None)]
struct Cli {
    /// Query result file (jsonproto or streamed_jsonproto); reads stdin if omitted
    input: Option<PathBuf>,

    /// Converter configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (default: Android.bp in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the generated file instead of writing it
    #[arg(long)]
    stdout: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read query result {}", path.display())),
        None => {
            let mut data = String::new();
            std::io::stdin()
                .read_to_string(&mut data)
                .context("Failed to read query result from stdin")?;
            Ok(data)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ConverterConfig> {
    match path {
        Some(path) => ConverterConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(ConverterConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = load_config(cli.config.as_deref())?;
    let data = read_input(cli.input.as_deref())?;
    let records = bazelbp::query::decode(&data).context("Failed to decode query result")?;
    info!("Decoded {} rule records", records.len());

    let converter = Converter::new(config)?;
    let conversion = converter.convert(&records)?;

    if cli.stdout {
        print!("{}", conversion.blueprint);
        eprint!("{}", conversion.report);
        return Ok(());
    }

    let output = match cli.output {
        Some(path) => path,
        None => std::env::current_dir()
            .context("Failed to determine current directory")?
            .join(&converter.config().output_file),
    };
    bazelbp::blueprint::write_atomic(&output, &conversion.blueprint)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print!("{}", conversion.report);
    println!("Wrote {}", output.display());
    Ok(())
}
