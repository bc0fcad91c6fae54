// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scriptpress — script-aware text converter
//
// Entry point. Initialises logging, parses the command line and runs the
// requested command on a multi-threaded Tokio runtime.

mod services;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use scriptpress_core::config::ConvertConfig;
use scriptpress_core::error::Result;
use scriptpress_core::script::{classify, script_counts};
use scriptpress_core::types::FailurePolicy;

use services::converter::Converter;
use services::samples::convert_samples;

#[derive(Parser)]
#[command(name = "scriptpress", version)]
#[command(about = "Convert text into TXT, DOCX, XLSX, PDF, JPEG and PNG using a font for its script")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert text into every output format
    Convert(ConvertArgs),

    /// Convert the built-in Russian, Amharic and Arabic samples
    Samples {
        /// Root directory; each sample gets its own subdirectory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the script profile detected for some text
    Detect {
        /// Text to classify (read from stdin when omitted)
        text: Option<String>,

        /// Print per-script character counts as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Text to convert (read from stdin when neither TEXT nor --file is given)
    text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File name stem shared by all outputs
    #[arg(long)]
    stem: Option<String>,

    /// Directory for downloaded fonts
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Skip detection and use this script profile (e.g. arabic, cyrillic)
    #[arg(long)]
    script: Option<String>,

    /// Keep the outputs that succeeded when another format fails
    #[arg(long)]
    keep_partial: bool,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Convert(args) => run_convert(args).await,
        Command::Samples { output, config } => run_samples(output, config).await,
        Command::Detect { text, json } => run_detect(text, json),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "scriptpress failed");
            ExitCode::FAILURE
        }
    }
}

/// Config file contents, or defaults when no file was given.
fn load_config(path: Option<&PathBuf>) -> Result<ConvertConfig> {
    match path {
        Some(path) => ConvertConfig::load(path),
        None => Ok(ConvertConfig::default()),
    }
}

fn read_input(text: Option<String>, file: Option<&PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(file) = file {
        return Ok(std::fs::read_to_string(file)?);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

async fn run_convert(args: ConvertArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if let Some(stem) = args.stem {
        config.file_stem = stem;
    }
    if let Some(font_dir) = args.font_dir {
        config.font_dir = font_dir;
    }
    if args.script.is_some() {
        config.forced_script = args.script;
    }
    if args.keep_partial {
        config.failure_policy = FailurePolicy::KeepPartial;
    }

    let text = read_input(args.text, args.file.as_ref())?;
    let converter = Converter::from_config(config)?;

    let report = converter.convert_text(&text).await?;
    if report.font_degraded {
        tracing::warn!(script = report.script, "outputs were rendered with a fallback font");
    }
    for path in &report.paths {
        println!("{}", path.display());
    }
    Ok(())
}

async fn run_samples(output: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let converter = Converter::from_config(load_config(config.as_ref())?)?;
    let outcomes = convert_samples(&converter, &output).await;

    let mut first_error = None;
    let mut converted = 0;
    for (name, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                converted += 1;
                println!("{name}: {} ({} files)", report.script, report.paths.len());
            }
            Err(e) => {
                println!("{name}: failed: {e}");
                first_error.get_or_insert(e);
            }
        }
    }
    // Individual failures are reported above; only a total failure is fatal.
    match first_error {
        Some(e) if converted == 0 => Err(e),
        _ => Ok(()),
    }
}

fn run_detect(text: Option<String>, json: bool) -> Result<()> {
    let text = read_input(text, None)?;
    let profile = classify(&text);

    if json {
        let counts: serde_json::Map<String, serde_json::Value> = script_counts(&text)
            .into_iter()
            .map(|(profile, count)| (profile.key.to_string(), count.into()))
            .collect();
        let body = serde_json::json!({
            "key": profile.key,
            "font": profile.name,
            "direction": if profile.right_to_left { "rtl" } else { "ltr" },
            "counts": counts,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        let direction = if profile.right_to_left { "rtl" } else { "ltr" };
        println!("{}\t{}\t{}", profile.key, profile.name, direction);
    }
    Ok(())
}
