//! Writes stack comments into a Huff source file.
//!
//! Usage: `huff-stack-comments <FILE> [--write] [--json] [--max-call-depth N]
//! [--max-steps N] [-v...]`

use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context};
use clap::Parser;
use huff_stack_comments::{document::loader::FsLoader, document::Document, vm::Config};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "huff-stack-comments")]
#[command(about = "Annotate each line of a Huff file with the symbolic stack after it")]
struct Args {
    /// Path to the Huff file to annotate
    file: PathBuf,

    /// Rewrite the file in place instead of printing it
    #[arg(long)]
    write: bool,

    /// Print a JSON report instead of the annotated source
    #[arg(long, conflicts_with = "write")]
    json: bool,

    /// Maximum depth of nested macro calls
    #[arg(long = "max-call-depth")]
    max_call_depth: Option<usize>,

    /// Maximum number of tokens to execute
    #[arg(long = "max-steps")]
    max_steps: Option<usize>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = Config::default();
    if let Some(depth) = args.max_call_depth {
        config = config.with_maximum_call_depth(depth);
    }
    if let Some(steps) = args.max_steps {
        config = config.with_maximum_steps(steps);
    }

    let document = Document::load(&args.file, &FsLoader).map_err(|e| anyhow!("{e}"))?;
    let analyzer = huff_stack_comments::new(document).analyze(config);

    for diagnostic in analyzer.diagnostics().payloads() {
        warn!("{diagnostic}");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analyzer.report())?);
    } else if args.write {
        fs::write(&args.file, analyzer.annotated())
            .with_context(|| format!("Failed to write {}", args.file.display()))?;
        info!("Wrote stack comments to {}", args.file.display());
    } else {
        print!("{}", analyzer.annotated());
    }

    Ok(())
}
