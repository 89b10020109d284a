//! Pipeline description analysis tool
//!
//! Parses a `.labfx` description and dumps the resulting pipeline graph to stdout,
//! either with Debug formatting or as JSON. Pass references that do not resolve are
//! reported as warnings; they do not make the description invalid.

use clap::Parser;
use std::path::PathBuf;
use std::process;

/// Command-line arguments for the analysis tool
#[derive(Parser)]
#[command(version, about = "Parses a pipeline description and dumps the parsed graph")]
struct Args {
    /// Pipeline description file
    description: PathBuf,

    /// Print the graph as JSON instead of Debug output
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    let subscriber = tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // The library has already logged the diagnostic
    let Ok(description) = labfx::parse_pipeline_file(&args.description) else {
        process::exit(1);
    };

    for reference in description.unresolved_references() {
        tracing::warn!("{reference}");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&description)?);
    } else {
        println!("{description:#?}");
    }

    Ok(())
}
