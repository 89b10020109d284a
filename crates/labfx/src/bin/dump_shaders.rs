//! Shader source dumping tool
//!
//! Parses a `.labfx` description, generates the final sources of every declared
//! shader and writes them either as `<shader>.vert` / `<shader>.frag` files into an
//! output directory or as a single JSON document.

use clap::Parser;
use labfx::{GeneratorConfig, ShaderGenerator};
use std::{fs, path::PathBuf, process};

/// Command-line arguments for the shader dumping tool
#[derive(Parser)]
#[command(version, about = "Generates the shader sources declared by a pipeline description")]
struct Args {
    /// Pipeline description file
    description: PathBuf,

    /// Directory receiving one .vert and one .frag file per shader
    #[arg(long, short, conflicts_with = "json")]
    output_dir: Option<PathBuf>,

    /// Write all generated sources to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// YAML generator configuration (version header, interface block names)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { tracing::Level::TRACE } else { tracing::Level::INFO };
    let subscriber = tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path).map_err(|e| format!("Error loading generator config '{}': {e}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    // The library has already logged the diagnostic
    let Ok(description) = labfx::parse_pipeline_file(&args.description) else {
        process::exit(1);
    };

    let shaders = ShaderGenerator::new(config).generate(&description);
    tracing::info!("Generated {} shaders from '{}'", shaders.len(), args.description.display());

    if let Some(json_path) = &args.json {
        fs::write(json_path, serde_json::to_string_pretty(&shaders)?)?;
        tracing::info!("Wrote shader sources to '{}'", json_path.display());
        return Ok(());
    }

    match &args.output_dir {
        Some(output_dir) => {
            fs::create_dir_all(output_dir)?;
            for shader in &shaders {
                let vertex_path = output_dir.join(format!("{}.vert", shader.name));
                let fragment_path = output_dir.join(format!("{}.frag", shader.name));
                fs::write(&vertex_path, &shader.vertex_source)?;
                fs::write(&fragment_path, &shader.fragment_source)?;
                tracing::info!("Wrote {} and {}", vertex_path.display(), fragment_path.display());
            }
        }
        None => {
            for shader in &shaders {
                println!("// ---- {} (vertex) ----", shader.name);
                print!("{}", shader.vertex_source);
                println!("// ---- {} (fragment) ----", shader.name);
                print!("{}", shader.fragment_source);
            }
        }
    }

    Ok(())
}
