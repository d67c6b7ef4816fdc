use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use opgen::{generate, Target};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan documentation sources and generate the schema plus one binding
    Generate {
        /// Documentation source files to scan
        #[arg(long, short, num_args = 1.., required = true)]
        sources: Vec<PathBuf>,

        /// Output directory
        #[arg(long, short)]
        output: PathBuf,

        /// Binding to emit alongside the canonical schema document
        #[arg(long, short, value_enum, default_value = "schema")]
        target: TargetArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
    Schema,
    TypedSurface,
    EmbeddedConstant,
    ParameterClass,
    Documentation,
}

impl From<TargetArg> for Target {
    fn from(value: TargetArg) -> Self {
        match value {
            TargetArg::Schema => Target::Schema,
            TargetArg::TypedSurface => Target::TypedSurface,
            TargetArg::EmbeddedConstant => Target::EmbeddedConstant,
            TargetArg::ParameterClass => Target::ParameterClass,
            TargetArg::Documentation => Target::Documentation,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            sources,
            output,
            target,
        } => {
            info!("generating from {} sources", sources.len());
            let generated = match generate(&sources, target.into()).await {
                Ok(generated) => generated,
                Err(failed) => {
                    // Recovered skips are part of the outcome even when the
                    // run dies afterwards.
                    for warning in &failed.warnings {
                        warn!("{warning}");
                    }
                    return Err(failed.error.into());
                }
            };

            fs::create_dir_all(&output)
                .with_context(|| format!("failed to create output directory {}", output.display()))?;
            for artifact in &generated.artifacts {
                let path = output.join(&artifact.filename);
                fs::write(&path, &artifact.contents)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!("wrote {}", path.display());
            }

            for warning in &generated.warnings {
                warn!("{warning}");
            }
            if !generated.warnings.is_empty() {
                warn!(
                    "{} source file(s) skipped; artifacts cover the remaining sources",
                    generated.warnings.len()
                );
            }
        }
    }

    Ok(())
}
