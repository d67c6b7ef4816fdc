pub mod aggregator;
pub mod emitters;
pub mod error;
pub mod normalizer;
pub mod scanner;
pub mod schema;

use emitters::{
    documentation::DocumentationEmitter, embedded_constant::EmbeddedConstantEmitter,
    parameter_class::ParameterClassEmitter, schema_doc::SchemaDocEmitter,
    typed_surface::TypedSurfaceEmitter, Artifact, Emitter,
};
use error::{GenError, Result};
use std::path::PathBuf;
use tracing::info;

/// The binding emitted alongside the canonical schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Schema,
    TypedSurface,
    EmbeddedConstant,
    ParameterClass,
    Documentation,
}

impl Target {
    fn extra_emitter(&self) -> Option<Box<dyn Emitter>> {
        match self {
            Target::Schema => None,
            Target::TypedSurface => Some(Box::new(TypedSurfaceEmitter)),
            Target::EmbeddedConstant => Some(Box::new(EmbeddedConstantEmitter)),
            Target::ParameterClass => Some(Box::new(ParameterClassEmitter)),
            Target::Documentation => Some(Box::new(DocumentationEmitter)),
        }
    }
}

/// Everything a run produces, rendered in memory. Nothing touches the
/// output directory until the whole set exists, so a fatal error never
/// leaves a partially-consistent set of bindings behind.
#[derive(Debug)]
pub struct GeneratedOutput {
    pub artifacts: Vec<Artifact>,
    /// Recoverable per-file skips recorded by the scanner.
    pub warnings: Vec<GenError>,
}

/// A fatal failure plus the recoverable skips recorded before it. The
/// warnings are part of the run's outcome either way; a fatal error must not
/// swallow them.
#[derive(Debug)]
pub struct FailedRun {
    pub warnings: Vec<GenError>,
    pub error: GenError,
}

/// Run the full pipeline: scan → normalize → aggregate → emit.
pub async fn generate(sources: &[PathBuf], target: Target) -> Result<GeneratedOutput, FailedRun> {
    let outcome = scanner::scan_sources(sources).await;
    info!(
        "scanned {} sources, {} fragments, {} skipped",
        sources.len(),
        outcome.fragments.len(),
        outcome.warnings.len()
    );

    match render(&outcome.fragments, target) {
        Ok(artifacts) => Ok(GeneratedOutput {
            artifacts,
            warnings: outcome.warnings,
        }),
        Err(error) => Err(FailedRun {
            warnings: outcome.warnings,
            error,
        }),
    }
}

fn render(fragments: &[scanner::RawFragment], target: Target) -> Result<Vec<Artifact>> {
    let mut variants = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        variants.push(normalizer::normalize(fragment)?);
    }

    let schema = aggregator::aggregate(variants)?;

    let mut artifacts = SchemaDocEmitter.emit(&schema)?;
    if let Some(emitter) = target.extra_emitter() {
        artifacts.extend(emitter.emit(&schema)?);
    }
    Ok(artifacts)
}
