use crate::error::{GenError, Result};
use crate::schema::{ConnectionSpec, OperatorVariant, ProgramSchema};
use std::collections::HashMap;
use std::path::PathBuf;

/// Union the normalized variants into the canonical program schema.
///
/// Every emitter assumes a bijection between discriminator value and shape,
/// so a collision is fatal and names both source files. Variant order is the
/// source-scan order, untouched. A zero-variant union is valid (a run over
/// sources that all skipped still emits a schema document).
pub fn aggregate(variants: Vec<OperatorVariant>) -> Result<ProgramSchema> {
    let mut seen: HashMap<&str, &PathBuf> = HashMap::new();
    for variant in &variants {
        if let Some(first) = seen.get(variant.discriminator.as_str()) {
            return Err(GenError::DuplicateDiscriminator {
                discriminator: variant.discriminator.clone(),
                first: (*first).clone(),
                second: variant.origin.clone(),
            });
        }
        seen.insert(variant.discriminator.as_str(), &variant.origin);
    }

    Ok(ProgramSchema {
        operators: variants,
        connections: ConnectionSpec::default(),
    })
}
