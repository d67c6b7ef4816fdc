pub mod documentation;
pub mod embedded_constant;
pub mod parameter_class;
pub mod schema_doc;
pub mod typed_surface;

use crate::error::{GenError, Result};
use crate::schema::ProgramSchema;

/// One rendered output file, held in memory until the whole run succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub filename: String,
    pub contents: String,
}

/// Common emitter contract: a pure, deterministic function from the
/// aggregated schema to one or more textual artifacts. Emitters never share
/// state and never read another emitter's output; everything renders
/// directly from the IR.
pub trait Emitter {
    fn target(&self) -> &'static str;

    fn emit(&self, schema: &ProgramSchema) -> Result<Vec<Artifact>>;
}

/// A discriminator doubles as a type name in the typed surface and the
/// parameter classes, so it must be a plain identifier.
pub(crate) fn check_identifier(target: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(GenError::Emission {
            target: target.to_string(),
            reason: format!("discriminator `{name}` is not a valid identifier"),
        })
    }
}
