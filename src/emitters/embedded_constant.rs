use super::{Artifact, Emitter};
use crate::emitters::schema_doc::program_schema_json;
use crate::error::{GenError, Result};
use crate::schema::ProgramSchema;

pub const EMBEDDED_CONSTANT_FILENAME: &str = "jsonschema.hpp";

/// Re-serializes the canonical schema as an escaped string literal wrapped
/// in a single C++ constant, so the engine can compile the schema into its
/// binary instead of reading it from disk at startup.
pub struct EmbeddedConstantEmitter;

impl Emitter for EmbeddedConstantEmitter {
    fn target(&self) -> &'static str {
        "embedded-constant"
    }

    fn emit(&self, schema: &ProgramSchema) -> Result<Vec<Artifact>> {
        let doc = program_schema_json(schema);
        let compact = serde_json::to_string(&doc).map_err(|e| GenError::Emission {
            target: self.target().to_string(),
            reason: e.to_string(),
        })?;

        let mut contents = String::new();
        contents.push_str("// Generated by opgen. Do not edit by hand.\n");
        contents.push_str("#ifndef OPGEN_OPERATOR_SCHEMA_HPP\n");
        contents.push_str("#define OPGEN_OPERATOR_SCHEMA_HPP\n\n");
        contents.push_str("namespace opgen {\n\n");
        contents.push_str("static const char* const OPERATOR_SCHEMA_JSON =\n    \"");
        contents.push_str(&escape_cpp(&compact));
        contents.push_str("\";\n\n");
        contents.push_str("}  // namespace opgen\n\n");
        contents.push_str("#endif  // OPGEN_OPERATOR_SCHEMA_HPP\n");

        Ok(vec![Artifact {
            filename: EMBEDDED_CONSTANT_FILENAME.to_string(),
            contents,
        }])
    }
}

/// Escape a compact JSON document for a C++ double-quoted string literal.
fn escape_cpp(json: &str) -> String {
    let mut out = String::with_capacity(json.len() + json.len() / 4);
    for c in json.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
