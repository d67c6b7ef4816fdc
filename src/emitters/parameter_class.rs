use super::{check_identifier, Artifact, Emitter};
use crate::error::Result;
use crate::schema::{OperatorVariant, ProgramSchema};
use serde_json::Value;

pub const PARAMETER_CLASS_FILENAME: &str = "operators.py";

/// Emits the Python parameter classes: one dict-backed class per variant
/// whose constructor lists every property, required ones bare and optional
/// ones initialized to their declared default (or `None`).
pub struct ParameterClassEmitter;

impl Emitter for ParameterClassEmitter {
    fn target(&self) -> &'static str {
        "parameter-class"
    }

    fn emit(&self, schema: &ProgramSchema) -> Result<Vec<Artifact>> {
        let mut out = String::new();
        out.push_str("# Generated by opgen. Do not edit by hand.\n\n\n");
        out.push_str("class Operator(dict):\n    def __init__(self):\n        dict.__init__(self)\n");

        for variant in &schema.operators {
            check_identifier(self.target(), &variant.discriminator)?;
            out.push_str("\n\n");
            out.push_str(&render_class(variant));
        }

        Ok(vec![Artifact {
            filename: PARAMETER_CLASS_FILENAME.to_string(),
            contents: out,
        }])
    }
}

fn render_class(variant: &OperatorVariant) -> String {
    // Required parameters first (Python forbids bare parameters after
    // defaulted ones), each group in declaration order.
    let required: Vec<&str> = variant
        .properties
        .iter()
        .filter(|(name, _)| variant.is_required(name))
        .map(|(name, _)| name.as_str())
        .collect();
    let optional: Vec<(&str, Option<&Value>)> = variant
        .properties
        .iter()
        .filter(|(name, _)| !variant.is_required(name))
        .map(|(name, spec)| (name.as_str(), spec.default.as_ref()))
        .collect();

    let mut params = vec!["self".to_string()];
    params.extend(required.iter().map(|name| (*name).to_string()));
    params.extend(optional.iter().map(|(name, default)| {
        let value = default.map(value_to_py).unwrap_or_else(|| "None".to_string());
        format!("{name} = {value}")
    }));

    let mut out = format!(
        "class {}(Operator):\n    def __init__({}):\n        Operator.__init__(self)\n",
        variant.discriminator,
        params.join(", ")
    );
    for name in &required {
        out.push_str(&format!("        self[\"{name}\"] = {name}\n"));
    }
    for (name, _) in &optional {
        out.push_str(&format!("        self[\"{name}\"] = {name}\n"));
    }
    out
}

/// Re-spell a JSON value as a Python literal. Booleans and null use Python's
/// own spelling, never the schema's.
pub fn value_to_py(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(value_to_py).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(fields) => {
            let inner: Vec<String> = fields
                .iter()
                .map(|(k, v)| format!("\"{}\": {}", k, value_to_py(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}
