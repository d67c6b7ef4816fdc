use super::{Artifact, Emitter};
use crate::error::{GenError, Result};
use crate::schema::{OperatorVariant, ProgramSchema, PropertyKind, PropertySpec};
use serde_json::{json, Map, Value};

pub const SCHEMA_DOC_FILENAME: &str = "jsonschema.json";

/// Serializes the aggregated schema into the canonical JSON Schema document.
/// This artifact is the reference every other binding must stay consistent
/// with; the embedded-constant emitter re-serializes the same tree.
pub struct SchemaDocEmitter;

impl Emitter for SchemaDocEmitter {
    fn target(&self) -> &'static str {
        "schema"
    }

    fn emit(&self, schema: &ProgramSchema) -> Result<Vec<Artifact>> {
        let doc = program_schema_json(schema);
        let mut contents = serde_json::to_string_pretty(&doc).map_err(|e| GenError::Emission {
            target: self.target().to_string(),
            reason: e.to_string(),
        })?;
        contents.push('\n');
        Ok(vec![Artifact {
            filename: SCHEMA_DOC_FILENAME.to_string(),
            contents,
        }])
    }
}

/// The canonical document: an `operators` discriminated union plus the fixed
/// `connections` shape.
pub fn program_schema_json(schema: &ProgramSchema) -> Value {
    let variants: Vec<Value> = schema.operators.iter().map(variant_json).collect();

    let mut connection_props = Map::new();
    let mut connection_required = Vec::new();
    for (name, type_tag, required) in &schema.connections.fields {
        connection_props.insert((*name).to_string(), json!({ "type": type_tag }));
        if *required {
            connection_required.push(Value::String((*name).to_string()));
        }
    }

    json!({
        "type": "object",
        "properties": {
            "operators": {
                "type": "array",
                "items": { "oneOf": variants },
            },
            "connections": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": connection_props,
                    "required": connection_required,
                    "additionalProperties": false,
                },
            },
        },
        "required": ["operators", "connections"],
    })
}

/// One variant as a closed JSON Schema object.
pub fn variant_json(variant: &OperatorVariant) -> Value {
    let mut properties = Map::new();
    for (name, spec) in &variant.properties {
        properties.insert(name.clone(), property_json(spec));
    }

    let mut out = Map::new();
    if let Some(title) = &variant.title {
        out.insert("title".to_string(), Value::String(title.clone()));
    }
    out.insert("type".to_string(), Value::String("object".to_string()));
    out.insert("properties".to_string(), Value::Object(properties));
    out.insert(
        "required".to_string(),
        Value::Array(
            variant
                .required
                .iter()
                .map(|r| Value::String(r.clone()))
                .collect(),
        ),
    );
    out.insert("additionalProperties".to_string(), Value::Bool(false));
    Value::Object(out)
}

pub fn property_json(spec: &PropertySpec) -> Value {
    let mut out = match &spec.kind {
        PropertyKind::Integer => json!({ "type": "integer" }),
        PropertyKind::Number => json!({ "type": "number" }),
        PropertyKind::String => json!({ "type": "string" }),
        PropertyKind::Boolean => json!({ "type": "boolean" }),
        PropertyKind::EnumString(values) => json!({ "enum": values }),
        PropertyKind::Array(item) => json!({ "type": "array", "items": property_json(item) }),
        PropertyKind::Object(fields) => {
            let mut properties = Map::new();
            for (name, field) in fields {
                properties.insert(name.clone(), property_json(field));
            }
            json!({ "type": "object", "properties": properties })
        }
        // The escape hatch renders as the empty schema: accepts anything.
        PropertyKind::Opaque => json!({}),
    };

    let map = out.as_object_mut().expect("property schema is an object");
    if let Some(description) = &spec.description {
        map.insert(
            "description".to_string(),
            Value::String(description.clone()),
        );
    }
    if let Some(default) = &spec.default {
        map.insert("default".to_string(), default.clone());
    }
    if let Some(example) = &spec.example {
        map.insert("examples".to_string(), Value::Array(vec![example.clone()]));
    }
    out
}
