use super::{Artifact, Emitter};
use crate::error::{GenError, Result};
use crate::schema::{OperatorVariant, ProgramSchema, PropertyKind, PropertySpec};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

/// Emits one enriched documentation page per eligible input file: a
/// parameter reference table per variant, and worked usage snippets for
/// single-variant files only (a multi-variant file is ambiguous as to which
/// variant to exemplify).
pub struct DocumentationEmitter;

impl Emitter for DocumentationEmitter {
    fn target(&self) -> &'static str {
        "documentation"
    }

    fn emit(&self, schema: &ProgramSchema) -> Result<Vec<Artifact>> {
        // Group variants per origin file, preserving scan order of files.
        let mut pages: Vec<(PathBuf, Vec<&OperatorVariant>)> = Vec::new();
        for variant in &schema.operators {
            match pages.iter_mut().find(|(origin, _)| *origin == variant.origin) {
                Some((_, group)) => group.push(variant),
                None => pages.push((variant.origin.clone(), vec![variant])),
            }
        }

        let mut artifacts = Vec::with_capacity(pages.len());
        for (origin, group) in pages {
            let stem = page_stem(&origin, &group)?;
            let filename = format!("{stem}.md");
            let contents = render_page(stem, &group);
            artifacts.push(Artifact { filename, contents });
        }
        Ok(artifacts)
    }
}

fn page_stem<'a>(origin: &'a Path, group: &[&OperatorVariant]) -> Result<&'a str> {
    origin
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| GenError::Emission {
            target: "documentation".to_string(),
            reason: format!(
                "source path {} for `{}` has no usable file stem",
                origin.display(),
                group[0].discriminator
            ),
        })
}

fn render_page(stem: &str, group: &[&OperatorVariant]) -> String {
    let mut out = String::new();

    if group.len() == 1 {
        let variant = group[0];
        out.push_str(&format!("# {}\n", variant.discriminator));
        if let Some(title) = &variant.title {
            out.push_str(&format!("\n{title}\n"));
        }
        out.push_str("\n## Parameters\n\n");
        out.push_str(&render_table(variant));
        if !variant.multi_variant_source {
            out.push_str("\n## Usage\n");
            out.push_str(&render_snippets(variant));
        }
        return out;
    }

    // Multi-variant file: the page subject is the file, not any one variant.
    // One table per variant, no usage section.
    out.push_str(&format!("# {stem}\n"));
    for variant in group {
        out.push_str(&format!("\n## {} parameters\n\n", variant.discriminator));
        out.push_str(&render_table(variant));
    }
    out
}

fn render_table(variant: &OperatorVariant) -> String {
    let mut out = String::from("| Name | Type | Description | Default |\n| --- | --- | --- | --- |\n");
    for (name, spec) in &variant.properties {
        let description = spec.description.as_deref().unwrap_or("");
        let default = spec
            .default
            .as_ref()
            .map(|v| format!("`{v}`"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "| `{}` | {} | {} | {} |\n",
            name,
            kind_display(&spec.kind),
            description,
            default
        ));
    }
    out
}

fn kind_display(kind: &PropertyKind) -> String {
    match kind {
        PropertyKind::Integer => "integer".to_string(),
        PropertyKind::Number => "number".to_string(),
        PropertyKind::String => "string".to_string(),
        PropertyKind::Boolean => "boolean".to_string(),
        PropertyKind::EnumString(values) => format!("enum({})", values.join(", ")),
        PropertyKind::Array(item) => format!("array<{}>", kind_display(&item.kind)),
        PropertyKind::Object(_) => "object".to_string(),
        PropertyKind::Opaque => "any".to_string(),
    }
}

/// All snippets render from one shared example-value map so they stay
/// mutually consistent and validate against the canonical document.
fn render_snippets(variant: &OperatorVariant) -> String {
    let examples = example_map(variant);

    let program = json!({
        "operators": [Value::Object(examples.clone())],
        "connections": [],
    });
    let json_block = serde_json::to_string_pretty(&program).unwrap_or_default();

    // Mirror the constructor's parameter order: required positionally in
    // declaration order, then optional as keywords. Interleaving would put a
    // keyword argument before a positional one.
    let mut python_args: Vec<String> = Vec::new();
    for (name, _) in &variant.properties {
        if variant.is_required(name) {
            python_args.push(crate::emitters::parameter_class::value_to_py(
                &examples[name.as_str()],
            ));
        }
    }
    for (name, _) in &variant.properties {
        if !variant.is_required(name) {
            python_args.push(format!(
                "{name}={}",
                crate::emitters::parameter_class::value_to_py(&examples[name.as_str()])
            ));
        }
    }
    let python_block = format!(
        "from operators import {}\n\nop = {}({})",
        variant.discriminator,
        variant.discriminator,
        python_args.join(", ")
    );

    let ts_value = serde_json::to_string_pretty(&Value::Object(examples)).unwrap_or_default();
    let ts_block = format!("const op: {} = {};", variant.discriminator, ts_value);

    format!(
        "\n```json\n{json_block}\n```\n\n```python\n{python_block}\n```\n\n```typescript\n{ts_block}\n```\n"
    )
}

fn example_map(variant: &OperatorVariant) -> Map<String, Value> {
    let mut map = Map::new();
    for (name, spec) in &variant.properties {
        map.insert(name.clone(), example_value(spec));
    }
    map
}

/// The declared example if present, else a fixed kind-appropriate
/// placeholder.
pub fn example_value(spec: &PropertySpec) -> Value {
    if let Some(example) = &spec.example {
        return example.clone();
    }
    match &spec.kind {
        PropertyKind::Integer => json!(2),
        PropertyKind::Number => json!(2.0),
        PropertyKind::String => json!("example"),
        PropertyKind::Boolean => json!(true),
        PropertyKind::EnumString(values) => {
            json!(values.first().cloned().unwrap_or_default())
        }
        PropertyKind::Array(item) => json!([example_value(item)]),
        PropertyKind::Object(fields) => {
            let mut map = Map::new();
            for (name, field) in fields {
                map.insert(name.clone(), example_value(field));
            }
            Value::Object(map)
        }
        PropertyKind::Opaque => json!({}),
    }
}
