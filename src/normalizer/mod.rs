use crate::error::{GenError, Result};
use crate::scanner::{explicit_discriminator, RawFragment};
use crate::schema::{OperatorVariant, PropertyKind, PropertySpec};
use serde_yaml::Value as Yaml;

/// Close a raw fragment into a well-formed `OperatorVariant`.
///
/// Structural problems (fragment not a mapping, `properties` missing) are
/// fatal: the fragment passed the scanner, so every emitter downstream is
/// entitled to assume a fully-typed variant. Individual properties that fall
/// outside the closed kind set are mapped to `Opaque` instead.
pub fn normalize(fragment: &RawFragment) -> Result<OperatorVariant> {
    if fragment.body.as_mapping().is_none() {
        return Err(structural(fragment, ".", "fragment is not a mapping"));
    }

    let Some(props) = fragment
        .body
        .get("properties")
        .and_then(Yaml::as_mapping)
    else {
        return Err(structural(
            fragment,
            "properties",
            "`properties` is missing or not a mapping",
        ));
    };

    let discriminator = match explicit_discriminator(&fragment.body) {
        Some(d) => d,
        None => match &fragment.fallback_discriminator {
            Some(d) => d.clone(),
            None => {
                return Err(structural(
                    fragment,
                    "properties.type",
                    "no discriminator and no filename fallback",
                ));
            }
        },
    };

    let title = fragment
        .body
        .get("title")
        .and_then(Yaml::as_str)
        .map(String::from);

    let mut properties = Vec::with_capacity(props.len() + 1);
    let mut has_discriminator_property = false;
    for (name, node) in props {
        let Some(name) = name.as_str() else {
            return Err(structural(fragment, "properties", "non-string property name"));
        };
        if name == "type" {
            has_discriminator_property = true;
            // Re-constrain to exactly one literal, whatever the source said.
            properties.push((
                name.to_string(),
                PropertySpec::new(PropertyKind::EnumString(vec![discriminator.clone()])),
            ));
            continue;
        }
        properties.push((name.to_string(), classify(node)));
    }

    if !has_discriminator_property {
        properties.insert(
            0,
            (
                "type".to_string(),
                PropertySpec::new(PropertyKind::EnumString(vec![discriminator.clone()])),
            ),
        );
    }

    let mut required: Vec<String> = fragment
        .body
        .get("required")
        .and_then(Yaml::as_sequence)
        .map(|seq| {
            seq.iter()
                .filter_map(Yaml::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    // Invariant: discriminator ∈ required.
    if !required.iter().any(|r| r == "type") {
        required.insert(0, "type".to_string());
    }

    Ok(OperatorVariant {
        discriminator,
        title,
        properties,
        required,
        origin: fragment.origin.clone(),
        multi_variant_source: fragment.multi_variant_source,
    })
}

/// Classify one declared property into a `PropertySpec`.
///
/// Total: never fails. Shapes outside the closed vocabulary collapse to
/// `Opaque` (the explicit escape hatch), never get silently dropped.
pub fn classify(node: &Yaml) -> PropertySpec {
    if node.as_mapping().is_none() {
        return PropertySpec::new(PropertyKind::Opaque);
    }

    let enum_values = node.get("enum").and_then(Yaml::as_sequence).map(|seq| {
        seq.iter()
            .filter_map(Yaml::as_str)
            .map(String::from)
            .collect::<Vec<_>>()
    });

    let kind = match node.get("type").and_then(Yaml::as_str) {
        Some("integer") => PropertyKind::Integer,
        Some("number") => PropertyKind::Number,
        Some("boolean") => PropertyKind::Boolean,
        Some("string") => match &enum_values {
            Some(values) if !values.is_empty() => PropertyKind::EnumString(values.clone()),
            _ => PropertyKind::String,
        },
        Some("array") => match node.get("items") {
            Some(items) => PropertyKind::Array(Box::new(classify(items))),
            None => PropertyKind::Opaque,
        },
        Some("object") => match node.get("properties").and_then(Yaml::as_mapping) {
            Some(fields) => PropertyKind::Object(
                fields
                    .iter()
                    .filter_map(|(name, node)| {
                        name.as_str().map(|n| (n.to_string(), classify(node)))
                    })
                    .collect(),
            ),
            // Free-form object with no declared fields: the escape hatch.
            None => PropertyKind::Opaque,
        },
        // A bare enum of strings is still a closed string set.
        None => match &enum_values {
            Some(values) if !values.is_empty() => PropertyKind::EnumString(values.clone()),
            _ => PropertyKind::Opaque,
        },
        Some(_) => PropertyKind::Opaque,
    };

    let mut spec = PropertySpec::new(kind);
    spec.description = node
        .get("description")
        .and_then(Yaml::as_str)
        .map(String::from);
    spec.default = node.get("default").and_then(yaml_to_json);
    spec.example = node
        .get("examples")
        .and_then(Yaml::as_sequence)
        .and_then(|seq| seq.first())
        .and_then(yaml_to_json);
    spec
}

fn yaml_to_json(value: &Yaml) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}

fn structural(fragment: &RawFragment, field_path: &str, reason: &str) -> GenError {
    GenError::UnsupportedPropertyKind {
        path: fragment.origin.clone(),
        field_path: field_path.to_string(),
        reason: reason.to_string(),
    }
}
