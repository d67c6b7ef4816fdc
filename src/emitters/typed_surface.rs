use super::{check_identifier, Artifact, Emitter};
use crate::error::Result;
use crate::schema::{
    is_port_type_vocabulary, OperatorVariant, ProgramSchema, PropertyKind, PropertySpec,
    PORT_TYPES,
};
use serde_json::Value;

pub const TYPED_SURFACE_FILENAME: &str = "index.ts";

/// Emits the TypeScript surface: one interface per variant plus, from the
/// same IR walk, a zod validator isomorphic to it. The validators are never
/// derived by post-processing the interface text.
pub struct TypedSurfaceEmitter;

impl Emitter for TypedSurfaceEmitter {
    fn target(&self) -> &'static str {
        "typed-surface"
    }

    fn emit(&self, schema: &ProgramSchema) -> Result<Vec<Artifact>> {
        let mut out = String::new();
        out.push_str("// Generated by opgen. Do not edit by hand.\n");
        out.push_str("import { z } from \"zod\";\n");

        if uses_port_vocabulary(&schema.operators) {
            out.push_str("\nexport type PortType = ");
            out.push_str(&string_union(PORT_TYPES));
            out.push_str(";\n\nexport const portTypeSchema = z.enum([");
            out.push_str(&quoted_list(PORT_TYPES));
            out.push_str("]);\n");
        }

        for variant in &schema.operators {
            check_identifier(self.target(), &variant.discriminator)?;
            out.push('\n');
            out.push_str(&render_variant(variant));
        }

        out.push('\n');
        out.push_str(&render_union(&schema.operators));
        out.push('\n');
        out.push_str(&render_program(schema));

        Ok(vec![Artifact {
            filename: TYPED_SURFACE_FILENAME.to_string(),
            contents: out,
        }])
    }
}

/// Both projections of one property shape, produced in lockstep.
struct Projection {
    ts: String,
    zod: String,
}

fn project(spec: &PropertySpec) -> Projection {
    match &spec.kind {
        PropertyKind::Integer | PropertyKind::Number => Projection {
            ts: "number".to_string(),
            zod: "z.number()".to_string(),
        },
        PropertyKind::String => Projection {
            ts: "string".to_string(),
            zod: "z.string()".to_string(),
        },
        PropertyKind::Boolean => Projection {
            ts: "boolean".to_string(),
            zod: "z.boolean()".to_string(),
        },
        PropertyKind::EnumString(values) if values.len() == 1 => Projection {
            ts: format!("\"{}\"", values[0]),
            zod: format!("z.literal(\"{}\")", values[0]),
        },
        PropertyKind::EnumString(values) => Projection {
            ts: string_union(&values.iter().map(String::as_str).collect::<Vec<_>>()),
            zod: format!(
                "z.enum([{}])",
                quoted_list(&values.iter().map(String::as_str).collect::<Vec<_>>())
            ),
        },
        PropertyKind::Array(item) => {
            // Port-type arrays share one named type instead of re-declaring
            // the union per variant.
            if let PropertyKind::EnumString(values) = &item.kind {
                if is_port_type_vocabulary(values) {
                    return Projection {
                        ts: "PortType[]".to_string(),
                        zod: "z.array(portTypeSchema)".to_string(),
                    };
                }
            }
            let inner = project(item);
            let ts = if inner.ts.contains(" | ") {
                format!("({})[]", inner.ts)
            } else {
                format!("{}[]", inner.ts)
            };
            Projection {
                ts,
                zod: format!("z.array({})", inner.zod),
            }
        }
        PropertyKind::Object(fields) => {
            let mut ts_fields = Vec::with_capacity(fields.len());
            let mut zod_fields = Vec::with_capacity(fields.len());
            for (name, field) in fields {
                let inner = project(field);
                ts_fields.push(format!("readonly {}: {}", name, inner.ts));
                zod_fields.push(format!("{}: {}", name, inner.zod));
            }
            Projection {
                ts: format!("{{ {} }}", ts_fields.join("; ")),
                zod: format!("z.object({{ {} }})", zod_fields.join(", ")),
            }
        }
        // Explicit untyped escape hatch, never inferred ad hoc.
        PropertyKind::Opaque => Projection {
            ts: "unknown".to_string(),
            zod: "z.unknown()".to_string(),
        },
    }
}

fn render_variant(variant: &OperatorVariant) -> String {
    let mut iface = format!("export interface {} {{\n", variant.discriminator);
    let mut validator = format!(
        "export const {}Schema = z\n  .object({{\n",
        lower_camel(&variant.discriminator)
    );

    for (name, spec) in &variant.properties {
        let required = variant.is_required(name);
        let inner = project(spec);

        let marker = if required { "" } else { "?" };
        iface.push_str(&format!("  readonly {}{}: {};\n", name, marker, inner.ts));

        let mut zod = inner.zod;
        if !required {
            // Non-required fields default per the schema's declared default.
            match &spec.default {
                Some(value) => zod.push_str(&format!(".default({})", value_to_ts(value))),
                None => zod.push_str(".optional()"),
            }
        }
        validator.push_str(&format!("    {}: {},\n", name, zod));
    }

    iface.push_str("}\n");
    validator.push_str("  })\n  .strict();\n");

    format!("{}\n{}", iface, validator)
}

fn render_union(variants: &[OperatorVariant]) -> String {
    if variants.is_empty() {
        return "export type Operator = never;\n\nexport const operatorSchema = z.never();\n"
            .to_string();
    }
    if variants.len() == 1 {
        let name = &variants[0].discriminator;
        return format!(
            "export type Operator = {};\n\nexport const operatorSchema = {}Schema;\n",
            name,
            lower_camel(name)
        );
    }

    let mut out = String::from("export type Operator =");
    for variant in variants {
        out.push_str(&format!("\n  | {}", variant.discriminator));
    }
    out.push_str(";\n\nexport const operatorSchema = z.union([");
    out.push_str(
        &variants
            .iter()
            .map(|v| format!("{}Schema", lower_camel(&v.discriminator)))
            .collect::<Vec<_>>()
            .join(", "),
    );
    out.push_str("]);\n");
    out
}

fn render_program(schema: &ProgramSchema) -> String {
    let mut iface = String::from("export interface Connection {\n");
    let mut validator = String::from("export const connectionSchema = z\n  .object({\n");
    for (name, type_tag, required) in &schema.connections.fields {
        let ts = match *type_tag {
            "string" => "string",
            other => other,
        };
        let marker = if *required { "" } else { "?" };
        iface.push_str(&format!("  readonly {}{}: {};\n", name, marker, ts));
        let suffix = if *required { "" } else { ".optional()" };
        validator.push_str(&format!("    {}: z.{}(){},\n", name, ts, suffix));
    }
    iface.push_str("}\n");
    validator.push_str("  })\n  .strict();\n");

    let program = "export interface Program {\n  readonly operators: Operator[];\n  \
                   readonly connections: Connection[];\n}\n\n\
                   export const programSchema = z\n  .object({\n    \
                   operators: z.array(operatorSchema),\n    \
                   connections: z.array(connectionSchema),\n  })\n  .strict();\n";

    format!("{}\n{}\n{}", iface, validator, program)
}

fn uses_port_vocabulary(variants: &[OperatorVariant]) -> bool {
    fn check(spec: &PropertySpec) -> bool {
        match &spec.kind {
            PropertyKind::Array(item) => {
                if let PropertyKind::EnumString(values) = &item.kind {
                    if is_port_type_vocabulary(values) {
                        return true;
                    }
                }
                check(item)
            }
            PropertyKind::Object(fields) => fields.iter().any(|(_, f)| check(f)),
            _ => false,
        }
    }
    variants
        .iter()
        .any(|v| v.properties.iter().any(|(_, spec)| check(spec)))
}

fn string_union(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn quoted_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn lower_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// JSON default values are valid TypeScript literals as-is.
fn value_to_ts(value: &Value) -> String {
    value.to_string()
}
