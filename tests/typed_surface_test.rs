use opgen::aggregator::aggregate;
use opgen::emitters::typed_surface::TypedSurfaceEmitter;
use opgen::emitters::Emitter;
use opgen::error::GenError;
use opgen::normalizer::normalize;
use opgen::scanner::RawFragment;
use opgen::schema::OperatorVariant;
use std::path::PathBuf;

fn variant_from(yaml: &str, fallback: &str) -> OperatorVariant {
    let fragment = RawFragment {
        origin: PathBuf::from(format!("docs/{fallback}.md")),
        body: serde_yaml::from_str(yaml).expect("fragment yaml"),
        fallback_discriminator: Some(fallback.to_string()),
        multi_variant_source: false,
    };
    normalize(&fragment).expect("normalize failed")
}

fn emit(variants: Vec<OperatorVariant>) -> String {
    let schema = aggregate(variants).expect("aggregate failed");
    let artifacts = TypedSurfaceEmitter.emit(&schema).expect("emit failed");
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].filename, "index.ts");
    artifacts[0].contents.clone()
}

#[test]
fn test_required_and_optional_fields() {
    // Scenario: required integer n, optional integer m with default 0.
    let out = emit(vec![variant_from(
        r#"
properties:
  n:
    type: integer
  m:
    type: integer
    default: 0
required: [n]
"#,
        "MovingAverage",
    )]);

    assert!(out.contains("export interface MovingAverage {"));
    assert!(out.contains("  readonly type: \"MovingAverage\";"));
    assert!(out.contains("  readonly n: number;"));
    assert!(out.contains("  readonly m?: number;"));

    // The validator is generated from the same walk, not from the text.
    assert!(out.contains("export const movingAverageSchema = z"));
    assert!(out.contains("    type: z.literal(\"MovingAverage\"),"));
    assert!(out.contains("    n: z.number(),"));
    assert!(out.contains("    m: z.number().default(0),"));
    assert!(out.contains(".strict()"));
}

#[test]
fn test_kind_mapping_totality() {
    let out = emit(vec![variant_from(
        r#"
properties:
  count:
    type: integer
  scale:
    type: number
  label:
    type: string
  mode:
    type: string
    enum: [fast, slow]
  enabled:
    type: boolean
  coeff:
    type: array
    items:
      type: number
  window:
    type: object
    properties:
      size:
        type: integer
  extra:
    type: object
required: [count, scale, label, mode, enabled, coeff, window, extra]
"#,
        "Everything",
    )]);

    // Every supported kind yields a non-empty, well-formed field.
    assert!(out.contains("  readonly count: number;"));
    assert!(out.contains("  readonly scale: number;"));
    assert!(out.contains("  readonly label: string;"));
    assert!(out.contains("  readonly mode: \"fast\" | \"slow\";"));
    assert!(out.contains("  readonly enabled: boolean;"));
    assert!(out.contains("  readonly coeff: number[];"));
    assert!(out.contains("  readonly window: { readonly size: number };"));
    // Opaque is the explicit escape hatch, never silently dropped.
    assert!(out.contains("  readonly extra: unknown;"));

    assert!(out.contains("    mode: z.enum([\"fast\", \"slow\"]),"));
    assert!(out.contains("    coeff: z.array(z.number()),"));
    assert!(out.contains("    window: z.object({ size: z.number() }),"));
    assert!(out.contains("    extra: z.unknown(),"));
}

#[test]
fn test_port_type_array_reuses_named_type() {
    let out = emit(vec![
        variant_from(
            r#"
properties:
  portTypes:
    type: array
    items:
      enum: [number, boolean, error]
required: [portTypes]
"#,
            "Input",
        ),
        variant_from(
            r#"
properties:
  portTypes:
    type: array
    items:
      enum: [number]
required: [portTypes]
"#,
            "Output",
        ),
    ]);

    // Declared once, referenced per variant.
    assert_eq!(out.matches("export type PortType =").count(), 1);
    assert!(out.contains("export type PortType = \"number\" | \"boolean\" | \"error\";"));
    assert_eq!(out.matches("readonly portTypes: PortType[];").count(), 2);
    assert_eq!(out.matches("portTypes: z.array(portTypeSchema),").count(), 2);
}

#[test]
fn test_boolean_default_respelled_natively() {
    let out = emit(vec![variant_from(
        r#"
properties:
  emitOnChange:
    type: boolean
    default: true
required: []
"#,
        "Filter",
    )]);
    assert!(out.contains("    emitOnChange: z.boolean().default(true),"));
}

#[test]
fn test_union_alias_over_all_variants() {
    let out = emit(vec![
        variant_from("properties:\n  n:\n    type: integer\nrequired: [n]", "Input"),
        variant_from("properties:\n  n:\n    type: integer\nrequired: [n]", "Output"),
    ]);
    assert!(out.contains("export type Operator =\n  | Input\n  | Output;"));
    assert!(out.contains("export const operatorSchema = z.union([inputSchema, outputSchema]);"));
    assert!(out.contains("export interface Program {"));
    assert!(out.contains("export const programSchema = z"));
}

#[test]
fn test_single_variant_union_collapses() {
    let out = emit(vec![variant_from(
        "properties:\n  n:\n    type: integer\nrequired: [n]",
        "Input",
    )]);
    assert!(out.contains("export type Operator = Input;"));
    assert!(out.contains("export const operatorSchema = inputSchema;"));
}

#[test]
fn test_empty_union_is_never() {
    let out = emit(Vec::new());
    assert!(out.contains("export type Operator = never;"));
    assert!(out.contains("export const operatorSchema = z.never();"));
}

#[test]
fn test_invalid_identifier_discriminator_is_emission_error() {
    let variant = variant_from(
        "properties:\n  n:\n    type: integer\nrequired: [n]",
        "Not-An-Identifier",
    );
    let schema = aggregate(vec![variant]).expect("aggregate failed");
    let err = TypedSurfaceEmitter.emit(&schema).unwrap_err();
    assert!(matches!(err, GenError::Emission { .. }));
}
