use opgen::aggregator::aggregate;
use opgen::error::GenError;
use opgen::normalizer::normalize;
use opgen::scanner::RawFragment;
use opgen::schema::OperatorVariant;
use std::path::PathBuf;

fn variant(discriminator: &str, origin: &str) -> OperatorVariant {
    let fragment = RawFragment {
        origin: PathBuf::from(origin),
        body: serde_yaml::from_str(
            "properties:\n  id:\n    type: string\nrequired: [id]",
        )
        .expect("fragment yaml"),
        fallback_discriminator: Some(discriminator.to_string()),
        multi_variant_source: false,
    };
    normalize(&fragment).expect("normalize failed")
}

#[test]
fn test_aggregate_preserves_scan_order() {
    let schema = aggregate(vec![
        variant("Input", "docs/Input.md"),
        variant("MovingAverage", "docs/MovingAverage.md"),
        variant("Output", "docs/Output.md"),
    ])
    .expect("aggregate failed");

    let order: Vec<_> = schema
        .operators
        .iter()
        .map(|v| v.discriminator.as_str())
        .collect();
    assert_eq!(order, vec!["Input", "MovingAverage", "Output"]);
}

#[test]
fn test_duplicate_discriminator_names_both_files() {
    let err = aggregate(vec![
        variant("Input", "docs/Input.md"),
        variant("Input", "docs/other/Input.md"),
    ])
    .unwrap_err();

    match err {
        GenError::DuplicateDiscriminator {
            discriminator,
            first,
            second,
        } => {
            assert_eq!(discriminator, "Input");
            assert_eq!(first, PathBuf::from("docs/Input.md"));
            assert_eq!(second, PathBuf::from("docs/other/Input.md"));
        }
        other => panic!("expected DuplicateDiscriminator, got {other:?}"),
    }
}

#[test]
fn test_zero_variant_union_is_valid() {
    let schema = aggregate(Vec::new()).expect("aggregate failed");
    assert!(schema.operators.is_empty());
    // The fixed connection shape is appended regardless.
    assert_eq!(schema.connections.fields.len(), 4);
}

#[test]
fn test_connection_spec_is_fixed() {
    let schema = aggregate(vec![variant("Input", "docs/Input.md")]).expect("aggregate failed");
    let required: Vec<_> = schema
        .connections
        .fields
        .iter()
        .filter(|(_, _, required)| *required)
        .map(|(name, _, _)| *name)
        .collect();
    assert_eq!(required, vec!["from", "to"]);
    let optional: Vec<_> = schema
        .connections
        .fields
        .iter()
        .filter(|(_, _, required)| !*required)
        .map(|(name, _, _)| *name)
        .collect();
    assert_eq!(optional, vec!["fromPort", "toPort"]);
}

#[test]
fn test_required_set_invariant_holds_for_all_variants() {
    let schema = aggregate(vec![
        variant("Input", "docs/Input.md"),
        variant("Output", "docs/Output.md"),
    ])
    .expect("aggregate failed");

    for operator in &schema.operators {
        assert!(
            operator.required.iter().any(|r| r == "type"),
            "discriminator missing from required of {}",
            operator.discriminator
        );
    }
}
