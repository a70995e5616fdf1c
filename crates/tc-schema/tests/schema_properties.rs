//! Property-based tests for schema instantiation, validation and merging.
//!
//! Uses proptest to check the contracts that must hold for any schema:
//! defaults only ever produce missing-value violations, range checks are
//! exact, merging is idempotent and atomic, and the plain form round-trips.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use tc_schema::{
    from_plain, instantiate, merge, to_plain, validate, FieldDefault, FieldKind, FieldSpec,
    MergeError, SchemaBuilder, SchemaRecord, ViolationKind,
};

/// Generated description of one flat field.
#[derive(Debug, Clone)]
struct GenField {
    kind: u8,
    default: u8,
    lo: i64,
    span: i64,
}

fn gen_field() -> impl Strategy<Value = GenField> {
    (0u8..4, 0u8..3, -1000i64..1000, 0i64..500).prop_map(|(kind, default, lo, span)| GenField {
        kind,
        default,
        lo,
        span,
    })
}

/// Build a schema from generated fields. Defaults always satisfy their own
/// constraints, as the builder requires.
fn build_flat(fields: &[GenField]) -> Arc<SchemaRecord> {
    let mut builder = SchemaBuilder::new("Generated");
    for (i, f) in fields.iter().enumerate() {
        let name = format!("f{}", i);
        let spec = match f.kind {
            0 => {
                let default = match f.default {
                    0 => FieldDefault::Missing,
                    1 => FieldDefault::None,
                    _ => FieldDefault::value(f.lo + f.span / 2),
                };
                FieldSpec::new(name, FieldKind::Int, default).range(f.lo as f64, (f.lo + f.span) as f64)
            }
            1 => {
                let default = match f.default {
                    0 => FieldDefault::Missing,
                    1 => FieldDefault::None,
                    _ => FieldDefault::value(f.lo as f64 + 0.5),
                };
                FieldSpec::new(name, FieldKind::Float, default).at_least(f.lo as f64)
            }
            2 => match f.default {
                0 => FieldSpec::new(name, FieldKind::String, FieldDefault::Missing).required(),
                1 => FieldSpec::new(name, FieldKind::String, FieldDefault::None),
                _ => FieldSpec::new(name, FieldKind::String, FieldDefault::value("set")).required(),
            },
            _ => {
                let default = match f.default {
                    0 => FieldDefault::Missing,
                    1 => FieldDefault::None,
                    _ => FieldDefault::value(f.span % 2 == 0),
                };
                FieldSpec::new(name, FieldKind::Bool, default)
            }
        };
        builder = builder.field(spec);
    }
    builder.build().expect("generated schema is valid")
}

fn nested_schema() -> Arc<SchemaRecord> {
    let audio = SchemaBuilder::new("Audio")
        .field(FieldSpec::new("sample_rate", FieldKind::Int, FieldDefault::value(22050)).range(512, 100000))
        .field(FieldSpec::new("stats_path", FieldKind::String, FieldDefault::None))
        .field(FieldSpec::new("mel_fmax", FieldKind::Float, FieldDefault::None).at_least(500.0))
        .build()
        .expect("audio schema");
    let dataset = SchemaBuilder::new("Dataset")
        .field(FieldSpec::new("name", FieldKind::String, FieldDefault::Missing).required())
        .field(FieldSpec::new("path", FieldKind::String, FieldDefault::value("data/")))
        .build()
        .expect("dataset schema");
    SchemaBuilder::new("Root")
        .field(FieldSpec::new("epochs", FieldKind::Int, FieldDefault::value(10)).at_least(1))
        .field(FieldSpec::new("run_name", FieldKind::String, FieldDefault::value("run")))
        .field(FieldSpec::new("audio", FieldKind::record(&audio), FieldDefault::record(&audio)))
        .field(FieldSpec::new(
            "datasets",
            FieldKind::sequence(&dataset),
            FieldDefault::sequence_of(&dataset, 1),
        ))
        .build()
        .expect("root schema")
}

fn gen_scalar() -> impl Strategy<Value = JsonValue> {
    prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::from),
        (-200_000i64..200_000).prop_map(JsonValue::from),
        (-1.0e6f64..1.0e6).prop_map(JsonValue::from),
        Just(json!("nan")),
        Just(json!("inf")),
        Just(json!("-inf")),
        "[a-z]{0,6}".prop_map(JsonValue::from),
    ]
}

/// Override trees that only use fields the nested schema declares.
fn gen_overrides() -> impl Strategy<Value = JsonValue> {
    (
        proptest::option::of(gen_scalar()),
        proptest::option::of(gen_scalar()),
        proptest::option::of((
            proptest::option::of(gen_scalar()),
            proptest::option::of(gen_scalar()),
        )),
        proptest::option::of(proptest::collection::vec(proptest::option::of(gen_scalar()), 0..3)),
    )
        .prop_map(|(epochs, run_name, audio_fields, datasets)| {
            let mut root = JsonMap::new();
            if let Some(v) = epochs {
                root.insert("epochs".to_string(), v);
            }
            if let Some(v) = run_name {
                root.insert("run_name".to_string(), v);
            }
            if let Some((sample_rate, mel_fmax)) = audio_fields {
                let mut audio = JsonMap::new();
                if let Some(v) = sample_rate {
                    audio.insert("sample_rate".to_string(), v);
                }
                if let Some(v) = mel_fmax {
                    audio.insert("mel_fmax".to_string(), v);
                }
                root.insert("audio".to_string(), JsonValue::Object(audio));
            }
            if let Some(items) = datasets {
                let items = items
                    .into_iter()
                    .map(|name| match name {
                        Some(v) => json!({ "name": v }),
                        None => json!({}),
                    })
                    .collect();
                root.insert("datasets".to_string(), JsonValue::Array(items));
            }
            JsonValue::Object(root)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Pure defaults only ever violate fields that had no default.
    #[test]
    fn defaults_only_report_missing_fields(fields in proptest::collection::vec(gen_field(), 0..12)) {
        let schema = build_flat(&fields);
        let violations = validate(&instantiate(&schema), &schema);

        let expected: Vec<String> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.default == 0)
            .map(|(i, _)| format!("f{}", i))
            .collect();
        let reported: Vec<String> = violations.iter().map(|v| v.path.to_string()).collect();

        prop_assert_eq!(reported, expected);
        prop_assert!(violations.iter().all(|v| v.kind == ViolationKind::MissingRequired));
    }

    /// In-range values never produce OutOfRange; out-of-range values produce exactly one.
    #[test]
    fn range_checks_are_exact(min in -500i64..500, span in 0i64..500, v in -2000i64..2000) {
        let max = min + span;
        let schema = SchemaBuilder::new("Ranged")
            .field(FieldSpec::new("n", FieldKind::Int, FieldDefault::value(min)).range(min as f64, max as f64))
            .build()
            .expect("schema");
        let instance = merge(&instantiate(&schema), &json!({ "n": v })).expect("merge");
        let out_of_range: Vec<_> = validate(&instance, &schema)
            .into_iter()
            .filter(|violation| violation.kind == ViolationKind::OutOfRange)
            .collect();

        if v >= min && v <= max {
            prop_assert!(out_of_range.is_empty());
        } else {
            prop_assert_eq!(out_of_range.len(), 1);
            prop_assert_eq!(out_of_range[0].path.to_string(), "n");
        }
    }

    /// merge(merge(i, o), o) == merge(i, o)
    #[test]
    fn merge_is_idempotent(overrides in gen_overrides()) {
        let schema = nested_schema();
        let base = instantiate(&schema);
        let once = merge(&base, &overrides).expect("known fields merge");
        let twice = merge(&once, &overrides).expect("known fields merge");
        prop_assert_eq!(once, twice);
    }

    /// An unknown key anywhere rejects the merge and leaves the instance untouched.
    #[test]
    fn unknown_key_rejects_merge(overrides in gen_overrides(), key in "[a-z]{3,8}_typo") {
        let schema = nested_schema();
        let mut instance = merge(&instantiate(&schema), &overrides).expect("known fields merge");
        let before = instance.clone();

        let mut poisoned = overrides.clone();
        if let JsonValue::Object(map) = &mut poisoned {
            map.insert(key.clone(), json!(1));
        }
        let err = instance.merge_in_place(&poisoned).expect_err("unknown key must fail");
        prop_assert!(matches!(err, MergeError::UnknownField { .. }), "unexpected error: {:?}", err);
        prop_assert_eq!(instance, before);
    }

    /// Plain round-trip validates identically.
    #[test]
    fn plain_round_trip_validates_identically(overrides in gen_overrides()) {
        let schema = nested_schema();
        let instance = merge(&instantiate(&schema), &overrides).expect("known fields merge");
        let restored = from_plain(&schema, &to_plain(&instance)).expect("round trip");

        let summarize = |violations: Vec<tc_schema::Violation>| -> Vec<(String, ViolationKind)> {
            violations.into_iter().map(|v| (v.path.to_string(), v.kind)).collect()
        };
        prop_assert_eq!(
            summarize(validate(&restored, &schema)),
            summarize(validate(&instance, &schema))
        );
        prop_assert_eq!(to_plain(&restored), to_plain(&instance));
        prop_assert_eq!(restored, instance);
    }
}

#[test]
fn non_finite_floats_survive_merge_and_round_trip() {
    let schema = nested_schema();
    let overrides = json!({ "audio": { "mel_fmax": "nan" }, "run_name": 7 });
    let once = merge(&instantiate(&schema), &overrides).expect("merge");
    let twice = merge(&once, &overrides).expect("merge");
    assert_eq!(once, twice);

    let plain = to_plain(&once);
    assert_eq!(plain["audio"]["mel_fmax"], "nan");
    assert_eq!(plain["run_name"], "7");
    assert_eq!(from_plain(&schema, &plain).expect("round trip"), once);
}

#[test]
fn sequence_default_and_wholesale_replacement() {
    let schema = nested_schema();
    let instance = instantiate(&schema);
    let len = |i: &tc_schema::ConfigInstance| i.get("datasets").and_then(|v| v.as_list()).map(|l| l.len());
    assert_eq!(len(&instance), Some(1));

    let overrides = json!({ "datasets": [] });
    let emptied = merge(&instance, &overrides).expect("merge");
    assert_eq!(len(&emptied), Some(0));
    let replayed = merge(&emptied, &overrides).expect("merge");
    assert_eq!(len(&replayed), Some(0));
}
