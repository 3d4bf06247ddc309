use super::*;
use crate::catalog::{FieldCatalog, FieldDescriptor, StringFunction, defaults::note_catalog};
use filter_syntax::{ParserLimits, ast::operator::ComparisonOperator, parse_expression};
use model::core::{
    data_type::{NumericWidth, SemanticType},
    entity::EntityKind,
};

fn check<'c>(
    catalog: &'c FieldCatalog,
    input: &str,
) -> Result<BoundExpr<'c, TypedValue<'c>>, SemanticError> {
    let expr = parse_expression(input, &ParserLimits::default()).unwrap();
    typecheck(bind(&expr, catalog)?)
}

fn check_err(catalog: &FieldCatalog, input: &str) -> SemanticError {
    match check(catalog, input) {
        Err(err) => err,
        Ok(bound) => panic!("Expected {input:?} to fail, got {bound:?}"),
    }
}

fn assert_mismatch(catalog: &FieldCatalog, input: &str) {
    let err = check_err(catalog, input);
    assert!(
        matches!(err, SemanticError::TypeMismatch { .. }),
        "{input}: {err:?}"
    );
}

#[test]
fn test_binds_simple_comparison() {
    let catalog = note_catalog().unwrap();
    let bound = check(&catalog, r#"tag == "math""#).unwrap();

    match bound {
        BoundExpr::Compare {
            field,
            operator,
            value,
            ..
        } => {
            assert_eq!(field.name, "tag");
            assert_eq!(operator, ComparisonOperator::Equal);
            assert_eq!(value, TypedValue::String("math".into()));
        }
        other => panic!("Expected comparison, got {other:?}"),
    }
}

#[test]
fn test_literal_on_left_is_flipped() {
    let catalog = note_catalog().unwrap();
    let bound = check(&catalog, "3 < difficulty").unwrap();

    match bound {
        BoundExpr::Compare {
            field,
            operator,
            value,
            ..
        } => {
            assert_eq!(field.name, "difficulty");
            assert_eq!(operator, ComparisonOperator::GreaterThan);
            assert_eq!(value, TypedValue::Int32(3));
        }
        other => panic!("Expected comparison, got {other:?}"),
    }
}

#[test]
fn test_bare_boolean_field_is_sugar() {
    let catalog = note_catalog().unwrap();

    let bare = check(&catalog, "!archived").unwrap();
    let explicit = check(&catalog, "!(archived == true)").unwrap();

    match (&bare, &explicit) {
        (BoundExpr::Not(a), BoundExpr::Not(b)) => match (a.as_ref(), b.as_ref()) {
            (
                BoundExpr::Compare {
                    field: fa,
                    operator: oa,
                    value: va,
                    ..
                },
                BoundExpr::Compare {
                    field: fb,
                    operator: ob,
                    value: vb,
                    ..
                },
            ) => {
                assert_eq!(fa.name, fb.name);
                assert_eq!(oa, ob);
                assert_eq!(va, vb);
            }
            other => panic!("Unexpected shapes {other:?}"),
        },
        other => panic!("Unexpected shapes {other:?}"),
    }
}

#[test]
fn test_referenced_fields() {
    let catalog = note_catalog().unwrap();
    let bound = check(
        &catalog,
        r#"(tag == "a" || tag == "b") && !archived && contains(content, "x")"#,
    )
    .unwrap();

    let fields: Vec<String> = bound.referenced_fields().into_iter().collect();
    assert_eq!(fields, vec!["archived", "content", "tag"]);
}

#[test]
fn test_unknown_field() {
    let catalog = note_catalog().unwrap();

    let err = check_err(&catalog, r#"unknown_field == "x""#);
    assert_eq!(
        err,
        SemanticError::UnknownField {
            name: "unknown_field".into(),
            span: err.span(),
        }
    );
    assert_eq!(err.span().start, 0);
}

#[test]
fn test_unknown_field_wins_over_shape_errors() {
    let catalog = note_catalog().unwrap();

    for input in [
        "(secret == 1) == true",
        "nope",
        r#"contains(password, "x")"#,
        "pinned == owner.password",
        r#"frobnicate(hidden, "x")"#,
    ] {
        let err = check_err(&catalog, input);
        assert!(
            matches!(err, SemanticError::UnknownField { .. }),
            "{input}: {err:?}"
        );
    }
}

#[test]
fn test_dotted_field_resolves_whole_path() {
    let catalog = note_catalog().unwrap();

    assert!(check(&catalog, "property.has_link").is_ok());
    assert!(matches!(
        check_err(&catalog, "property.missing == true"),
        SemanticError::UnknownField { ref name, .. } if name == "property.missing"
    ));
}

#[test]
fn test_unsupported_functions() {
    let catalog = note_catalog().unwrap();

    match check_err(&catalog, r#"matches(content, "x")"#) {
        SemanticError::UnsupportedFunction { name, field, .. } => {
            assert_eq!(name, "matches");
            assert_eq!(field, None);
        }
        other => panic!("Expected UnsupportedFunction, got {other:?}"),
    }

    match check_err(&catalog, r#"contains(tag, "x")"#) {
        SemanticError::UnsupportedFunction { field, .. } => {
            assert_eq!(field.as_deref(), Some("tag"))
        }
        other => panic!("Expected UnsupportedFunction, got {other:?}"),
    }
}

#[test]
fn test_function_shape_errors() {
    let catalog = note_catalog().unwrap();

    assert_mismatch(&catalog, r#"contains("x", content)"#);
    assert_mismatch(&catalog, "contains(content)");
    assert_mismatch(&catalog, r#"contains(content, "a", "b")"#);
    assert_mismatch(&catalog, "contains(content, 42)");
}

#[test]
fn test_ordering_requires_ordered_type() {
    let catalog = note_catalog().unwrap();

    assert!(check(&catalog, "difficulty >= 3").is_ok());
    assert!(check(&catalog, "created_ts < 1700000000").is_ok());
    assert_mismatch(&catalog, r#"content > "a""#);
    assert_mismatch(&catalog, "pinned < true");
    assert_mismatch(&catalog, r#"visibility >= "PUBLIC""#);
}

#[test]
fn test_string_against_number_is_mismatch() {
    let catalog = note_catalog().unwrap();

    let err = check_err(&catalog, r#"difficulty > "hard""#);
    match err {
        SemanticError::TypeMismatch { message, span } => {
            assert!(message.contains("difficulty"), "{message}");
            assert_eq!(span.start, 13);
        }
        other => panic!("Expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn test_boolean_fields_only_accept_booleans() {
    let catalog = note_catalog().unwrap();

    assert!(check(&catalog, "pinned != false").is_ok());
    assert_mismatch(&catalog, "pinned == 1");
    assert_mismatch(&catalog, r#"pinned == "true""#);
}

#[test]
fn test_enum_literals_must_match_a_variant() {
    let catalog = note_catalog().unwrap();

    match check(&catalog, r#"visibility == "PRIVATE""#).unwrap() {
        BoundExpr::Compare {
            value: TypedValue::Enum(variant),
            ..
        } => assert_eq!(variant.literal, "PRIVATE"),
        other => panic!("Expected enum comparison, got {other:?}"),
    }

    assert_mismatch(&catalog, r#"visibility == "private""#);
    assert_mismatch(&catalog, r#"visibility == "SECRET""#);
    assert_mismatch(&catalog, "visibility == 1");
}

#[test]
fn test_numeric_coercion() {
    let catalog = FieldCatalog::builder(EntityKind::Note, "memo")
        .field(FieldDescriptor::column(
            "small",
            SemanticType::Number(NumericWidth::Int32),
            "small",
        ))
        .field(FieldDescriptor::column(
            "big",
            SemanticType::Number(NumericWidth::Int64),
            "big",
        ))
        .field(FieldDescriptor::column(
            "ratio",
            SemanticType::Number(NumericWidth::Float64),
            "ratio",
        ))
        .build()
        .unwrap();

    let value_of = |input: &str| match check(&catalog, input).unwrap() {
        BoundExpr::Compare { value, .. } => value,
        other => panic!("Expected comparison, got {other:?}"),
    };

    assert_eq!(value_of("small == 7"), TypedValue::Int32(7));
    assert_eq!(
        value_of("big == 5000000000"),
        TypedValue::Int64(5_000_000_000)
    );
    assert_eq!(value_of("ratio > 2"), TypedValue::Float(2.0));
    assert_eq!(value_of("ratio > 0.5"), TypedValue::Float(0.5));

    assert_mismatch(&catalog, "small == 5000000000");
    assert_mismatch(&catalog, "small == 1.5");
    assert_mismatch(&catalog, "big == 1.5");
    assert_mismatch(&catalog, r#"big == "5""#);
}

#[test]
fn test_timestamp_literals() {
    let catalog = note_catalog().unwrap();

    let value_of = |input: &str| match check(&catalog, input).unwrap() {
        BoundExpr::Compare { value, .. } => value,
        other => panic!("Expected comparison, got {other:?}"),
    };

    assert_eq!(
        value_of("created_ts >= 1700000000"),
        TypedValue::Timestamp(1_700_000_000)
    );
    assert_eq!(
        value_of(r#"created_ts >= "2024-01-01T00:00:00Z""#),
        TypedValue::Timestamp(1_704_067_200)
    );
    assert_eq!(
        value_of(r#"updated_ts < "2024-01-01T02:00:00+02:00""#),
        TypedValue::Timestamp(1_704_067_200)
    );

    assert_mismatch(&catalog, r#"created_ts > "yesterday""#);
    assert_mismatch(&catalog, "created_ts > 1.5");
}

#[test]
fn test_invalid_shapes() {
    let catalog = note_catalog().unwrap();

    assert_mismatch(&catalog, "content == creator_id");
    assert_mismatch(&catalog, "1 == 1");
    assert_mismatch(&catalog, "true");
    assert_mismatch(&catalog, "content");
    assert_mismatch(&catalog, "(pinned == true) == true");
}

#[test]
fn test_match_binds_function() {
    let catalog = note_catalog().unwrap();

    match check(&catalog, r##"startsWith(content, "# ")"##).unwrap() {
        BoundExpr::Match {
            field,
            function,
            value,
            ..
        } => {
            assert_eq!(field.name, "content");
            assert_eq!(function, StringFunction::StartsWith);
            assert_eq!(value, TypedValue::String("# ".into()));
        }
        other => panic!("Expected match, got {other:?}"),
    }
}
