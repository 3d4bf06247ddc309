use super::*;
use crate::{
    bind::{bind, typecheck},
    catalog::{
        FieldCatalog,
        defaults::{class_catalog, note_catalog},
    },
};
use filter_syntax::{ParserLimits, parse_expression};
use model::core::{data_type::EnumType, entity::EntityKind};

fn render_with(
    catalog: &FieldCatalog,
    input: &str,
    dialect: SqlDialect,
    offset: usize,
) -> (String, Vec<Value>) {
    let expr = parse_expression(input, &ParserLimits::default()).unwrap();
    let bound = typecheck(bind(&expr, catalog).unwrap()).unwrap();
    render_predicate(&bound, dialect, offset)
}

fn render_note(input: &str, dialect: SqlDialect) -> (String, Vec<Value>) {
    render_with(&note_catalog().unwrap(), input, dialect, 0)
}

fn s(v: &str) -> Value {
    Value::String(v.to_string())
}

#[test]
fn test_render_tag_and_pinned_sqlite() {
    let (sql, params) = render_note(r#"tag == "math" && pinned == true"#, SqlDialect::Sqlite);

    assert_eq!(
        sql,
        concat!(
            "((EXISTS (SELECT 1 FROM json_each(\"memo\".\"payload\", '$.tags') ",
            "WHERE json_each.value = ?)) AND (\"memo\".\"pinned\" = ?))"
        )
    );
    assert_eq!(params, vec![s("math"), Value::Int32(1)]);
}

#[test]
fn test_render_tag_and_pinned_postgres() {
    let (sql, params) = render_note(r#"tag == "math" && pinned == true"#, SqlDialect::Postgres);

    assert_eq!(
        sql,
        concat!(
            "((COALESCE((\"memo\".\"payload\" #> '{tags}') @> ",
            "jsonb_build_array(CAST($1 AS TEXT)), FALSE)) AND (\"memo\".\"pinned\" = $2))"
        )
    );
    assert_eq!(params, vec![s("math"), Value::Boolean(true)]);
}

#[test]
fn test_render_tag_and_pinned_mysql() {
    let (sql, params) = render_note(r#"tag == "math" && pinned == true"#, SqlDialect::MySql);

    assert_eq!(
        sql,
        concat!(
            "((COALESCE(JSON_CONTAINS(`memo`.`payload`, JSON_QUOTE(?), '$.tags'), 0)) ",
            "AND (`memo`.`pinned` = ?))"
        )
    );
    assert_eq!(params, vec![s("math"), Value::Int32(1)]);
}

#[test]
fn test_render_nested_or_with_negated_flag() {
    let (sql, params) = render_note(
        r#"(tag == "math" || tag == "physics") && !archived"#,
        SqlDialect::Sqlite,
    );

    let tag = "(EXISTS (SELECT 1 FROM json_each(\"memo\".\"payload\", '$.tags') WHERE json_each.value = ?))";
    assert_eq!(
        sql,
        format!("(({tag} OR {tag}) AND NOT (\"memo\".\"row_status\" = ?))")
    );
    assert_eq!(params, vec![s("math"), s("physics"), s("ARCHIVED")]);
}

#[test]
fn test_render_tag_inequality() {
    let (sql, params) = render_note(r#"tag != "draft""#, SqlDialect::MySql);

    assert_eq!(
        sql,
        "(NOT COALESCE(JSON_CONTAINS(`memo`.`payload`, JSON_QUOTE(?), '$.tags'), 0))"
    );
    assert_eq!(params, vec![s("draft")]);
}

#[test]
fn test_render_status_flag_polarity() {
    let cases = [
        ("archived == true", " = "),
        ("archived", " = "),
        ("archived != false", " = "),
        ("archived == false", " <> "),
        ("archived != true", " <> "),
    ];

    for (input, op) in cases {
        let (sql, params) = render_note(input, SqlDialect::Postgres);
        assert_eq!(sql, format!("(\"memo\".\"row_status\"{op}$1)"), "{input}");
        assert_eq!(params, vec![s("ARCHIVED")]);
    }
}

#[test]
fn test_render_case_sensitive_string_equality() {
    let input = r#"content == "Hello""#;

    assert_eq!(
        render_note(input, SqlDialect::MySql).0,
        "(`memo`.`content` COLLATE utf8mb4_bin = ?)"
    );
    assert_eq!(
        render_note(input, SqlDialect::Postgres).0,
        "(\"memo\".\"content\" = $1)"
    );
    assert_eq!(
        render_note(input, SqlDialect::Sqlite).0,
        "(\"memo\".\"content\" = ?)"
    );
}

#[test]
fn test_render_negated_comparison() {
    let (sql, params) = render_note(r#"!content == "x""#, SqlDialect::Sqlite);
    assert_eq!(sql, "NOT (\"memo\".\"content\" = ?)");
    assert_eq!(params, vec![s("x")]);

    let (sql, params) = render_note("!creator_id > 3", SqlDialect::Postgres);
    assert_eq!(sql, "NOT (\"memo\".\"creator_id\" > $1)");
    assert_eq!(params, vec![Value::Int32(3)]);
}

#[test]
fn test_render_string_functions() {
    let input = r#"contains(content, "50%")"#;

    let (sql, params) = render_note(input, SqlDialect::MySql);
    assert_eq!(
        sql,
        "(`memo`.`content` COLLATE utf8mb4_bin LIKE ? ESCAPE '!')"
    );
    assert_eq!(params, vec![s("%50!%%")]);

    let (sql, params) = render_note(input, SqlDialect::Postgres);
    assert_eq!(sql, "(\"memo\".\"content\" LIKE $1 ESCAPE '!')");
    assert_eq!(params, vec![s("%50!%%")]);

    let (sql, params) = render_note(input, SqlDialect::Sqlite);
    assert_eq!(sql, "(\"memo\".\"content\" GLOB ?)");
    assert_eq!(params, vec![s("*50%*")]);
}

#[test]
fn test_render_timestamp_override() {
    let input = r#"created_ts >= "2024-01-01T00:00:00Z""#;

    let (sql, params) = render_note(input, SqlDialect::MySql);
    assert_eq!(sql, "(UNIX_TIMESTAMP(`memo`.`created_ts`) >= ?)");
    assert_eq!(params, vec![Value::Int(1_704_067_200)]);

    let (sql, params) = render_note(input, SqlDialect::Sqlite);
    assert_eq!(sql, "(\"memo\".\"created_ts\" >= ?)");
    assert_eq!(params, vec![Value::Int(1_704_067_200)]);
}

#[test]
fn test_render_json_scalars() {
    let (sql, params) = render_note("difficulty > 3", SqlDialect::Postgres);
    assert_eq!(
        sql,
        "(CAST((\"memo\".\"payload\" #>> '{difficulty}') AS INTEGER) > $1)"
    );
    assert_eq!(params, vec![Value::Int32(3)]);

    let (sql, params) = render_note("property.has_link", SqlDialect::MySql);
    assert_eq!(
        sql,
        "((JSON_EXTRACT(`memo`.`payload`, '$.property.hasLink') IS TRUE) = ?)"
    );
    assert_eq!(params, vec![Value::Int32(1)]);

    let (sql, _) = render_note("!property.has_task_list", SqlDialect::Sqlite);
    assert_eq!(
        sql,
        "NOT ((json_extract(\"memo\".\"payload\", '$.property.hasTaskList') IS TRUE) = ?)"
    );
}

#[test]
fn test_render_enum_uses_dialect_encoding() {
    let catalog = FieldCatalog::builder(EntityKind::Note, "memo")
        .field(FieldDescriptor::column(
            "visibility",
            SemanticType::Enum(
                EnumType::new("visibility")
                    .variant("PUBLIC")
                    .variant_stored_as("PRIVATE", "private")
                    .stored_for(SqlDialect::Postgres, "PRIVATE"),
            ),
            "visibility",
        ))
        .build()
        .unwrap();

    let input = r#"visibility == "PRIVATE""#;
    assert_eq!(
        render_with(&catalog, input, SqlDialect::Sqlite, 0).1,
        vec![s("private")]
    );
    assert_eq!(
        render_with(&catalog, input, SqlDialect::Postgres, 0).1,
        vec![s("PRIVATE")]
    );
}

#[test]
fn test_render_param_offset() {
    let catalog = class_catalog().unwrap();
    let input = r#"visibility == "PUBLIC" || startsWith(name, "Al")"#;

    let (sql, params) = render_with(&catalog, input, SqlDialect::Postgres, 2);
    assert_eq!(
        sql,
        "((\"class\".\"visibility\" = $3) OR (\"class\".\"name\" LIKE $4 ESCAPE '!'))"
    );
    assert_eq!(params, vec![s("PUBLIC"), s("Al%")]);

    let (sql, _) = render_with(&catalog, input, SqlDialect::MySql, 2);
    assert_eq!(
        sql,
        "((`class`.`visibility` = ?) OR (`class`.`name` COLLATE utf8mb4_bin LIKE ? ESCAPE '!'))"
    );
}

#[test]
fn test_injection_payload_is_only_a_parameter() {
    let payload = "'; DROP TABLE memo; --";
    let input = format!(r#"content == "{payload}" || contains(content, "{payload}")"#);

    for dialect in SqlDialect::ALL {
        let (sql, params) = render_note(&input, dialect);
        assert!(!sql.contains("DROP"), "{dialect}: {sql}");
        assert!(!sql.contains(';'), "{dialect}: {sql}");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], s(payload));
    }
}
