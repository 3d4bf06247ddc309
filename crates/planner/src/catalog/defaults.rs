//! Catalogs for the entities whose list endpoints accept filters.

use crate::catalog::{CatalogError, FieldCatalog, FieldDescriptor, StringFunction};
use model::core::{
    data_type::{EnumType, NumericWidth, SemanticType, SqlDialect},
    entity::EntityKind,
};

const ALL_MATCHES: &[StringFunction] = &StringFunction::ALL;

pub fn default_catalog(entity: EntityKind) -> Result<FieldCatalog, CatalogError> {
    match entity {
        EntityKind::Note => note_catalog(),
        EntityKind::Class => class_catalog(),
        EntityKind::SavedQuery => saved_query_catalog(),
    }
}

pub fn note_catalog() -> Result<FieldCatalog, CatalogError> {
    FieldCatalog::builder(EntityKind::Note, "memo")
        .field(
            FieldDescriptor::column("content", SemanticType::String, "content")
                .with_functions(ALL_MATCHES),
        )
        .field(FieldDescriptor::json_array("tag", "payload", &["tags"]))
        .field(FieldDescriptor::column(
            "pinned",
            SemanticType::Boolean,
            "pinned",
        ))
        .field(FieldDescriptor::status_flag(
            "archived",
            "row_status",
            "ARCHIVED",
        ))
        .field(FieldDescriptor::column(
            "visibility",
            SemanticType::Enum(visibility()),
            "visibility",
        ))
        .field(FieldDescriptor::column("creator_id", int32(), "creator_id"))
        .field(timestamp("memo", "created_ts"))
        .field(timestamp("memo", "updated_ts"))
        .field(FieldDescriptor::json(
            "difficulty",
            int32(),
            "payload",
            &["difficulty"],
        ))
        .field(FieldDescriptor::json(
            "property.has_link",
            SemanticType::Boolean,
            "payload",
            &["property", "hasLink"],
        ))
        .field(FieldDescriptor::json(
            "property.has_task_list",
            SemanticType::Boolean,
            "payload",
            &["property", "hasTaskList"],
        ))
        .build()
}

pub fn class_catalog() -> Result<FieldCatalog, CatalogError> {
    FieldCatalog::builder(EntityKind::Class, "class")
        .field(
            FieldDescriptor::column("uid", SemanticType::String, "uid")
                .with_functions(&[StringFunction::StartsWith]),
        )
        .field(
            FieldDescriptor::column("name", SemanticType::String, "name")
                .with_functions(ALL_MATCHES),
        )
        .field(
            FieldDescriptor::column("description", SemanticType::String, "description")
                .with_functions(&[StringFunction::Contains]),
        )
        .field(FieldDescriptor::column("creator_id", int32(), "creator_id"))
        .field(FieldDescriptor::column(
            "visibility",
            SemanticType::Enum(visibility()),
            "visibility",
        ))
        .field(timestamp("class", "created_ts"))
        .field(timestamp("class", "updated_ts"))
        .build()
}

pub fn saved_query_catalog() -> Result<FieldCatalog, CatalogError> {
    FieldCatalog::builder(EntityKind::SavedQuery, "shortcut")
        .field(
            FieldDescriptor::column("title", SemanticType::String, "title")
                .with_functions(ALL_MATCHES),
        )
        .field(
            FieldDescriptor::column("filter", SemanticType::String, "filter")
                .with_functions(&[StringFunction::Contains]),
        )
        .field(FieldDescriptor::column("creator_id", int32(), "creator_id"))
        .field(timestamp("shortcut", "created_ts"))
        .build()
}

fn int32() -> SemanticType {
    SemanticType::Number(NumericWidth::Int32)
}

fn visibility() -> EnumType {
    EnumType::new("visibility")
        .variant("PUBLIC")
        .variant("PROTECTED")
        .variant("PRIVATE")
}

// MySQL stores these as TIMESTAMP columns; the others store epoch seconds.
fn timestamp(table: &str, column: &str) -> FieldDescriptor {
    FieldDescriptor::column(column, SemanticType::Timestamp, column).with_override(
        SqlDialect::MySql,
        &format!("UNIX_TIMESTAMP(`{table}`.`{column}`)"),
    )
}
