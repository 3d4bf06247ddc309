use crate::error::CliError;
use engine_core::CompiledStatement;
use planner::catalog::{FieldCatalog, FieldSource};

pub fn statement_json(statement: &CompiledStatement, compact: bool) -> Result<String, CliError> {
    let json = if compact {
        serde_json::to_string(statement)?
    } else {
        serde_json::to_string_pretty(statement)?
    };
    Ok(json)
}

pub fn catalog_json(catalog: &FieldCatalog) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(catalog.fields())?)
}

pub fn print_catalog_table(catalog: &FieldCatalog) {
    println!(
        "Fields for '{}' (table '{}', catalog v{}):",
        catalog.entity(),
        catalog.table(),
        catalog.version()
    );
    println!("{}", "-".repeat(72));
    println!("{:<24} {:<16} {:<22} {}", "Field", "Type", "Source", "Functions");
    for field in catalog.fields() {
        let functions = field
            .functions
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<24} {:<16} {:<22} {}",
            field.name,
            field.ty.to_string(),
            describe_source(&field.source),
            functions
        );
    }
}

fn describe_source(source: &FieldSource) -> String {
    match source {
        FieldSource::Column { column } => column.clone(),
        FieldSource::JsonScalar { column, path } => format!("{column}.{}", path.join(".")),
        FieldSource::JsonArray { column, path } => format!("{column}.{}[]", path.join(".")),
        FieldSource::StatusFlag { column, value } => format!("{column} = {value}"),
    }
}
