//! Closed, versioned tables of the fields each entity exposes to filters.
//!
//! A catalog is the only source of identifiers and column names that reach
//! rendered SQL. It is validated once when built and read-only afterwards.

use model::core::{data_type::SemanticType, entity::EntityKind};
use std::collections::HashMap;
use thiserror::Error;

pub mod defaults;
pub mod field;

pub use field::{FieldDescriptor, FieldSource, StringFunction};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("duplicate field '{name}' in {entity} catalog")]
    DuplicateField { entity: EntityKind, name: String },

    #[error("'{name}' is not a valid field name")]
    InvalidFieldName { name: String },

    #[error("'{ident}' is not a valid SQL identifier")]
    InvalidIdentifier { ident: String },

    #[error("field '{field}' has an invalid JSON path segment '{segment}'")]
    InvalidJsonPath { field: String, segment: String },

    #[error("function '{function}' cannot be attached to {ty} field '{field}'")]
    FunctionNotApplicable {
        field: String,
        function: StringFunction,
        ty: SemanticType,
    },

    #[error("{entity} catalog has no fields")]
    Empty { entity: EntityKind },
}

#[derive(Debug, Clone)]
pub struct FieldCatalog {
    entity: EntityKind,
    table: String,
    version: u32,
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

impl FieldCatalog {
    pub fn builder(entity: EntityKind, table: &str) -> FieldCatalogBuilder {
        FieldCatalogBuilder {
            entity,
            table: table.to_string(),
            version: 1,
            fields: Vec::new(),
        }
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn lookup(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub struct FieldCatalogBuilder {
    entity: EntityKind,
    table: String,
    version: u32,
    fields: Vec<FieldDescriptor>,
}

impl FieldCatalogBuilder {
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<FieldCatalog, CatalogError> {
        if self.fields.is_empty() {
            return Err(CatalogError::Empty {
                entity: self.entity,
            });
        }
        check_identifier(&self.table)?;

        let mut fields = Vec::with_capacity(self.fields.len());
        let mut index = HashMap::with_capacity(self.fields.len());

        for mut field in self.fields {
            check_field(&field)?;

            if index.insert(field.name.clone(), fields.len()).is_some() {
                return Err(CatalogError::DuplicateField {
                    entity: self.entity,
                    name: field.name,
                });
            }

            field.table = self.table.clone();
            fields.push(field);
        }

        Ok(FieldCatalog {
            entity: self.entity,
            table: self.table,
            version: self.version,
            fields,
            index,
        })
    }
}

fn check_field(field: &FieldDescriptor) -> Result<(), CatalogError> {
    // Names must be something the lexer produces as a single identifier.
    let valid_name = !field.name.is_empty() && field.name.split('.').all(is_identifier);
    if !valid_name {
        return Err(CatalogError::InvalidFieldName {
            name: field.name.clone(),
        });
    }

    check_identifier(field.source.column())?;

    if let Some(path) = field.source.json_path() {
        if path.is_empty() {
            return Err(CatalogError::InvalidJsonPath {
                field: field.name.clone(),
                segment: String::new(),
            });
        }
        if let Some(bad) = path.iter().find(|s| !is_path_segment(s)) {
            return Err(CatalogError::InvalidJsonPath {
                field: field.name.clone(),
                segment: bad.clone(),
            });
        }
    }

    let matchable = field.ty == SemanticType::String
        && !matches!(field.source, FieldSource::JsonArray { .. });
    if let Some(function) = field.functions.first().filter(|_| !matchable) {
        return Err(CatalogError::FunctionNotApplicable {
            field: field.name.clone(),
            function: *function,
            ty: field.ty.clone(),
        });
    }

    Ok(())
}

fn check_identifier(ident: &str) -> Result<(), CatalogError> {
    if is_identifier(ident) {
        Ok(())
    } else {
        Err(CatalogError::InvalidIdentifier {
            ident: ident.to_string(),
        })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_path_segment(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
