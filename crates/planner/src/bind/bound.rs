use crate::catalog::{FieldDescriptor, StringFunction};
use filter_syntax::ast::{operator::ComparisonOperator, span::Span};
use model::core::data_type::EnumVariant;
use std::collections::BTreeSet;

/// A filter whose identifiers have been resolved against a catalog.
///
/// The tree mirrors the parsed expression but only keeps the shapes that can
/// reach SQL: connectives and predicates over a single field. `V` is the
/// operand representation, raw literals after binding and [`TypedValue`]s
/// after type checking.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpr<'c, V> {
    And(Box<BoundExpr<'c, V>>, Box<BoundExpr<'c, V>>),
    Or(Box<BoundExpr<'c, V>>, Box<BoundExpr<'c, V>>),
    Not(Box<BoundExpr<'c, V>>),
    Compare {
        field: &'c FieldDescriptor,
        operator: ComparisonOperator,
        value: V,
        span: Span,
    },
    Match {
        field: &'c FieldDescriptor,
        function: StringFunction,
        value: V,
        span: Span,
    },
}

impl<V> BoundExpr<'_, V> {
    /// Names of every catalog field the filter touches.
    pub fn referenced_fields(&self) -> BTreeSet<String> {
        let mut fields = BTreeSet::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields(&self, out: &mut BTreeSet<String>) {
        match self {
            BoundExpr::And(left, right) | BoundExpr::Or(left, right) => {
                left.collect_fields(out);
                right.collect_fields(out);
            }
            BoundExpr::Not(inner) => inner.collect_fields(out),
            BoundExpr::Compare { field, .. } | BoundExpr::Match { field, .. } => {
                out.insert(field.name.clone());
            }
        }
    }
}

/// An operand coerced to its field's semantic type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue<'c> {
    String(String),
    Int32(i32),
    Int64(i64),
    Float(f64),
    Boolean(bool),
    /// Seconds since the Unix epoch.
    Timestamp(i64),
    Enum(&'c EnumVariant),
}
