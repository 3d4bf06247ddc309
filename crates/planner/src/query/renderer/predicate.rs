use crate::{
    bind::{BoundExpr, TypedValue},
    catalog::{FieldDescriptor, FieldSource, StringFunction},
    query::{
        dialect::{Dialect, dialect_for},
        renderer::{Render, Renderer},
    },
};
use filter_syntax::ast::operator::ComparisonOperator;
use model::core::{
    data_type::{SemanticType, SqlDialect},
    value::Value,
};
use tracing::trace;

/// Renders a type-checked filter for `dialect`. Placeholder numbering starts
/// after `param_offset` parameters the caller binds first.
pub fn render_predicate(
    expr: &BoundExpr<'_, TypedValue<'_>>,
    dialect: SqlDialect,
    param_offset: usize,
) -> (String, Vec<Value>) {
    let mut renderer = Renderer::with_offset(dialect_for(dialect), param_offset);
    expr.render(&mut renderer);
    trace!(%dialect, params = renderer.params.len(), "rendered predicate");
    renderer.finish()
}

// Every node renders wrapped in parentheses, so `NOT ` can be prefixed
// without further grouping.
impl Render for BoundExpr<'_, TypedValue<'_>> {
    fn render(&self, r: &mut Renderer) {
        match self {
            BoundExpr::And(left, right) => render_connective(r, left, " AND ", right),
            BoundExpr::Or(left, right) => render_connective(r, left, " OR ", right),
            BoundExpr::Not(inner) => {
                r.sql.push_str("NOT ");
                inner.render(r);
            }
            BoundExpr::Compare {
                field,
                operator,
                value,
                ..
            } => render_compare(r, field, *operator, value),
            BoundExpr::Match {
                field,
                function,
                value,
                ..
            } => render_match(r, field, *function, value),
        }
    }
}

fn render_connective(
    r: &mut Renderer,
    left: &BoundExpr<'_, TypedValue<'_>>,
    op: &str,
    right: &BoundExpr<'_, TypedValue<'_>>,
) {
    r.sql.push('(');
    left.render(r);
    r.sql.push_str(op);
    right.render(r);
    r.sql.push(')');
}

fn render_compare(
    r: &mut Renderer,
    field: &FieldDescriptor,
    operator: ComparisonOperator,
    value: &TypedValue<'_>,
) {
    match &field.source {
        FieldSource::JsonArray { column, path } => {
            let column = r.quote_column(&field.table, column);
            let placeholder = r.bind(encode(r.dialect, value));
            let contains = r.dialect.json_array_contains(&column, path, &placeholder);

            r.sql.push('(');
            if operator == ComparisonOperator::NotEqual {
                r.sql.push_str("NOT ");
            }
            r.sql.push_str(&contains);
            r.sql.push(')');
        }
        FieldSource::StatusFlag {
            column,
            value: status,
        } => {
            let flag = matches!(value, TypedValue::Boolean(true));
            let holds = (operator == ComparisonOperator::Equal) == flag;
            let column = r.quote_column(&field.table, column);

            r.sql.push('(');
            r.sql.push_str(&column);
            r.sql.push_str(if holds { " = " } else { " <> " });
            r.add_param(Value::String(status.clone()));
            r.sql.push(')');
        }
        FieldSource::Column { .. } | FieldSource::JsonScalar { .. } => {
            let mut lhs = value_expr(r, field);
            if field.ty == SemanticType::String {
                lhs = r.dialect.case_sensitive(&lhs);
            }

            r.sql.push('(');
            r.sql.push_str(&lhs);
            r.sql.push_str(comparison_sql(operator));
            r.add_param(encode(r.dialect, value));
            r.sql.push(')');
        }
    }
}

fn render_match(
    r: &mut Renderer,
    field: &FieldDescriptor,
    function: StringFunction,
    value: &TypedValue<'_>,
) {
    let needle = match value {
        TypedValue::String(s) => s.clone(),
        other => encode(r.dialect, other).to_string(),
    };
    let lhs = value_expr(r, field);
    let pattern = r.dialect.match_pattern(function, &needle);
    let placeholder = r.bind(Value::String(pattern));
    let matched = r.dialect.string_match(&lhs, &placeholder);

    r.sql.push('(');
    r.sql.push_str(&matched);
    r.sql.push(')');
}

/// SQL for the field's value: the dialect override when present, otherwise
/// the qualified column or JSON extraction.
fn value_expr(r: &Renderer, field: &FieldDescriptor) -> String {
    if let Some(sql) = field.override_for(r.dialect.kind()) {
        return sql.to_string();
    }

    match &field.source {
        FieldSource::JsonScalar { column, path } => {
            let column = r.quote_column(&field.table, column);
            r.dialect.json_scalar(&column, path, &field.ty)
        }
        FieldSource::Column { column }
        | FieldSource::JsonArray { column, .. }
        | FieldSource::StatusFlag { column, .. } => r.quote_column(&field.table, column),
    }
}

fn comparison_sql(operator: ComparisonOperator) -> &'static str {
    match operator {
        ComparisonOperator::Equal => " = ",
        ComparisonOperator::NotEqual => " <> ",
        ComparisonOperator::LessThan => " < ",
        ComparisonOperator::LessOrEqual => " <= ",
        ComparisonOperator::GreaterThan => " > ",
        ComparisonOperator::GreaterOrEqual => " >= ",
    }
}

fn encode(dialect: &dyn Dialect, value: &TypedValue<'_>) -> Value {
    match value {
        TypedValue::String(s) => Value::String(s.clone()),
        TypedValue::Int32(n) => Value::Int32(*n),
        TypedValue::Int64(n) | TypedValue::Timestamp(n) => Value::Int(*n),
        TypedValue::Float(n) => Value::Float(*n),
        TypedValue::Boolean(b) => dialect.encode_bool(*b),
        TypedValue::Enum(variant) => Value::String(variant.encoding(dialect.kind()).to_string()),
    }
}

#[cfg(test)]
mod tests;
