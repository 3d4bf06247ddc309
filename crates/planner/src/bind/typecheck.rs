use crate::{
    bind::{
        bound::{BoundExpr, TypedValue},
        error::SemanticError,
    },
    catalog::{FieldDescriptor, StringFunction},
};
use chrono::DateTime;
use filter_syntax::ast::{literal::Literal, operator::ComparisonOperator, span::Span};
use model::core::data_type::{NumericWidth, SemanticType};

/// Checks every predicate's operator against its field type and coerces the
/// literal operand. The output has the same shape as the input.
pub fn typecheck<'c>(
    expr: BoundExpr<'c, Literal>,
) -> Result<BoundExpr<'c, TypedValue<'c>>, SemanticError> {
    match expr {
        BoundExpr::And(left, right) => Ok(BoundExpr::And(
            Box::new(typecheck(*left)?),
            Box::new(typecheck(*right)?),
        )),
        BoundExpr::Or(left, right) => Ok(BoundExpr::Or(
            Box::new(typecheck(*left)?),
            Box::new(typecheck(*right)?),
        )),
        BoundExpr::Not(inner) => Ok(BoundExpr::Not(Box::new(typecheck(*inner)?))),
        BoundExpr::Compare {
            field,
            operator,
            value,
            span,
        } => {
            check_operator(field, operator, span)?;
            Ok(BoundExpr::Compare {
                field,
                operator,
                value: coerce(field, value, span)?,
                span,
            })
        }
        BoundExpr::Match {
            field,
            function,
            value,
            span,
        } => Ok(BoundExpr::Match {
            field,
            function,
            value: match_operand(function, value, span)?,
            span,
        }),
    }
}

fn check_operator(
    field: &FieldDescriptor,
    operator: ComparisonOperator,
    span: Span,
) -> Result<(), SemanticError> {
    if operator.is_ordering() && !field.ty.is_ordered() {
        return Err(SemanticError::mismatch(
            span,
            format!(
                "operator '{operator}' is not defined for {} field '{}'",
                field.ty, field.name
            ),
        ));
    }
    Ok(())
}

fn coerce<'c>(
    field: &'c FieldDescriptor,
    literal: Literal,
    span: Span,
) -> Result<TypedValue<'c>, SemanticError> {
    let mismatch = |literal: &Literal| {
        SemanticError::mismatch(
            span,
            format!(
                "cannot compare {} field '{}' with {} {}",
                field.ty,
                field.name,
                literal.type_name(),
                literal
            ),
        )
    };

    match (&field.ty, literal) {
        (SemanticType::String, Literal::String(s)) => Ok(TypedValue::String(s)),
        (SemanticType::Boolean, Literal::Boolean(b)) => Ok(TypedValue::Boolean(b)),

        (SemanticType::Number(NumericWidth::Int32), Literal::Integer(n)) => i32::try_from(n)
            .map(TypedValue::Int32)
            .map_err(|_| {
                SemanticError::mismatch(
                    span,
                    format!("{n} is out of range for 32-bit field '{}'", field.name),
                )
            }),
        (SemanticType::Number(NumericWidth::Int64), Literal::Integer(n)) => {
            Ok(TypedValue::Int64(n))
        }
        (SemanticType::Number(NumericWidth::Float64), Literal::Integer(n)) => {
            Ok(TypedValue::Float(n as f64))
        }
        (SemanticType::Number(NumericWidth::Float64), Literal::Decimal(n)) => {
            Ok(TypedValue::Float(n))
        }

        (SemanticType::Enum(enum_type), Literal::String(s)) => match enum_type.resolve(&s) {
            Some(variant) => Ok(TypedValue::Enum(variant)),
            None => Err(SemanticError::mismatch(
                span,
                format!(
                    "{s:?} is not a valid {} (expected one of {})",
                    enum_type.name,
                    enum_type.literals().join(", ")
                ),
            )),
        },

        (SemanticType::Timestamp, Literal::Integer(n)) => Ok(TypedValue::Timestamp(n)),
        (SemanticType::Timestamp, Literal::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|ts| TypedValue::Timestamp(ts.timestamp()))
            .map_err(|e| {
                SemanticError::mismatch(span, format!("{s:?} is not an RFC 3339 timestamp: {e}"))
            }),

        (_, literal) => Err(mismatch(&literal)),
    }
}

fn match_operand<'c>(
    function: StringFunction,
    literal: Literal,
    span: Span,
) -> Result<TypedValue<'c>, SemanticError> {
    match literal {
        Literal::String(s) => Ok(TypedValue::String(s)),
        other => Err(SemanticError::mismatch(
            span,
            format!(
                "{function}() expects a string, found {} {other}",
                other.type_name()
            ),
        )),
    }
}
