use crate::{
    bind::{bound::BoundExpr, error::SemanticError},
    catalog::{FieldCatalog, FieldDescriptor, StringFunction},
};
use filter_syntax::ast::{
    dotpath::DotPath,
    expr::{Expression, ExpressionKind},
    literal::Literal,
    operator::{BinaryOperator, ComparisonOperator, UnaryOperator},
    span::Span,
};
use model::core::data_type::SemanticType;
use tracing::trace;

/// Resolves every identifier and function in `expr` against `catalog`.
///
/// Comparisons are normalized so the field is always on the left and a bare
/// boolean field becomes `field == true`. Literal types are left for
/// [`typecheck`](super::typecheck::typecheck).
pub fn bind<'c>(
    expr: &Expression,
    catalog: &'c FieldCatalog,
) -> Result<BoundExpr<'c, Literal>, SemanticError> {
    trace!(entity = %catalog.entity(), version = catalog.version(), "binding filter");
    let binder = Binder { catalog };
    binder.check_identifiers(expr)?;
    binder.bind(expr)
}

struct Binder<'c> {
    catalog: &'c FieldCatalog,
}

impl<'c> Binder<'c> {
    /// Rejects the first unknown identifier in source order, wherever it
    /// appears, before any shape checks run.
    fn check_identifiers(&self, expr: &Expression) -> Result<(), SemanticError> {
        match &expr.kind {
            ExpressionKind::Identifier(path) => self.resolve(path).map(|_| ()),
            ExpressionKind::Literal(_) => Ok(()),
            ExpressionKind::Binary { left, right, .. }
            | ExpressionKind::Comparison { left, right, .. } => {
                self.check_identifiers(left)?;
                self.check_identifiers(right)
            }
            ExpressionKind::Unary { operand, .. } => self.check_identifiers(operand),
            ExpressionKind::FunctionCall { arguments, .. } => arguments
                .iter()
                .try_for_each(|arg| self.check_identifiers(arg)),
        }
    }

    fn bind(&self, expr: &Expression) -> Result<BoundExpr<'c, Literal>, SemanticError> {
        match &expr.kind {
            ExpressionKind::Binary {
                left,
                operator,
                right,
            } => {
                let left = Box::new(self.bind(left)?);
                let right = Box::new(self.bind(right)?);
                Ok(match operator {
                    BinaryOperator::And => BoundExpr::And(left, right),
                    BinaryOperator::Or => BoundExpr::Or(left, right),
                })
            }
            ExpressionKind::Unary {
                operator: UnaryOperator::Not,
                operand,
            } => Ok(BoundExpr::Not(Box::new(self.bind(operand)?))),
            ExpressionKind::Comparison {
                left,
                operator,
                right,
            } => self.bind_comparison(left, *operator, right),
            ExpressionKind::FunctionCall { name, arguments } => {
                self.bind_call(name, arguments, expr.span)
            }
            ExpressionKind::Identifier(path) => {
                let field = self.resolve(path)?;
                if field.ty != SemanticType::Boolean {
                    return Err(SemanticError::mismatch(
                        path.span,
                        format!(
                            "{} field '{}' cannot be used as a condition on its own",
                            field.ty, field.name
                        ),
                    ));
                }
                Ok(BoundExpr::Compare {
                    field,
                    operator: ComparisonOperator::Equal,
                    value: Literal::Boolean(true),
                    span: path.span,
                })
            }
            ExpressionKind::Literal(literal) => Err(SemanticError::mismatch(
                expr.span,
                format!("{} literal cannot be used as a condition", literal.type_name()),
            )),
        }
    }

    fn bind_comparison(
        &self,
        left: &Expression,
        operator: ComparisonOperator,
        right: &Expression,
    ) -> Result<BoundExpr<'c, Literal>, SemanticError> {
        let left_field = self.resolve_operand(left)?;
        let right_field = self.resolve_operand(right)?;

        match (left_field, right_field) {
            (Some(field), None) => Ok(BoundExpr::Compare {
                field,
                operator,
                value: literal_operand(right)?,
                span: right.span,
            }),
            (None, Some(field)) => Ok(BoundExpr::Compare {
                field,
                operator: operator.flip(),
                value: literal_operand(left)?,
                span: left.span,
            }),
            (Some(_), Some(_)) => Err(SemanticError::mismatch(
                left.span.to(right.span),
                "comparing two fields is not supported",
            )),
            (None, None) => Err(SemanticError::mismatch(
                left.span.to(right.span),
                "comparison must reference a field",
            )),
        }
    }

    fn bind_call(
        &self,
        name: &str,
        arguments: &[Expression],
        span: Span,
    ) -> Result<BoundExpr<'c, Literal>, SemanticError> {
        let Some(function) = StringFunction::from_name(name) else {
            return Err(SemanticError::UnsupportedFunction {
                name: name.to_string(),
                field: None,
                span,
            });
        };

        let [target, needle] = arguments else {
            return Err(SemanticError::mismatch(
                span,
                format!(
                    "{name}() takes a field and a string, got {} argument(s)",
                    arguments.len()
                ),
            ));
        };

        let ExpressionKind::Identifier(path) = &target.kind else {
            return Err(SemanticError::mismatch(
                target.span,
                format!(
                    "first argument of {name}() must be a field, found {}",
                    target.kind.describe()
                ),
            ));
        };
        let field = self.resolve(path)?;

        if !field.supports(function) {
            return Err(SemanticError::UnsupportedFunction {
                name: name.to_string(),
                field: Some(field.name.clone()),
                span,
            });
        }

        Ok(BoundExpr::Match {
            field,
            function,
            value: literal_operand(needle)?,
            span: needle.span,
        })
    }

    fn resolve(&self, path: &DotPath) -> Result<&'c FieldDescriptor, SemanticError> {
        let name = path.to_string();
        match self.catalog.lookup(&name) {
            Some(field) => Ok(field),
            None => Err(SemanticError::UnknownField {
                name,
                span: path.span,
            }),
        }
    }

    fn resolve_operand(
        &self,
        operand: &Expression,
    ) -> Result<Option<&'c FieldDescriptor>, SemanticError> {
        match &operand.kind {
            ExpressionKind::Identifier(path) => self.resolve(path).map(Some),
            _ => Ok(None),
        }
    }
}

fn literal_operand(operand: &Expression) -> Result<Literal, SemanticError> {
    match &operand.kind {
        ExpressionKind::Literal(literal) => Ok(literal.clone()),
        other => Err(SemanticError::mismatch(
            operand.span,
            format!("expected a literal operand, found {}", other.describe()),
        )),
    }
}
