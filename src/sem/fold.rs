use crate::ast::{BinaryOp, Expression, UnaryOp};

/// Attempts to evaluate `expr` as a compile-time integer constant.
/// `resolve` looks up the already-folded value of a previously declared
/// integer constant visible at this point (typically a scope-chain lookup).
/// Supports integer literals, such identifier references, unary minus, and
/// the six integer arithmetic operators (add, sub, mul, integer-div, mod,
/// power) — ordinary `/` division is excluded, since it produces a real and
/// array dimensions/case labels require integers. Division/modulo by zero
/// and a negative exponent are "not foldable"; overflow wraps two's-complement
/// style.
pub fn fold_integer(expr: &Expression, resolve: &dyn Fn(&str) -> Option<i64>) -> Option<i64> {
    match expr {
        Expression::IntegerLiteral { value, .. } => Some(*value),
        Expression::Identifier { name, .. } => resolve(name),
        Expression::Unary { op: UnaryOp::Neg, operand, .. } => {
            fold_integer(operand, resolve).map(|v| v.wrapping_neg())
        }
        Expression::Binary { op, left, right, .. } => {
            let l = fold_integer(left, resolve)?;
            let r = fold_integer(right, resolve)?;
            match op {
                BinaryOp::Add => Some(l.wrapping_add(r)),
                BinaryOp::Sub => Some(l.wrapping_sub(r)),
                BinaryOp::Mul => Some(l.wrapping_mul(r)),
                BinaryOp::IntDiv => (r != 0).then(|| l.wrapping_div(r)),
                BinaryOp::Mod => (r != 0).then(|| l.wrapping_rem(r)),
                BinaryOp::Pow => {
                    if r < 0 {
                        None
                    } else {
                        Some(l.wrapping_pow(r as u32))
                    }
                }
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    fn int(value: i64) -> Expression {
        Expression::IntegerLiteral {
            value,
            position: Position::new(1, 1),
        }
    }

    fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            position: Position::new(1, 1),
        }
    }

    fn no_constants(_: &str) -> Option<i64> {
        None
    }

    #[test]
    fn folds_integer_literal() {
        assert_eq!(fold_integer(&int(5), &no_constants), Some(5));
    }

    #[test]
    fn folds_arithmetic_closed_form() {
        let expr = binary(BinaryOp::Add, int(2), binary(BinaryOp::Mul, int(3), int(4)));
        assert_eq!(fold_integer(&expr, &no_constants), Some(14));
    }

    #[test]
    fn resolves_known_constant_identifier() {
        let ident = Expression::Identifier {
            name: "N".to_string(),
            position: Position::new(1, 1),
        };
        assert_eq!(
            fold_integer(&ident, &|name| (name == "N").then_some(5)),
            Some(5)
        );
    }

    #[test]
    fn division_by_zero_is_not_foldable() {
        let expr = binary(BinaryOp::IntDiv, int(1), int(0));
        assert_eq!(fold_integer(&expr, &no_constants), None);
    }

    #[test]
    fn real_division_is_not_foldable() {
        let expr = binary(BinaryOp::Div, int(1), int(2));
        assert_eq!(fold_integer(&expr, &no_constants), None);
    }

    #[test]
    fn unary_minus_negates() {
        let expr = Expression::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(int(5)),
            position: Position::new(1, 1),
        };
        assert_eq!(fold_integer(&expr, &no_constants), Some(-5));
    }
}
