//! Functions of several variables.
use crate::calculus::errors::CalculusError;
use crate::symbolic::parse_expr::IntoExpr;
use crate::symbolic::symbolic_engine::Expr;

/// Simplified partial derivative `∂f/∂var`; every other variable is held constant.
///
/// # Examples
/// ```rust, ignore
/// let d = partial_derivate("x^2*y + sin(y)", "y").unwrap(); // x^2 + cos(y)
/// ```
pub fn partial_derivate<E: IntoExpr>(expression: E, var: &str) -> Result<Expr, CalculusError> {
    Ok(expression.into_expr()?.diff(var).simplify())
}

/// `[∂f/∂v for v in vars]`
pub fn gradient<E: IntoExpr>(expression: E, vars: &[&str]) -> Result<Vec<Expr>, CalculusError> {
    let expr = expression.into_expr()?;
    Ok(vars.iter().map(|var| expr.diff(var).simplify()).collect())
}
