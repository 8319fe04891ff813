//! Inverse functions: all branches `x = h(y)` of `y = f(x)` for the elementary
//! functions the engine knows.
//!
//! The equation is peeled from the outside in (`f = g + c` gives `g = y - c`, `exp(g) = y`
//! gives `g = ln(y)`, ...). Expressions where the variable shows up in more than one
//! place are accepted when they are polynomials of degree two or less in it; the
//! quadratic formula then gives both roots. Periodic functions contribute their branch
//! over one period only (`sin` gives `asin(y)` and `pi - asin(y)`).

use crate::symbolic::errors::SymbolicError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_simplify::{Factor, Product, Sum};
use std::f64::consts::PI;

fn not_invertible(expr: &Expr, var: &str) -> SymbolicError {
    SymbolicError::NotInvertible {
        expr: expr.to_string(),
        var: var.to_string(),
    }
}

/// `Some((a, b, c))` with `expr = a x^2 + b x + c`, numeric `a`, `b` and `c` free of `x`
fn as_quadratic(expr: &Expr, var: &str) -> Option<(f64, f64, Expr)> {
    let x = Factor::Symbol(var.to_string());
    let square = Product::from_factor(x.clone(), 2.0);
    let linear = Product::from_factor(x, 1.0);
    let (mut a, mut b) = (0.0, 0.0);
    let mut c = Sum::zero();
    for (product, coefficient) in expr.canonical().terms() {
        if *product == square {
            a += coefficient;
        } else if *product == linear {
            b += coefficient;
        } else if !product.contains_symbol(var) {
            c.add_term(product.clone(), coefficient);
        } else {
            return None;
        }
    }
    Some((a, b, c.to_expr()))
}

fn peel(expr: &Expr, target: Expr, var: &str) -> Result<Vec<Expr>, SymbolicError> {
    let has = |e: &Expr| e.contains_variable(var);
    match expr {
        Expr::Var(name) if name == var => Ok(vec![target]),
        _ if !has(expr) => Err(not_invertible(expr, var)),
        Expr::Add(lhs, rhs) if !has(rhs) => peel(lhs, target - *rhs.clone(), var),
        Expr::Add(lhs, rhs) if !has(lhs) => peel(rhs, target - *lhs.clone(), var),
        Expr::Sub(lhs, rhs) if !has(rhs) => peel(lhs, target + *rhs.clone(), var),
        Expr::Sub(lhs, rhs) if !has(lhs) => peel(rhs, *lhs.clone() - target, var),
        Expr::Mul(lhs, rhs) if !has(rhs) => peel(lhs, target / *rhs.clone(), var),
        Expr::Mul(lhs, rhs) if !has(lhs) => peel(rhs, target / *lhs.clone(), var),
        Expr::Div(lhs, rhs) if !has(rhs) => peel(lhs, target * *rhs.clone(), var),
        Expr::Div(lhs, rhs) if !has(lhs) => peel(rhs, *lhs.clone() / target, var),
        Expr::Pow(base, exp) if !has(exp) => {
            let k = exp.constant_value().ok_or_else(|| not_invertible(expr, var))?;
            let root = target.pow(Expr::Const(1.0 / k));
            if k.rem_euclid(2.0) == 0.0 {
                let mut branches = peel(base, -root.clone(), var)?;
                branches.extend(peel(base, root, var)?);
                Ok(branches)
            } else {
                peel(base, root, var)
            }
        }
        Expr::Pow(base, exp) if !has(base) => peel(exp, target.ln() / base.as_ref().clone().ln(), var),
        Expr::Exp(arg) => peel(arg, target.ln(), var),
        Expr::Ln(arg) => peel(arg, target.exp(), var),
        Expr::sin(arg) => {
            let principal = Expr::arcsin(target.boxed());
            let mut branches = peel(arg, Expr::Const(PI) - principal.clone(), var)?;
            branches.extend(peel(arg, principal, var)?);
            Ok(branches)
        }
        Expr::cos(arg) => {
            let principal = Expr::arccos(target.boxed());
            let mut branches = peel(arg, Expr::Const(2.0 * PI) - principal.clone(), var)?;
            branches.extend(peel(arg, principal, var)?);
            Ok(branches)
        }
        Expr::tg(arg) => peel(arg, Expr::arctg(target.boxed()), var),
        Expr::arcsin(arg) => peel(arg, Expr::sin(target.boxed()), var),
        Expr::arccos(arg) => peel(arg, Expr::cos(target.boxed()), var),
        Expr::arctg(arg) => peel(arg, Expr::tg(target.boxed()), var),
        _ => {
            let (a, b, c) = as_quadratic(expr, var).ok_or_else(|| not_invertible(expr, var))?;
            let shifted = c - target;
            if a == 0.0 {
                if b == 0.0 {
                    return Err(not_invertible(expr, var));
                }
                return Ok(vec![-shifted / Expr::Const(b)]);
            }
            let discriminant = Expr::Const(b * b) - Expr::Const(4.0 * a) * shifted;
            let root = discriminant.sqrt();
            let denominator = Expr::Const(2.0 * a);
            Ok(vec![
                (Expr::Const(-b) - root.clone()) / denominator.clone(),
                (Expr::Const(-b) + root) / denominator,
            ])
        }
    }
}

impl Expr {
    /// All inverse branches of `y = self(var)`, written in terms of `y_name`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x^2").unwrap();
    /// let branches = f.inverse("x", "y").unwrap(); // [-y^0.5, y^0.5]
    /// ```
    pub fn inverse(&self, var: &str, y_name: &str) -> Result<Vec<Expr>, SymbolicError> {
        let simplified = self.simplify();
        let branches = peel(&simplified, Expr::Var(y_name.to_string()), var)?;
        Ok(branches.into_iter().map(|b| b.simplify()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    /// f(h(y)) = y for every branch at a sample y
    fn check_branches(input: &str, y: f64, expected_branches: usize) {
        let f = parse(input);
        let branches = f.inverse("x", "y").unwrap();
        assert_eq!(branches.len(), expected_branches, "{:?}", branches);
        for branch in branches {
            let x = branch.eval_expression(&["y"], &[y]).unwrap();
            let back = f.eval_expression(&["x"], &[x]).unwrap();
            assert_relative_eq!(back, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_square_has_two_branches() {
        let branches = parse("x^2").inverse("x", "y").unwrap();
        assert!(branches[0].equivalent_to(&-parse("y^0.5")));
        assert!(branches[1].equivalent_to(&parse("y^0.5")));
    }

    #[test]
    fn test_linear_and_elementary() {
        check_branches("2*x + 1", 5.0, 1);
        check_branches("exp(3*x)", 2.0, 1);
        check_branches("ln(x - 1)", 0.5, 1);
        check_branches("1/(x + 2)", 0.25, 1);
        check_branches("x^3", 8.0, 1);
        check_branches("2^x", 8.0, 1);
        check_branches("sin(x)", 0.5, 2);
        check_branches("cos(x)", 0.5, 2);
    }

    #[test]
    fn test_quadratic() {
        check_branches("x^2 + 2*x", 3.0, 2);
        check_branches("(x - 1)*(x + 3)", 1.0, 2);
    }

    #[test]
    fn test_not_invertible() {
        let err = parse("x*exp(x)").inverse("x", "y").unwrap_err();
        assert!(matches!(err, SymbolicError::NotInvertible { .. }));
        let err = parse("5").inverse("x", "y").unwrap_err();
        assert!(matches!(err, SymbolicError::NotInvertible { .. }));
    }
}
