//! # Symbolic Engine Derivatives Module
//!
//! Differentiation, evaluation and lambdification of [`Expr`] trees.
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var: &str)` - analytical partial/total derivative (raw tree, call `simplify()` to tidy)
//! - `n_th_derivative(var, n)` - higher-order derivatives, simplified after every step
//!
//! ### Function evaluation
//! - `eval_expression(vars, values)` - direct evaluation without closure creation
//! - `lambdify(vars)` - thread safe closure `&[f64] -> f64`
//! - `lambdify1D(var)` - thread safe closure `f64 -> f64`
//! - `evaluate_on(var, points)` - evaluation over a grid
//!
//! ### Numerical Analysis
//! - `compare_num1D()` - validate an analytical derivative against central differences
//!
//! Evaluation never panics on a missing variable: every entry point returns
//! `SymbolicError::UnknownVariable` instead.

use crate::symbolic::errors::SymbolicError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{linspace, numerical_derivative};

/// thread safe compiled expression of several variables
pub type LambdifiedFn = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;
/// thread safe compiled expression of one variable
pub type LambdifiedFn1D = Box<dyn Fn(f64) -> f64 + Send + Sync>;

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements the standard rules (sum, product, quotient, chain). Powers with a
    /// variable exponent use `d(b^e) = b^e * (e' ln b + e b'/b)`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.clone().pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x").simplify(); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Pow(rhs.clone(), Box::new(Expr::Const(2.0)))),
            ),
            Expr::Pow(base, exp) if !exp.contains_variable(var) => Expr::Mul(
                Box::new(Expr::Mul(
                    exp.clone(),
                    Box::new(Expr::Pow(
                        base.clone(),
                        Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                    )),
                )),
                Box::new(base.diff(var)),
            ),
            Expr::Pow(base, exp) => Expr::Mul(
                Box::new(self.clone()),
                Box::new(Expr::Add(
                    Box::new(Expr::Mul(Box::new(exp.diff(var)), Box::new(Expr::Ln(base.clone())))),
                    Box::new(Expr::Div(
                        Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                        base.clone(),
                    )),
                )),
            ),
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::cos(expr.clone())),
                    Box::new(Expr::Const(2.0)),
                )),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
        }
    } // end of diff

    /// Computes the nth derivative, simplifying after every step so the tree stays small.
    /// `n = 0` returns the simplified expression itself.
    pub fn n_th_derivative(&self, var_name: &str, n: usize) -> Expr {
        let mut expr = self.simplify();
        for _ in 0..n {
            expr = expr.diff(var_name).simplify();
        }
        expr
    }

    /// EVALUATION

    /// Evaluates the expression for the given variable values.
    ///
    /// # Errors
    /// `UnknownVariable` if the tree holds a variable that is not in `vars`.
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> Result<f64, SymbolicError> {
        let value = match self {
            Expr::Var(name) => {
                let index = vars
                    .iter()
                    .position(|&x| x == name)
                    .ok_or_else(|| SymbolicError::UnknownVariable(name.clone()))?;
                values
                    .get(index)
                    .copied()
                    .ok_or_else(|| SymbolicError::UnknownVariable(name.clone()))?
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => lhs.eval_expression(vars, values)? + rhs.eval_expression(vars, values)?,
            Expr::Sub(lhs, rhs) => lhs.eval_expression(vars, values)? - rhs.eval_expression(vars, values)?,
            Expr::Mul(lhs, rhs) => lhs.eval_expression(vars, values)? * rhs.eval_expression(vars, values)?,
            Expr::Div(lhs, rhs) => lhs.eval_expression(vars, values)? / rhs.eval_expression(vars, values)?,
            Expr::Pow(base, exp) => base
                .eval_expression(vars, values)?
                .powf(exp.eval_expression(vars, values)?),
            Expr::Exp(expr) => expr.eval_expression(vars, values)?.exp(),
            Expr::Ln(expr) => expr.eval_expression(vars, values)?.ln(),
            Expr::sin(expr) => expr.eval_expression(vars, values)?.sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values)?.cos(),
            Expr::tg(expr) => expr.eval_expression(vars, values)?.tan(),
            Expr::arcsin(expr) => expr.eval_expression(vars, values)?.asin(),
            Expr::arccos(expr) => expr.eval_expression(vars, values)?.acos(),
            Expr::arctg(expr) => expr.eval_expression(vars, values)?.atan(),
        };
        Ok(value)
    }

    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Compiles the expression into a closure taking the values of `vars` in order.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("x*y + 1").unwrap();
    /// let func = f.lambdify(&["x", "y"]).unwrap();
    /// assert_eq!(func(&[2.0, 3.0]), 7.0);
    /// ```
    pub fn lambdify(&self, vars: &[&str]) -> Result<LambdifiedFn, SymbolicError> {
        let compiled: LambdifiedFn = match self {
            Expr::Var(name) => {
                let index = vars
                    .iter()
                    .position(|&x| x == name)
                    .ok_or_else(|| SymbolicError::UnknownVariable(name.clone()))?;
                Box::new(move |args| args[index])
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let lf = lhs.lambdify(vars)?;
                let rf = rhs.lambdify(vars)?;
                Box::new(move |args| lf(args) + rf(args))
            }
            Expr::Sub(lhs, rhs) => {
                let lf = lhs.lambdify(vars)?;
                let rf = rhs.lambdify(vars)?;
                Box::new(move |args| lf(args) - rf(args))
            }
            Expr::Mul(lhs, rhs) => {
                let lf = lhs.lambdify(vars)?;
                let rf = rhs.lambdify(vars)?;
                Box::new(move |args| lf(args) * rf(args))
            }
            Expr::Div(lhs, rhs) => {
                let lf = lhs.lambdify(vars)?;
                let rf = rhs.lambdify(vars)?;
                Box::new(move |args| lf(args) / rf(args))
            }
            Expr::Pow(b, e) => {
                let bf = b.lambdify(vars)?;
                let ef = e.lambdify(vars)?;
                Box::new(move |args| bf(args).powf(ef(args)))
            }
            Expr::Exp(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).exp())
            }
            Expr::Ln(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).ln())
            }
            Expr::sin(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).sin())
            }
            Expr::cos(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).cos())
            }
            Expr::tg(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).tan())
            }
            Expr::arcsin(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).asin())
            }
            Expr::arccos(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).acos())
            }
            Expr::arctg(e) => {
                let f = e.lambdify(vars)?;
                Box::new(move |args| f(args).atan())
            }
        };
        Ok(compiled)
    }

    /// Compiles an expression of the single variable `var` (constants are allowed).
    pub fn lambdify1D(&self, var: &str) -> Result<LambdifiedFn1D, SymbolicError> {
        let compiled = self.lambdify(&[var])?;
        Ok(Box::new(move |x| compiled(&[x])))
    }

    /// Values of the expression at each of `points`.
    pub fn evaluate_on(&self, var: &str, points: &[f64]) -> Result<Vec<f64>, SymbolicError> {
        let f = self.lambdify1D(var)?;
        Ok(points.iter().map(|&x| f(x)).collect())
    }

    /// Compares the analytical derivative with a central-difference one on a grid.
    /// Returns the largest deviation and whether it is below `max_norm`.
    pub fn compare_num1D(
        &self,
        var: &str,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> Result<(f64, bool), SymbolicError> {
        let f = self.lambdify1D(var)?;
        let df = self.diff(var).lambdify1D(var)?;
        let norm = linspace(start, end, num_values)
            .into_iter()
            .map(|x| (df(x) - numerical_derivative(&f, x, 1e-5)).abs())
            .fold(0.0_f64, f64::max);
        Ok((norm, norm < max_norm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    #[test]
    fn test_diff_polynomial() {
        let df = parse("t^3 + 2*t").diff("t").simplify();
        assert!(df.equivalent_to(&parse("3*t^2 + 2")));
    }

    #[test]
    fn test_diff_variable_exponent() {
        let df = parse("2^t").diff("t");
        let value = df.eval_expression(&["t"], &[1.0]).unwrap();
        assert_relative_eq!(value, 2.0 * 2.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_diff_matches_numerics() {
        for input in ["sin(t)*exp(-t)", "ln(t^2 + 1)", "t/(t + 1)", "arctan(2*t)", "tan(t)"] {
            let (norm, ok) = parse(input).compare_num1D("t", 0.1, 1.0, 20, 1e-6).unwrap();
            assert!(ok, "{} deviates by {}", input, norm);
        }
    }

    #[test]
    fn test_n_th_derivative() {
        let d3 = parse("t^4").n_th_derivative("t", 3);
        assert!(d3.equivalent_to(&parse("24*t")));
        let d0 = parse("t + t").n_th_derivative("t", 0);
        assert_eq!(d0, parse("2*t"));
        let d2 = parse("sin(t)").n_th_derivative("t", 2);
        assert!(d2.equivalent_to(&parse("-sin(t)")));
    }

    #[test]
    fn test_eval_unknown_variable() {
        let err = parse("x + y").eval_expression(&["x"], &[1.0]).unwrap_err();
        assert_eq!(err, SymbolicError::UnknownVariable("y".to_string()));
        assert!(parse("x + y").lambdify(&["x"]).is_err());
    }

    #[test]
    fn test_lambdify() {
        let f = parse("x*y + 1").lambdify(&["x", "y"]).unwrap();
        assert_relative_eq!(f(&[2.0, 3.0]), 7.0);
        let g = parse("exp(t)").lambdify1D("t").unwrap();
        assert_relative_eq!(g(1.0), std::f64::consts::E);
        let values = parse("t^2").evaluate_on("t", &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(values, vec![1.0, 4.0, 9.0]);
    }
}
