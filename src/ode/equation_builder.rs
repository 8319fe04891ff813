//! # Equation Builder
//!
//! Assembles linear ODEs from coefficient vectors:
//! - first order `[p, q, g]`: `p(t) y' + q(t) y = g(t)`
//! - second order `[a, b, c, g]`: `a(t) y'' + b(t) y' + c(t) y = g(t)`
//! - 2×2 systems `[[a, b], [c, d]]`: `x' = a x + b y`, `y' = c x + d y`
//!
//! Coefficients are anything implementing [`IntoExpr`]: strings are parsed, numbers become
//! constants, expressions pass through. The independent variable is always `t`, the
//! unknown functions `y` (scalar case) or `x`, `y` (systems).

use crate::ode::errors::OdeError;
use crate::symbolic::parse_expr::IntoExpr;
use crate::symbolic::symbolic_engine::{Equation, Expr};

/// name of the independent variable
pub const T: &str = "t";

/// Scalar linear ODE `Σ coefficients[i] · y^(order - i) = forcing`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearOde {
    pub order: usize,
    /// leading coefficient first
    pub coefficients: Vec<Expr>,
    pub forcing: Expr,
    pub variable: String,
    pub function: String,
}

fn collect_exprs<E: IntoExpr>(items: Vec<E>) -> Result<Vec<Expr>, OdeError> {
    items
        .into_iter()
        .map(|item| item.into_expr().map_err(OdeError::from))
        .collect()
}

impl LinearOde {
    /// `[p, q, g]` for `p y' + q y = g`.
    pub fn first_order<E: IntoExpr>(coeffs: Vec<E>) -> Result<Self, OdeError> {
        Self::from_coefficients(1, coeffs)
    }

    /// `[a, b, c, g]` for `a y'' + b y' + c y = g`.
    pub fn second_order<E: IntoExpr>(coeffs: Vec<E>) -> Result<Self, OdeError> {
        Self::from_coefficients(2, coeffs)
    }

    /// Checks that there are exactly `order + 2` entries (coefficients of `y^(order)`..`y`
    /// and the forcing term).
    pub fn from_coefficients<E: IntoExpr>(order: usize, coeffs: Vec<E>) -> Result<Self, OdeError> {
        if !(1..=2).contains(&order) {
            return Err(OdeError::InvalidShape {
                expected: "order 1 or 2".to_string(),
                found: format!("order {}", order),
            });
        }
        if coeffs.len() != order + 2 {
            return Err(OdeError::InvalidShape {
                expected: format!("{} coefficients for an order {} equation", order + 2, order),
                found: format!("{} coefficients", coeffs.len()),
            });
        }
        let mut exprs = collect_exprs(coeffs)?;
        let forcing = exprs.pop().unwrap_or(Expr::Const(0.0));
        Ok(LinearOde {
            order,
            coefficients: exprs,
            forcing,
            variable: T.to_string(),
            function: "y".to_string(),
        })
    }

    /// placeholder symbol for the i-th derivative: `y`, `y'`, `y''`
    fn derivative_symbol(&self, i: usize) -> Expr {
        Expr::Var(format!("{}{}", self.function, "'".repeat(i)))
    }

    /// The equation with derivative placeholders, e.g. `t*y' + 2*y = 2 + t`.
    pub fn equation(&self) -> Equation {
        let lhs = self
            .coefficients
            .iter()
            .enumerate()
            .map(|(i, c)| c.clone() * self.derivative_symbol(self.order - i))
            .reduce(|acc, term| acc + term)
            .unwrap_or(Expr::Const(0.0));
        Equation::new(lhs, self.forcing.clone())
    }

    /// `Σ c_i · d^(order-i) candidate / dt^(order-i) − g`, simplified.
    pub fn residual(&self, candidate: &Expr) -> Expr {
        let mut derivatives = vec![candidate.clone()];
        for _ in 0..self.order {
            let next = derivatives[derivatives.len() - 1].diff(&self.variable).simplify();
            derivatives.push(next);
        }
        let lhs = self
            .coefficients
            .iter()
            .enumerate()
            .map(|(i, c)| c.clone() * derivatives[self.order - i].clone())
            .fold(Expr::Const(0.0), |acc, term| acc + term);
        (lhs - self.forcing.clone()).simplify()
    }

    /// Numeric values of the coefficients when none of them depends on anything.
    pub fn constant_coefficients(&self) -> Option<Vec<f64>> {
        self.coefficients.iter().map(|c| c.constant_value()).collect()
    }
}

/// 2×2 linear system `x' = a x + b y`, `y' = c x + d y`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearSystem2 {
    pub matrix: [[Expr; 2]; 2],
    pub variable: String,
}

impl LinearSystem2 {
    /// Builds the system from rows; anything other than two rows of two entries is
    /// `InvalidShape`.
    pub fn from_matrix<E: IntoExpr>(rows: Vec<Vec<E>>) -> Result<Self, OdeError> {
        let shape: Vec<usize> = rows.iter().map(|r| r.len()).collect();
        if shape != [2, 2] {
            return Err(OdeError::InvalidShape {
                expected: "a 2x2 matrix".to_string(),
                found: format!("rows of lengths {:?}", shape),
            });
        }
        let mut entries = rows.into_iter().flat_map(collect_row);
        let mut next = || entries.next().unwrap_or(Ok(Expr::Const(0.0)));
        let matrix = [[next()?, next()?], [next()?, next()?]];
        Ok(LinearSystem2 {
            matrix,
            variable: T.to_string(),
        })
    }

    /// `[x' = a*x + b*y, y' = c*x + d*y]`
    pub fn equations(&self) -> [Equation; 2] {
        let (x, y) = (Expr::var("x"), Expr::var("y"));
        let row = |i: usize| {
            self.matrix[i][0].clone() * x.clone() + self.matrix[i][1].clone() * y.clone()
        };
        [
            Equation::new(Expr::var("x'"), row(0)),
            Equation::new(Expr::var("y'"), row(1)),
        ]
    }

    /// Entries as numbers, or `Unsolvable` when one of them is symbolic.
    pub fn numeric(&self) -> Result<[[f64; 2]; 2], OdeError> {
        let value = |e: &Expr| {
            e.constant_value().ok_or_else(|| OdeError::Unsolvable {
                equation: self.to_string(),
                reason: format!("coefficient {} is not a constant", e),
            })
        };
        Ok([
            [value(&self.matrix[0][0])?, value(&self.matrix[0][1])?],
            [value(&self.matrix[1][0])?, value(&self.matrix[1][1])?],
        ])
    }
}

fn collect_row<E: IntoExpr>(row: Vec<E>) -> Vec<Result<Expr, OdeError>> {
    row.into_iter()
        .map(|e| e.into_expr().map_err(OdeError::from))
        .collect()
}

impl std::fmt::Display for LinearOde {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.equation())
    }
}

impl std::fmt::Display for LinearSystem2 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let [first, second] = self.equations();
        write!(f, "{}; {}", first, second)
    }
}
