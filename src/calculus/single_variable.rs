//! Calculus of one variable `x`: derivatives, tangent lines, roots, surfaces of
//! revolution and inverse functions.
use crate::Utils::config::LiMathConfig;
use crate::Utils::plots::plot_function_and_derivative;
use crate::calculus::errors::CalculusError;
use crate::symbolic::parse_expr::IntoExpr;
use crate::symbolic::symbolic_engine::{Equation, Expr};
use crate::symbolic::utils::linspace;
use gauss_quad::GaussLegendre;
use log::info;
use std::f64::consts::PI;
use std::path::Path;

/// Gauss–Legendre nodes used by `revolution_area`
const QUADRATURE_DEGREE: usize = 64;

/// `[f, f', ..., f^(n)]` with respect to `x`.
///
/// # Examples
/// ```rust, ignore
/// let derivatives = n_derivatives("x^4", 4).unwrap();
/// // [x^4, 4*x^3, 12*x^2, 24*x, 24]
/// ```
pub fn n_derivatives<E: IntoExpr>(expr: E, n: usize) -> Result<Vec<Expr>, CalculusError> {
    let mut derivatives = vec![expr.into_expr()?.simplify()];
    for _ in 0..n {
        let next = derivatives[derivatives.len() - 1].diff("x").simplify();
        derivatives.push(next);
    }
    Ok(derivatives)
}

/// Plots `f` and `f'` on `[-10, 10]` with 50 samples into a PNG file.
pub fn graph_fyd<E: IntoExpr>(expression: E, path: &Path, config: &LiMathConfig) -> Result<(), CalculusError> {
    let expr = expression.into_expr()?;
    let derivative = expr.diff("x").simplify();
    let domain = linspace(-10.0, 10.0, 50);
    let f = expr.evaluate_on("x", &domain)?;
    let df = derivative.evaluate_on("x", &domain)?;
    plot_function_and_derivative(&domain, &f, &df, "Function and derivative", path, config.plot_size())?;
    info!("f = {} and f' = {} plotted to {}", expr, derivative, path.display());
    Ok(())
}

/// `y = f'(x0) (x - x0) + f(x0)`.
///
/// # Examples
/// ```rust, ignore
/// let line = tangent_line("x^2", 1.0).unwrap();
/// assert_eq!(line.to_string(), "y = 2*x - 1");
/// ```
pub fn tangent_line<E: IntoExpr>(expression: E, x0: f64) -> Result<Equation, CalculusError> {
    let expr = expression.into_expr()?;
    let y0 = expr.eval_expression(&["x"], &[x0])?;
    let slope = expr.diff("x").eval_expression(&["x"], &[x0])?;
    let line = Expr::Const(slope) * (Expr::var("x") - Expr::Const(x0)) + Expr::Const(y0);
    Ok(Equation::new(Expr::var("y"), line.simplify()))
}

/// true if `f(number)` vanishes up to the default tolerance
pub fn root_f<E: IntoExpr>(expression: E, number: f64) -> Result<bool, CalculusError> {
    root_f_with_tolerance(expression, number, LiMathConfig::default().tolerance)
}

pub fn root_f_with_tolerance<E: IntoExpr>(
    expression: E,
    number: f64,
    tolerance: f64,
) -> Result<bool, CalculusError> {
    let value = expression.into_expr()?.eval_expression(&["x"], &[number])?;
    Ok(value.abs() <= tolerance)
}

/// Area of the surface swept by `f` rotating about the x axis over `[a, b]`:
/// `2π ∫_a^b f sqrt(1 + f'^2) dx`.
pub fn revolution_area<E: IntoExpr>(expression: E, a: f64, b: f64) -> Result<f64, CalculusError> {
    let expr = expression.into_expr()?;
    let f = expr.lambdify1D("x")?;
    let df = expr.diff("x").lambdify1D("x")?;
    let quad = GaussLegendre::new(QUADRATURE_DEGREE).map_err(|e| CalculusError::Quadrature(format!("{:?}", e)))?;
    let integral = quad.integrate(a, b, |x| {
        let slope = df(x);
        f(x) * (1.0 + slope * slope).sqrt()
    });
    Ok(2.0 * PI * integral)
}

/// All branches of the inverse of `y = f(x)`.
///
/// # Examples
/// ```rust, ignore
/// let branches = reverse_func("x^2").unwrap(); // [-y^0.5, y^0.5]
/// ```
pub fn reverse_func<E: IntoExpr>(expression: E) -> Result<Vec<Expr>, CalculusError> {
    Ok(expression.into_expr()?.inverse("x", "y")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::errors::SymbolicError;
    use approx::assert_relative_eq;

    #[test]
    fn test_n_derivatives() {
        let derivatives = n_derivatives("x^4", 4).unwrap();
        let printed: Vec<String> = derivatives.iter().map(|d| d.to_string()).collect();
        assert_eq!(printed, vec!["x^4", "4*x^3", "12*x^2", "24*x", "24"]);
        assert_eq!(n_derivatives("sin(x)", 0).unwrap().len(), 1);
    }

    #[test]
    fn test_tangent_line() {
        let line = tangent_line("x^2", 1.0).unwrap();
        assert_eq!(line.to_string(), "y = 2*x - 1");
        let line = tangent_line("exp(x)", 0.0).unwrap();
        assert!(line.rhs.equivalent_to(&Expr::parse_expression("x + 1").unwrap()));
    }

    #[test]
    fn test_root_f() {
        assert!(root_f("x^2 - 4", 2.0).unwrap());
        assert!(!root_f("x^2 - 4", 1.0).unwrap());
        assert!(root_f("sin(x)", std::f64::consts::PI).unwrap());
        assert!(matches!(
            root_f("x + q", 0.0),
            Err(CalculusError::Symbolic(SymbolicError::UnknownVariable(_)))
        ));
    }

    #[test]
    fn test_revolution_area() {
        // a cylinder of radius 1 and length 2
        assert_relative_eq!(revolution_area("1", 0.0, 2.0).unwrap(), 4.0 * PI, epsilon = 1e-10);
        // a cone: f = x on [0, 1] gives pi*sqrt(2)
        assert_relative_eq!(revolution_area("x", 0.0, 1.0).unwrap(), PI * 2f64.sqrt(), epsilon = 1e-10);
        // x^2 on [0, 2]: pi*(132*sqrt(17) - asinh(4))/32
        let exact = PI * (132.0 * 17f64.sqrt() - 4f64.asinh()) / 32.0;
        assert_relative_eq!(revolution_area("x^2", 0.0, 2.0).unwrap(), exact, epsilon = 1e-8);
    }

    #[test]
    fn test_reverse_func() {
        let branches = reverse_func("x^2").unwrap();
        assert_eq!(branches.len(), 2);
        let y = 9.0;
        let values: Vec<f64> = branches
            .iter()
            .map(|b| b.eval_expression(&["y"], &[y]).unwrap())
            .collect();
        assert_relative_eq!(values[0], -3.0, epsilon = 1e-12);
        assert_relative_eq!(values[1], 3.0, epsilon = 1e-12);
        assert!(reverse_func("x*sin(x)").is_err());
    }

    #[test]
    #[ignore]
    fn test_graph_fyd_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fyd.png");
        graph_fyd("x^3 - 2*x", &path, &LiMathConfig::default()).unwrap();
        assert!(path.exists());
    }
}
