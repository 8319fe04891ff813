//! Ratio (d'Alembert) test for sequences and series in the variable `n`.
//!
//! The ratio `a(n+1)/a(n)` is simplified symbolically first. When `n` survives the
//! simplification the limit is estimated from the values at two large `n` with one
//! Richardson step, which removes the `1/n` part of the error.
use crate::calculus::errors::CalculusError;
use crate::symbolic::parse_expr::IntoExpr;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::snap;
use log::debug;

const N_LARGE: f64 = 1e5;
/// terms checked for a positive sign before the ratio is taken
const SIGN_WINDOW: std::ops::Range<u32> = 50..60;
/// relative spread of the two samples accepted as convergence of the ratio
const SPREAD_TOLERANCE: f64 = 1e-3;
/// beyond this the ratio is taken to grow without bound
const RATIO_CEILING: f64 = 1e3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RatioLimit {
    Finite(f64),
    Infinite,
}

/// What the ratio test concludes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatioVerdict {
    Converges,
    Diverges,
    Inconclusive,
}

/// `lim a(n+1)/a(n)` for `n → ∞`.
pub fn ratio_limit(expr: &Expr) -> Result<RatioLimit, CalculusError> {
    let shifted = expr.substitute_variable("n", &(Expr::var("n") + Expr::Const(1.0)));
    let ratio = (shifted / expr.clone()).simplify();
    debug!("ratio a(n+1)/a(n) = {}", ratio);
    if let Some(r) = ratio.constant_value() {
        return Ok(RatioLimit::Finite(snap(r)));
    }
    let f = ratio.lambdify1D("n")?;
    let (near, far) = (f(N_LARGE), f(2.0 * N_LARGE));
    let diverges = || CalculusError::TestLimitDiverges(expr.to_string());
    if near.is_nan() || far.is_nan() {
        return Err(diverges());
    }
    if (near.is_infinite() || near > RATIO_CEILING) && far >= near {
        return Ok(RatioLimit::Infinite);
    }
    if (far - near).abs() > SPREAD_TOLERANCE * far.abs().max(1.0) {
        return Err(diverges());
    }
    let estimate = 2.0 * far - near;
    let rounded = estimate.round();
    // the Richardson step leaves an O(1/n^2) error
    let r = if (estimate - rounded).abs() < 1e-8 { rounded } else { estimate };
    Ok(RatioLimit::Finite(snap(r)))
}

/// the ratio test only applies to positive terms
fn check_positive(expr: &Expr) -> Result<(), CalculusError> {
    let a = expr.lambdify1D("n")?;
    for n in SIGN_WINDOW {
        let (current, next) = (a(n as f64), a(n as f64 + 1.0));
        if current < 0.0 || next < 0.0 {
            return Err(CalculusError::NotPositive {
                expr: expr.to_string(),
                ratio: next / current,
            });
        }
    }
    Ok(())
}

fn verdict(expr: &Expr) -> Result<RatioVerdict, CalculusError> {
    check_positive(expr)?;
    match ratio_limit(expr)? {
        RatioLimit::Infinite => Ok(RatioVerdict::Diverges),
        RatioLimit::Finite(r) if r < 0.0 => Err(CalculusError::NotPositive {
            expr: expr.to_string(),
            ratio: r,
        }),
        RatioLimit::Finite(r) if r < 1.0 => Ok(RatioVerdict::Converges),
        RatioLimit::Finite(r) if r > 1.0 => Ok(RatioVerdict::Diverges),
        RatioLimit::Finite(_) => Ok(RatioVerdict::Inconclusive),
    }
}

/// Whether the positive sequence `a(n)` tends to zero.
///
/// # Examples
/// ```rust, ignore
/// assert_eq!(seq_converg("2^(-n)").unwrap(), "The sequence 2^(-n) converges to zero.");
/// ```
pub fn seq_converg<E: IntoExpr>(expression: E) -> Result<String, CalculusError> {
    let expr = expression.into_expr()?;
    Ok(match verdict(&expr)? {
        RatioVerdict::Converges => format!("The sequence {} converges to zero.", expr),
        RatioVerdict::Diverges => format!("The sequence {} diverges.", expr),
        RatioVerdict::Inconclusive => format!("Nothing can be said about the sequence {}, try another method.", expr),
    })
}

/// Whether `Σ_{n>=1} a(n)` converges.
pub fn seri_converg<E: IntoExpr>(expression: E) -> Result<String, CalculusError> {
    let expr = expression.into_expr()?;
    Ok(match verdict(&expr)? {
        RatioVerdict::Converges => format!("The infinite series of the sequence {} converges.", expr),
        RatioVerdict::Diverges => format!("The infinite series of the sequence {} diverges.", expr),
        RatioVerdict::Inconclusive => {
            format!("Nothing can be said about the infinite series {}, try another method.", expr)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn limit(s: &str) -> RatioLimit {
        ratio_limit(&Expr::parse_expression(s).unwrap()).unwrap()
    }

    fn finite(s: &str) -> f64 {
        match limit(s) {
            RatioLimit::Finite(r) => r,
            RatioLimit::Infinite => panic!("infinite ratio limit for {}", s),
        }
    }

    #[test]
    fn test_ratio_limits() {
        assert_relative_eq!(finite("2^(-n)"), 0.5, epsilon = 1e-12);
        assert_eq!(finite("3^n"), 3.0);
        assert_eq!(finite("1/n"), 1.0);
        assert_eq!(finite("n^2"), 1.0);
        assert_relative_eq!(finite("n^2*2^(-n)"), 0.5, epsilon = 1e-8);
        assert_eq!(limit("exp(n^2)"), RatioLimit::Infinite);
    }

    #[test]
    fn test_messages() {
        let expr = Expr::parse_expression("2^(-n)").unwrap();
        assert_eq!(
            seq_converg(&expr).unwrap(),
            format!("The sequence {} converges to zero.", expr)
        );
        assert_eq!(
            seri_converg(&expr).unwrap(),
            format!("The infinite series of the sequence {} converges.", expr)
        );
        assert!(seq_converg("3^n").unwrap().ends_with("diverges."));
        assert!(seri_converg("1/n").unwrap().starts_with("Nothing can be said"));
        assert!(seq_converg("n").unwrap().starts_with("Nothing can be said"));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            seq_converg("(-2)^n"),
            Err(CalculusError::NotPositive { .. })
        ));
        assert!(matches!(
            seri_converg("2 + sin(n)"),
            Err(CalculusError::TestLimitDiverges(_))
        ));
    }
}
