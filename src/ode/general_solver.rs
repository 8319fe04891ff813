//! # General Solver
//!
//! Closed-form general solutions with free constants `C1`, `C2`:
//! - first order `p y' + q y = g`, any coefficients the integrator can handle:
//!   `μ = exp(∫ q/p dt)`, `y = (∫ μ g/p dt + C1) / μ`
//! - second order with constant numeric `a, b, c`: homogeneous basis from the roots of
//!   `a r^2 + b r + c`, particular solution by undetermined coefficients
//!   (see [`crate::ode::undetermined_coefficients`])
//!
//! 2x2 systems live in [`crate::ode::linear_system`].
use crate::ode::equation_builder::{LinearOde, LinearSystem2};
use crate::ode::errors::OdeError;
use crate::ode::undetermined_coefficients::particular_solution;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_integration::integrate_sum;
use crate::symbolic::symbolic_simplify::{Factor, FuncKind, Sum, exp_of, func_of};
use crate::symbolic::utils::snap;
use log::{debug, info};

/// `C1..Cn`
pub fn constant_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("C{}", i)).collect()
}

/// Family of solutions of a scalar ODE, parametrised by `constants`.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneralSolution {
    pub function: String,
    pub variable: String,
    pub expr: Expr,
    pub constants: Vec<String>,
}

impl GeneralSolution {
    /// true if the family satisfies the equation for every value of the constants
    pub fn verify(&self, ode: &LinearOde) -> bool {
        ode.residual(&self.expr).is_identically_zero()
    }
}

impl std::fmt::Display for GeneralSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}({}) = {}", self.function, self.variable, self.expr)
    }
}

/// Family of solutions `(x(t), y(t))` of a 2x2 system.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemSolution {
    pub variable: String,
    pub x: Expr,
    pub y: Expr,
    pub constants: Vec<String>,
}

impl SystemSolution {
    pub fn verify(&self, system: &LinearSystem2) -> bool {
        let t = &self.variable;
        let [[a, b], [c, d]] = &system.matrix;
        let rx = self.x.diff(t) - (a.clone() * self.x.clone() + b.clone() * self.y.clone());
        let ry = self.y.diff(t) - (c.clone() * self.x.clone() + d.clone() * self.y.clone());
        rx.is_identically_zero() && ry.is_identically_zero()
    }
}

impl std::fmt::Display for SystemSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let t = &self.variable;
        write!(f, "x({}) = {}, y({}) = {}", t, self.x, t, self.y)
    }
}

/// Roots of the characteristic polynomial `a r^2 + b r + c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CharacteristicRoots {
    /// larger root first
    Distinct(f64, f64),
    Repeated(f64),
    /// `re ± i·im`, `im > 0`
    Complex { re: f64, im: f64 },
}

/// relative closeness used when matching roots and exponents
pub(crate) fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

impl CharacteristicRoots {
    /// `a` must be non-zero.
    pub fn of(a: f64, b: f64, c: f64) -> Self {
        let disc = b * b - 4.0 * a * c;
        let tol = 1e-12 * (b * b).max((4.0 * a * c).abs());
        if disc.abs() <= tol {
            CharacteristicRoots::Repeated(snap(-b / (2.0 * a)))
        } else if disc > 0.0 {
            let root = disc.sqrt();
            let r1 = snap((-b + root) / (2.0 * a));
            let r2 = snap((-b - root) / (2.0 * a));
            CharacteristicRoots::Distinct(r1.max(r2), r1.min(r2))
        } else {
            CharacteristicRoots::Complex {
                re: snap(-b / (2.0 * a)),
                im: snap((-disc).sqrt() / (2.0 * a).abs()),
            }
        }
    }

    /// How many times `k + i w` (`w >= 0`) is a root.
    pub fn multiplicity(&self, k: f64, w: f64) -> usize {
        match *self {
            CharacteristicRoots::Distinct(r1, r2) if close(w, 0.0) => {
                usize::from(close(r1, k)) + usize::from(close(r2, k))
            }
            CharacteristicRoots::Repeated(r) if close(w, 0.0) && close(r, k) => 2,
            CharacteristicRoots::Complex { re, im } if close(re, k) && close(im, w) => 1,
            _ => 0,
        }
    }

    /// Two independent solutions of the homogeneous equation.
    pub fn basis(&self, t: &str) -> [Sum; 2] {
        match *self {
            CharacteristicRoots::Distinct(r1, r2) => [exp_t(r1, t), exp_t(r2, t)],
            CharacteristicRoots::Repeated(r) => [
                exp_t(r, t),
                Sum::from_factor(Factor::Symbol(t.to_string()), 1.0).mul(&exp_t(r, t)),
            ],
            CharacteristicRoots::Complex { re, im } => {
                let wt = Sum::symbol(t).scale(im);
                [
                    exp_t(re, t).mul(&func_of(FuncKind::Cos, &wt)),
                    exp_t(re, t).mul(&func_of(FuncKind::Sin, &wt)),
                ]
            }
        }
    }
}

/// `exp(k*t)`, which is 1 for `k = 0`
pub(crate) fn exp_t(k: f64, t: &str) -> Sum {
    exp_of(&Sum::symbol(t).scale(k))
}

fn unsolvable(ode: &LinearOde, reason: String) -> OdeError {
    OdeError::Unsolvable {
        equation: ode.to_string(),
        reason,
    }
}

/// `p y' + q y = g` by an integrating factor.
fn solve_first_order(ode: &LinearOde) -> Result<GeneralSolution, OdeError> {
    let t = ode.variable.as_str();
    let p = ode.coefficients[0].canonical();
    let q = ode.coefficients[1].canonical();
    if p.is_zero() {
        return Err(unsolvable(ode, "the coefficient of y' vanishes".to_string()));
    }
    let inverse_p = p.powf(-1.0);
    let ratio = q.mul(&inverse_p);
    let exponent = integrate_sum(&ratio, t)
        .ok_or_else(|| unsolvable(ode, format!("no closed form for the integral of {}", ratio.to_expr())))?;
    let mu = exp_of(&exponent);
    debug!("integrating factor: {}", mu.to_expr());

    let integrand = mu.mul(&ode.forcing.canonical()).mul(&inverse_p);
    let integral = integrate_sum(&integrand, t).ok_or_else(|| {
        unsolvable(ode, format!("no closed form for the integral of {}", integrand.to_expr()))
    })?;
    let constants = constant_names(1);
    let y = integral.add(&Sum::symbol(&constants[0])).mul(&mu.powf(-1.0));
    Ok(GeneralSolution {
        function: ode.function.clone(),
        variable: ode.variable.clone(),
        expr: y.to_expr(),
        constants,
    })
}

/// `a y'' + b y' + c y = g` with numeric `a, b, c`.
fn solve_second_order(ode: &LinearOde) -> Result<GeneralSolution, OdeError> {
    let t = ode.variable.as_str();
    let coefficients = ode
        .constant_coefficients()
        .ok_or_else(|| unsolvable(ode, "only constant coefficients are supported".to_string()))?;
    let (a, b, c) = (coefficients[0], coefficients[1], coefficients[2]);
    if a == 0.0 {
        return Err(unsolvable(ode, "the coefficient of y'' vanishes".to_string()));
    }
    let roots = CharacteristicRoots::of(a, b, c);
    debug!("characteristic roots of {}r^2 + {}r + {}: {:?}", a, b, c, roots);

    let constants = constant_names(2);
    let [first, second] = roots.basis(t);
    let homogeneous = Sum::symbol(&constants[0])
        .mul(&first)
        .add(&Sum::symbol(&constants[1]).mul(&second));
    let particular = particular_solution([a, b, c], &roots, &ode.forcing, t)
        .map_err(|reason| unsolvable(ode, reason))?;
    Ok(GeneralSolution {
        function: ode.function.clone(),
        variable: ode.variable.clone(),
        expr: homogeneous.add(&particular).to_expr(),
        constants,
    })
}

/// General solution of a first or second order linear ODE.
///
/// # Examples
/// ```rust, ignore
/// let ode = LinearOde::first_order(vec!["t", "2", "2 + t"]).unwrap();
/// let general = solve_general(&ode).unwrap();
/// assert_eq!(general.expr.to_string(), "C1/t^2 + t/3 + 1");
/// ```
pub fn solve_general(ode: &LinearOde) -> Result<GeneralSolution, OdeError> {
    info!("solving {}", ode);
    let solution = match ode.order {
        1 => solve_first_order(ode)?,
        2 => solve_second_order(ode)?,
        other => {
            return Err(OdeError::InvalidShape {
                expected: "order 1 or 2".to_string(),
                found: format!("order {}", other),
            });
        }
    };
    info!("general solution: {}", solution);
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    #[test]
    fn test_first_order_textbook() {
        let ode = LinearOde::first_order(vec!["t", "2", "2 + t"]).unwrap();
        let general = solve_general(&ode).unwrap();
        assert_eq!(general.expr.to_string(), "C1/t^2 + t/3 + 1");
        assert_eq!(general.constants, vec!["C1".to_string()]);
        assert!(general.verify(&ode));
    }

    #[test]
    fn test_first_order_variable_coefficients() {
        for coeffs in [
            vec!["1", "1", "0"],
            vec!["1", "-2", "exp(t)"],
            vec!["1", "2", "t"],
            vec!["2", "4", "sin(t)"],
            vec!["t", "1", "t^2"],
        ] {
            let ode = LinearOde::first_order(coeffs.clone()).unwrap();
            let general = solve_general(&ode).unwrap();
            assert!(general.verify(&ode), "{:?} -> {}", coeffs, general);
        }
    }

    #[test]
    fn test_first_order_squared_sine_forcing() {
        let ode = LinearOde::first_order(vec!["1", "0", "sin(t)^2"]).unwrap();
        let general = solve_general(&ode).unwrap();
        assert!(general.verify(&ode), "{}", general);
        assert!(general.expr.equivalent_to(&parse("C1 + t/2 - sin(2*t)/4")));
        let slope = general.expr.diff("t").eval_expression(&["t", "C1"], &[0.7, 0.0]).unwrap();
        assert_relative_eq!(slope, 0.7f64.sin().powi(2), epsilon = 1e-12);
    }

    #[test]
    fn test_first_order_unsolvable() {
        let ode = LinearOde::first_order(vec!["0", "1", "1"]).unwrap();
        assert!(matches!(solve_general(&ode), Err(OdeError::Unsolvable { .. })));
        // the integrating factor is exp(t^2) and exp(3*t^2) has no elementary antiderivative
        let ode = LinearOde::first_order(vec!["1", "2*t", "exp(2*t^2)"]).unwrap();
        assert!(matches!(solve_general(&ode), Err(OdeError::Unsolvable { .. })));
    }

    #[test]
    fn test_roots() {
        assert_eq!(CharacteristicRoots::of(1.0, -1.0, -6.0), CharacteristicRoots::Distinct(3.0, -2.0));
        assert_eq!(CharacteristicRoots::of(1.0, 2.0, 1.0), CharacteristicRoots::Repeated(-1.0));
        assert_eq!(
            CharacteristicRoots::of(1.0, 2.0, 5.0),
            CharacteristicRoots::Complex { re: -1.0, im: 2.0 }
        );
        let roots = CharacteristicRoots::of(1.0, 0.0, 4.0);
        assert_eq!(roots.multiplicity(0.0, 2.0), 1);
        assert_eq!(roots.multiplicity(0.0, 1.0), 0);
        assert_eq!(CharacteristicRoots::of(1.0, -2.0, 1.0).multiplicity(1.0, 0.0), 2);
        assert_eq!(CharacteristicRoots::of(1.0, -1.0, 0.0).multiplicity(0.0, 0.0), 1);
    }

    #[test]
    fn test_second_order_homogeneous() {
        for coeffs in [[1.0, -1.0, -6.0], [1.0, 2.0, 1.0], [1.0, 2.0, 5.0], [2.0, 0.0, 8.0], [1.0, 3.0, 0.0]] {
            let mut input = coeffs.to_vec();
            input.push(0.0);
            let ode = LinearOde::second_order(input).unwrap();
            let general = solve_general(&ode).unwrap();
            assert_eq!(general.constants.len(), 2);
            assert!(general.verify(&ode), "{:?} -> {}", coeffs, general);
        }
        let ode = LinearOde::second_order(vec![1, 0, 1, 0]).unwrap();
        let general = solve_general(&ode).unwrap();
        assert!(general.expr.equivalent_to(&parse("C1*cos(t) + C2*sin(t)")));
    }

    #[test]
    fn test_second_order_forced() {
        for forcing in [
            "t^2",
            "exp(2*t)",
            "exp(3*t)",
            "t*exp(-2*t)",
            "sin(t)",
            "cos(2*t + 1)",
            "exp(-t)*sin(3*t)",
            "5 + t*cos(t)",
        ] {
            let ode = LinearOde::second_order(vec!["1", "-1", "-6", forcing]).unwrap();
            let general = solve_general(&ode).unwrap();
            assert!(general.verify(&ode), "{} -> {}", forcing, general);
        }
    }

    #[test]
    fn test_resonance() {
        // sin(2t) and cos(2t) solve the homogeneous equation
        let ode = LinearOde::second_order(vec!["1", "0", "4", "sin(2*t)"]).unwrap();
        let general = solve_general(&ode).unwrap();
        assert!(general.verify(&ode));
        // repeated root hit by the forcing term needs t^2
        let ode = LinearOde::second_order(vec!["1", "-2", "1", "exp(t)"]).unwrap();
        let general = solve_general(&ode).unwrap();
        assert!(general.verify(&ode));
        let at_zero_constants = general.expr.set_variable("C1", 0.0).set_variable("C2", 0.0);
        let value = at_zero_constants.eval_expression(&["t"], &[1.0]).unwrap();
        assert_relative_eq!(value, 0.5 * 1f64.exp(), epsilon = 1e-10);
    }

    #[test]
    fn test_second_order_unsolvable() {
        let ode = LinearOde::second_order(vec!["t", "0", "1", "0"]).unwrap();
        assert!(matches!(solve_general(&ode), Err(OdeError::Unsolvable { .. })));
        let ode = LinearOde::second_order(vec!["0", "1", "1", "0"]).unwrap();
        assert!(matches!(solve_general(&ode), Err(OdeError::Unsolvable { .. })));
        let ode = LinearOde::second_order(vec!["1", "0", "1", "ln(t)"]).unwrap();
        assert!(matches!(solve_general(&ode), Err(OdeError::Unsolvable { .. })));
        let ode = LinearOde::second_order(vec!["1", "0", "1", "k*t"]).unwrap();
        assert!(matches!(solve_general(&ode), Err(OdeError::Unsolvable { .. })));
    }
}
