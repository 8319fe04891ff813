//! # Constant Fitter
//!
//! Turns conditions `f(point) = value` into linear equations in the free constants and
//! solves them. A scalar solution takes every condition on `y`; a system solution takes
//! the first condition on `x` and the second on `y`.
use crate::ode::errors::OdeError;
use crate::ode::general_solver::{GeneralSolution, SystemSolution};
use crate::symbolic::linear_solve::solve_linear;
use crate::symbolic::symbolic_engine::{Equation, Expr};
use crate::symbolic::utils::snap;
use log::info;
use std::collections::BTreeMap;

/// constant name → value
pub type ConstantMap = BTreeMap<String, f64>;

/// `f(point) = value`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Condition {
    pub point: f64,
    pub value: f64,
}

impl Condition {
    pub fn new(point: f64, value: f64) -> Self {
        Condition { point, value }
    }
}

impl From<(f64, f64)> for Condition {
    fn from((point, value): (f64, f64)) -> Self {
        Condition { point, value }
    }
}

/// A family of solutions with free constants: what the fitter needs to know.
pub trait SolutionFamily {
    fn variable(&self) -> &str;
    fn constants(&self) -> &[String];
    /// the component the i-th condition applies to
    fn component(&self, condition_index: usize) -> &Expr;
}

impl SolutionFamily for GeneralSolution {
    fn variable(&self) -> &str {
        &self.variable
    }
    fn constants(&self) -> &[String] {
        &self.constants
    }
    fn component(&self, _condition_index: usize) -> &Expr {
        &self.expr
    }
}

impl SolutionFamily for SystemSolution {
    fn variable(&self) -> &str {
        &self.variable
    }
    fn constants(&self) -> &[String] {
        &self.constants
    }
    fn component(&self, condition_index: usize) -> &Expr {
        if condition_index == 0 { &self.x } else { &self.y }
    }
}

/// `f(point) = value` for every condition, with the point substituted and simplified.
pub fn constant_equations<S: SolutionFamily>(solution: &S, conditions: &[Condition]) -> Vec<Equation> {
    conditions
        .iter()
        .enumerate()
        .map(|(i, condition)| {
            let at_point = solution
                .component(i)
                .set_variable(solution.variable(), condition.point)
                .simplify();
            Equation::new(at_point, Expr::Const(condition.value))
        })
        .collect()
}

/// Solves equations linear in `constants`.
///
/// # Errors
/// `NoSolution` for inconsistent equations, `MultipleSolutions` when they do not pin every
/// constant down, `NonlinearConstants` when a constant enters non-linearly,
/// `SingularCondition` when a condition sits where the solution is infinite or undefined.
pub fn solve_for_constants(equations: &[Equation], constants: &[String]) -> Result<ConstantMap, OdeError> {
    let residuals: Vec<Expr> = equations.iter().map(|eq| eq.residual()).collect();
    let values = solve_linear(&residuals, constants).map_err(|e| OdeError::from_fit(e, equations))?;
    Ok(values.into_iter().map(|(name, v)| (name, snap(v))).collect())
}

fn check_counts(constants: usize, conditions: usize) -> Result<(), OdeError> {
    if conditions < constants {
        return Err(OdeError::UnderDetermined { constants, conditions });
    }
    if conditions > constants {
        return Err(OdeError::OverDetermined { constants, conditions });
    }
    Ok(())
}

fn fit<S: SolutionFamily>(solution: &S, conditions: &[Condition]) -> Result<ConstantMap, OdeError> {
    check_counts(solution.constants().len(), conditions.len())?;
    let equations = constant_equations(solution, conditions);
    let constants = solve_for_constants(&equations, solution.constants())?;
    info!("fitted constants: {:?}", constants);
    Ok(constants)
}

/// Values of `C1..Cn` for which the scalar solution meets every condition.
///
/// # Examples
/// ```rust, ignore
/// let ode = LinearOde::first_order(vec!["t", "2", "2 + t"]).unwrap();
/// let general = solve_general(&ode).unwrap();
/// let constants = fit_constants(&general, &[Condition::new(1.0, 0.0)]).unwrap();
/// assert_eq!(constants["C1"], -4.0 / 3.0);
/// ```
pub fn fit_constants(solution: &GeneralSolution, conditions: &[Condition]) -> Result<ConstantMap, OdeError> {
    fit(solution, conditions)
}

/// Values of `C1, C2` for `x(t1) = v1`, `y(t2) = v2`.
pub fn fit_system_constants(
    solution: &SystemSolution,
    conditions: &[Condition],
) -> Result<ConstantMap, OdeError> {
    fit(solution, conditions)
}
