//! One-call entry points: Build → Solve → Fit → Assemble.
use crate::Utils::config::LiMathConfig;
use crate::Utils::plots::{plot_phase_portrait, plot_slope_field};
use crate::ode::assembler::{assemble, assemble_system};
use crate::ode::constant_fitter::{Condition, constant_equations, fit_constants, fit_system_constants};
use crate::ode::equation_builder::{LinearOde, LinearSystem2};
use crate::ode::errors::OdeError;
use crate::ode::general_solver::{GeneralSolution, SystemSolution, solve_general};
use crate::ode::linear_system::solve_system_general;
use crate::ode::visualization::{PhasePortrait, SlopeField, phase_portrait, slope_field};
use crate::symbolic::parse_expr::IntoExpr;
use crate::symbolic::symbolic_engine::{Equation, Expr};
use std::path::Path;

/// General solution of `p y' + q y = g` from `[p, q, g]`.
pub fn first_ode<E: IntoExpr>(coeffs: Vec<E>) -> Result<GeneralSolution, OdeError> {
    solve_general(&LinearOde::first_order(coeffs)?)
}

/// General solution of `a y'' + b y' + c y = g` from `[a, b, c, g]`.
pub fn second_ode<E: IntoExpr>(coeffs: Vec<E>) -> Result<GeneralSolution, OdeError> {
    solve_general(&LinearOde::second_order(coeffs)?)
}

/// General solution of `x' = a x + b y, y' = c x + d y` from `[[a, b], [c, d]]`.
pub fn system_ode<E: IntoExpr>(matrix: Vec<Vec<E>>) -> Result<SystemSolution, OdeError> {
    solve_system_general(&LinearSystem2::from_matrix(matrix)?)
}

/// `y(point) = value` with the first order general solution.
///
/// # Examples
/// ```rust, ignore
/// let y = solve_ivp_first_order(vec!["t", "2", "2 + t"], &[Condition::new(1.0, 0.0)]).unwrap();
/// assert_eq!(y.to_string(), "-4/(3*t^2) + t/3 + 1");
/// ```
pub fn solve_ivp_first_order<E: IntoExpr>(coeffs: Vec<E>, conditions: &[Condition]) -> Result<Expr, OdeError> {
    let general = first_ode(coeffs)?;
    assemble(&general, &fit_constants(&general, conditions)?)
}

/// `y(t1) = v1`, `y(t2) = v2` with the second order general solution.
pub fn solve_ivp_second_order<E: IntoExpr>(coeffs: Vec<E>, conditions: &[Condition]) -> Result<Expr, OdeError> {
    let general = second_ode(coeffs)?;
    assemble(&general, &fit_constants(&general, conditions)?)
}

/// `x(t1) = v1`, `y(t2) = v2` for the system.
pub fn solve_ivp_system<E: IntoExpr>(
    matrix: Vec<Vec<E>>,
    conditions: &[Condition],
) -> Result<(Expr, Expr), OdeError> {
    let general = system_ode(matrix)?;
    assemble_system(&general, &fit_system_constants(&general, conditions)?)
}

/// The linear equations in `C1, C2` that the system conditions impose.
pub fn system_constant_equations<E: IntoExpr>(
    matrix: Vec<Vec<E>>,
    conditions: &[Condition],
) -> Result<Vec<Equation>, OdeError> {
    let general = system_ode(matrix)?;
    Ok(constant_equations(&general, conditions))
}

/// Phase portrait over `t ∈ [0, 10]` for `x(0), y(0) ∈ 0..grid`, written as PNG.
pub fn draw_phase_portrait<E: IntoExpr>(
    matrix: Vec<Vec<E>>,
    grid: usize,
    path: &Path,
    config: &LiMathConfig,
) -> Result<PhasePortrait, OdeError> {
    let system = LinearSystem2::from_matrix(matrix)?;
    let portrait = phase_portrait(&system, grid, (0.0, 10.0), config.samples)?;
    plot_phase_portrait(&portrait, path, config.plot_size())?;
    Ok(portrait)
}

/// Slope field of `y' = f(x, y)` on `[-range, range]^2`, written as PNG.
pub fn draw_slope_field<E: IntoExpr>(
    f: E,
    range: f64,
    n: usize,
    path: &Path,
    config: &LiMathConfig,
) -> Result<SlopeField, OdeError> {
    let f = f.into_expr()?;
    let field = slope_field(&f, (-range, range), (-range, range), n)?;
    plot_slope_field(&field, path, config.plot_size())?;
    Ok(field)
}
