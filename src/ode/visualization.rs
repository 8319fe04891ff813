//! Data for phase portraits and slope fields. Rendering is done by [`crate::Utils::plots`].
use crate::ode::assembler::assemble_system;
use crate::ode::constant_fitter::{Condition, fit_system_constants};
use crate::ode::equation_builder::LinearSystem2;
use crate::ode::errors::OdeError;
use crate::ode::linear_system::solve_system_general;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::linspace;
use log::info;
use rayon::prelude::*;

/// Sampled particular solution `(x(t), y(t))` of one initial condition.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    /// `(x(0), y(0))`
    pub initial: (f64, f64),
    pub t: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhasePortrait {
    pub trajectories: Vec<Trajectory>,
}

/// Unit direction of `(1, f(x, y))` at a grid node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrow {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SlopeField {
    pub equation: String,
    /// nodes per axis
    pub resolution: usize,
    pub arrows: Vec<Arrow>,
}

/// One trajectory per initial condition `x(0) = i, y(0) = j`, `i, j ∈ 0..grid`, in
/// row-major order of `(i, j)`.
///
/// The general solution is computed once; the grid sweep runs on the rayon pool.
pub fn phase_portrait(
    system: &LinearSystem2,
    grid: usize,
    t_range: (f64, f64),
    samples: usize,
) -> Result<PhasePortrait, OdeError> {
    let general = solve_system_general(system)?;
    let t = linspace(t_range.0, t_range.1, samples);
    let initials: Vec<(f64, f64)> = (0..grid)
        .flat_map(|i| (0..grid).map(move |j| (i as f64, j as f64)))
        .collect();

    let trajectories = initials
        .par_iter()
        .map(|&(x0, y0)| {
            let conditions = [Condition::new(0.0, x0), Condition::new(0.0, y0)];
            let constants = fit_system_constants(&general, &conditions)?;
            let (x, y) = assemble_system(&general, &constants)?;
            Ok(Trajectory {
                initial: (x0, y0),
                x: x.evaluate_on(&general.variable, &t)?,
                y: y.evaluate_on(&general.variable, &t)?,
                t: t.clone(),
            })
        })
        .collect::<Result<Vec<Trajectory>, OdeError>>()?;
    info!("phase portrait: {} trajectories of {} samples", trajectories.len(), samples);
    Ok(PhasePortrait { trajectories })
}

/// Directions of `y' = f(x, y)` on an `n × n` grid over `x_range × y_range`.
pub fn slope_field(
    f: &Expr,
    x_range: (f64, f64),
    y_range: (f64, f64),
    n: usize,
) -> Result<SlopeField, OdeError> {
    let slope = f.lambdify(&["x", "y"])?;
    let xs = linspace(x_range.0, x_range.1, n);
    let ys = linspace(y_range.0, y_range.1, n);
    let arrows = xs
        .iter()
        .flat_map(|&x| ys.iter().map(move |&y| (x, y)))
        .map(|(x, y)| {
            let m = slope(&[x, y]);
            let norm = (1.0 + m * m).sqrt();
            Arrow {
                x,
                y,
                dx: 1.0 / norm,
                dy: m / norm,
            }
        })
        .collect();
    Ok(SlopeField {
        equation: f.to_string(),
        resolution: n,
        arrows,
    })
}
