//! # Mathematical models
//!
//! Small numerical demos:
//! - `rungekutta2_fg`: Heun's second-order Runge–Kutta scheme for a planar system
//!   `x' = f(t, x, y)`, `y' = g(t, x, y)`, e.g. the Lotka–Volterra predator–prey model
//! - `cobweb`: frames of the cobweb diagram of the logistic map `x -> r x (1 - x)`
//! - `bifurcation`: attractor points of the logistic map against `r`
//! - `fibonacci`
//!
//! Results are plain data (`DMatrix`, `Vec`); the `draw_*`/`animate_*` helpers hand them
//! to the plotters sink in `Utils::plots`.
use crate::Utils::config::LiMathConfig;
use crate::Utils::logger::save_matrix_to_csv;
use crate::Utils::plots::{plot_bifurcation, plot_cobweb};
use crate::numerical::errors::NumericalError;
use crate::symbolic::utils::linspace;
use log::info;
use nalgebra::DMatrix;
use rayon::prelude::*;
use std::io;
use std::path::Path;
use tabled::{builder::Builder, settings::Style};

/// column names of the Runge–Kutta table
pub const RK_HEADERS: [&str; 3] = ["t", "x", "y"];
/// delay between cobweb animation frames
pub const COBWEB_FRAME_DELAY_MS: u32 = 100;
/// step of the sampled logistic curve on [0, 1)
const CURVE_STEP: f64 = 0.01;

/// Heun's RK2 table with rows `[t_i, x_i, y_i]`, `i = 0..=samples`.
///
/// ```text
/// K1 = h (f, g)(t, x, y)
/// K2 = h (f, g)(t + h, x + K1x, y + K1y)
/// (x, y) += (K1 + K2) / 2
/// ```
/// # Examples
/// ```rust, ignore
/// let (a, b, c, d) = (0.5, 0.7, 0.35, 0.35);
/// let table = rungekutta2_fg(
///     |_t, x, y| a * x - b * x * y,
///     |_t, x, y| -c * y + d * x * y,
///     0.0, 2.0, 1.0, 0.5, 100,
/// );
/// // second row: [0.5, 1.754875, 1.16975]
/// ```
pub fn rungekutta2_fg<F, G>(f: F, g: G, t0: f64, x0: f64, y0: f64, h: f64, samples: usize) -> DMatrix<f64>
where
    F: Fn(f64, f64, f64) -> f64,
    G: Fn(f64, f64, f64) -> f64,
{
    let mut table = DMatrix::zeros(samples + 1, 3);
    let (mut t, mut x, mut y) = (t0, x0, y0);
    table.set_row(0, &nalgebra::RowVector3::new(t, x, y));
    for i in 1..=samples {
        let k1x = h * f(t, x, y);
        let k1y = h * g(t, x, y);
        let k2x = h * f(t + h, x + k1x, y + k1y);
        let k2y = h * g(t + h, x + k1x, y + k1y);
        x += 0.5 * (k1x + k2x);
        y += 0.5 * (k1y + k2y);
        t += h;
        table.set_row(i, &nalgebra::RowVector3::new(t, x, y));
    }
    info!("RK2 table with {} steps of h = {}\n{}", samples, h, render_table(&table));
    table
}

/// Rounded-box text rendering of a `[t, x, y]` table, six decimals.
pub fn render_table(table: &DMatrix<f64>) -> String {
    let mut builder = Builder::default();
    builder.push_record(RK_HEADERS);
    for row in table.row_iter() {
        builder.push_record(row.iter().map(|v| format!("{:.6}", v)));
    }
    let mut rendered = builder.build();
    rendered.with(Style::modern_rounded());
    rendered.to_string()
}

/// Saves a `[t, x, y]` table as CSV.
pub fn save_table<P: AsRef<Path>>(table: &DMatrix<f64>, path: P) -> io::Result<()> {
    save_matrix_to_csv(table, &RK_HEADERS, path)
}

pub fn logistic(r: f64, x: f64) -> f64 {
    r * x * (1.0 - x)
}

/// Polyline of the cobweb after one more iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct CobwebFrame {
    pub points: Vec<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cobweb {
    /// `r` of the logistic map
    pub parameter: f64,
    /// `(s, r s (1 - s))` for `s` in `[0, 1)` with step 0.01
    pub curve: Vec<(f64, f64)>,
    pub frames: Vec<CobwebFrame>,
}

/// Cobweb diagram of `x -> par x (1 - x)` started at `x0`, one frame per iteration.
///
/// The path runs `(x0, x0) -> (x0, f(x0)) -> (f(x0), f(x0)) -> ...`; frame `i` holds
/// the first `2 i + 3` vertices.
pub fn cobweb(par: f64, x0: f64, it: usize) -> Cobweb {
    let steps = (1.0 / CURVE_STEP).round() as usize;
    let curve = (0..steps)
        .map(|k| {
            let s = k as f64 * CURVE_STEP;
            (s, logistic(par, s))
        })
        .collect();
    let mut path = vec![(x0, x0)];
    let mut frames = Vec::with_capacity(it);
    let mut x = x0;
    for _ in 0..it {
        let next = logistic(par, x);
        path.push((x, next));
        path.push((next, next));
        x = next;
        frames.push(CobwebFrame { points: path.clone() });
    }
    Cobweb {
        parameter: par,
        curve,
        frames,
    }
}

/// Bifurcation diagram data of the logistic map.
///
/// For each of `steps` values of `r` in `r_range` the map is iterated `transient`
/// times from `x0` and the next `keep` iterates are recorded as `(r, x)`. The sweep
/// over `r` runs on the rayon pool; points keep the order of the sequential sweep.
pub fn bifurcation(
    r_range: (f64, f64),
    steps: usize,
    x0: f64,
    transient: usize,
    keep: usize,
) -> Vec<(f64, f64)> {
    linspace(r_range.0, r_range.1, steps)
        .par_iter()
        .flat_map_iter(|&r| {
            let mut x = x0;
            for _ in 0..transient {
                x = logistic(r, x);
            }
            (0..keep).map(move |_| {
                x = logistic(r, x);
                (r, x)
            })
        })
        .collect()
}

/// n-th Fibonacci number counted from `fibonacci(1) = 0`, `fibonacci(2) = 1`.
pub fn fibonacci(n: u32) -> Result<u64, NumericalError> {
    if n == 0 {
        return Err(NumericalError::InvalidArgument(
            "Fibonacci numbers are counted from n = 1".to_string(),
        ));
    }
    let (mut previous, mut current): (u64, u64) = (0, 1);
    if n == 1 {
        return Ok(previous);
    }
    for _ in 2..n {
        let next = previous
            .checked_add(current)
            .ok_or_else(|| NumericalError::Overflow(format!("fibonacci({})", n)))?;
        previous = current;
        current = next;
    }
    Ok(current)
}

/// Renders the cobweb of `x -> par x (1 - x)` as an animated GIF.
pub fn animate_cobweb(par: f64, x0: f64, it: usize, path: &Path, config: &LiMathConfig) -> Result<Cobweb, NumericalError> {
    let diagram = cobweb(par, x0, it);
    plot_cobweb(&diagram, path, config.plot_size(), COBWEB_FRAME_DELAY_MS)?;
    Ok(diagram)
}

/// Computes and plots the bifurcation diagram on `r_range` with `config.samples` values of `r`.
pub fn draw_bifurcation(r_range: (f64, f64), path: &Path, config: &LiMathConfig) -> Result<Vec<(f64, f64)>, NumericalError> {
    if !(r_range.0 < r_range.1) {
        return Err(NumericalError::InvalidArgument(format!("empty range of r: {:?}", r_range)));
    }
    let points = bifurcation(r_range, config.samples, 0.5, 200, 50);
    plot_bifurcation(&points, path, config.plot_size())?;
    Ok(points)
}
