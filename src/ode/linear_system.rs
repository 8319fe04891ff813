//! General solution of `x' = a x + b y, y' = c x + d y` with numeric entries, from the
//! eigenvalues of the matrix:
//! - distinct real `λ1 > λ2`: `C1 e^{λ1 t} v1 + C2 e^{λ2 t} v2`
//! - repeated, `A = λI`: `x = C1 e^{λt}`, `y = C2 e^{λt}`
//! - repeated, defective: `C1 e^{λt} v + C2 e^{λt} (t v + w)` with `(A - λI) w = v`
//! - complex `α ± iβ`, eigenvector `p + iq`:
//!   `C1 e^{αt} (p cos βt - q sin βt) + C2 e^{αt} (p sin βt + q cos βt)`
use crate::ode::equation_builder::LinearSystem2;
use crate::ode::errors::OdeError;
use crate::ode::general_solver::{SystemSolution, close, constant_names};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::snap;
use log::{debug, info};

/// (x component, y component) of one fundamental solution
type Mode = (Expr, Expr);

/// Eigen-structure of a real 2x2 matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Eigenstructure {
    Distinct { lambda1: f64, lambda2: f64 },
    Scalar(f64),
    Defective(f64),
    Complex { re: f64, im: f64 },
}

impl Eigenstructure {
    pub fn of(m: &[[f64; 2]; 2]) -> Self {
        let [[a, b], [c, d]] = *m;
        let trace = a + d;
        let det = a * d - b * c;
        let disc = trace * trace - 4.0 * det;
        let tol = 1e-12 * (trace * trace).max((4.0 * det).abs());
        if disc.abs() <= tol {
            let lambda = snap(trace / 2.0);
            if negligible(b, m) && negligible(c, m) {
                Eigenstructure::Scalar(lambda)
            } else {
                Eigenstructure::Defective(lambda)
            }
        } else if disc > 0.0 {
            let root = disc.sqrt();
            Eigenstructure::Distinct {
                lambda1: snap((trace + root) / 2.0),
                lambda2: snap((trace - root) / 2.0),
            }
        } else {
            Eigenstructure::Complex {
                re: snap(trace / 2.0),
                im: snap((-disc).sqrt() / 2.0),
            }
        }
    }
}

/// `|value|` is round-off compared with the largest entry
fn negligible(value: f64, m: &[[f64; 2]; 2]) -> bool {
    let scale = m.iter().flatten().fold(1.0_f64, |acc, v| acc.max(v.abs()));
    value.abs() <= 1e-12 * scale
}

/// eigenvector of a real eigenvalue with a non-repeated eigenspace
fn eigenvector(m: &[[f64; 2]; 2], lambda: f64) -> (f64, f64) {
    let [[a, b], [c, d]] = *m;
    if !negligible(b, m) {
        (1.0, snap((lambda - a) / b))
    } else if !negligible(c, m) {
        (snap((lambda - d) / c), 1.0)
    } else if close(lambda, a) {
        (1.0, 0.0)
    } else {
        (0.0, 1.0)
    }
}

fn exp_t(lambda: f64, t: &str) -> Expr {
    (Expr::Const(lambda) * Expr::var(t)).exp()
}

fn modes(m: &[[f64; 2]; 2], structure: Eigenstructure, t: &str) -> [Mode; 2] {
    let [[a, b], [c, d]] = *m;
    let scaled = |k: f64, e: &Expr| Expr::Const(k) * e.clone();
    match structure {
        Eigenstructure::Distinct { lambda1, lambda2 } => {
            let (v1, v2) = (eigenvector(m, lambda1), eigenvector(m, lambda2));
            let (e1, e2) = (exp_t(lambda1, t), exp_t(lambda2, t));
            [
                (scaled(v1.0, &e1), scaled(v1.1, &e1)),
                (scaled(v2.0, &e2), scaled(v2.1, &e2)),
            ]
        }
        Eigenstructure::Scalar(lambda) => {
            let e = exp_t(lambda, t);
            [(e.clone(), Expr::Const(0.0)), (Expr::Const(0.0), e)]
        }
        Eigenstructure::Defective(lambda) => {
            let (v, w) = if !negligible(b, m) {
                ((b, snap(lambda - a)), (0.0, 1.0))
            } else {
                ((snap(lambda - d), c), (1.0, 0.0))
            };
            let e = exp_t(lambda, t);
            let tv = |vi: f64, wi: f64| (Expr::Const(vi) * Expr::var(t) + Expr::Const(wi)) * e.clone();
            [
                (scaled(v.0, &e), scaled(v.1, &e)),
                (tv(v.0, w.0), tv(v.1, w.1)),
            ]
        }
        Eigenstructure::Complex { re, im } => {
            // eigenvector (b, λ - a) = p + i q, b != 0 for complex eigenvalues
            let (p, q) = ((b, snap(re - a)), (0.0, im));
            let e = exp_t(re, t);
            let wt = Expr::Const(im) * Expr::var(t);
            let (cos, sin) = (Expr::cos(wt.clone().boxed()), Expr::sin(wt.boxed()));
            let combine = |x: f64, y: f64, f: &Expr, g: &Expr| {
                e.clone() * (Expr::Const(x) * f.clone() + Expr::Const(y) * g.clone())
            };
            [
                (combine(p.0, -q.0, &cos, &sin), combine(p.1, -q.1, &cos, &sin)),
                (combine(p.0, q.0, &sin, &cos), combine(p.1, q.1, &sin, &cos)),
            ]
        }
    }
}

/// General solution of a 2x2 system with constant numeric coefficients.
///
/// # Examples
/// ```rust, ignore
/// let system = LinearSystem2::from_matrix(vec![vec![1.0, 0.0], vec![0.0, -3.0]]).unwrap();
/// let general = solve_system_general(&system).unwrap();
/// // x = C1*exp(t), y = C2*exp(-3*t)
/// ```
pub fn solve_system_general(system: &LinearSystem2) -> Result<SystemSolution, OdeError> {
    info!("solving the system {}", system);
    let m = system.numeric()?;
    let structure = Eigenstructure::of(&m);
    debug!("eigen-structure: {:?}", structure);
    let t = system.variable.as_str();
    let constants = constant_names(2);
    let [first, second] = modes(&m, structure, t);
    let (c1, c2) = (Expr::var(&constants[0]), Expr::var(&constants[1]));
    let x = (c1.clone() * first.0 + c2.clone() * second.0).simplify();
    let y = (c1 * first.1 + c2 * second.1).simplify();
    let solution = SystemSolution {
        variable: system.variable.clone(),
        x,
        y,
        constants,
    };
    info!("general solution: {}", solution);
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(rows: [[f64; 2]; 2]) -> LinearSystem2 {
        LinearSystem2::from_matrix(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_diagonal() {
        let s = system([[1.0, 0.0], [0.0, -3.0]]);
        let general = solve_system_general(&s).unwrap();
        assert_eq!(general.x.to_string(), "C1*exp(t)");
        assert_eq!(general.y.to_string(), "C2*exp(-3*t)");
        assert!(general.verify(&s));
    }

    #[test]
    fn test_structures() {
        assert_eq!(
            Eigenstructure::of(&[[2.0, 1.0], [1.0, 2.0]]),
            Eigenstructure::Distinct { lambda1: 3.0, lambda2: 1.0 }
        );
        assert_eq!(Eigenstructure::of(&[[2.0, 0.0], [0.0, 2.0]]), Eigenstructure::Scalar(2.0));
        assert_eq!(Eigenstructure::of(&[[2.0, 1.0], [0.0, 2.0]]), Eigenstructure::Defective(2.0));
        assert_eq!(
            Eigenstructure::of(&[[0.0, 1.0], [-1.0, 0.0]]),
            Eigenstructure::Complex { re: 0.0, im: 1.0 }
        );
    }

    #[test]
    fn test_every_structure_solves_the_system() {
        for rows in [
            [[2.0, 1.0], [1.0, 2.0]],
            [[-3.0, 0.0], [0.0, 1.0]],
            [[0.0, 1.0], [-2.0, -3.0]],
            [[2.0, 0.0], [0.0, 2.0]],
            [[2.0, 1.0], [0.0, 2.0]],
            [[2.0, 0.0], [1.0, 2.0]],
            [[1.0, -1.0], [1.0, 3.0]],
            [[0.0, 1.0], [-1.0, 0.0]],
            [[1.0, -2.0], [2.0, 1.0]],
            [[0.0, 0.0], [0.0, 0.0]],
        ] {
            let s = system(rows);
            let general = solve_system_general(&s).unwrap();
            assert!(general.verify(&s), "{:?} -> {}", rows, general);
            assert!(general.x.contains_variable("C1") || general.y.contains_variable("C1"));
            assert!(general.x.contains_variable("C2") || general.y.contains_variable("C2"));
        }
    }

    #[test]
    fn test_symbolic_entries_are_unsolvable() {
        let s = LinearSystem2::from_matrix(vec![vec!["a", "1"], vec!["0", "1"]]).unwrap();
        assert!(matches!(solve_system_general(&s), Err(OdeError::Unsolvable { .. })));
    }
}
