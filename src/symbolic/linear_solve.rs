//! Linear systems written symbolically.
//!
//! Each input expression is a residual that must vanish; it is brought to canonical form
//! and split into `Σ a_j x_j + b` over the unknowns. Solvability is decided with the
//! Rouché–Capelli theorem: the system is consistent iff `rank(A) = rank([A b])`, and the
//! solution is unique iff that rank equals the number of unknowns.

use crate::symbolic::errors::LinearSolveError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_simplify::Factor;
use log::warn;
use nalgebra::{DMatrix, DVector, stack};
use std::collections::BTreeMap;

/// `A x = rhs` extracted from symbolic residuals
#[derive(Clone, Debug, PartialEq)]
pub struct LinearSystem {
    pub matrix: DMatrix<f64>,
    pub rhs: DVector<f64>,
    pub unknowns: Vec<String>,
}

/// Splits the residuals into a coefficient matrix and a right-hand side.
///
/// # Errors
/// `Nonlinear` if a residual holds a product of unknowns, a function of an unknown, or a
/// symbol other than the unknowns. `NonFinite` if a coefficient or the constant part is
/// infinite or NaN, as happens when a residual is evaluated at a singular point.
pub fn extract_linear_system(
    residuals: &[Expr],
    unknowns: &[String],
) -> Result<LinearSystem, LinearSolveError> {
    let mut matrix = DMatrix::<f64>::zeros(residuals.len(), unknowns.len());
    let mut rhs = DVector::<f64>::zeros(residuals.len());
    for (i, residual) in residuals.iter().enumerate() {
        let nonlinear = || LinearSolveError::Nonlinear {
            equation: format!("{} = 0", residual),
        };
        for (product, c) in residual.canonical().terms() {
            if product.is_one() {
                rhs[i] -= c;
                continue;
            }
            let mut factors = product.factors();
            let single = match (factors.next(), factors.next()) {
                (Some((Factor::Symbol(name), e)), None) if e == 1.0 => Some(name),
                _ => None,
            };
            let column = single
                .and_then(|name| unknowns.iter().position(|u| u == name))
                .ok_or_else(nonlinear)?;
            matrix[(i, column)] += c;
        }
        if !rhs[i].is_finite() || matrix.row(i).iter().any(|c| !c.is_finite()) {
            return Err(LinearSolveError::NonFinite {
                row: i,
                equation: format!("{} = 0", residual),
            });
        }
    }
    Ok(LinearSystem {
        matrix,
        rhs,
        unknowns: unknowns.to_vec(),
    })
}

impl LinearSystem {
    fn rank_tolerance(&self) -> f64 {
        let scale = self
            .matrix
            .iter()
            .chain(self.rhs.iter())
            .fold(1.0_f64, |acc, v| acc.max(v.abs()));
        1e-9 * scale
    }

    /// `(rank(A), rank([A b]))`
    pub fn ranks(&self) -> (usize, usize) {
        let eps = self.rank_tolerance();
        let (a, b) = (&self.matrix, &self.rhs);
        let augmented: DMatrix<f64> = stack![a, b];
        (self.matrix.rank(eps), augmented.rank(eps))
    }

    /// Unique solution by name.
    pub fn solve(&self) -> Result<BTreeMap<String, f64>, LinearSolveError> {
        let (rank, augmented_rank) = self.ranks();
        if rank != augmented_rank {
            warn!(
                "The system has no solution. rank(A) = {} != rank([A b]) = {}",
                rank, augmented_rank
            );
            return Err(LinearSolveError::Inconsistent {
                rank,
                augmented_rank,
            });
        }
        let underdetermined = LinearSolveError::Underdetermined {
            rank,
            unknowns: self.unknowns.len(),
        };
        if rank < self.unknowns.len() {
            warn!("The system has infinitely many solutions. rank(A) = {} < {}", rank, self.unknowns.len());
            return Err(underdetermined);
        }
        if self.unknowns.is_empty() {
            return Ok(BTreeMap::new());
        }
        // normal equations: consistent full-rank systems with more rows than unknowns are allowed
        let transposed = self.matrix.transpose();
        let solution = (&transposed * &self.matrix)
            .lu()
            .solve(&(&transposed * &self.rhs))
            .ok_or(underdetermined)?;
        Ok(self
            .unknowns
            .iter()
            .cloned()
            .zip(solution.iter().copied())
            .collect())
    }
}

/// Solves residual equations `r_i(x) = 0` that are linear in `unknowns`.
pub fn solve_linear(
    residuals: &[Expr],
    unknowns: &[String],
) -> Result<BTreeMap<String, f64>, LinearSolveError> {
    extract_linear_system(residuals, unknowns)?.solve()
}
