//! Small dense linear-algebra helpers over `nalgebra::DMatrix<f64>`.
//!
//! Matrices are printed in nested-list form, `[[1, 2], [3, 4]]`, in messages and logs.
use crate::linear_algebra::errors::LinalgError;
use crate::symbolic::utils::{is_integer, snap};
use itertools::Itertools;
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex;

/// `[[a, b], [c, d]]`
pub fn format_matrix(matrix: &DMatrix<f64>) -> String {
    let rows = matrix
        .row_iter()
        .map(|row| format!("[{}]", row.iter().map(|v| snap(*v)).join(", ")))
        .join(", ");
    format!("[{}]", rows)
}

fn check_square(matrix: &DMatrix<f64>) -> Result<usize, LinalgError> {
    let (rows, cols) = matrix.shape();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    Ok(rows)
}

/// `[m, m^2, ..., m^n]`
///
/// # Examples
/// ```rust, ignore
/// let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
/// let powers = matrix_n(&m, 2).unwrap(); // [[1, 2], [3, 4]], [[7, 10], [15, 22]]
/// ```
pub fn matrix_n(matrix: &DMatrix<f64>, n: usize) -> Result<Vec<DMatrix<f64>>, LinalgError> {
    check_square(matrix)?;
    let mut powers: Vec<DMatrix<f64>> = Vec::with_capacity(n);
    for i in 0..n {
        let next = match powers.last() {
            Some(previous) => previous * matrix,
            None => matrix.clone(),
        };
        debug!("{}^{} = {}", format_matrix(matrix), i + 1, format_matrix(&next));
        powers.push(next);
    }
    Ok(powers)
}

/// true if every value is an integer; complex values also need a vanishing imaginary part
pub fn integers_list(values: &[Complex<f64>]) -> bool {
    values.iter().all(|z| is_integer(z.re) && z.im.abs() <= 1e-10 * z.re.abs().max(1.0))
}

/// Eigenvalues of a square matrix, complex in general.
pub fn eigenvalues(matrix: &DMatrix<f64>) -> Result<Vec<Complex<f64>>, LinalgError> {
    check_square(matrix)?;
    Ok(matrix.complex_eigenvalues().iter().copied().collect())
}

/// The values `i` in `0..=n` for which `[[1, i], [1, 1]]` has integer eigenvalues.
///
/// # Examples
/// ```rust, ignore
/// assert_eq!(int_eigvals_n(10), vec![0, 1, 4, 9]);
/// ```
pub fn int_eigvals_n(n: u32) -> Vec<u32> {
    (0..=n)
        .filter(|&i| {
            let matrix = DMatrix::from_row_slice(2, 2, &[1.0, i as f64, 1.0, 1.0]);
            let values: Vec<Complex<f64>> = matrix.complex_eigenvalues().iter().copied().collect();
            integers_list(&values)
        })
        .collect()
}

/// Message telling whether all eigenvalues of the matrix are integers.
pub fn int_eigenvalues(matrix: &DMatrix<f64>) -> Result<String, LinalgError> {
    let values = eigenvalues(matrix)?;
    let message = if integers_list(&values) {
        format!("The {} has all its integer eigenvalues", format_matrix(matrix))
    } else {
        format!("The {} has not all its integer eigenvalues", format_matrix(matrix))
    };
    info!("{}", message);
    Ok(message)
}

/// Usual inner product in R^n.
pub fn inner_product(v1: &DVector<f64>, v2: &DVector<f64>) -> Result<f64, LinalgError> {
    if v1.len() != v2.len() {
        return Err(LinalgError::DimensionMismatch {
            left: v1.shape(),
            right: v2.shape(),
        });
    }
    Ok(v1.dot(v2))
}

/// Change-of-basis matrix `b2^-1 * b1` taking coordinates in the basis `b1` (columns) to
/// coordinates in the basis `b2`.
///
/// # Examples
/// ```rust, ignore
/// let b1 = DMatrix::from_row_slice(2, 2, &[3.0, 2.0, 1.0, -1.0]);
/// let b2 = DMatrix::from_row_slice(2, 2, &[2.0, -5.0, 4.0, 3.0]);
/// let p = change_basis(&b1, &b2).unwrap(); // [[7/13, 1/26], [-5/13, -5/13]]
/// ```
pub fn change_basis(b1: &DMatrix<f64>, b2: &DMatrix<f64>) -> Result<DMatrix<f64>, LinalgError> {
    check_square(b1)?;
    check_square(b2)?;
    if b1.shape() != b2.shape() {
        return Err(LinalgError::DimensionMismatch {
            left: b1.shape(),
            right: b2.shape(),
        });
    }
    let inverse = b2
        .clone()
        .try_inverse()
        .ok_or_else(|| LinalgError::Singular(format_matrix(b2)))?;
    Ok(inverse * b1)
}

/// `m = S + A` with `S = (m + mᵀ)/2` symmetric and `A = (m - mᵀ)/2` antisymmetric.
pub fn symmetric_antisymmetric(matrix: &DMatrix<f64>) -> Result<(DMatrix<f64>, DMatrix<f64>), LinalgError> {
    check_square(matrix)?;
    let transposed = matrix.transpose();
    let symmetric = (matrix + &transposed) * 0.5;
    let antisymmetric = (matrix - &transposed) * 0.5;
    Ok((symmetric, antisymmetric))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn m2(values: [f64; 4]) -> DMatrix<f64> {
        DMatrix::from_row_slice(2, 2, &values)
    }

    #[test]
    fn test_matrix_n() {
        let powers = matrix_n(&m2([1.0, 2.0, 3.0, 4.0]), 3).unwrap();
        assert_eq!(powers.len(), 3);
        assert_eq!(powers[0], m2([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(powers[1], m2([7.0, 10.0, 15.0, 22.0]));
        assert_eq!(powers[2], m2([37.0, 54.0, 81.0, 118.0]));
        assert!(matrix_n(&m2([1.0, 2.0, 3.0, 4.0]), 0).unwrap().is_empty());
        assert_eq!(
            matrix_n(&DMatrix::zeros(2, 3), 2),
            Err(LinalgError::NotSquare { rows: 2, cols: 3 })
        );
    }

    #[test]
    fn test_integers_list() {
        let reals = |v: &[f64]| v.iter().map(|&x| Complex::new(x, 0.0)).collect::<Vec<_>>();
        assert!(!integers_list(&reals(&[1.0, 3.0, 0.5])));
        assert!(integers_list(&reals(&[1.0, -3.0, 0.0])));
        assert!(!integers_list(&[Complex::new(1.0, 1.0)]));
        assert!(integers_list(&[]));
    }

    #[test]
    fn test_int_eigvals_n() {
        assert_eq!(int_eigvals_n(100), vec![0, 1, 4, 9, 16, 25, 36, 49, 64, 81, 100]);
        assert_eq!(int_eigvals_n(0), vec![0]);
    }

    #[test]
    fn test_int_eigenvalues_message() {
        assert_eq!(
            int_eigenvalues(&m2([1.0, 2.0, 1.0, 3.0])).unwrap(),
            "The [[1, 2], [1, 3]] has not all its integer eigenvalues"
        );
        assert_eq!(
            int_eigenvalues(&m2([2.0, 1.0, 1.0, 2.0])).unwrap(),
            "The [[2, 1], [1, 2]] has all its integer eigenvalues"
        );
    }

    #[test]
    fn test_eigenvalues() {
        let mut values = eigenvalues(&m2([2.0, 1.0, 1.0, 2.0])).unwrap();
        values.sort_by(|a, b| a.re.total_cmp(&b.re));
        assert_relative_eq!(values[0].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(values[1].re, 3.0, epsilon = 1e-12);
        // rotation generator: ±i
        let values = eigenvalues(&m2([0.0, 1.0, -1.0, 0.0])).unwrap();
        for z in values {
            assert_relative_eq!(z.re, 0.0, epsilon = 1e-12);
            assert_relative_eq!(z.im.abs(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_inner_product() {
        let v1 = DVector::from_vec(vec![0.0, 1.0]);
        let v2 = DVector::from_vec(vec![1.0, 2.0]);
        assert_eq!(inner_product(&v1, &v2).unwrap(), 2.0);
        assert!(matches!(
            inner_product(&v1, &DVector::from_vec(vec![1.0, 2.0, 3.0])),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_change_basis() {
        let b1 = m2([3.0, 2.0, 1.0, -1.0]);
        let b2 = m2([2.0, -5.0, 4.0, 3.0]);
        let p = change_basis(&b1, &b2).unwrap();
        let expected = m2([7.0 / 13.0, 1.0 / 26.0, -5.0 / 13.0, -5.0 / 13.0]);
        assert_relative_eq!(p, expected, epsilon = 1e-12);
        assert!(matches!(
            change_basis(&b1, &m2([1.0, 2.0, 2.0, 4.0])),
            Err(LinalgError::Singular(_))
        ));
    }

    #[test]
    fn test_symmetric_antisymmetric() {
        let m = m2([1.0, 2.0, 4.0, 3.0]);
        let (s, a) = symmetric_antisymmetric(&m).unwrap();
        assert_eq!(s, s.transpose());
        assert_eq!(a, -a.transpose());
        assert_eq!(&s + &a, m);
        assert_eq!(s, m2([1.0, 3.0, 3.0, 3.0]));
    }
}
