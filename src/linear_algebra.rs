/// error enum of the matrix helpers
pub mod errors;
/// matrix powers, integer-eigenvalue checks, inner product, change of basis,
/// symmetric/antisymmetric split
///# Example
/// ```
/// use nalgebra::DMatrix;
/// use RustedLiMath::linear_algebra::matrices::int_eigenvalues;
/// let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 1.0, 3.0]);
/// let message = int_eigenvalues(&m).unwrap();
/// assert_eq!(message, "The [[1, 2], [1, 3]] has not all its integer eigenvalues");
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod matrices;
