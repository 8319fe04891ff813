/// error enum of the calculus helpers
pub mod errors;
/// derivatives, tangent lines, roots, surfaces of revolution, inverse functions
///# Example
/// ```
/// use RustedLiMath::calculus::single_variable::tangent_line;
/// let line = tangent_line("x^2", 1.0).unwrap();
/// assert_eq!(line.to_string(), "y = 2*x - 1");
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod single_variable;
/// ratio test for sequences and series in `n`
///# Example
/// ```
/// use RustedLiMath::calculus::convergence::seri_converg;
/// let message = seri_converg("3^n").unwrap();
/// assert!(message.ends_with("diverges."));
/// ```
pub mod convergence;
///________________________________________________________________________________________________________________________________
/// partial derivatives
pub mod several_variables;
