/// error enum of the numerical demos
pub mod errors;
/// Runge–Kutta tables, logistic-map cobweb and bifurcation data, Fibonacci numbers
///# Example
/// ```
/// use RustedLiMath::numerical::models::rungekutta2_fg;
/// let (a, b, c, d) = (0.5, 0.7, 0.35, 0.35);
/// let table = rungekutta2_fg(
///     |_t, x, y| a * x - b * x * y,
///     |_t, x, y| -c * y + d * x * y,
///     0.0,
///     2.0,
///     1.0,
///     0.5,
///     100,
/// );
/// assert_eq!(table.shape(), (101, 3));
/// println!("x(0.5) = {}, y(0.5) = {}", table[(1, 1)], table[(1, 2)]);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod models;
