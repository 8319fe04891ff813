#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// error enums of the symbolic layer
pub mod errors;
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedLiMath::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("t**2*exp(-3*t) + sin(2*t)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let f = parsed_expression.lambdify1D("t").unwrap();
/// println!("f(1) = {}", f(1.0));
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the expression tree `Expr` and the equality constraint `Equation`
/// 2) substitutes values and expressions for variables
/// 3) prints expressions with minimal parentheses
///# Example#
/// ```
/// use RustedLiMath::symbolic::symbolic_engine::Expr;
/// let input = "C1/t^2 + t/3 + 1";
/// let expr = Expr::parse_expression(input).unwrap();
/// let at_one = expr.set_variable("t", 1.0).set_variable("C1", 0.0);
/// assert_eq!(at_one.constant_value().map(|v| (v * 3.0).round()), Some(4.0));
/// // differentiate with respect to t
/// let dy_dt = expr.diff("t").simplify();
/// println!("dy/dt = {}", dy_dt);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
///________________________________________________________________________________________________________________________________________________
/// canonical sum-of-products form, `simplify()` and zero testing
pub mod symbolic_simplify;
/// closed-form antiderivatives of exponential-polynomial-trigonometric terms
/// Example#
/// ```
/// use RustedLiMath::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("t*exp(-t)").unwrap();
/// let F = f.integrate("t").unwrap();
/// println!("∫ t exp(-t) dt = {}", F);
/// ```
pub mod symbolic_integration;
///______________________________________________________________________________________________________________________________________________
/// linear systems in unknown symbols (Rouché–Capelli rank checks + nalgebra)
pub mod linear_solve;
/// inverse branches `x = h(y)` of elementary functions
pub mod symbolic_inverse;
///______________________________________________________________________________________________________________________________________________
/// the collection of small numeric helpers
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
