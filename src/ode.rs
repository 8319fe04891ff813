/// error enum of the ODE pipeline
pub mod errors;
/// linear ODEs and 2x2 systems from coefficient vectors
///# Example
/// ```
/// use RustedLiMath::ode::equation_builder::LinearOde;
/// let ode = LinearOde::first_order(vec!["t", "2", "2 + t"]).unwrap();
/// println!("{}", ode.equation()); // t*y' + 2*y = 2 + t
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod equation_builder;
/// closed-form general solutions with free constants C1, C2
///# Example
/// ```
/// use RustedLiMath::ode::equation_builder::LinearOde;
/// use RustedLiMath::ode::general_solver::solve_general;
/// let ode = LinearOde::second_order(vec!["1", "0", "4", "sin(t)"]).unwrap();
/// let general = solve_general(&ode).unwrap();
/// assert!(general.verify(&ode));
/// println!("{}", general);
/// ```
pub mod general_solver;
pub mod undetermined_coefficients;
/// 2x2 systems x' = a x + b y, y' = c x + d y
pub mod linear_system;
///________________________________________________________________________________________________________________________________
/// free constants from conditions y(t_i) = v_i
pub mod constant_fitter;
/// substitution of the fitted constants
pub mod assembler;
/// phase portraits and slope fields as plain data
pub mod visualization;
///________________________________________________________________________________________________________________________________
/// one-call pipeline
///# Example
/// ```
/// use RustedLiMath::ode::constant_fitter::Condition;
/// use RustedLiMath::ode::ode_api::solve_ivp_system;
/// let (x, y) = solve_ivp_system(
///     vec![vec![1.0, 0.0], vec![0.0, -3.0]],
///     &[Condition::new(0.0, 0.0), Condition::new(0.0, 1.0)],
/// )
/// .unwrap();
/// println!("x = {}, y = {}", x, y); // x = 0, y = exp(-3*t)
/// ```
pub mod ode_api;
#[cfg(test)]
mod ode_tests;
