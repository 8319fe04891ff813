// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// symbolic expressions: parsing, differentiation, simplification, integration,
/// linear systems in unknown symbols, inverse functions
pub mod symbolic;
/// linear ODEs in closed form
///  Example#1
/// ```
/// use RustedLiMath::ode::constant_fitter::Condition;
/// use RustedLiMath::ode::ode_api::{first_ode, solve_ivp_first_order};
/// // t y' + 2 y = 2 + t
/// let general = first_ode(vec!["t", "2", "2 + t"]).unwrap();
/// println!("{}", general); // y(t) = C1/t^2 + t/3 + 1
/// let y = solve_ivp_first_order(vec!["t", "2", "2 + t"], &[Condition::new(1.0, 0.0)]).unwrap();
/// println!("y(t) = {}", y);
/// ```
/// Example#2
/// ```
/// use RustedLiMath::ode::constant_fitter::Condition;
/// use RustedLiMath::ode::ode_api::solve_ivp_second_order;
/// // y'' + 4 y = sin(t), y(0) = 1, y(1) = 0
/// let y = solve_ivp_second_order(
///     vec!["1", "0", "4", "sin(t)"],
///     &[Condition::new(0.0, 1.0), Condition::new(1.0, 0.0)],
/// )
/// .unwrap();
/// println!("y(t) = {}", y);
/// ```
pub mod ode;
/// derivatives, tangent lines, roots, surfaces of revolution, convergence tests
pub mod calculus;
/// dense matrix helpers over nalgebra
pub mod linear_algebra;
/// Runge–Kutta, logistic map, Fibonacci
pub mod numerical;
/// configuration, logging, CSV export and plotting
pub mod Utils;
