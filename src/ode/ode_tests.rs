use crate::ode::constant_fitter::{Condition, fit_constants};
use crate::ode::equation_builder::{LinearOde, LinearSystem2};
use crate::ode::errors::OdeError;
use crate::ode::general_solver::solve_general;
use crate::ode::linear_system::solve_system_general;
use crate::ode::ode_api::*;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::linspace;
use approx::assert_relative_eq;

fn parse(s: &str) -> Expr {
    Expr::parse_expression(s).unwrap()
}

/// values of two expressions of t agree on [0, 2]
fn assert_same_function(actual: &Expr, expected: &Expr) {
    let points = linspace(0.0, 2.0, 11);
    let a = actual.evaluate_on("t", &points).unwrap();
    let e = expected.evaluate_on("t", &points).unwrap();
    for (a, e) in a.iter().zip(&e) {
        assert_relative_eq!(a, e, epsilon = 1e-9, max_relative = 1e-9);
    }
}

#[test]
fn first_order_textbook_example() {
    let general = first_ode(vec!["t", "2", "2 + t"]).unwrap();
    assert_eq!(general.expr.to_string(), "C1/t^2 + t/3 + 1");

    let constants = fit_constants(&general, &[Condition::new(1.0, 0.0)]).unwrap();
    assert_relative_eq!(constants["C1"], -4.0 / 3.0, epsilon = 1e-12);

    let y = solve_ivp_first_order(vec!["t", "2", "2 + t"], &[Condition::new(1.0, 0.0)]).unwrap();
    assert_eq!(y.to_string(), "-4/(3*t^2) + t/3 + 1");
}

#[test]
fn first_order_residual_vanishes_for_constant_coefficients() {
    for coeffs in [[1.0, 1.0, 0.0], [2.0, -3.0, 1.0], [1.0, 0.0, 5.0], [-1.0, 4.0, 2.5]] {
        let ode = LinearOde::first_order(coeffs.to_vec()).unwrap();
        let general = solve_general(&ode).unwrap();
        assert!(ode.residual(&general.expr).is_identically_zero(), "{:?}", coeffs);
    }
}

#[test]
fn system_example() {
    let general = system_ode(vec![vec![1, 0], vec![0, -3]]).unwrap();
    assert_eq!(general.x.to_string(), "C1*exp(t)");
    assert_eq!(general.y.to_string(), "C2*exp(-3*t)");

    let (x, y) =
        solve_ivp_system(vec![vec![1, 0], vec![0, -3]], &[Condition::new(0.0, 0.0), Condition::new(0.0, 1.0)])
            .unwrap();
    assert!(x.is_identically_zero());
    assert!(y.equivalent_to(&parse("exp(-3*t)")));
}

#[test]
fn system_constant_equations_at_zero() {
    let equations = system_constant_equations(
        vec![vec![0, 1], vec![-1, 0]],
        &[Condition::new(0.0, 1.0), Condition::new(0.0, -2.0)],
    )
    .unwrap();
    assert_eq!(equations.len(), 2);
    for equation in &equations {
        assert!(!equation.lhs.contains_variable("t"));
    }
    let (x, y) = solve_ivp_system(
        vec![vec![0, 1], vec![-1, 0]],
        &[Condition::new(0.0, 1.0), Condition::new(0.0, -2.0)],
    )
    .unwrap();
    assert_same_function(&x, &parse("cos(t) - 2*sin(t)"));
    assert_same_function(&y, &parse("-sin(t) - 2*cos(t)"));
}

#[test]
fn particular_solution_meets_every_condition() {
    let conditions = [Condition::new(0.0, 1.0), Condition::new(1.0, -0.5)];
    for coeffs in [
        vec!["1", "-1", "-6", "0"],
        vec!["1", "0", "4", "sin(t)"],
        vec!["1", "2", "1", "t"],
        vec!["1", "2", "5", "exp(-t)"],
    ] {
        let y = solve_ivp_second_order(coeffs.clone(), &conditions).unwrap();
        for condition in &conditions {
            let value = y.eval_expression(&["t"], &[condition.point]).unwrap();
            assert_relative_eq!(value, condition.value, epsilon = 1e-9);
        }
        let ode = LinearOde::second_order(coeffs).unwrap();
        assert!(ode.residual(&y).is_identically_zero());
    }

    let conditions = [Condition::new(0.5, 2.0), Condition::new(2.0, -1.0)];
    let (x, y) = solve_ivp_system(vec![vec![1.0, -1.0], vec![1.0, 3.0]], &conditions).unwrap();
    assert_relative_eq!(x.eval_expression(&["t"], &[0.5]).unwrap(), 2.0, epsilon = 1e-9);
    assert_relative_eq!(y.eval_expression(&["t"], &[2.0]).unwrap(), -1.0, epsilon = 1e-9);
}

#[test]
fn fitting_is_idempotent() {
    let general = second_ode(vec!["1", "0", "1", "t"]).unwrap();
    let conditions = [Condition::new(0.0, 1.0), Condition::new(1.0, 2.0)];
    let first = fit_constants(&general, &conditions).unwrap();
    let second = fit_constants(&general, &conditions).unwrap();
    assert_eq!(first, second);
}

#[test]
fn wrong_shapes_and_counts() {
    assert!(matches!(first_ode(vec!["t", "2"]), Err(OdeError::InvalidShape { .. })));
    assert!(matches!(second_ode(vec!["1", "2", "3"]), Err(OdeError::InvalidShape { .. })));
    assert!(matches!(
        system_ode(vec![vec![1, 2, 3], vec![4, 5, 6]]),
        Err(OdeError::InvalidShape { .. })
    ));

    let err = solve_ivp_second_order(vec![1, 0, 1, 0], &[Condition::new(0.0, 1.0)]).unwrap_err();
    assert_eq!(err, OdeError::UnderDetermined { constants: 2, conditions: 1 });
    let err = solve_ivp_first_order(
        vec![1, 1, 0],
        &[Condition::new(0.0, 1.0), Condition::new(1.0, 1.0)],
    )
    .unwrap_err();
    assert_eq!(err, OdeError::OverDetermined { constants: 1, conditions: 2 });
    let err = solve_ivp_system(vec![vec![1, 0], vec![0, 1]], &[]).unwrap_err();
    assert_eq!(err, OdeError::UnderDetermined { constants: 2, conditions: 0 });
}

#[test]
fn round_trip_reproduces_known_solutions() {
    // y'' - y' - 6y = 0 is solved by 2 exp(3t) - exp(-2t)
    let known = parse("2*exp(3*t) - exp(-2*t)");
    let conditions: Vec<Condition> = [0.0, 1.0]
        .iter()
        .map(|&p| Condition::new(p, known.eval_expression(&["t"], &[p]).unwrap()))
        .collect();
    let y = solve_ivp_second_order(vec![1, -1, -6, 0], &conditions).unwrap();
    assert_same_function(&y, &known);

    // y' + 2y = 4 is solved by 2 + 3 exp(-2t)
    let known = parse("2 + 3*exp(-2*t)");
    let condition = Condition::new(0.0, 5.0);
    let y = solve_ivp_first_order(vec![1, 2, 4], &[condition]).unwrap();
    assert_same_function(&y, &known);

    // x' = 2x + y, y' = x + 2y is solved by (exp(3t) + exp(t), exp(3t) - exp(t))
    let (kx, ky) = (parse("exp(3*t) + exp(t)"), parse("exp(3*t) - exp(t)"));
    let conditions = [
        Condition::new(1.0, kx.eval_expression(&["t"], &[1.0]).unwrap()),
        Condition::new(0.0, ky.eval_expression(&["t"], &[0.0]).unwrap()),
    ];
    let system = LinearSystem2::from_matrix(vec![vec![2, 1], vec![1, 2]]).unwrap();
    let general = solve_system_general(&system).unwrap();
    assert!(general.verify(&system));
    let (x, y) = solve_ivp_system(vec![vec![2, 1], vec![1, 2]], &conditions).unwrap();
    assert_same_function(&x, &kx);
    assert_same_function(&y, &ky);
}

#[test]
fn ambiguous_fit_fails() {
    // y'' + y = 0 with y(0) = 0 and y(pi) = 0 has infinitely many solutions
    let pi = std::f64::consts::PI;
    let err = solve_ivp_second_order(vec![1, 0, 1, 0], &[Condition::new(0.0, 0.0), Condition::new(pi, 0.0)])
        .unwrap_err();
    assert!(matches!(err, OdeError::MultipleSolutions { .. }));
    let err = solve_ivp_second_order(vec![1, 0, 1, 0], &[Condition::new(0.0, 0.0), Condition::new(pi, 1.0)])
        .unwrap_err();
    assert!(matches!(err, OdeError::NoSolution { .. }));
}

#[test]
fn condition_at_singular_point_is_reported() {
    // t*y' + 2y = 2 + t has the general solution C1/t^2 + t/3 + 1, which blows up at t = 0
    let err = solve_ivp_first_order(vec!["t", "2", "2 + t"], &[Condition::new(0.0, 1.0)]).unwrap_err();
    assert!(matches!(err, OdeError::SingularCondition { .. }), "{:?}", err);
    assert!(err.to_string().contains("singular point"));
    let solution = solve_ivp_first_order(vec!["t", "2", "2 + t"], &[Condition::new(1.0, 0.0)]).unwrap();
    assert_relative_eq!(solution.eval_expression(&["t"], &[2.0]).unwrap(), -1.0 / 3.0 + 2.0 / 3.0 + 1.0, epsilon = 1e-12);
}
