use crate::ode::constant_fitter::{ConstantMap, SolutionFamily};
use crate::ode::errors::OdeError;
use crate::ode::general_solver::{GeneralSolution, SystemSolution};
use crate::symbolic::symbolic_engine::Expr;

/// Substitutes every free constant; a constant missing from the map is an error.
fn substitute_all<S: SolutionFamily>(solution: &S, expr: &Expr, constants: &ConstantMap) -> Result<Expr, OdeError> {
    let mut result = expr.clone();
    for name in solution.constants() {
        let value = constants.get(name).ok_or(OdeError::UnderDetermined {
            constants: solution.constants().len(),
            conditions: constants.len(),
        })?;
        result = result.set_variable(name, *value);
    }
    Ok(result.simplify())
}

/// The particular solution selected by `constants`.
pub fn assemble(solution: &GeneralSolution, constants: &ConstantMap) -> Result<Expr, OdeError> {
    substitute_all(solution, &solution.expr, constants)
}

/// `(x(t), y(t))` selected by `constants`.
pub fn assemble_system(solution: &SystemSolution, constants: &ConstantMap) -> Result<(Expr, Expr), OdeError> {
    Ok((
        substitute_all(solution, &solution.x, constants)?,
        substitute_all(solution, &solution.y, constants)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble() {
        let general = GeneralSolution {
            function: "y".to_string(),
            variable: "t".to_string(),
            expr: Expr::parse_expression("C1/t^2 + t/3 + 1").unwrap(),
            constants: vec!["C1".to_string()],
        };
        let constants = ConstantMap::from([("C1".to_string(), -4.0 / 3.0)]);
        let particular = assemble(&general, &constants).unwrap();
        assert_eq!(particular.to_string(), "-4/(3*t^2) + t/3 + 1");
        assert!(!particular.contains_variable("C1"));

        let err = assemble(&general, &ConstantMap::new()).unwrap_err();
        assert_eq!(err, OdeError::UnderDetermined { constants: 1, conditions: 0 });
    }

    #[test]
    fn test_assemble_system() {
        let general = SystemSolution {
            variable: "t".to_string(),
            x: Expr::parse_expression("C1*exp(t)").unwrap(),
            y: Expr::parse_expression("C2*exp(-3*t)").unwrap(),
            constants: vec!["C1".to_string(), "C2".to_string()],
        };
        let constants = ConstantMap::from([("C1".to_string(), 0.0), ("C2".to_string(), 1.0)]);
        let (x, y) = assemble_system(&general, &constants).unwrap();
        assert_eq!(x, Expr::Const(0.0));
        assert_eq!(y.to_string(), "exp(-3*t)");
    }
}
