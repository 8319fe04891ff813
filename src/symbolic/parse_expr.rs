//! Turns a string such as `"t**2*exp(-3*t) + sin(2*t)"` into an [`Expr`].
//!
//! The grammar is parsed with `nom` combinators:
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := unary (('*' | '/') unary)*
//! unary      := ('-' | '+') unary | power
//! power      := atom (('^' | '**') unary)?
//! atom       := number | function '(' expression ')' | identifier | '(' expression ')'
//! ```
//! Powers are right associative (`2^3^2 = 2^9`) and bind tighter than unary minus
//! (`-t^2 = -(t^2)`). Both `^` and `**` are accepted, `log` is the natural logarithm,
//! `pi` and `E` are the usual constants.

use crate::symbolic::errors::SymbolicError;
use crate::symbolic::symbolic_engine::Expr;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0, one_of},
    combinator::{map_res, opt, recognize},
    error::{Error, ErrorKind},
    multi::many0,
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded},
};

/// unsigned literal; signs belong to `unary`
fn number(input: &str) -> IResult<&str, Expr> {
    if input.starts_with(['+', '-']) {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Float)));
    }
    let mut parser = map_res(recognize_float, |s: &str| s.parse::<f64>().map(Expr::Const));
    parser.parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    let mut parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    parser.parse(input)
}

fn variable(input: &str) -> IResult<&str, Expr> {
    let (input, name) = identifier(input)?;
    let expr = match name {
        "pi" => Expr::Const(std::f64::consts::PI),
        "E" => Expr::Const(std::f64::consts::E),
        _ => Expr::Var(name.to_string()),
    };
    Ok((input, expr))
}

fn parenthesized(input: &str) -> IResult<&str, Expr> {
    let mut parser = delimited(
        char('('),
        expression,
        preceded(multispace0, char(')')),
    );
    parser.parse(input)
}

fn function_call(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = identifier(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, arg) = parenthesized(rest)?;
    let arg = Box::new(arg);
    let expr = match name {
        "exp" => Expr::Exp(arg),
        "ln" | "log" => Expr::Ln(arg),
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tan" | "tg" => Expr::tg(arg),
        "arcsin" | "asin" => Expr::arcsin(arg),
        "arccos" | "acos" => Expr::arccos(arg),
        "arctan" | "atan" | "arctg" => Expr::arctg(arg),
        "sqrt" => arg.sqrt(),
        // an unknown name applied to an argument is an error, not a variable
        _ => return Err(nom::Err::Failure(Error::new(input, ErrorKind::Tag))),
    };
    Ok((rest, expr))
}

fn atom(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;
    alt((number, function_call, variable, parenthesized)).parse(input)
}

fn power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = atom(input)?;
    let mut exponent = opt(preceded(
        delimited(multispace0, alt((tag("**"), tag("^"))), multispace0),
        unary,
    ));
    let (input, exp) = exponent.parse(input)?;
    match exp {
        Some(exp) => Ok((input, base.pow(exp))),
        None => Ok((input, base)),
    }
}

fn unary(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;
    let mut sign = opt(one_of("+-"));
    let (rest, sign) = sign.parse(input)?;
    match sign {
        Some('-') => {
            let (rest, inner) = unary(rest)?;
            let negated = match inner {
                Expr::Const(c) => Expr::Const(-c),
                other => -other,
            };
            Ok((rest, negated))
        }
        Some(_) => unary(rest),
        None => power(input),
    }
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let mut rest = many0(pair(delimited(multispace0, one_of("*/"), multispace0), unary));
    let (input, pairs) = rest.parse(input)?;
    let expr = pairs.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => acc * rhs,
        _ => acc / rhs,
    });
    Ok((input, expr))
}

fn expression(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    let mut rest = many0(pair(delimited(multispace0, one_of("+-"), multispace0), term));
    let (input, pairs) = rest.parse(input)?;
    let expr = pairs.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => acc + rhs,
        _ => acc - rhs,
    });
    Ok((input, expr))
}

impl Expr {
    /// Parses a string into a symbolic expression.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let e = Expr::parse_expression("t**2 + 3*t").unwrap();
    /// assert_eq!(e.set_variable("t", 1.0).constant_value(), Some(4.0));
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, SymbolicError> {
        let parse_error = |reason: String| SymbolicError::Parse {
            input: input.to_string(),
            reason,
        };
        if input.trim().is_empty() {
            return Err(parse_error("empty input".to_string()));
        }
        let (rest, expr) = expression(input).map_err(|e| parse_error(e.to_string()))?;
        let rest = rest.trim();
        if !rest.is_empty() {
            return Err(parse_error(format!("unexpected input at '{}'", rest)));
        }
        Ok(expr)
    }
}

/// Anything the public API accepts where an expression is expected:
/// strings are parsed, numbers become constants.
pub trait IntoExpr {
    fn into_expr(self) -> Result<Expr, SymbolicError>;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Result<Expr, SymbolicError> {
        Ok(self)
    }
}

impl IntoExpr for &Expr {
    fn into_expr(self) -> Result<Expr, SymbolicError> {
        Ok(self.clone())
    }
}

impl IntoExpr for &str {
    fn into_expr(self) -> Result<Expr, SymbolicError> {
        Expr::parse_expression(self)
    }
}

impl IntoExpr for String {
    fn into_expr(self) -> Result<Expr, SymbolicError> {
        Expr::parse_expression(&self)
    }
}

impl IntoExpr for &String {
    fn into_expr(self) -> Result<Expr, SymbolicError> {
        Expr::parse_expression(self)
    }
}

impl IntoExpr for f64 {
    fn into_expr(self) -> Result<Expr, SymbolicError> {
        Ok(Expr::Const(self))
    }
}

impl IntoExpr for i32 {
    fn into_expr(self) -> Result<Expr, SymbolicError> {
        Ok(Expr::Const(self as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn t() -> Expr {
        Expr::var("t")
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(Expr::parse_expression("2.5").unwrap(), Expr::Const(2.5));
        assert_eq!(Expr::parse_expression("1e-3").unwrap(), Expr::Const(1e-3));
        assert_eq!(Expr::parse_expression(".5").unwrap(), Expr::Const(0.5));
        assert_eq!(Expr::parse_expression("-3").unwrap(), Expr::Const(-3.0));
        assert_eq!(Expr::parse_expression("1.25").unwrap(), Expr::Const(1.25));
        assert_eq!(Expr::parse_expression("2.5e2").unwrap(), Expr::Const(250.0));
    }

    #[test]
    fn test_trailing_decimals_keep_their_fraction() {
        assert_eq!(number("2.5").unwrap(), ("", Expr::Const(2.5)));
        assert_eq!(
            Expr::parse_expression("t^0.5").unwrap(),
            t().pow(Expr::Const(0.5))
        );
        assert_eq!(
            Expr::parse_expression("3*t + 0.25").unwrap(),
            Expr::Const(3.0) * t() + Expr::Const(0.25)
        );
        assert_eq!(
            Expr::parse_expression("t - 1.5").unwrap(),
            t() - Expr::Const(1.5)
        );
    }

    #[test]
    fn test_operator_precedence() {
        let parsed = Expr::parse_expression("1 + 2*t").unwrap();
        assert_eq!(parsed, Expr::Const(1.0) + Expr::Const(2.0) * t());
        let parsed = Expr::parse_expression("t - 1 - 2").unwrap();
        assert_eq!(parsed, (t() - Expr::Const(1.0)) - Expr::Const(2.0));
        let parsed = Expr::parse_expression("-t^2").unwrap();
        assert_eq!(parsed, -(t().pow(Expr::Const(2.0))));
    }

    #[test]
    fn test_power_is_right_associative() {
        let parsed = Expr::parse_expression("2^3^2").unwrap();
        assert_relative_eq!(parsed.constant_value().unwrap(), 512.0);
        let parsed = Expr::parse_expression("t**2").unwrap();
        assert_eq!(parsed, t().pow(Expr::Const(2.0)));
        let parsed = Expr::parse_expression("t^-1").unwrap();
        assert_eq!(parsed, t().pow(Expr::Const(-1.0)));
    }

    #[test]
    fn test_functions_and_constants() {
        let parsed = Expr::parse_expression("exp(-3*t) + sin(2 * t)").unwrap();
        let expected = (Expr::Const(-3.0) * t()).exp() + Expr::sin((Expr::Const(2.0) * t()).boxed());
        assert_eq!(parsed, expected);
        let parsed = Expr::parse_expression("log(x)").unwrap();
        assert_eq!(parsed, Expr::var("x").ln());
        let parsed = Expr::parse_expression("cos(pi)").unwrap();
        assert_relative_eq!(parsed.constant_value().unwrap(), -1.0);
        let parsed = Expr::parse_expression("sqrt(t)").unwrap();
        assert_eq!(parsed, t().sqrt());
    }

    #[test]
    fn test_identifiers_with_digits() {
        let parsed = Expr::parse_expression("C1*exp(t) + C2").unwrap();
        let vars: Vec<String> = parsed.variables().into_iter().collect();
        assert_eq!(vars, vec!["C1", "C2", "t"]);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "2*", "(t + 1", "f(t)", "t $ 2", "exp t"] {
            let result = Expr::parse_expression(bad);
            assert!(
                matches!(result, Err(SymbolicError::Parse { .. })),
                "'{}' should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_into_expr() {
        assert_eq!("t".into_expr().unwrap(), t());
        assert_eq!(2.0_f64.into_expr().unwrap(), Expr::Const(2.0));
        assert_eq!(3_i32.into_expr().unwrap(), Expr::Const(3.0));
        assert!("1 +".into_expr().is_err());
    }
}
