//! # Symbolic Engine Module
//!
//! Core expression type of the crate. Every other module (the ODE pipeline, the calculus
//! helpers, the plotting adapters) exchanges mathematics as [`Expr`] trees.
//!
//! ## Main Structures
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "t", "y", "C1"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `arcsin`, `arccos`, `arctg`
//!
//! ### `Equation`
//! A symbolic equality `lhs = rhs`, the value returned by tangent lines, by the equation
//! builder of the ODE pipeline and by the constant fitter.
//!
//! ## Key Methods
//! - `Symbols(symbols: &str)` - create several variables from a comma-separated string
//! - `set_variable()` / `set_variables()` - substitute numbers for variables
//! - `substitute_variable()` - substitute an expression for a variable
//! - `variables()` - sorted set of the variable names in the tree
//!
//! Expressions are immutable values: every method returns a new tree, so symbols such as
//! `t` or `C1` can be rebuilt locally wherever they are needed.

#![allow(non_camel_case_types)]

use std::collections::{BTreeSet, HashMap};
use std::f64;
use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// let t = Expr::Var("t".to_string());
/// let expr = Expr::Add(Box::new(t), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "t", "x", "C1")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Arcsine function: arcsin(x)
    arcsin(Box<Expr>),
    /// Arccosine function: arccos(x)
    arccos(Box<Expr>),
    /// Arctangent function: arctan(x) - uses mathematical notation 'arctg'
    arctg(Box<Expr>),
}

/// Symbolic equality constraint `lhs = rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Equation { lhs, rhs }
    }

    /// `lhs - rhs`, the expression that must vanish for the equation to hold.
    pub fn residual(&self) -> Expr {
        (self.lhs.clone() - self.rhs.clone()).simplify()
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

// binding strength used by Display to decide where parentheses are needed
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_POWER: u8 = 3;
const PREC_ATOM: u8 = 4;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => PREC_SUM,
            Expr::Mul(..) | Expr::Div(..) => PREC_PRODUCT,
            Expr::Const(val) if *val < 0.0 => PREC_PRODUCT,
            Expr::Pow(..) => PREC_POWER,
            _ => PREC_ATOM,
        }
    }

    fn fmt_with(&self, f: &mut fmt::Formatter, parent: u8) -> fmt::Result {
        let own = self.precedence();
        if own < parent {
            write!(f, "(")?;
            self.fmt_inner(f)?;
            write!(f, ")")
        } else {
            self.fmt_inner(f)
        }
    }

    /// the same value with the sign Display would print in front of it removed
    fn without_leading_minus(&self) -> Option<Expr> {
        match self {
            Expr::Const(c) if *c < 0.0 => Some(Expr::Const(-c)),
            Expr::Mul(lhs, rhs) => match lhs.as_ref() {
                Expr::Const(c) if *c == -1.0 => Some(rhs.as_ref().clone()),
                _ => lhs
                    .without_leading_minus()
                    .map(|positive| Expr::Mul(positive.boxed(), rhs.clone())),
            },
            Expr::Div(lhs, rhs) => lhs
                .without_leading_minus()
                .map(|positive| Expr::Div(positive.boxed(), rhs.clone())),
            _ => None,
        }
    }

    fn fmt_inner(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => {
                lhs.fmt_with(f, PREC_SUM)?;
                match rhs.without_leading_minus() {
                    Some(positive) => {
                        write!(f, " - ")?;
                        positive.fmt_with(f, PREC_PRODUCT)
                    }
                    None => {
                        write!(f, " + ")?;
                        rhs.fmt_with(f, PREC_SUM)
                    }
                }
            }
            Expr::Sub(lhs, rhs) => {
                lhs.fmt_with(f, PREC_SUM)?;
                match rhs.without_leading_minus() {
                    Some(positive) => {
                        write!(f, " + ")?;
                        positive.fmt_with(f, PREC_SUM)
                    }
                    None => {
                        write!(f, " - ")?;
                        rhs.fmt_with(f, PREC_PRODUCT)
                    }
                }
            }
            Expr::Mul(lhs, rhs) => match lhs.as_ref() {
                Expr::Const(c) if *c == -1.0 => {
                    write!(f, "-")?;
                    rhs.fmt_with(f, PREC_POWER)
                }
                _ => {
                    lhs.fmt_with(f, PREC_PRODUCT)?;
                    write!(f, "*")?;
                    rhs.fmt_with(f, PREC_POWER)
                }
            },
            Expr::Div(lhs, rhs) => {
                lhs.fmt_with(f, PREC_PRODUCT)?;
                write!(f, "/")?;
                rhs.fmt_with(f, PREC_POWER)
            }
            Expr::Pow(base, exp) => {
                base.fmt_with(f, PREC_ATOM)?;
                write!(f, "^")?;
                exp.fmt_with(f, PREC_ATOM)
            }
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctg(expr) => write!(f, "arctg({})", expr),
        }
    }
}

/// Display implementation for pretty printing symbolic expressions.
///
/// Parentheses are only emitted where operator precedence requires them, so the canonical
/// output of `simplify()` reads like `C1/t^2 + t/3 + 1`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_with(f, 0)
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Const(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Const(value as f64)
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let vars = Expr::Symbols("t, C1, C2");
    /// assert_eq!(vars.len(), 3);
    /// ```
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Expr::Var(s.to_string()))
            .collect()
    }

    /// Shorthand for `Expr::Var(name.to_string())`.
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    /// Rebuilds the node with every direct child passed through `f`.
    fn map_children<F>(&self, mut f: F) -> Expr
    where
        F: FnMut(&Expr) -> Expr,
    {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Mul(lhs, rhs) => Expr::Mul(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Div(lhs, rhs) => Expr::Div(Box::new(f(lhs)), Box::new(f(rhs))),
            Expr::Pow(base, exp) => Expr::Pow(Box::new(f(base)), Box::new(f(exp))),
            Expr::Exp(expr) => Expr::Exp(Box::new(f(expr))),
            Expr::Ln(expr) => Expr::Ln(Box::new(f(expr))),
            Expr::sin(expr) => Expr::sin(Box::new(f(expr))),
            Expr::cos(expr) => Expr::cos(Box::new(f(expr))),
            Expr::tg(expr) => Expr::tg(Box::new(f(expr))),
            Expr::arcsin(expr) => Expr::arcsin(Box::new(f(expr))),
            Expr::arccos(expr) => Expr::arccos(Box::new(f(expr))),
            Expr::arctg(expr) => Expr::arctg(Box::new(f(expr))),
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        match self {
            Expr::Var(name) if name == var => Expr::Const(value),
            _ => self.map_children(|child| child.set_variable(var, value)),
        }
    }

    /// Substitutes multiple variables with constant values using a map.
    ///
    /// Only variables present in the map are substituted.
    pub fn set_variables<S>(&self, var_map: &HashMap<String, f64, S>) -> Expr
    where
        S: std::hash::BuildHasher,
    {
        match self {
            Expr::Var(name) => match var_map.get(name) {
                Some(value) => Expr::Const(*value),
                None => self.clone(),
            },
            _ => self.map_children(|child| child.set_variables(var_map)),
        }
    }

    /// Substitutes a variable with an expression.
    pub fn substitute_variable(&self, var: &str, expr: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => expr.clone(),
            _ => self.map_children(|child| child.substitute_variable(var, expr)),
        }
    }

    /// Renames a variable throughout the expression.
    pub fn rename_variable(&self, old_var: &str, new_var: &str) -> Expr {
        self.substitute_variable(old_var, &Expr::Var(new_var.to_string()))
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr) => expr.contains_variable(var_name),
        }
    }

    /// Sorted, deduplicated names of all variables in the tree.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        self.collect_variables(&mut found);
        found
    }

    fn collect_variables(&self, found: &mut BTreeSet<String>) {
        match self {
            Expr::Var(name) => {
                found.insert(name.clone());
            }
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(found);
                rhs.collect_variables(found);
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr) => expr.collect_variables(found),
        }
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Square root as `self^0.5`.
    pub fn sqrt(self) -> Expr {
        Expr::Pow(self.boxed(), Box::new(Expr::Const(0.5)))
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// `Some(value)` for a bare constant node.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(val) => Some(*val),
            _ => None,
        }
    }
}

//___________________________________MACROS____________________________________

/// Macro to create symbolic variables from a comma-separated list
/// Usage: symbols!(t, y) -> creates variables t, y
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        {
            let var_names = stringify!($($var),+);
            let vars = $crate::symbolic::symbolic_engine::Expr::Symbols(var_names);
            let mut iter = vars.into_iter();
            ($(
                {
                    let $var = iter.next().unwrap();
                    $var
                }
            ),+)
        }
    };
}
