//! # Symbolic Expression Simplification Module
//!
//! Simplification works by converting an [`Expr`] tree into a canonical
//! sum-of-products form and printing it back.
//!
//! ## Canonical form
//!
//! - [`Sum`]: map `Product -> coefficient`, like terms are collected on insertion
//! - [`Product`]: map `Factor -> exponent`
//! - [`Factor`]: a symbol, an elementary function of a canonical argument, a multi-term
//!   group raised to a non-expandable power, or a single `exp(..)`
//!
//! ## Rules applied while building the form
//!
//! - products are distributed over sums, positive integer powers of sums are expanded
//! - `x^a * x^b = x^(a+b)`, `(x^a)^b = x^(a*b)`, zero exponents vanish
//! - all exponentials of a term are merged: `exp(a) * exp(b) = exp(a + b)`; the constant
//!   part of the argument is pulled out as a coefficient and `exp(k*ln(u)) = u^k`
//! - `ln(c * x^k * exp(v)) = ln(c) + k*ln(x) + v`
//! - `c^f = exp(f*ln(c))` for a numeric base and a symbolic exponent
//! - odd functions pull out the sign of their argument, `cos(-u) = cos(u)`
//! - a numeric phase is split off sines and cosines, `sin(u + c) = sin(u)cos(c) + cos(u)sin(c)`
//! - functions of numeric arguments are evaluated
//!
//! Equal expressions therefore reach the same canonical value in the common cases the
//! ODE pipeline produces (polynomials, rational terms in one variable, exponentials,
//! sines and cosines), which is what `is_identically_zero()` relies on.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{is_integer, rational_approx};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// relative size below which a cancelled coefficient is dropped
const CANCEL_TOLERANCE: f64 = 1e-12;
/// largest integer power of a multi-term sum that is multiplied out
const MAX_EXPANDED_POWER: f64 = 12.0;

/// `f64` with a total order so that it can be part of a `BTreeMap` key.
#[derive(Clone, Copy, Debug)]
pub struct Num(pub f64);

impl Num {
    pub fn new(value: f64) -> Self {
        Num(if value == 0.0 { 0.0 } else { value })
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Num {}

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Num {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Elementary functions other than `exp`, which gets its own factor kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FuncKind {
    Ln,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
}

impl FuncKind {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            FuncKind::Ln => value.ln(),
            FuncKind::Sin => value.sin(),
            FuncKind::Cos => value.cos(),
            FuncKind::Tan => value.tan(),
            FuncKind::Asin => value.asin(),
            FuncKind::Acos => value.acos(),
            FuncKind::Atan => value.atan(),
        }
    }

    pub fn to_expr(self, arg: Expr) -> Expr {
        let arg = Box::new(arg);
        match self {
            FuncKind::Ln => Expr::Ln(arg),
            FuncKind::Sin => Expr::sin(arg),
            FuncKind::Cos => Expr::cos(arg),
            FuncKind::Tan => Expr::tg(arg),
            FuncKind::Asin => Expr::arcsin(arg),
            FuncKind::Acos => Expr::arccos(arg),
            FuncKind::Atan => Expr::arctg(arg),
        }
    }

    fn is_odd(self) -> bool {
        matches!(
            self,
            FuncKind::Sin | FuncKind::Tan | FuncKind::Asin | FuncKind::Atan
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Factor {
    Symbol(String),
    Func(FuncKind, Box<Sum>),
    /// multi-term sum kept unexpanded (negative or fractional power)
    Group(Box<Sum>),
    /// at most one per product, always with exponent 1
    Exp(Box<Sum>),
}

impl Factor {
    pub fn contains_symbol(&self, name: &str) -> bool {
        match self {
            Factor::Symbol(s) => s == name,
            Factor::Func(_, arg) | Factor::Group(arg) | Factor::Exp(arg) => {
                arg.contains_symbol(name)
            }
        }
    }

    pub fn to_expr(&self) -> Expr {
        match self {
            Factor::Symbol(s) => Expr::Var(s.clone()),
            Factor::Func(kind, arg) => kind.to_expr(arg.to_expr()),
            Factor::Group(sum) => sum.to_expr(),
            Factor::Exp(arg) => Expr::Exp(Box::new(arg.to_expr())),
        }
    }
}

/// Product of factors with real exponents; the empty product is 1.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Product {
    factors: BTreeMap<Factor, Num>,
}

impl Product {
    pub fn one() -> Self {
        Product::default()
    }

    pub fn from_factor(factor: Factor, exponent: f64) -> Self {
        let mut factors = BTreeMap::new();
        factors.insert(factor, Num::new(exponent));
        Product { factors }
    }

    pub fn is_one(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn factors(&self) -> impl Iterator<Item = (&Factor, f64)> {
        self.factors.iter().map(|(f, e)| (f, e.0))
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn exponent_of(&self, factor: &Factor) -> Option<f64> {
        self.factors.get(factor).map(|e| e.0)
    }

    /// Copy of the product with `factor` removed.
    pub fn without(&self, factor: &Factor) -> Product {
        let mut factors = self.factors.clone();
        factors.remove(factor);
        Product { factors }
    }

    pub fn contains_symbol(&self, name: &str) -> bool {
        self.factors.keys().any(|f| f.contains_symbol(name))
    }

    /// `Some(u)` when the product is exactly `ln(u)`.
    fn as_single_ln(&self) -> Option<&Sum> {
        if self.factors.len() != 1 {
            return None;
        }
        match self.factors.iter().next() {
            Some((Factor::Func(FuncKind::Ln, arg), e)) if e.0 == 1.0 => Some(arg),
            _ => None,
        }
    }

    pub fn to_expr(&self) -> Expr {
        term_to_expr(self, 1.0)
    }
}

/// Canonical sum of `coefficient * product` terms.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sum {
    terms: BTreeMap<Product, Num>,
}

impl Sum {
    pub fn zero() -> Self {
        Sum::default()
    }

    pub fn constant(value: f64) -> Self {
        let mut sum = Sum::zero();
        sum.add_term(Product::one(), value);
        sum
    }

    pub fn symbol(name: &str) -> Self {
        Sum::single(Product::from_factor(Factor::Symbol(name.to_string()), 1.0), 1.0)
    }

    pub fn single(product: Product, coefficient: f64) -> Self {
        let mut sum = Sum::zero();
        sum.add_term(product, coefficient);
        sum
    }

    pub fn from_factor(factor: Factor, exponent: f64) -> Self {
        Sum::single(Product::from_factor(factor, exponent), 1.0)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Product, f64)> {
        self.terms.iter().map(|(p, c)| (p, c.0))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// `Some(value)` if the sum has no symbolic part.
    pub fn as_constant(&self) -> Option<f64> {
        match self.terms.len() {
            0 => Some(0.0),
            1 => self.terms.get(&Product::one()).map(|c| c.0),
            _ => None,
        }
    }

    /// coefficient of the first term in canonical order
    pub fn leading_coefficient(&self) -> f64 {
        self.terms.values().next().map(|c| c.0).unwrap_or(0.0)
    }

    pub fn contains_symbol(&self, name: &str) -> bool {
        self.terms.keys().any(|p| p.contains_symbol(name))
    }

    /// coefficient of the first non-constant term, falling back to the constant
    fn symbolic_lead(&self) -> f64 {
        self.terms()
            .find(|(p, _)| !p.is_one())
            .map(|(_, c)| c)
            .unwrap_or_else(|| self.leading_coefficient())
    }

    /// Factor pulled out of a multi-term group: the gcd of integer coefficients, otherwise
    /// the first non-constant coefficient; the sign follows the first non-constant term.
    fn group_scale(&self) -> f64 {
        let lead = self.symbolic_lead();
        if !self.terms().all(|(_, c)| is_integer(c) && c.abs() < 1e15) {
            return lead;
        }
        let gcd = self
            .terms()
            .map(|(_, c)| c.abs().round() as u64)
            .fold(0_u64, gcd_u64);
        if gcd == 0 { lead } else { lead.signum() * gcd as f64 }
    }

    pub fn add_term(&mut self, product: Product, coefficient: f64) {
        if coefficient == 0.0 {
            return;
        }
        match self.terms.get(&product).map(|c| c.0) {
            Some(old) => {
                let new = old + coefficient;
                if new.abs() <= CANCEL_TOLERANCE * old.abs().max(coefficient.abs()) {
                    self.terms.remove(&product);
                } else {
                    self.terms.insert(product, Num::new(new));
                }
            }
            None => {
                self.terms.insert(product, Num::new(coefficient));
            }
        }
    }

    pub fn add(&self, other: &Sum) -> Sum {
        let mut result = self.clone();
        for (p, c) in other.terms() {
            result.add_term(p.clone(), c);
        }
        result
    }

    pub fn scale(&self, factor: f64) -> Sum {
        let mut result = Sum::zero();
        for (p, c) in self.terms() {
            result.add_term(p.clone(), c * factor);
        }
        result
    }

    pub fn neg(&self) -> Sum {
        self.scale(-1.0)
    }

    pub fn sub(&self, other: &Sum) -> Sum {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Sum) -> Sum {
        if let Some(reduced) = self.absorb_into(other).or_else(|| other.absorb_into(self)) {
            return reduced;
        }
        let mut result = Sum::zero();
        for (pa, ca) in self.terms() {
            for (pb, cb) in other.terms() {
                result = result.add(&mul_terms(pa, ca, pb, cb));
            }
        }
        result
    }

    /// `self * other` when the single-term `other` holds a negative power of `self`,
    /// so `(t + 1) * (t + 1)^-1` reduces to 1 instead of being distributed.
    fn absorb_into(&self, other: &Sum) -> Option<Sum> {
        if self.len() < 2 || other.len() != 1 {
            return None;
        }
        let (product, c) = other.terms().next()?;
        let lead = self.group_scale();
        let normalized = self.scale(1.0 / lead);
        for (factor, e) in product.factors() {
            if e >= 0.0 {
                continue;
            }
            if let Factor::Group(group) = factor {
                let scale = if **group == normalized {
                    lead
                } else if **group == *self {
                    1.0
                } else {
                    continue;
                };
                let mut reduced = product.clone();
                reduced.factors.insert(factor.clone(), Num::new(e + 1.0));
                return Some(mul_terms(&reduced, c * scale, &Product::one(), 1.0));
            }
        }
        None
    }

    /// Real power with a numeric exponent.
    pub fn powf(&self, k: f64) -> Sum {
        if k == 0.0 {
            return Sum::constant(1.0);
        }
        if k == 1.0 {
            return self.clone();
        }
        if let Some(c) = self.as_constant() {
            return Sum::constant(c.powf(k));
        }
        if self.terms.len() == 1 {
            let (product, c) = self.terms().next().map(|(p, c)| (p.clone(), c)).unwrap_or_default();
            if c < 0.0 && !is_integer(k) {
                return Sum::from_factor(Factor::Group(Box::new(self.clone())), k);
            }
            let mut raised = Product::one();
            for (factor, e) in product.factors() {
                match factor {
                    Factor::Exp(arg) => {
                        raised
                            .factors
                            .insert(Factor::Exp(Box::new(arg.scale(k))), Num::new(1.0));
                    }
                    _ => {
                        raised.factors.insert(factor.clone(), Num::new(e * k));
                    }
                }
            }
            return mul_terms(&raised, c.powf(k), &Product::one(), 1.0);
        }
        if is_integer(k) && k > 0.0 && k <= MAX_EXPANDED_POWER {
            return self.powi(k.round() as u32);
        }
        let lead = self.group_scale();
        let (normalized, coefficient) = if is_integer(k) || lead > 0.0 {
            (self.scale(1.0 / lead), lead.powf(k))
        } else {
            (self.clone(), 1.0)
        };
        Sum::single(
            Product::from_factor(Factor::Group(Box::new(normalized)), k),
            coefficient,
        )
    }

    fn powi(&self, n: u32) -> Sum {
        let mut result = Sum::constant(1.0);
        for _ in 0..n {
            result = result.mul(self);
        }
        result
    }

    pub fn to_expr(&self) -> Expr {
        let constant = self.terms.get(&Product::one()).map(|c| c.0);
        let mut ordered: Vec<(&Product, f64)> = self.terms().filter(|(p, _)| !p.is_one()).collect();
        if let Some(c) = constant {
            ordered.push((&EMPTY_PRODUCT, c));
        }
        let mut iter = ordered.into_iter();
        let Some((first, c)) = iter.next() else {
            return Expr::Const(0.0);
        };
        let mut acc = term_to_expr(first, c);
        for (p, c) in iter {
            acc = if c < 0.0 {
                Expr::Sub(Box::new(acc), Box::new(term_to_expr(p, -c)))
            } else {
                Expr::Add(Box::new(acc), Box::new(term_to_expr(p, c)))
            };
        }
        acc
    }
}

fn gcd_u64(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd_u64(b, a % b) }
}

static EMPTY_PRODUCT: Product = Product {
    factors: BTreeMap::new(),
};

/// Multiplies two terms, merging powers and exponentials.
fn mul_terms(a: &Product, ca: f64, b: &Product, cb: f64) -> Sum {
    let mut plain: BTreeMap<Factor, f64> = BTreeMap::new();
    let mut exp_arg = Sum::zero();
    for (factor, e) in a.factors().chain(b.factors()) {
        match factor {
            Factor::Exp(arg) => exp_arg = exp_arg.add(&arg.scale(e)),
            _ => *plain.entry(factor.clone()).or_insert(0.0) += e,
        }
    }
    let mut product = Product::one();
    let mut expanded: Vec<(Sum, u32)> = Vec::new();
    for (factor, e) in plain {
        if e.abs() < CANCEL_TOLERANCE {
            continue;
        }
        match factor {
            Factor::Group(group) if is_integer(e) && e > 0.0 && e <= MAX_EXPANDED_POWER => {
                expanded.push((*group, e.round() as u32));
            }
            other => {
                product.factors.insert(other, Num::new(e));
            }
        }
    }
    let (exp_coefficient, ln_part, rest) = split_exp_argument(&exp_arg);
    if !rest.is_zero() {
        product
            .factors
            .insert(Factor::Exp(Box::new(rest)), Num::new(1.0));
    }
    let mut result = Sum::single(product, ca * cb * exp_coefficient);
    if let Some(extra) = ln_part {
        result = result.mul(&extra);
    }
    for (group, n) in expanded {
        result = result.mul(&group.powi(n));
    }
    result
}

/// Splits `exp(arg)` into `e^c * Π u^k * exp(rest)`.
fn split_exp_argument(arg: &Sum) -> (f64, Option<Sum>, Sum) {
    let mut coefficient = 1.0;
    let mut extra: Option<Sum> = None;
    let mut rest = Sum::zero();
    for (product, c) in arg.terms() {
        if product.is_one() {
            coefficient *= c.exp();
        } else if let Some(u) = product.as_single_ln() {
            let power = u.powf(c);
            extra = Some(match extra {
                Some(e) => e.mul(&power),
                None => power,
            });
        } else {
            rest.add_term(product.clone(), c);
        }
    }
    (coefficient, extra, rest)
}

pub fn exp_of(arg: &Sum) -> Sum {
    let product = Product::from_factor(Factor::Exp(Box::new(arg.clone())), 1.0);
    mul_terms(&product, 1.0, &Product::one(), 1.0)
}

fn ln_factor(factor: Factor) -> Sum {
    let inner = Sum::from_factor(factor, 1.0);
    Sum::from_factor(Factor::Func(FuncKind::Ln, Box::new(inner)), 1.0)
}

pub fn ln_of(arg: &Sum) -> Sum {
    if let Some(c) = arg.as_constant() {
        if c > 0.0 {
            return Sum::constant(c.ln());
        }
        return Sum::from_factor(Factor::Func(FuncKind::Ln, Box::new(arg.clone())), 1.0);
    }
    if arg.len() == 1 {
        let (product, c) = arg.terms().next().map(|(p, c)| (p.clone(), c)).unwrap_or_default();
        if c > 0.0 {
            let mut result = Sum::constant(c.ln());
            for (factor, e) in product.factors() {
                let piece = match factor {
                    Factor::Exp(v) => v.scale(e),
                    Factor::Group(g) => ln_factor(Factor::Group(g.clone())).scale(e),
                    other => ln_factor(other.clone()).scale(e),
                };
                result = result.add(&piece);
            }
            return result;
        }
    }
    Sum::from_factor(Factor::Func(FuncKind::Ln, Box::new(arg.clone())), 1.0)
}

pub fn func_of(kind: FuncKind, arg: &Sum) -> Sum {
    if kind == FuncKind::Ln {
        return ln_of(arg);
    }
    if let Some(c) = arg.as_constant() {
        let value = kind.apply(c);
        if value.is_finite() {
            return Sum::constant(if value.abs() < 1e-14 { 0.0 } else { value });
        }
    }
    if matches!(kind, FuncKind::Sin | FuncKind::Cos) && arg.len() > 1 {
        if let Some(shift) = arg.terms.get(&Product::one()).map(|c| c.0) {
            return shifted_trig(kind, &arg.sub(&Sum::constant(shift)), shift);
        }
    }
    if arg.symbolic_lead() < 0.0 {
        if kind.is_odd() {
            return func_of(kind, &arg.neg()).neg();
        }
        if kind == FuncKind::Cos {
            return func_of(kind, &arg.neg());
        }
    }
    Sum::from_factor(Factor::Func(kind, Box::new(arg.clone())), 1.0)
}

/// `sin(u + φ) = sin u cos φ + cos u sin φ`, `cos(u + φ) = cos u cos φ - sin u sin φ`
fn shifted_trig(kind: FuncKind, rest: &Sum, shift: f64) -> Sum {
    let phase = Sum::constant(shift);
    let (cos_phase, sin_phase) = (func_of(FuncKind::Cos, &phase), func_of(FuncKind::Sin, &phase));
    let (cos_rest, sin_rest) = (func_of(FuncKind::Cos, rest), func_of(FuncKind::Sin, rest));
    match kind {
        FuncKind::Sin => sin_rest.mul(&cos_phase).add(&cos_rest.mul(&sin_phase)),
        _ => cos_rest.mul(&cos_phase).sub(&sin_rest.mul(&sin_phase)),
    }
}

fn power_expr(base: Expr, exponent: f64) -> Expr {
    if exponent == 1.0 {
        base
    } else {
        Expr::Pow(Box::new(base), Box::new(Expr::Const(exponent)))
    }
}

fn product_expr(factors: Vec<Expr>) -> Option<Expr> {
    factors.into_iter().reduce(|acc, f| Expr::Mul(Box::new(acc), Box::new(f)))
}

fn term_to_expr(product: &Product, coefficient: f64) -> Expr {
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for (factor, e) in product.factors() {
        if e > 0.0 {
            numerator.push(power_expr(factor.to_expr(), e));
        } else {
            denominator.push(power_expr(factor.to_expr(), -e));
        }
    }
    let (num_coefficient, den_coefficient) = match rational_approx(coefficient) {
        Some((p, q)) => (p as f64, q as f64),
        None => (coefficient, 1.0),
    };
    let num = match product_expr(numerator) {
        None => Expr::Const(num_coefficient),
        Some(prod) if num_coefficient == 1.0 => prod,
        Some(prod) if num_coefficient == -1.0 => -prod,
        Some(prod) => Expr::Mul(Box::new(Expr::Const(num_coefficient)), Box::new(prod)),
    };
    if den_coefficient != 1.0 {
        denominator.insert(0, Expr::Const(den_coefficient));
    }
    match product_expr(denominator) {
        None => num,
        Some(den) => Expr::Div(Box::new(num), Box::new(den)),
    }
}

impl Sum {
    /// Builds the canonical form of an expression tree.
    pub fn from_expr(expr: &Expr) -> Sum {
        match expr {
            Expr::Var(name) => Sum::symbol(name),
            Expr::Const(c) => Sum::constant(*c),
            Expr::Add(lhs, rhs) => Sum::from_expr(lhs).add(&Sum::from_expr(rhs)),
            Expr::Sub(lhs, rhs) => Sum::from_expr(lhs).sub(&Sum::from_expr(rhs)),
            Expr::Mul(lhs, rhs) => Sum::from_expr(lhs).mul(&Sum::from_expr(rhs)),
            Expr::Div(lhs, rhs) => Sum::from_expr(lhs).mul(&Sum::from_expr(rhs).powf(-1.0)),
            Expr::Pow(base, exp) => {
                let base = Sum::from_expr(base);
                let exponent = Sum::from_expr(exp);
                match (exponent.as_constant(), base.as_constant()) {
                    (Some(k), _) => base.powf(k),
                    (None, Some(c)) if c > 0.0 => exp_of(&exponent.scale(c.ln())),
                    (None, _) => exp_of(&exponent.mul(&ln_of(&base))),
                }
            }
            Expr::Exp(arg) => exp_of(&Sum::from_expr(arg)),
            Expr::Ln(arg) => ln_of(&Sum::from_expr(arg)),
            Expr::sin(arg) => func_of(FuncKind::Sin, &Sum::from_expr(arg)),
            Expr::cos(arg) => func_of(FuncKind::Cos, &Sum::from_expr(arg)),
            Expr::tg(arg) => func_of(FuncKind::Tan, &Sum::from_expr(arg)),
            Expr::arcsin(arg) => func_of(FuncKind::Asin, &Sum::from_expr(arg)),
            Expr::arccos(arg) => func_of(FuncKind::Acos, &Sum::from_expr(arg)),
            Expr::arctg(arg) => func_of(FuncKind::Atan, &Sum::from_expr(arg)),
        }
    }
}

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Canonical sum-of-products form of the expression.
    pub fn canonical(&self) -> Sum {
        Sum::from_expr(self)
    }

    /// Algebraic simplification: expands, collects like terms, merges powers and
    /// exponentials, evaluates numeric sub-expressions.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let e = Expr::parse_expression("t*(t + 1) - t^2").unwrap();
    /// assert_eq!(e.simplify(), Expr::Var("t".to_string()));
    /// ```
    pub fn simplify(&self) -> Expr {
        self.canonical().to_expr()
    }

    /// true if the expression simplifies to the constant 0
    pub fn is_identically_zero(&self) -> bool {
        self.canonical().is_zero()
    }

    /// numeric value if the expression has no symbolic part after simplification
    pub fn constant_value(&self) -> Option<f64> {
        self.canonical().as_constant()
    }

    /// true if both sides simplify to the same canonical form
    pub fn equivalent_to(&self, other: &Expr) -> bool {
        (self.clone() - other.clone()).is_identically_zero()
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
    fn test_collect_like_terms() {
        let expr = Expr::Const(3.0) * t() + Expr::Const(2.0) * t();
        assert_eq!(expr.simplify(), Expr::Const(5.0) * t());
    }

    #[test]
    fn test_cancellation() {
        let expr = (t() + Expr::Const(1.0)) * t() - t().pow(Expr::Const(2.0)) - t();
        assert!(expr.is_identically_zero());
    }

    #[test]
    fn test_power_merging() {
        let expr = t().pow(Expr::Const(2.0)) * t().pow(Expr::Const(-2.0));
        assert_eq!(expr.simplify(), Expr::Const(1.0));
        let expr = t().pow(Expr::Const(2.0)).pow(Expr::Const(0.5));
        assert_eq!(expr.simplify(), t());
    }

    #[test]
    fn test_exp_merging() {
        let expr = t().exp() * (-t()).exp();
        assert_eq!(expr.simplify(), Expr::Const(1.0));
        let expr = (Expr::Const(2.0) * t().ln()).exp();
        assert_eq!(expr.simplify(), t().pow(Expr::Const(2.0)));
    }

    #[test]
    fn test_exp_constant_part_pulled_out() {
        let expr = (t() + Expr::Const(1.0)).exp();
        let canonical = expr.canonical();
        assert_eq!(canonical.len(), 1);
        let (_, c) = canonical.terms().next().unwrap();
        assert_relative_eq!(c, std::f64::consts::E, epsilon = 1e-12);
    }

    #[test]
    fn test_numeric_base_power() {
        let n = Expr::var("n");
        let ratio = Expr::Const(2.0).pow(-(n.clone() + Expr::Const(1.0)))
            / Expr::Const(2.0).pow(-n);
        assert_relative_eq!(ratio.constant_value().unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_ln_of_power() {
        let expr = t().pow(Expr::Const(3.0)).ln() - Expr::Const(3.0) * t().ln();
        assert!(expr.is_identically_zero());
        let expr = t().exp().ln();
        assert_eq!(expr.simplify(), t());
    }

    #[test]
    fn test_expand_square() {
        let expr = (t() + Expr::Const(1.0)).pow(Expr::Const(2.0));
        let expected = t().pow(Expr::Const(2.0)) + Expr::Const(2.0) * t() + Expr::Const(1.0);
        assert!(expr.equivalent_to(&expected));
    }

    #[test]
    fn test_group_division() {
        let expr = (t() + Expr::Const(1.0)) / (t() + Expr::Const(1.0));
        assert_eq!(expr.simplify(), Expr::Const(1.0));
        let expr = Expr::Const(2.0) / (Expr::Const(2.0) * t() + Expr::Const(2.0))
            - Expr::Const(1.0) / (t() + Expr::Const(1.0));
        assert!(expr.is_identically_zero());
    }

    #[test]
    fn test_trig_parity() {
        let expr = Expr::sin((-t()).boxed()) + Expr::sin(t().boxed());
        assert!(expr.is_identically_zero());
        let expr = Expr::cos((-t()).boxed()) - Expr::cos(t().boxed());
        assert!(expr.is_identically_zero());
        let expr = Expr::sin(Expr::Const(std::f64::consts::PI).boxed());
        assert_eq!(expr.simplify(), Expr::Const(0.0));
    }

    #[test]
    fn test_trig_phase_split() {
        let expr = Expr::sin((Expr::Const(3.0) * t() + Expr::Const(0.5)).boxed());
        let expected = Expr::Const(0.5f64.cos()) * Expr::sin((Expr::Const(3.0) * t()).boxed())
            + Expr::Const(0.5f64.sin()) * Expr::cos((Expr::Const(3.0) * t()).boxed());
        assert_eq!(expr.canonical().len(), 2);
        assert!(expr.equivalent_to(&expected));
        let expr = Expr::cos((Expr::Const(2.0) * t() + Expr::Const(1.0)).boxed());
        let expected = Expr::Const(1f64.cos()) * Expr::cos((Expr::Const(2.0) * t()).boxed())
            - Expr::Const(1f64.sin()) * Expr::sin((Expr::Const(2.0) * t()).boxed());
        assert!(expr.equivalent_to(&expected));
        // a negative slope is normalised after the split
        let expr = Expr::sin((Expr::Const(1.0) - t()).boxed());
        let expected = Expr::Const(1f64.sin()) * Expr::cos(t().boxed())
            - Expr::Const(1f64.cos()) * Expr::sin(t().boxed());
        assert!(expr.equivalent_to(&expected));
    }

    #[test]
    fn test_canonical_display() {
        let c1 = Expr::var("C1");
        let expr = c1 / t().pow(Expr::Const(2.0)) + t() / Expr::Const(3.0) + Expr::Const(1.0);
        assert_eq!(expr.simplify().to_string(), "C1/t^2 + t/3 + 1");
        let expr = Expr::Const(1.0) - Expr::Const(4.0) / (Expr::Const(3.0) * t().pow(Expr::Const(2.0)));
        assert_eq!(expr.simplify().to_string(), "-4/(3*t^2) + 1");
    }

    #[test]
    fn test_zero_expression() {
        assert_eq!(Sum::zero().to_expr(), Expr::Const(0.0));
        assert_eq!((t() - t()).simplify(), Expr::Const(0.0));
    }
}
