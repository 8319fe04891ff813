//! # Symbolic Integration Module
//!
//! Antiderivatives of the expression classes produced by linear ODE work. The integrand
//! is brought to canonical sum-of-products form and integrated term by term; the factors
//! free of the integration variable are carried through as a constant multiplier.
//!
//! ## Supported term shapes
//! - `t^n` for any real `n` (`t^-1` gives `ln(t)`)
//! - `t^n * exp(a*t + b) * trig(w*t + p) * ...` for integer `n >= 0`, numeric `a` and `w`,
//!   any number of sine/cosine factors (reduced with product-to-sum identities)
//! - `t^n * ln(t)`, `ln(a*t + b)`
//! - `(a*t + b)^k`, including `k = -1`
//!
//! The exponential-trigonometric case uses the closed form
//! `∫ t^n e^{zt} dt = e^{zt} Σ_k (-1)^k n!/(n-k)! t^{n-k} / z^{k+1}` with `z = a + iw`,
//! whose real part gives the cosine integral and the imaginary part the sine integral.
//!
//! Anything else is reported as `SymbolicError::NoClosedForm`; callers decide whether
//! that is fatal.

use crate::symbolic::errors::SymbolicError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_simplify::{
    exp_of, func_of, ln_of, Factor, FuncKind, Product, Sum,
};
use crate::symbolic::utils::is_integer;
use num_complex::Complex64;

/// `Some((slope, intercept))` if `arg = slope*var + intercept` with a numeric slope.
pub fn linear_in(arg: &Sum, var: &str) -> Option<(f64, Sum)> {
    let unit = Product::from_factor(Factor::Symbol(var.to_string()), 1.0);
    let mut slope = 0.0;
    let mut intercept = Sum::zero();
    for (product, c) in arg.terms() {
        if !product.contains_symbol(var) {
            intercept.add_term(product.clone(), c);
        } else if *product == unit {
            slope += c;
        } else {
            return None;
        }
    }
    Some((slope, intercept))
}

/// sine or cosine of `w*var + phase`, with a coefficient
#[derive(Clone, Debug)]
struct TrigPiece {
    coefficient: f64,
    kind: FuncKind,
    w: f64,
    phase: Sum,
}

impl TrigPiece {
    fn unit() -> Self {
        TrigPiece {
            coefficient: 1.0,
            kind: FuncKind::Cos,
            w: 0.0,
            phase: Sum::zero(),
        }
    }

    /// keeps the frequency non-negative: `cos(-x) = cos(x)`, `sin(-x) = -sin(x)`
    fn normalized(mut self) -> Self {
        if self.w < 0.0 {
            self.w = -self.w;
            self.phase = self.phase.neg();
            if self.kind == FuncKind::Sin {
                self.coefficient = -self.coefficient;
            }
        }
        self
    }

    /// product-to-sum expansion of `self * other`
    fn times(&self, other: &TrigPiece) -> [TrigPiece; 2] {
        let half = 0.5 * self.coefficient * other.coefficient;
        let minus = (self.w - other.w, self.phase.sub(&other.phase));
        let plus = (self.w + other.w, self.phase.add(&other.phase));
        let piece = |coefficient: f64, kind: FuncKind, (w, phase): (f64, Sum)| {
            TrigPiece { coefficient, kind, w, phase }.normalized()
        };
        use FuncKind::{Cos, Sin};
        match (self.kind, other.kind) {
            (Cos, Cos) => [piece(half, Cos, minus), piece(half, Cos, plus)],
            (Sin, Sin) => [piece(half, Cos, minus), piece(-half, Cos, plus)],
            (Sin, _) => [piece(half, Sin, plus), piece(half, Sin, minus)],
            (_, _) => [piece(half, Sin, plus), piece(-half, Sin, minus)],
        }
    }
}

fn reduce_trig(factors: &[TrigPiece]) -> Vec<TrigPiece> {
    let mut pieces = match factors.split_first() {
        None => return vec![TrigPiece::unit()],
        Some((first, rest)) => {
            let mut pieces = vec![first.clone()];
            for factor in rest {
                pieces = pieces.iter().flat_map(|p| p.times(factor)).collect();
            }
            pieces
        }
    };
    pieces.retain(|p| p.coefficient != 0.0);
    pieces
}

/// what the variable-dependent part of a single term looks like
#[derive(Default)]
struct TermShape {
    power: f64,
    rate: f64,
    trig: Vec<TrigPiece>,
    log: Option<(f64, Sum)>,
    group: Option<((f64, Sum), f64)>,
}

fn drop_roundoff(value: f64, scale: f64) -> f64 {
    if value.abs() <= 1e-13 * scale { 0.0 } else { value }
}

/// `∫ t^n e^{a t} trig(w t + phase) dt`
fn integrate_exp_trig(n: f64, a: f64, piece: &TrigPiece, var: &str) -> Option<Sum> {
    let t = Sum::symbol(var);
    if a == 0.0 && piece.w == 0.0 {
        let factor = func_of(piece.kind, &piece.phase);
        if factor.is_zero() {
            return Some(Sum::zero());
        }
        let antiderivative = if n == -1.0 {
            ln_of(&t)
        } else {
            t.powf(n + 1.0).scale(1.0 / (n + 1.0))
        };
        return Some(factor.mul(&antiderivative).scale(piece.coefficient));
    }
    if !is_integer(n) || n < 0.0 {
        return None;
    }
    let n = n.round() as i32;
    let z = Complex64::new(a, piece.w);
    let theta = t.scale(piece.w).add(&piece.phase);
    let cos_theta = func_of(FuncKind::Cos, &theta);
    let sin_theta = func_of(FuncKind::Sin, &theta);
    let mut acc = Sum::zero();
    let mut falling = 1.0;
    for k in 0..=n {
        if k > 0 {
            falling *= (n - k + 1) as f64;
        }
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        let ck = Complex64::new(sign * falling, 0.0) / z.powi(k + 1);
        let re = drop_roundoff(ck.re, ck.norm());
        let im = drop_roundoff(ck.im, ck.norm());
        let trig = match piece.kind {
            FuncKind::Cos => cos_theta.scale(re).sub(&sin_theta.scale(im)),
            _ => sin_theta.scale(re).add(&cos_theta.scale(im)),
        };
        acc = acc.add(&t.powf((n - k) as f64).mul(&trig));
    }
    let growth = if a != 0.0 {
        exp_of(&t.scale(a))
    } else {
        Sum::constant(1.0)
    };
    Some(growth.mul(&acc).scale(piece.coefficient))
}

fn integrate_term(product: &Product, c: f64, var: &str) -> Option<Sum> {
    let mut constant = Sum::constant(c);
    let mut shape = TermShape::default();
    for (factor, e) in product.factors() {
        if !factor.contains_symbol(var) {
            constant = constant.mul(&Sum::from_factor(factor.clone(), e));
            continue;
        }
        match factor {
            Factor::Symbol(_) => shape.power += e,
            Factor::Exp(arg) => {
                let (rate, intercept) = linear_in(arg, var)?;
                shape.rate += rate;
                constant = constant.mul(&exp_of(&intercept));
            }
            Factor::Func(kind @ (FuncKind::Sin | FuncKind::Cos), arg)
                if is_integer(e) && e > 0.0 =>
            {
                let (w, phase) = linear_in(arg, var)?;
                for _ in 0..e.round() as usize {
                    shape.trig.push(
                        TrigPiece {
                            coefficient: 1.0,
                            kind: *kind,
                            w,
                            phase: phase.clone(),
                        }
                        .normalized(),
                    );
                }
            }
            Factor::Func(FuncKind::Ln, arg) if e == 1.0 && shape.log.is_none() => {
                shape.log = Some(linear_in(arg, var)?);
            }
            Factor::Group(group) if shape.group.is_none() => {
                shape.group = Some((linear_in(group, var)?, e));
            }
            _ => return None,
        }
    }
    let t = Sum::symbol(var);
    let body = if let Some(((a, b), k)) = shape.group {
        if shape.power != 0.0 || shape.rate != 0.0 || !shape.trig.is_empty() || shape.log.is_some() || a == 0.0 {
            return None;
        }
        let g = t.scale(a).add(&b);
        if k == -1.0 {
            ln_of(&g).scale(1.0 / a)
        } else {
            g.powf(k + 1.0).scale(1.0 / (a * (k + 1.0)))
        }
    } else if let Some((a, b)) = shape.log {
        if shape.rate != 0.0 || !shape.trig.is_empty() || a == 0.0 {
            return None;
        }
        let u = t.scale(a).add(&b);
        let log_u = ln_of(&u);
        let n = shape.power;
        if b.is_zero() {
            if n == -1.0 {
                log_u.powf(2.0).scale(0.5)
            } else {
                let lifted = t.powf(n + 1.0);
                lifted
                    .mul(&log_u)
                    .scale(1.0 / (n + 1.0))
                    .sub(&lifted.scale(1.0 / ((n + 1.0) * (n + 1.0))))
            }
        } else if n == 0.0 {
            u.mul(&log_u).sub(&u).scale(1.0 / a)
        } else {
            return None;
        }
    } else {
        let mut total = Sum::zero();
        for piece in reduce_trig(&shape.trig) {
            total = total.add(&integrate_exp_trig(shape.power, shape.rate, &piece, var)?);
        }
        total
    };
    Some(constant.mul(&body))
}

/// Antiderivative of a canonical sum, `None` if some term has no supported shape.
pub fn integrate_sum(sum: &Sum, var: &str) -> Option<Sum> {
    let mut total = Sum::zero();
    for (product, c) in sum.terms() {
        total = total.add(&integrate_term(product, c, var)?);
    }
    Some(total)
}

impl Expr {
    /// Antiderivative with respect to `var`, without an additive constant.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("t*exp(-t)").unwrap();
    /// let F = f.integrate("t").unwrap(); // -t*exp(-t) - exp(-t)
    /// ```
    pub fn integrate(&self, var: &str) -> Result<Expr, SymbolicError> {
        integrate_sum(&self.canonical(), var)
            .map(|antiderivative| antiderivative.to_expr())
            .ok_or_else(|| SymbolicError::NoClosedForm {
                expr: self.to_string(),
                var: var.to_string(),
            })
    }

    /// `F(b) - F(a)` through the antiderivative.
    pub fn definite_integral(&self, var: &str, a: f64, b: f64) -> Result<f64, SymbolicError> {
        let antiderivative = self.integrate(var)?;
        Ok(antiderivative.eval_expression(&[var], &[b])? - antiderivative.eval_expression(&[var], &[a])?)
    }
}
