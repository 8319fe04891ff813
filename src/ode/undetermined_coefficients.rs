//! Particular solutions of `a y'' + b y' + c y = g(t)` with numeric `a, b, c` by the
//! method of undetermined coefficients.
//!
//! `g` must be a sum of terms `K t^n e^{kt}`, `K t^n e^{kt} cos(wt + φ)` and
//! `K t^n e^{kt} sin(wt + φ)` with numeric `K, k, w, φ`. Terms are grouped by `(k, w)`;
//! for each group the trial function is
//!
//! `t^s Σ_{j<=n} t^j e^{kt} (A_j cos wt + B_j sin wt)`
//!
//! where `n` is the highest power of `t` in the group and `s` the multiplicity of `k + iw`
//! as a characteristic root. Plugging the trial into the operator and matching the
//! coefficients of every basis function gives a linear system for the `A_j, B_j`.

use crate::ode::general_solver::{CharacteristicRoots, close, exp_t};
use crate::symbolic::linear_solve::LinearSystem;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_integration::linear_in;
use crate::symbolic::symbolic_simplify::{Factor, FuncKind, Product, Sum, func_of};
use crate::symbolic::utils::{is_integer, snap};
use log::debug;
use nalgebra::{DMatrix, DVector};
use std::collections::{BTreeMap, HashMap};

/// `t^degree e^{kt} (cos_part cos wt + sin_part sin wt)`, phase already expanded
#[derive(Clone, Debug, PartialEq)]
struct ForcingTerm {
    degree: u32,
    k: f64,
    w: f64,
    cos_part: f64,
    sin_part: f64,
}

/// one trial block per distinct `(k, w)`
#[derive(Clone, Debug, PartialEq)]
struct ForcingGroup {
    k: f64,
    w: f64,
    degree: u32,
}

fn forcing_term(product: &Product, coefficient: f64, t: &str) -> Result<ForcingTerm, String> {
    let reject = || format!("forcing term {} is not of the form t^n exp(kt) sin/cos(wt + phase)", Sum::single(product.clone(), coefficient).to_expr());
    let mut term = ForcingTerm {
        degree: 0,
        k: 0.0,
        w: 0.0,
        cos_part: coefficient,
        sin_part: 0.0,
    };
    let mut trig_seen = false;
    for (factor, e) in product.factors() {
        match factor {
            Factor::Symbol(name) if name == t && e > 0.0 && is_integer(e) => {
                term.degree = e.round() as u32;
            }
            Factor::Exp(arg) => {
                let (k, intercept) = linear_in(arg, t).ok_or_else(reject)?;
                if !intercept.is_zero() {
                    return Err(reject());
                }
                term.k = k;
            }
            Factor::Func(kind, arg)
                if matches!(kind, FuncKind::Sin | FuncKind::Cos) && e == 1.0 && !trig_seen =>
            {
                trig_seen = true;
                let (w, intercept) = linear_in(arg, t).ok_or_else(reject)?;
                let phase = intercept.as_constant().ok_or_else(reject)?;
                // sin(-w t + φ) = -sin(w t - φ), cos(-w t + φ) = cos(w t - φ)
                let (w, phase, sign) = if w < 0.0 {
                    let sign = if *kind == FuncKind::Sin { -1.0 } else { 1.0 };
                    (-w, -phase, sign)
                } else {
                    (w, phase, 1.0)
                };
                let c = coefficient * sign;
                term.w = w;
                // cos(wt + φ) = cos φ cos wt - sin φ sin wt, sin(wt + φ) = cos φ sin wt + sin φ cos wt
                (term.cos_part, term.sin_part) = match kind {
                    FuncKind::Cos => (c * phase.cos(), -c * phase.sin()),
                    _ => (c * phase.sin(), c * phase.cos()),
                };
            }
            _ => return Err(reject()),
        }
    }
    Ok(term)
}

/// `t^j e^{kt} trig(wt)`
fn basis_function(t: &str, j: u32, k: f64, w: f64, kind: FuncKind) -> Sum {
    let power = if j == 0 {
        Sum::constant(1.0)
    } else {
        Sum::from_factor(Factor::Symbol(t.to_string()), j as f64)
    };
    power
        .mul(&exp_t(k, t))
        .mul(&func_of(kind, &Sum::symbol(t).scale(w)))
}

/// Solves `L[trial] = g`; errors are human-readable reasons.
pub fn particular_solution(
    coefficients: [f64; 3],
    roots: &CharacteristicRoots,
    forcing: &Expr,
    t: &str,
) -> Result<Sum, String> {
    let forcing = forcing.canonical();
    if forcing.is_zero() {
        return Ok(Sum::zero());
    }
    let mut groups: Vec<ForcingGroup> = Vec::new();
    let mut rewritten = Sum::zero();
    for (product, coefficient) in forcing.terms() {
        let term = forcing_term(product, coefficient, t)?;
        rewritten = rewritten
            .add(&basis_function(t, term.degree, term.k, term.w, FuncKind::Cos).scale(term.cos_part))
            .add(&basis_function(t, term.degree, term.k, term.w, FuncKind::Sin).scale(term.sin_part));
        match groups.iter_mut().find(|g| close(g.k, term.k) && close(g.w, term.w)) {
            Some(group) => group.degree = group.degree.max(term.degree),
            None => groups.push(ForcingGroup {
                k: term.k,
                w: term.w,
                degree: term.degree,
            }),
        }
    }

    let mut unknowns: Vec<String> = Vec::new();
    let mut trial = Sum::zero();
    for group in &groups {
        let s = roots.multiplicity(group.k, group.w) as u32;
        debug!("trial block k = {}, w = {}, degree {}, shifted by t^{}", group.k, group.w, group.degree, s);
        for j in 0..=group.degree {
            let name = format!("A{}", unknowns.len());
            let cos_basis = basis_function(t, j + s, group.k, group.w, FuncKind::Cos);
            trial = trial.add(&Sum::symbol(&name).mul(&cos_basis));
            unknowns.push(name);
            if group.w > 0.0 {
                let name = format!("B{}", unknowns.len());
                let sin_basis = basis_function(t, j + s, group.k, group.w, FuncKind::Sin);
                trial = trial.add(&Sum::symbol(&name).mul(&sin_basis));
                unknowns.push(name);
            }
        }
    }

    // one print/parse pass for every piece so that exp and trig arguments share the same keys
    let [a, b, c] = coefficients;
    let trial_expr = trial.to_expr();
    let first = trial_expr.diff(t);
    let second = first.diff(t);
    let residual = second
        .canonical()
        .scale(a)
        .add(&first.canonical().scale(b))
        .add(&trial_expr.canonical().scale(c))
        .sub(&rewritten.to_expr().canonical());

    let system = match_basis_functions(&residual, &unknowns)?;
    let values = system
        .solve()
        .map_err(|e| format!("undetermined coefficients: {}", e))?;
    let values: HashMap<String, f64> = values.into_iter().map(|(k, v)| (k, snap(v))).collect();
    Ok(trial_expr.set_variables(&values).canonical())
}

/// One equation per basis function: `Σ coeff(unknown) · unknown = -free term`.
fn match_basis_functions(residual: &Sum, unknowns: &[String]) -> Result<LinearSystem, String> {
    let symbols: Vec<Factor> = unknowns.iter().map(|u| Factor::Symbol(u.clone())).collect();
    let mut rows: BTreeMap<Product, (Vec<f64>, f64)> = BTreeMap::new();
    for (product, coefficient) in residual.terms() {
        let found = symbols
            .iter()
            .enumerate()
            .find_map(|(i, s)| product.exponent_of(s).map(|e| (i, s, e)));
        match found {
            Some((column, symbol, e)) => {
                if e != 1.0 {
                    return Err(format!("{} appears non-linearly", unknowns[column]));
                }
                let basis = product.without(symbol);
                let row = rows.entry(basis).or_insert_with(|| (vec![0.0; unknowns.len()], 0.0));
                row.0[column] += coefficient;
            }
            None => {
                let row = rows
                    .entry(product.clone())
                    .or_insert_with(|| (vec![0.0; unknowns.len()], 0.0));
                row.1 -= coefficient;
            }
        }
    }
    let n_rows = rows.len();
    let mut matrix = DMatrix::zeros(n_rows, unknowns.len());
    let mut rhs = DVector::zeros(n_rows);
    for (i, (coefficients, free)) in rows.into_values().enumerate() {
        for (j, value) in coefficients.into_iter().enumerate() {
            matrix[(i, j)] = value;
        }
        rhs[i] = free;
    }
    Ok(LinearSystem {
        matrix,
        rhs,
        unknowns: unknowns.to_vec(),
    })
}
