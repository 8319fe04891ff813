// the collection of small numeric helpers shared by the symbolic engine and its users

/// tolerance below which a computed value is treated as an exact integer or zero
pub const SNAP_TOLERANCE: f64 = 1e-10;

/// Evenly spaced samples on `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    match num_values {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num_values - 1) as f64;
            (0..num_values).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Rounds values that are within `SNAP_TOLERANCE` of an integer; turns -0.0 into 0.0.
pub fn snap(value: f64) -> f64 {
    let rounded = value.round();
    let snapped = if (value - rounded).abs() <= SNAP_TOLERANCE * rounded.abs().max(1.0) {
        rounded
    } else {
        value
    };
    if snapped == 0.0 { 0.0 } else { snapped }
}

/// true if `value` is an integer up to `SNAP_TOLERANCE`
pub fn is_integer(value: f64) -> bool {
    value.is_finite() && (value - value.round()).abs() <= SNAP_TOLERANCE * value.abs().max(1.0)
}

/// Finds `p/q` with `q <= 1000` equal to `value` up to round-off.
///
/// Used when printing canonical expressions so that `0.333..` shows up as `1/3`.
pub fn rational_approx(value: f64) -> Option<(i64, i64)> {
    if !value.is_finite() || value.abs() > 1e12 {
        return None;
    }
    for q in 1..=1000_i64 {
        let p = (value * q as f64).round();
        if (value - p / q as f64).abs() <= 1e-12 * value.abs().max(1.0) {
            return Some((p as i64, q));
        }
    }
    None
}

/// central difference derivative
pub fn numerical_derivative<F>(f: F, x: f64, step: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    (f(x + step) - f(x - step)) / (2.0 * step)
}
