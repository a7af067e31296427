//! Small numeric utilities used across probability code: bracketed root
//! finding and one-dimensional minimization.

use ns_core::{Error, Result};

/// Bisection on a monotone predicate.
///
/// `lo` must satisfy `pred` and `hi` must not (or vice versa, the predicate
/// only has to flip once inside the bracket). Returns the midpoint of the
/// final bracket after `|hi - lo| <= tol` or `max_iter` halvings.
pub fn bisect_predicate<F: Fn(f64) -> Result<bool>>(
    mut lo: f64,
    mut hi: f64,
    tol: f64,
    max_iter: usize,
    pred: F,
) -> Result<f64> {
    let at_lo = pred(lo)?;
    for _ in 0..max_iter {
        if (hi - lo).abs() <= tol {
            break;
        }
        let mid = 0.5 * (lo + hi);
        if pred(mid)? == at_lo {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Brent's method for a root of `f` in `[a, b]`.
///
/// Requires `f(a)` and `f(b)` of opposite sign (or one of them zero).
pub fn brent<F: Fn(f64) -> f64>(
    mut a: f64,
    mut b: f64,
    tol: f64,
    max_iter: usize,
    f: F,
) -> Result<f64> {
    let mut fa = f(a);
    let mut fb = f(b);
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa * fb > 0.0 {
        return Err(Error::Validation(format!(
            "Invalid bracket: f({})={} and f({})={} have the same sign",
            a, fa, b, fb
        )));
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iter {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * tol;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation (secant when a == c).
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q0 = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q0 * (q0 - r) - (b - a) * (r - 1.0)),
                    (q0 - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol1 { d } else { tol1.copysign(xm) };
        fb = f(b);
    }

    Err(Error::Computation(format!("Brent root finding did not converge after {} iterations", max_iter)))
}

/// Golden-section search for the minimum of a unimodal `f` on `[a, b]`.
pub fn golden_section_min<F: Fn(f64) -> Result<f64>>(
    mut a: f64,
    mut b: f64,
    tol: f64,
    max_iter: usize,
    f: F,
) -> Result<f64> {
    let inv_phi = (5f64.sqrt() - 1.0) / 2.0;
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let mut fc = f(c)?;
    let mut fd = f(d)?;
    for _ in 0..max_iter {
        if (b - a).abs() <= tol {
            break;
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = f(c)?;
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = f(d)?;
        }
    }
    Ok(0.5 * (a + b))
}
