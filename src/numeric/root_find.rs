//! Bracketed 1-D root finder (§4.1): bisection with a secant-step
//! acceleration, used by the magnetizing-inductance solver (§4.7) and the
//! core-losses frequency/flux-density inverses (§4.8).

use crate::error::{Error, Result};

/// Tolerance on `|f(x)|` or the bracket width below which the search stops.
const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Maximum number of bracket doublings attempted before giving up when the
/// caller does not provide a bracket that already changes sign.
const MAX_BRACKET_DOUBLINGS: u32 = 32;

/// Maximum number of bisection/secant iterations within a known-good
/// bracket.
const MAX_ITERATIONS: u32 = 200;

/// Finds `x` in `[low, high]` such that `f(x) ≈ 0`, given that `f(low)` and
/// `f(high)` have opposite signs (or one of them is already within
/// tolerance).
///
/// On each iteration a secant step is attempted first (faster convergence
/// for smooth `f`); if the secant step would leave the current bracket, the
/// method falls back to a bisection step, guaranteeing convergence.
///
/// # Errors
/// Returns [`Error::RootNotFound`] if `f(low)` and `f(high)` do not bracket
/// a root (same sign) and the context string names what was being solved
/// for, or if the iteration budget is exhausted without reaching tolerance.
pub fn find_root<F>(context: &str, mut low: f64, mut high: f64, mut f: F) -> Result<f64>
where
    F: FnMut(f64) -> f64,
{
    if low > high {
        std::mem::swap(&mut low, &mut high);
    }

    let mut f_low = f(low);
    let mut f_high = f(high);

    if f_low.abs() < DEFAULT_TOLERANCE {
        return Ok(low);
    }
    if f_high.abs() < DEFAULT_TOLERANCE {
        return Ok(high);
    }

    if f_low.signum() == f_high.signum() {
        return Err(Error::RootNotFound {
            context: context.to_string(),
            low,
            high,
            attempts: 0,
        });
    }

    for iteration in 0..MAX_ITERATIONS {
        if (high - low).abs() < DEFAULT_TOLERANCE {
            return Ok(0.5 * (low + high));
        }

        // Attempt a secant step between the two bracket endpoints.
        let secant = if (f_high - f_low).abs() > f64::EPSILON {
            low - f_low * (high - low) / (f_high - f_low)
        } else {
            f64::NAN
        };

        let candidate = if secant.is_finite() && secant > low && secant < high {
            secant
        } else {
            0.5 * (low + high)
        };

        let f_candidate = f(candidate);
        if f_candidate.abs() < DEFAULT_TOLERANCE {
            return Ok(candidate);
        }

        if f_candidate.signum() == f_low.signum() {
            low = candidate;
            f_low = f_candidate;
        } else {
            high = candidate;
            f_high = f_candidate;
        }

        if iteration == MAX_ITERATIONS - 1 {
            return Err(Error::RootNotFound {
                context: context.to_string(),
                low,
                high,
                attempts: iteration + 1,
            });
        }
    }

    Err(Error::RootNotFound {
        context: context.to_string(),
        low,
        high,
        attempts: MAX_ITERATIONS,
    })
}

/// Like [`find_root`], but `low`/`high` need not already bracket a root: the
/// interval is doubled outward (around its centre) up to
/// [`MAX_BRACKET_DOUBLINGS`] times until the sign changes, then
/// [`find_root`] is run on the resulting bracket.
///
/// # Errors
/// Returns [`Error::RootNotFound`] if no sign change is found within the
/// doubling budget, or if [`find_root`] itself fails to converge.
pub fn find_root_expanding<F>(context: &str, mut low: f64, mut high: f64, mut f: F) -> Result<f64>
where
    F: FnMut(f64) -> f64,
{
    let mut f_low = f(low);
    let mut f_high = f(high);

    let mut attempts = 0;
    while f_low.signum() == f_high.signum() && attempts < MAX_BRACKET_DOUBLINGS {
        let center = 0.5 * (low + high);
        let half_width = 0.5 * (high - low);
        low = center - half_width * 2.0;
        high = center + half_width * 2.0;
        f_low = f(low);
        f_high = f(high);
        attempts += 1;
    }

    if f_low.signum() == f_high.signum() {
        return Err(Error::RootNotFound {
            context: context.to_string(),
            low,
            high,
            attempts,
        });
    }

    find_root(context, low, high, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_root_of_linear_function() {
        let root = find_root("linear", -10.0, 10.0, |x| x - 3.0).unwrap();
        assert!((root - 3.0).abs() < 1e-6);
    }

    #[test]
    fn finds_root_of_nonlinear_function() {
        let root = find_root("quadratic", 0.0, 5.0, |x| x * x - 4.0).unwrap();
        assert!((root - 2.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_non_bracketing_interval() {
        assert!(find_root("no root", 1.0, 2.0, |x| x * x + 1.0).is_err());
    }

    #[test]
    fn expanding_bracket_finds_distant_root() {
        let root = find_root_expanding("distant", -0.01, 0.01, |x| x - 50.0).unwrap();
        assert!((root - 50.0).abs() < 1e-5);
    }
}
