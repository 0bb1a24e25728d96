//! 1-D interpolation (§4.1): clamped linear interpolation and a
//! monotonicity-preserving cubic (Fritsch–Carlson / Akima-style) spline for
//! empirically tabulated curves (filling factors, gap fringing tables,
//! permeability tables).

use crate::error::{Error, Result};

/// Clamped linear interpolation over a strictly increasing `x`.
///
/// Contract: does not extrapolate — `x*` values outside `[x[0], x[n-1]]`
/// clamp to the nearest endpoint's `y` value.
///
/// # Errors
/// Returns [`Error::CalculationInvalid`] if `x` and `y` have different
/// lengths, fewer than two points, or `x` is not strictly increasing.
pub fn linear_interpolate(x: &[f64], y: &[f64], x_star: f64) -> Result<f64> {
    validate_table(x, y)?;

    if x_star <= x[0] {
        return Ok(y[0]);
    }
    if x_star >= x[x.len() - 1] {
        return Ok(y[y.len() - 1]);
    }

    let segment = x.windows(2).position(|w| x_star >= w[0] && x_star <= w[1]);
    let Some(i) = segment else {
        return Ok(y[y.len() - 1]);
    };

    let (x0, x1) = (x[i], x[i + 1]);
    let (y0, y1) = (y[i], y[i + 1]);
    let t = (x_star - x0) / (x1 - x0);
    Ok(y0 + t * (y1 - y0))
}

/// A monotone cubic spline (Fritsch–Carlson method) that never overshoots
/// between tabulated points, preserving monotonicity of the input samples.
/// Evaluation outside `[x[0], x[n-1]]` clamps to the nearest endpoint, same
/// contract as [`linear_interpolate`].
#[derive(Clone, Debug)]
pub struct MonotoneCubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    tangents: Vec<f64>,
}

impl MonotoneCubicSpline {
    /// Builds a spline from a strictly increasing `x` and matching `y`.
    ///
    /// # Errors
    /// Returns [`Error::CalculationInvalid`] under the same conditions as
    /// [`linear_interpolate`].
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self> {
        validate_table(x, y)?;
        let n = x.len();

        let deltas: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / (x[i + 1] - x[i])).collect();

        let mut tangents = vec![0.0; n];
        tangents[0] = deltas[0];
        tangents[n - 1] = deltas[n - 2];
        for i in 1..n - 1 {
            if deltas[i - 1] == 0.0 || deltas[i] == 0.0 || deltas[i - 1].signum() != deltas[i].signum() {
                tangents[i] = 0.0;
            } else {
                tangents[i] = (deltas[i - 1] + deltas[i]) / 2.0;
            }
        }

        // Fritsch-Carlson limiter: clamp tangents so the cubic stays monotone
        // on every sub-interval.
        for i in 0..n - 1 {
            if deltas[i] == 0.0 {
                tangents[i] = 0.0;
                tangents[i + 1] = 0.0;
                continue;
            }
            let alpha = tangents[i] / deltas[i];
            let beta = tangents[i + 1] / deltas[i];
            let magnitude = alpha.hypot(beta);
            if magnitude > 3.0 {
                let tau = 3.0 / magnitude;
                tangents[i] = tau * alpha * deltas[i];
                tangents[i + 1] = tau * beta * deltas[i];
            }
        }

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            tangents,
        })
    }

    /// Evaluates the spline at `x_star`, clamping outside the tabulated
    /// range.
    #[must_use]
    pub fn evaluate(&self, x_star: f64) -> f64 {
        let n = self.x.len();
        if x_star <= self.x[0] {
            return self.y[0];
        }
        if x_star >= self.x[n - 1] {
            return self.y[n - 1];
        }

        let i = self
            .x
            .windows(2)
            .position(|w| x_star >= w[0] && x_star <= w[1])
            .unwrap_or(n - 2);

        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let h = x1 - x0;
        let t = (x_star - x0) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * self.y[i]
            + h10 * h * self.tangents[i]
            + h01 * self.y[i + 1]
            + h11 * h * self.tangents[i + 1]
    }
}

fn validate_table(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::CalculationInvalid(format!(
            "interpolation table x/y length mismatch: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(Error::CalculationInvalid(
            "interpolation table needs at least two points".to_string(),
        ));
    }
    if !x.windows(2).all(|w| w[1] > w[0]) {
        return Err(Error::CalculationInvalid(
            "interpolation table x values must be strictly increasing".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_interpolate_clamps_at_ends() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 10.0, 20.0];
        assert!((linear_interpolate(&x, &y, -5.0).unwrap() - 0.0).abs() < 1e-12);
        assert!((linear_interpolate(&x, &y, 5.0).unwrap() - 20.0).abs() < 1e-12);
        assert!((linear_interpolate(&x, &y, 0.5).unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn monotone_spline_preserves_monotonicity() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 0.1, 5.0, 5.1];
        let spline = MonotoneCubicSpline::new(&x, &y).unwrap();
        let mut previous = spline.evaluate(0.0);
        let mut t = 0.05;
        while t <= 3.0 {
            let value = spline.evaluate(t);
            assert!(value + 1e-9 >= previous, "spline overshot at t={t}");
            previous = value;
            t += 0.05;
        }
    }

    #[test]
    fn bobbin_filling_factor_boundary_values() {
        // Matches spec.md §8: width=0 height=0 -> 0.377; width=1 height=1 -> 0.738.
        let x = [0.0, 1.0];
        let y = [0.377, 0.738];
        assert!((linear_interpolate(&x, &y, 0.0).unwrap() - 0.377).abs() < 1e-12);
        assert!((linear_interpolate(&x, &y, 1.0).unwrap() - 0.738).abs() < 1e-12);
    }
}
