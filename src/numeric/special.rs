//! Special functions needed by the physical models (§4.1): modified and
//! ordinary Bessel functions, Kelvin functions (for the skin-effect
//! resistance model, §4.9) and complete elliptic integrals (used by a
//! handful of fringing-factor models, §4.6).
//!
//! All series/iterative routines here stop on relative change below
//! [`crate::constants::SPECIAL_FUNCTION_RELATIVE_TOLERANCE`], or bail out
//! with [`Error::NaNResult`] if a term overflows, per §4.1.

use num_complex::Complex64;

use crate::constants::SPECIAL_FUNCTION_RELATIVE_TOLERANCE;
use crate::error::{Error, Result};

const MAX_SERIES_TERMS: u32 = 200;

/// Lanczos approximation to `Γ(x)` for `x > 0`.
#[must_use]
pub fn gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFICIENTS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        std::f64::consts::PI / ((std::f64::consts::PI * x).sin() * gamma(1.0 - x))
    } else {
        let x = x - 1.0;
        let mut a = COEFFICIENTS[0];
        let t = x + G + 0.5;
        for (i, coefficient) in COEFFICIENTS.iter().enumerate().skip(1) {
            a += coefficient / (x + i as f64);
        }
        (2.0 * std::f64::consts::PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * a
    }
}

/// Evaluates `I_ν(z)` (modified Bessel function of the first kind) for a
/// complex argument via its defining power series.
///
/// # Errors
/// Returns [`Error::NaNResult`] if the series fails to converge within
/// [`MAX_SERIES_TERMS`] or a term overflows.
pub fn bessel_i_complex(nu: f64, z: Complex64) -> Result<Complex64> {
    if z.norm() == 0.0 {
        return Ok(if nu == 0.0 { Complex64::new(1.0, 0.0) } else { Complex64::new(0.0, 0.0) });
    }

    let half_z = z / 2.0;
    let half_z_sq = half_z * half_z;

    let mut term = half_z.powf(nu) / gamma(nu + 1.0);
    let mut sum = term;

    for k in 0..MAX_SERIES_TERMS {
        term *= half_z_sq / ((k as f64 + 1.0) * (nu + k as f64 + 1.0));
        sum += term;

        if !term.re.is_finite() || !term.im.is_finite() {
            return Err(Error::NaNResult {
                context: "bessel_i_complex".to_string(),
                detail: format!("term overflowed at k={k}"),
            });
        }
        if sum.norm() > 0.0 && term.norm() / sum.norm() < SPECIAL_FUNCTION_RELATIVE_TOLERANCE {
            return Ok(sum);
        }
    }

    Err(Error::NaNResult {
        context: "bessel_i_complex".to_string(),
        detail: "series did not converge within term budget".to_string(),
    })
}

/// Evaluates `I_ν(x)` for a real argument.
///
/// # Errors
/// See [`bessel_i_complex`].
pub fn bessel_i(nu: f64, x: f64) -> Result<f64> {
    Ok(bessel_i_complex(nu, Complex64::new(x, 0.0))?.re)
}

/// Evaluates `J_ν(x)` (Bessel function of the first kind) for a real
/// argument via its defining power series.
///
/// # Errors
/// Returns [`Error::NaNResult`] under the same conditions as
/// [`bessel_i_complex`].
pub fn bessel_j(nu: f64, x: f64) -> Result<f64> {
    if x == 0.0 {
        return Ok(if nu == 0.0 { 1.0 } else { 0.0 });
    }

    let half_x = x / 2.0;
    let half_x_sq = half_x * half_x;

    let mut term = half_x.powf(nu) / gamma(nu + 1.0);
    let mut sum = term;

    for k in 0..MAX_SERIES_TERMS {
        term *= -half_x_sq / ((k as f64 + 1.0) * (nu + k as f64 + 1.0));
        sum += term;

        if !term.is_finite() {
            return Err(Error::NaNResult {
                context: "bessel_j".to_string(),
                detail: format!("term overflowed at k={k}"),
            });
        }
        if sum.abs() > 0.0 && (term / sum).abs() < SPECIAL_FUNCTION_RELATIVE_TOLERANCE {
            return Ok(sum);
        }
    }

    Err(Error::NaNResult {
        context: "bessel_j".to_string(),
        detail: "series did not converge within term budget".to_string(),
    })
}

/// A Kelvin-function pair `(ber_ν(x), bei_ν(x))`, per DLMF 10.61:
/// `ber_ν(x) + i·bei_ν(x) = e^{-iνπ} I_ν(x·e^{iπ/4})`.
///
/// # Errors
/// Returns [`Error::NaNResult`] if the underlying Bessel series fails to
/// converge.
pub fn kelvin_ber_bei(nu: f64, x: f64) -> Result<(f64, f64)> {
    let rotation = Complex64::from_polar(1.0, std::f64::consts::FRAC_PI_4);
    let phase = Complex64::from_polar(1.0, -nu * std::f64::consts::PI);
    let value = phase * bessel_i_complex(nu, x * rotation)?;
    Ok((value.re, value.im))
}

/// Derivatives `(ber'_ν(x), bei'_ν(x))` with respect to `x`, obtained from
/// the recurrence `I_ν'(z) = (I_{ν-1}(z) + I_{ν+1}(z)) / 2`. Only
/// non-negative integer `ν` is supported (the only orders the skin-effect
/// model needs), using `I_{-n} = I_n` for integer `n`.
///
/// # Errors
/// Returns [`Error::NaNResult`] if the underlying Bessel series fails to
/// converge, or [`Error::CalculationInvalid`] if `ν` is not a non-negative
/// integer.
pub fn kelvin_ber_bei_prime(nu: f64, x: f64) -> Result<(f64, f64)> {
    if nu < 0.0 || nu.fract().abs() > 1e-9 {
        return Err(Error::CalculationInvalid(format!(
            "kelvin_ber_bei_prime only supports non-negative integer orders, got {nu}"
        )));
    }

    let rotation = Complex64::from_polar(1.0, std::f64::consts::FRAC_PI_4);
    let phase = Complex64::from_polar(1.0, -nu * std::f64::consts::PI);
    let z = x * rotation;

    let i_plus = bessel_i_complex(nu + 1.0, z)?;
    let i_minus = if nu == 0.0 {
        bessel_i_complex(1.0, z)?
    } else {
        bessel_i_complex(nu - 1.0, z)?
    };

    let derivative = phase * rotation * (i_minus + i_plus) / 2.0;
    Ok((derivative.re, derivative.im))
}

/// Complete elliptic integrals `(K(k), E(k))` of the first and second kind,
/// evaluated by the arithmetic-geometric mean, for modulus `k ∈ [0, 1)`.
///
/// # Errors
/// Returns [`Error::CalculationInvalid`] if `k` is outside `[0, 1)`, or
/// [`Error::NaNResult`] if the AGM iteration does not converge within the
/// term budget.
pub fn complete_elliptic_integrals(k: f64) -> Result<(f64, f64)> {
    if !(0.0..1.0).contains(&k) {
        return Err(Error::CalculationInvalid(format!(
            "elliptic modulus must be in [0, 1), got {k}"
        )));
    }

    let mut a = 1.0_f64;
    let mut b = (1.0 - k * k).sqrt();
    let mut c = k;
    let mut sum = 0.5 * c * c;
    let mut two_n = 1.0_f64;

    for _ in 0..MAX_SERIES_TERMS {
        if (a - b).abs() < SPECIAL_FUNCTION_RELATIVE_TOLERANCE * a {
            let k_complete = std::f64::consts::PI / (2.0 * a);
            let e_complete = k_complete * (1.0 - sum);
            return Ok((k_complete, e_complete));
        }

        c = (a - b) / 2.0;
        let a_next = (a + b) / 2.0;
        b = (a * b).sqrt();
        a = a_next;
        two_n *= 2.0;
        sum += two_n * c * c;

        if !a.is_finite() || !b.is_finite() {
            return Err(Error::NaNResult {
                context: "complete_elliptic_integrals".to_string(),
                detail: "AGM iteration diverged".to_string(),
            });
        }
    }

    Err(Error::NaNResult {
        context: "complete_elliptic_integrals".to_string(),
        detail: "AGM iteration did not converge within term budget".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_matches_factorials() {
        assert!((gamma(1.0) - 1.0).abs() < 1e-9);
        assert!((gamma(2.0) - 1.0).abs() < 1e-9);
        assert!((gamma(5.0) - 24.0).abs() < 1e-6);
        assert!((gamma(0.5) - std::f64::consts::PI.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn bessel_i0_at_zero_is_one() {
        assert!((bessel_i(0.0, 0.0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bessel_i0_matches_known_value() {
        // I_0(1) = 1.2660658...
        let value = bessel_i(0.0, 1.0).unwrap();
        assert!((value - 1.266_065_8).abs() < 1e-5);
    }

    #[test]
    fn bessel_j0_at_zero_is_one() {
        assert!((bessel_j(0.0, 0.0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn kelvin_ber_zero_is_one_bei_zero_is_zero() {
        let (ber, bei) = kelvin_ber_bei(0.0, 0.0).unwrap();
        assert!((ber - 1.0).abs() < 1e-9);
        assert!(bei.abs() < 1e-9);
    }

    #[test]
    fn elliptic_at_zero_modulus_is_pi_over_two() {
        let (k, e) = complete_elliptic_integrals(0.0).unwrap();
        assert!((k - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert!((e - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn elliptic_k_increases_and_e_decreases_with_modulus() {
        let (k_low, e_low) = complete_elliptic_integrals(0.1).unwrap();
        let (k_high, e_high) = complete_elliptic_integrals(0.8).unwrap();
        assert!(k_high > k_low);
        assert!(e_high < e_low);
    }
}
