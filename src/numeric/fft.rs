//! In-place, decimation-in-frequency Cooley–Tukey DFT (§4.1).
//!
//! Mirrors the way the teacher crate hand-rolls its own numerics
//! (`interpolation.rs`'s Lagrange weights) rather than reaching for an
//! external FFT crate: the transform is small, exact in its contract
//! (power-of-two length only — resampling to a power of two is the signal
//! processor's job, §4.2), and is the kind of "hard part" this system is
//! meant to own.

use num_complex::Complex64;

use crate::error::{Error, Result};

/// Performs an in-place, decimation-in-frequency radix-2 DFT.
///
/// `data.len()` must be a power of two (and non-zero); anything else is a
/// programmer error in the caller (the signal processor guarantees this by
/// always resampling to [`crate::constants::NUMBER_POINTS_SAMPLES_WAVEFORMS`]
/// points before calling this).
///
/// # Errors
/// Returns [`Error::CalculationInvalid`] if `data` is empty or its length is
/// not a power of two.
pub fn dft_in_place(data: &mut [Complex64]) -> Result<()> {
    let n = data.len();
    if n == 0 || !n.is_power_of_two() {
        return Err(Error::CalculationInvalid(format!(
            "DFT input length {n} is not a non-zero power of two"
        )));
    }
    decimation_in_frequency(data);
    bit_reverse_permute(data);
    Ok(())
}

/// Recursive decimation-in-frequency butterfly pass. Operates on the whole
/// buffer; after this pass, output is in bit-reversed order, which
/// [`bit_reverse_permute`] undoes.
fn decimation_in_frequency(data: &mut [Complex64]) {
    let n = data.len();
    if n <= 1 {
        return;
    }
    let half = n / 2;
    let angle_step = -2.0 * std::f64::consts::PI / n as f64;

    for k in 0..half {
        let twiddle = Complex64::from_polar(1.0, angle_step * k as f64);
        let top = data[k];
        let bottom = data[k + half];
        data[k] = top + bottom;
        data[k + half] = (top - bottom) * twiddle;
    }

    decimation_in_frequency(&mut data[..half]);
    decimation_in_frequency(&mut data[half..]);
}

/// Swaps elements into natural order given a bit-reversed layout.
fn bit_reverse_permute(data: &mut [Complex64]) {
    let n = data.len();
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = reverse_bits(i as u32, bits) as usize;
        if j > i {
            data.swap(i, j);
        }
    }
}

fn reverse_bits(mut value: u32, bits: u32) -> u32 {
    let mut result = 0;
    for _ in 0..bits {
        result = (result << 1) | (value & 1);
        value >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dft_of_dc_signal_has_only_one_bin() {
        let mut data: Vec<Complex64> = (0..8).map(|_| Complex64::new(2.0, 0.0)).collect();
        dft_in_place(&mut data).unwrap();
        assert!((data[0].re - 16.0).abs() < 1e-9);
        for bin in &data[1..] {
            assert!(bin.norm() < 1e-9);
        }
    }

    #[test]
    fn dft_of_single_cycle_sine_peaks_at_k1() {
        let n = 128;
        let mut data: Vec<Complex64> = (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                Complex64::new((2.0 * std::f64::consts::PI * t).sin(), 0.0)
            })
            .collect();
        dft_in_place(&mut data).unwrap();
        let amplitude_k1 = 2.0 * data[1].norm() / n as f64;
        assert!((amplitude_k1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_non_power_of_two_length() {
        let mut data = vec![Complex64::new(0.0, 0.0); 3];
        assert!(dft_in_place(&mut data).is_err());
    }
}
