//! Conversions between the three representations of a periodic signal
//! (§4.2, component B): `standardize`, `sample`, `harmonics`, `processed`,
//! plus the derived operations `derivate`, `integrate`, `reflect` and
//! `add_offset` used by the inputs pipeline (§4.3) and the inductance
//! solver (§4.7).

use num_complex::Complex64;

use crate::constants::NUMBER_POINTS_SAMPLES_WAVEFORMS;
use crate::error::{Error, Result};
use crate::numeric::{fft, interpolate};
use crate::signal::waveform::{Harmonics, Processed, SignalDescriptor, Waveform, WaveformLabel};

/// Synthesises or passes through a one-period [`Waveform`] for `signal` at
/// frequency `f`.
///
/// If `signal.waveform` is already present this is the identity (returns a
/// clone). Otherwise, if `signal.processed` is present, a waveform is
/// synthesised according to `processed.label` (§4.2). If neither is
/// present, [`Error::NotProcessed`] is returned.
///
/// # Errors
/// Returns [`Error::NotProcessed`] if neither a waveform nor a processed
/// descriptor (with a label that supports synthesis) is available, and
/// [`Error::InvalidInput`] if `f <= 0`.
pub fn standardize(signal: &SignalDescriptor, f: f64) -> Result<Waveform> {
    if f <= 0.0 {
        return Err(Error::InvalidInput(format!("frequency must be positive, got {f}")));
    }

    if let Some(waveform) = &signal.waveform {
        return Ok(waveform.clone());
    }

    let Some(processed) = &signal.processed else {
        return Err(Error::NotProcessed(
            "standardize requires a waveform or a processed descriptor".to_string(),
        ));
    };

    let period = 1.0 / f;
    let offset = processed.offset;
    let peak_to_peak = processed.peak_to_peak;
    let duty_cycle = processed.duty_cycle.unwrap_or(0.5);

    match processed.label {
        Some(WaveformLabel::Sinusoidal) | None => {
            let amplitude = peak_to_peak / 2.0;
            let n = NUMBER_POINTS_SAMPLES_WAVEFORMS;
            let data: Vec<f64> = (0..n)
                .map(|i| {
                    let t = period * i as f64 / n as f64;
                    amplitude * (2.0 * std::f64::consts::PI * t * f).sin() + offset
                })
                .collect();
            Waveform::from_equidistant(data, period)
        }
        Some(WaveformLabel::Triangular) => {
            let low = -peak_to_peak / 2.0 + offset;
            let high = peak_to_peak / 2.0 + offset;
            Waveform::new(vec![0.0, duty_cycle * period, period], vec![low, high, low])
        }
        Some(WaveformLabel::Square) => {
            let high = peak_to_peak * (1.0 - duty_cycle) + offset;
            let low = -peak_to_peak * duty_cycle + offset;
            let transition = duty_cycle * period;
            Waveform::new(
                vec![0.0, transition, transition, period],
                vec![high, high, low, low],
            )
        }
        Some(WaveformLabel::SquareWithDeadTime) => {
            let amplitude = peak_to_peak / 2.0;
            let half_width = duty_cycle * period / 2.0;
            let rising_center = 0.25 * period;
            let falling_center = 0.75 * period;
            Waveform::new(
                vec![
                    0.0,
                    rising_center - half_width,
                    rising_center - half_width,
                    rising_center + half_width,
                    rising_center + half_width,
                    falling_center - half_width,
                    falling_center - half_width,
                    falling_center + half_width,
                    falling_center + half_width,
                    period,
                ],
                vec![
                    offset,
                    offset,
                    amplitude + offset,
                    amplitude + offset,
                    offset,
                    offset,
                    -amplitude + offset,
                    -amplitude + offset,
                    offset,
                    offset,
                ],
            )
        }
        Some(WaveformLabel::Rectangular | WaveformLabel::Custom) => Err(Error::NotProcessed(
            "RECTANGULAR/CUSTOM labels cannot be synthesised; a waveform must already be given"
                .to_string(),
        )),
    }
}

/// Resamples `waveform` to exactly
/// [`NUMBER_POINTS_SAMPLES_WAVEFORMS`] equidistant points covering one
/// period at frequency `f`, via linear interpolation over the waveform's
/// own time axis (treated as spanning exactly one period).
///
/// # Errors
/// Returns [`Error::InvalidInput`] if `f <= 0` or the waveform has a
/// non-positive period, and propagates interpolation errors.
pub fn sample(waveform: &Waveform, f: f64) -> Result<Waveform> {
    if f <= 0.0 {
        return Err(Error::InvalidInput(format!("frequency must be positive, got {f}")));
    }
    let source_period = waveform.period();
    if source_period <= 0.0 {
        return Err(Error::InvalidInput("waveform has non-positive period".to_string()));
    }

    let n = NUMBER_POINTS_SAMPLES_WAVEFORMS;
    let start = waveform.time()[0];
    let mut data = Vec::with_capacity(n);
    for i in 0..n {
        let fraction = i as f64 / n as f64;
        let source_time = start + fraction * source_period;
        data.push(interpolate::linear_interpolate(waveform.time(), waveform.data(), source_time)?);
    }

    Waveform::from_equidistant(data, 1.0 / f)
}

/// Computes the [`Harmonics`] of an already-sampled, power-of-two-length
/// waveform via the numeric kernel's DFT.
///
/// # Errors
/// Propagates [`Error::CalculationInvalid`] from [`fft::dft_in_place`] if
/// `sampled`'s length is not a power of two.
pub fn harmonics(sampled: &Waveform, f: f64) -> Result<Harmonics> {
    let n = sampled.len();
    let mut spectrum: Vec<Complex64> = sampled.data().iter().map(|&v| Complex64::new(v, 0.0)).collect();
    fft::dft_in_place(&mut spectrum)?;

    let k_max = n / 2;
    let mut amplitudes = Vec::with_capacity(k_max + 1);
    let mut frequencies = Vec::with_capacity(k_max + 1);

    for k in 0..=k_max {
        let magnitude = spectrum[k].norm() / n as f64;
        amplitudes.push(if k == 0 { magnitude } else { 2.0 * magnitude });
        frequencies.push(k as f64 * f);
    }

    Harmonics::new(amplitudes, frequencies)
}

/// Computes the [`Processed`] scalar descriptor for a sampled waveform,
/// given its harmonics.
#[must_use]
pub fn processed(
    sampled: &Waveform,
    spectrum: &Harmonics,
    label: Option<WaveformLabel>,
    duty_cycle: Option<f64>,
) -> Processed {
    let data = sampled.data();
    let n = data.len() as f64;

    let offset = data.iter().sum::<f64>() / n;
    let peak = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let trough = data.iter().cloned().fold(f64::INFINITY, f64::min);
    let peak_to_peak = peak - trough;
    let rms = (data.iter().map(|v| v * v).sum::<f64>() / n).sqrt();

    let amplitudes = spectrum.amplitudes();
    let frequencies = spectrum.frequencies();

    let fundamental = amplitudes.get(1).copied().unwrap_or(0.0);
    let thd = if fundamental > 0.0 {
        let sum_sq_harmonics: f64 = amplitudes.iter().skip(2).map(|a| a * a).sum();
        sum_sq_harmonics.sqrt() / fundamental
    } else {
        0.0
    };

    let weighted_sq_sum: f64 = amplitudes
        .iter()
        .zip(frequencies.iter())
        .map(|(a, fr)| a * a * fr * fr)
        .sum();
    let total_sq_sum: f64 = amplitudes.iter().map(|a| a * a).sum();
    let effective_frequency = if total_sq_sum > 0.0 { (weighted_sq_sum / total_sq_sum).sqrt() } else { 0.0 };

    let ac_weighted_sq_sum: f64 = amplitudes
        .iter()
        .zip(frequencies.iter())
        .skip(1)
        .map(|(a, fr)| a * a * fr * fr)
        .sum();
    let ac_total_sq_sum: f64 = amplitudes.iter().skip(1).map(|a| a * a).sum();
    let ac_effective_frequency =
        if ac_total_sq_sum > 0.0 { (ac_weighted_sq_sum / ac_total_sq_sum).sqrt() } else { 0.0 };

    Processed {
        label,
        offset,
        peak,
        peak_to_peak,
        rms,
        thd,
        effective_frequency,
        ac_effective_frequency,
        duty_cycle,
    }
}

/// Cyclic adjacent-difference of the samples: `d[i] = data[(i+1) % n] -
/// data[i]`. Used by the iGSE/GSE/Barg core-losses models (§4.8) to
/// approximate `dB/dt`; dividing by the sample spacing is the caller's
/// responsibility since it depends on the waveform's period.
///
/// # Errors
/// Propagates construction errors from [`Waveform::new`] (none expected in
/// practice, since the time axis is reused unchanged).
pub fn derivate(waveform: &Waveform) -> Result<Waveform> {
    let data = waveform.data();
    let n = data.len();
    let derivative: Vec<f64> = (0..n).map(|i| data[(i + 1) % n] - data[i]).collect();
    Waveform::new(waveform.time().to_vec(), derivative)
}

/// Time-integrates a voltage waveform `v` sampled at frequency `f` over
/// inductance `L` to obtain the magnetizing-current waveform, DC-removed
/// and then offset by `i_dc` (§4.2 `integrate`, used by §4.3 step 4).
///
/// # Errors
/// Returns [`Error::NaNResult`] if `L` is zero, and propagates waveform
/// construction errors.
pub fn integrate(v: &Waveform, f: f64, inductance: f64, i_dc: f64) -> Result<Waveform> {
    if inductance == 0.0 {
        return Err(Error::NaNResult {
            context: "integrate".to_string(),
            detail: "magnetizing inductance is zero".to_string(),
        });
    }

    let n = v.len();
    let dt = 1.0 / f / n as f64;

    let mut cumulative = Vec::with_capacity(n);
    let mut running = 0.0;
    for &value in v.data() {
        running += value * dt / inductance;
        cumulative.push(running);
    }

    let mean = cumulative.iter().sum::<f64>() / n as f64;
    let result: Vec<f64> = cumulative.into_iter().map(|value| value - mean + i_dc).collect();

    Waveform::new(v.time().to_vec(), result)
}

/// Multiplies every sample of `waveform` by `ratio` (turn-ratio reflection,
/// §4.2/§4.3 step 3).
///
/// # Errors
/// Propagates waveform construction errors (none expected: the time axis
/// is reused unchanged).
pub fn reflect(waveform: &Waveform, ratio: f64) -> Result<Waveform> {
    let data: Vec<f64> = waveform.data().iter().map(|v| v * ratio).collect();
    Waveform::new(waveform.time().to_vec(), data)
}

/// Shifts every sample of the waveform inside `excitation` by `delta` and
/// recomputes its harmonics and processed descriptor at frequency `f`.
///
/// # Errors
/// Returns [`Error::NotProcessed`] if `excitation` has no waveform.
pub fn add_offset(excitation: &SignalDescriptor, delta: f64, f: f64) -> Result<SignalDescriptor> {
    let Some(waveform) = &excitation.waveform else {
        return Err(Error::NotProcessed("add_offset requires a waveform".to_string()));
    };

    let shifted_data: Vec<f64> = waveform.data().iter().map(|v| v + delta).collect();
    let shifted = Waveform::new(waveform.time().to_vec(), shifted_data)?;
    let resampled = sample(&shifted, f)?;
    let spectrum = harmonics(&resampled, f)?;
    let label = excitation.processed.as_ref().and_then(|p| p.label);
    let duty_cycle = excitation.processed.as_ref().and_then(|p| p.duty_cycle);
    let descriptor = processed(&resampled, &spectrum, label, duty_cycle);

    Ok(SignalDescriptor {
        waveform: Some(shifted),
        harmonics: Some(spectrum),
        processed: Some(descriptor),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::waveform::Processed;

    fn sinusoidal_signal(peak_to_peak: f64, offset: f64) -> SignalDescriptor {
        SignalDescriptor {
            waveform: None,
            harmonics: None,
            processed: Some(Processed {
                label: Some(WaveformLabel::Sinusoidal),
                offset,
                peak: peak_to_peak / 2.0 + offset,
                peak_to_peak,
                rms: 0.0,
                thd: 0.0,
                effective_frequency: 0.0,
                ac_effective_frequency: 0.0,
                duty_cycle: None,
            }),
        }
    }

    #[test]
    fn standardize_sinusoidal_matches_amplitude() {
        let signal = sinusoidal_signal(20.0, 0.0);
        let waveform = standardize(&signal, 100_000.0).unwrap();
        assert_eq!(waveform.len(), NUMBER_POINTS_SAMPLES_WAVEFORMS);
        let peak = waveform.data().iter().cloned().fold(f64::MIN, f64::max);
        assert!((peak - 10.0).abs() < 1e-6);
    }

    #[test]
    fn harmonics_amplitude_k1_matches_sine_amplitude() {
        let signal = sinusoidal_signal(20.0, 0.0);
        let waveform = standardize(&signal, 100_000.0).unwrap();
        let sampled = sample(&waveform, 100_000.0).unwrap();
        let spectrum = harmonics(&sampled, 100_000.0).unwrap();
        assert!((spectrum.amplitudes()[1] - 10.0).abs() < 1e-6);
        assert!((spectrum.frequencies()[1] - 100_000.0).abs() < 1e-3);
    }

    #[test]
    fn harmonics_dc_term_equals_mean() {
        let signal = sinusoidal_signal(20.0, 3.5);
        let waveform = standardize(&signal, 50_000.0).unwrap();
        let sampled = sample(&waveform, 50_000.0).unwrap();
        let spectrum = harmonics(&sampled, 50_000.0).unwrap();
        let mean = sampled.data().iter().sum::<f64>() / sampled.len() as f64;
        assert!((spectrum.amplitudes()[0] - mean).abs() < 1e-6);
    }

    #[test]
    fn ac_effective_frequency_of_pure_tone_equals_its_frequency() {
        let signal = sinusoidal_signal(20.0, 0.0);
        let waveform = standardize(&signal, 100_000.0).unwrap();
        let sampled = sample(&waveform, 100_000.0).unwrap();
        let spectrum = harmonics(&sampled, 100_000.0).unwrap();
        let descriptor = processed(&sampled, &spectrum, Some(WaveformLabel::Sinusoidal), None);
        assert!((descriptor.ac_effective_frequency - 100_000.0).abs() < 1e-3 * 100_000.0);
    }

    #[test]
    fn reflect_scales_every_sample() {
        let waveform = Waveform::new(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
        let reflected = reflect(&waveform, 2.0).unwrap();
        assert_eq!(reflected.data(), &[2.0, 4.0, 6.0]);
    }

    #[test]
    fn integrate_removes_dc_and_applies_offset() {
        let waveform = Waveform::from_equidistant(vec![1.0, -1.0, 1.0, -1.0], 1.0 / 1000.0).unwrap();
        let current = integrate(&waveform, 1000.0, 1.0, 0.5).unwrap();
        let mean = current.data().iter().sum::<f64>() / current.len() as f64;
        assert!((mean - 0.5).abs() < 1e-9);
    }
}
