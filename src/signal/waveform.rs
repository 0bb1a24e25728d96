//! Data types for §3's `Waveform`, `Harmonics` and `Processed` entities, and
//! the `SignalDescriptor` that bundles them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The canonical shape label for a waveform, used by
/// [`crate::signal::processor::standardize`] to synthesise samples when only
/// [`Processed`] is known.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum WaveformLabel {
    /// Sinusoidal excitation.
    Sinusoidal,
    /// Symmetric triangular excitation.
    Triangular,
    /// Two-level square excitation.
    Square,
    /// Square excitation with an explicit dead time around each transition.
    SquareWithDeadTime,
    /// Asymmetric rectangular excitation (high/low widths independent of
    /// duty cycle symmetry).
    Rectangular,
    /// Arbitrary waveform with no closed-form synthesis; only a sampled or
    /// harmonic representation is meaningful.
    Custom,
}

/// An ordered sequence of `(time, value)` samples, or an equidistant value
/// series (one period).
///
/// Invariant: `time` is strictly nondecreasing. A `Waveform` is never
/// mutated in place after construction — every transform in
/// [`crate::signal::processor`] returns a new value.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Waveform {
    time: Vec<f64>,
    data: Vec<f64>,
}

impl Waveform {
    /// Builds a waveform from explicit `(time, value)` samples.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `time` and `data` have different
    /// lengths, if either is empty, or if `time` is not nondecreasing.
    pub fn new(time: Vec<f64>, data: Vec<f64>) -> Result<Self> {
        if time.len() != data.len() {
            return Err(Error::InvalidInput(format!(
                "waveform time/data length mismatch: {} vs {}",
                time.len(),
                data.len()
            )));
        }
        if time.is_empty() {
            return Err(Error::InvalidInput("waveform must have at least one sample".to_string()));
        }
        if !time.windows(2).all(|w| w[1] >= w[0]) {
            return Err(Error::InvalidInput("waveform time must be nondecreasing".to_string()));
        }
        Ok(Self { time, data })
    }

    /// Builds an equidistant waveform covering `[0, period)` from a value
    /// series alone.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `data` is empty or `period <= 0`.
    pub fn from_equidistant(data: Vec<f64>, period: f64) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::InvalidInput("waveform must have at least one sample".to_string()));
        }
        if period <= 0.0 {
            return Err(Error::InvalidInput("waveform period must be positive".to_string()));
        }
        let n = data.len();
        let time = (0..n).map(|i| period * i as f64 / n as f64).collect();
        Self::new(time, data)
    }

    /// The sample times.
    #[must_use]
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// The sample values.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the waveform holds no samples (never true for a validly
    /// constructed waveform, kept for clippy's `len_without_is_empty`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The waveform's period, taken as the last sample time minus the
    /// first, or the `period` it was built with for equidistant waveforms.
    #[must_use]
    pub fn period(&self) -> f64 {
        self.time.last().copied().unwrap_or(0.0) - self.time.first().copied().unwrap_or(0.0)
    }

    /// Whether the sample count is a power of two, the precondition the FFT
    /// requires.
    #[must_use]
    pub fn is_power_of_two_length(&self) -> bool {
        self.data.len().is_power_of_two()
    }
}

/// Parallel arrays of harmonic amplitudes and frequencies (§3).
///
/// Invariant: `frequencies[0] == 0` and `amplitudes[0]` is the DC term.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Harmonics {
    amplitudes: Vec<f64>,
    frequencies: Vec<f64>,
}

impl Harmonics {
    /// Builds a `Harmonics` value from parallel amplitude/frequency arrays.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the arrays differ in length, are
    /// empty, or `frequencies[0] != 0`.
    pub fn new(amplitudes: Vec<f64>, frequencies: Vec<f64>) -> Result<Self> {
        if amplitudes.len() != frequencies.len() {
            return Err(Error::InvalidInput("harmonics amplitude/frequency length mismatch".to_string()));
        }
        if amplitudes.is_empty() {
            return Err(Error::InvalidInput("harmonics must have at least the DC term".to_string()));
        }
        if frequencies[0] != 0.0 {
            return Err(Error::InvalidInput("harmonics[0] must be the DC term (frequency 0)".to_string()));
        }
        Ok(Self { amplitudes, frequencies })
    }

    /// Peak amplitudes, `amplitudes[0]` being the DC term.
    #[must_use]
    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    /// Harmonic frequencies, `frequencies[0] == 0`.
    #[must_use]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Number of harmonics, `K = N/2` for a sampled waveform of length `N`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Whether there are no harmonics (never true once constructed).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// The DC (offset) term.
    #[must_use]
    pub fn dc(&self) -> f64 {
        self.amplitudes[0]
    }
}

/// Scalar descriptor of a periodic signal (§3).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Processed {
    /// Shape label, when known.
    pub label: Option<WaveformLabel>,
    /// DC offset.
    pub offset: f64,
    /// Maximum sample value.
    pub peak: f64,
    /// `max - min` over the period.
    pub peak_to_peak: f64,
    /// Root-mean-square value.
    pub rms: f64,
    /// Total harmonic distortion.
    pub thd: f64,
    /// RMS-weighted frequency of the full harmonic content.
    pub effective_frequency: f64,
    /// Same as `effective_frequency` but excluding the DC term.
    pub ac_effective_frequency: f64,
    /// Fraction of the period the waveform is "high"/rising, when the
    /// label defines one.
    pub duty_cycle: Option<f64>,
}

/// Bundles a [`Waveform`], [`Harmonics`] and [`Processed`] view of the same
/// periodic signal. At least one must be present; the signal processor can
/// complete the other two (§4.2).
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SignalDescriptor {
    /// Sampled or explicit-sample representation.
    pub waveform: Option<Waveform>,
    /// Harmonic-domain representation.
    pub harmonics: Option<Harmonics>,
    /// Scalar-descriptor representation.
    pub processed: Option<Processed>,
}

impl SignalDescriptor {
    /// Whether at least one of the three representations is present.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.waveform.is_some() || self.harmonics.is_some() || self.processed.is_some()
    }
}
