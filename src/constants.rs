//! Physical and numerical constants used throughout the crate.
//!
//! Values and names follow §6 of the specification exactly; nothing here is
//! tunable at runtime (tunable knobs live in [`crate::settings::Settings`]).

/// Vacuum permeability, `μ₀`, in henries per metre.
pub const VACUUM_PERMEABILITY: f64 = 4.0 * std::f64::consts::PI * 1e-7;

/// Smallest gap length a catalogue/adviser may produce before it is
/// considered a manufacturing residual gap, in metres.
pub const RESIDUAL_GAP: f64 = 5e-6;

/// Smallest gap length considered deliberately non-residual, in metres.
pub const MINIMUM_NON_RESIDUAL_GAP: f64 = 0.1e-3;

/// Number of equidistant samples the signal processor uses to represent one
/// period of a waveform.
pub const NUMBER_POINTS_SAMPLES_WAVEFORMS: usize = 128;

/// Lower clamp for the fringing factor of a gap classified as distributed.
pub const MINIMUM_DISTRIBUTED_FRINGING_FACTOR: f64 = 1.05;

/// Upper clamp for the fringing factor of a gap classified as distributed.
pub const MAXIMUM_DISTRIBUTED_FRINGING_FACTOR: f64 = 1.3;

/// Initial bracket length used when searching for a gap length that hits a
/// target inductance, in metres.
pub const INITIAL_GAP_LENGTH_FOR_SEARCHING: f64 = 1e-3;

/// Step used when sweeping magnetic field strength while reconstructing a
/// Roshen hysteresis major loop, in A/m.
pub const ROSHEN_MAGNETIC_FIELD_STRENGTH_STEP: f64 = 0.1;

/// Relative tolerance within which two quantities derived from the same
/// sampled waveform (waveform / harmonics / processed) must agree.
pub const SIGNAL_CONSISTENCY_RELATIVE_TOLERANCE: f64 = 1e-6;

/// Relative tolerance the magnetizing-inductance gap search must hit before
/// it reports success.
pub const GAP_SEARCH_RELATIVE_TOLERANCE: f64 = 1e-3;

/// Relative-change stopping criterion for the Bessel/Kelvin/elliptic series
/// and AGM iterations in the numeric kernel.
pub const SPECIAL_FUNCTION_RELATIVE_TOLERANCE: f64 = 1e-4;
