//! Material coefficients consumed by [`super::RoshenModel`] (§4.8).

use serde::{Deserialize, Serialize};

/// Hysteresis/eddy/excess coefficients for the Roshen core-losses model.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct RoshenCoefficients {
    /// Major-loop hysteresis coefficient.
    pub hysteresis_coefficient: f64,
    /// Major-loop hysteresis flux-density exponent.
    pub hysteresis_exponent: f64,
    /// Excess eddy-current coefficient (`α·N₀` combined).
    pub excess_coefficient: f64,
}
