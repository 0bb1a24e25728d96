//! Magnetic filters (§4.11, component K).

use enum_dispatch::enum_dispatch;

use crate::error::Result;
use crate::model::magnetic::Magnetic;
use crate::model::requirement::Inputs;
use crate::settings::Settings;

/// Result of evaluating one filter against one candidate (§4.11).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterOutcome {
    /// Whether the candidate satisfies this filter's hard constraint.
    pub valid: bool,
    /// Raw (un-normalised) score; lower-is-better filters negate internally
    /// so that "higher raw score is better" always holds before
    /// normalisation (§4.11's invert step then operates uniformly).
    pub scoring: f64,
}

/// Shared behaviour every magnetic filter implements (§4.11).
#[enum_dispatch]
pub trait MagneticFilter {
    /// Evaluates the filter against one candidate.
    ///
    /// # Errors
    /// Propagates whatever physical-model errors the filter's scoring
    /// invocation raises (e.g. `NotProcessed` if geometry is missing).
    fn evaluate(&self, magnetic: &Magnetic, inputs: &Inputs, settings: &Settings) -> Result<FilterOutcome>;
}

fn peak_and_rms_current(inputs: &Inputs) -> (f64, f64) {
    let mut peak = 0.0_f64;
    let mut rms = 0.0_f64;
    for op in &inputs.operating_points {
        for excitation in &op.excitations_per_winding {
            if let Some(signal) = &excitation.current {
                if let Some(processed) = &signal.processed {
                    peak = peak.max(processed.peak);
                    rms = rms.max(processed.rms);
                }
            }
        }
    }
    (peak, rms)
}

const UTILISATION_FACTOR: f64 = 0.4;
const CURRENT_DENSITY_MAX: f64 = 6.0e6;
const FLUX_DENSITY_MAX: f64 = 0.3;

/// Required-vs-candidate area product (§4.11).
#[derive(Clone, Copy, Debug, Default)]
pub struct AreaProductFilter;
impl MagneticFilter for AreaProductFilter {
    fn evaluate(&self, magnetic: &Magnetic, inputs: &Inputs, _settings: &Settings) -> Result<FilterOutcome> {
        let l = inputs.design_requirements.magnetizing_inductance.get_requirement_value()?;
        let (peak, rms) = peak_and_rms_current(inputs);
        let required = (l * peak * rms) / (UTILISATION_FACTOR * CURRENT_DENSITY_MAX * FLUX_DENSITY_MAX);
        let processed_core = magnetic.core.processed()?;
        let processed_bobbin = magnetic.coil.bobbin.processed()?;
        let window_area: f64 = processed_bobbin.winding_windows.iter().map(|w| w.height * w.width).sum();
        let candidate = window_area * processed_core.effective_parameters.effective_area;
        let valid = candidate >= required;
        Ok(FilterOutcome { valid, scoring: required / candidate.max(1e-18) })
    }
}

/// Core max magnetic energy vs `1/2 L I_peak^2` requirement (§4.11).
#[derive(Clone, Copy, Debug, Default)]
pub struct EnergyStoredFilter;
impl MagneticFilter for EnergyStoredFilter {
    fn evaluate(&self, magnetic: &Magnetic, inputs: &Inputs, _settings: &Settings) -> Result<FilterOutcome> {
        let l = inputs.design_requirements.magnetizing_inductance.get_requirement_value()?;
        let (peak, _) = peak_and_rms_current(inputs);
        let required = 0.5 * l * peak.powi(2);
        let processed = magnetic.core.processed()?;
        let saturation = magnetic.core.material.saturation.first();
        let b_sat = saturation.map(|s| s.magnetic_flux_density).unwrap_or(FLUX_DENSITY_MAX);
        let candidate = processed.effective_parameters.effective_volume * b_sat.powi(2)
            / (2.0 * crate::constants::VACUUM_PERMEABILITY);
        let valid = candidate >= required;
        Ok(FilterOutcome { valid, scoring: required / candidate.max(1e-18) })
    }
}

/// Per-kg material cost times core mass; lower is better (§4.11).
#[derive(Clone, Copy, Debug, Default)]
pub struct CostFilter;
impl MagneticFilter for CostFilter {
    fn evaluate(&self, magnetic: &Magnetic, _inputs: &Inputs, _settings: &Settings) -> Result<FilterOutcome> {
        let processed = magnetic.core.processed()?;
        let cost_per_kg = magnetic.manufacturer_info.cost.unwrap_or(10.0);
        let cost = processed.mass * cost_per_kg;
        Ok(FilterOutcome { valid: true, scoring: -cost })
    }
}

/// Full core-losses invocation with a provisional 1-turn winding and
/// approximate scaling; lower losses score higher (§4.11).
#[derive(Clone, Copy, Debug, Default)]
pub struct LossesFilter;
impl MagneticFilter for LossesFilter {
    fn evaluate(&self, magnetic: &Magnetic, inputs: &Inputs, settings: &Settings) -> Result<FilterOutcome> {
        let operating_point = inputs
            .operating_points
            .first()
            .ok_or_else(|| crate::error::Error::InvalidInput("inputs has no operating points".to_string()))?;
        let excitation = operating_point
            .excitations_per_winding
            .first()
            .ok_or_else(|| crate::error::Error::InvalidInput("operating point has no excitations".to_string()))?;
        let temperature = operating_point.conditions.ambient_temperature;
        let losses = crate::core_losses::core_losses(&magnetic.core, excitation, temperature, &settings.core_losses_model_names)?;
        Ok(FilterOutcome { valid: true, scoring: -losses.total })
    }
}

/// A weighted sum of (height, width, depth); smaller is better (§4.11).
#[derive(Clone, Copy, Debug, Default)]
pub struct DimensionsFilter;
impl MagneticFilter for DimensionsFilter {
    fn evaluate(&self, magnetic: &Magnetic, inputs: &Inputs, _settings: &Settings) -> Result<FilterOutcome> {
        let processed = magnetic.core.processed()?;
        let volume_estimate = processed.height + processed.width + processed.depth;
        let valid = inputs.design_requirements.maximum_dimensions.as_ref().is_none_or(|max| {
            processed.height <= max.height && processed.width <= max.width && processed.depth <= max.depth
        });
        Ok(FilterOutcome { valid, scoring: -volume_estimate })
    }
}

/// For filter chokes: requires `μᵢ(f)` and §4.9 to estimate `|Z|` at every
/// declared frequency band (§4.11).
#[derive(Clone, Copy, Debug, Default)]
pub struct MinimumImpedanceFilter;
impl MagneticFilter for MinimumImpedanceFilter {
    fn evaluate(&self, magnetic: &Magnetic, inputs: &Inputs, settings: &Settings) -> Result<FilterOutcome> {
        let Some(bands) = &inputs.design_requirements.minimum_impedance else {
            return Ok(FilterOutcome { valid: true, scoring: 0.0 });
        };
        let turns = f64::from(magnetic.coil.turns_for_winding(0)?);
        let mut worst_margin = f64::MAX;
        for &(frequency, minimum_z) in bands {
            let reluctance = crate::reluctance::total_reluctance(&magnetic.core, 25.0, frequency, settings)?;
            let inductance = turns.powi(2) / reluctance;
            let impedance = std::f64::consts::TAU * frequency * inductance;
            worst_margin = worst_margin.min(impedance - minimum_z);
        }
        Ok(FilterOutcome { valid: worst_margin >= 0.0, scoring: worst_margin })
    }
}

/// The `enum_dispatch` family over all six named filters.
#[enum_dispatch(MagneticFilter)]
#[derive(Clone, Copy, Debug)]
pub enum MagneticFilterEnum {
    /// See [`AreaProductFilter`].
    AreaProduct(AreaProductFilter),
    /// See [`EnergyStoredFilter`].
    EnergyStored(EnergyStoredFilter),
    /// See [`CostFilter`].
    Cost(CostFilter),
    /// See [`LossesFilter`].
    Losses(LossesFilter),
    /// See [`DimensionsFilter`].
    Dimensions(DimensionsFilter),
    /// See [`MinimumImpedanceFilter`].
    MinimumImpedance(MinimumImpedanceFilter),
}

/// A named filter paired with its weight and normalisation options
/// (§4.11's "weight map").
#[derive(Clone, Copy, Debug)]
pub struct FilterConfiguration {
    /// Which filter.
    pub filter: MagneticFilterEnum,
    /// Relative weight in the aggregate score.
    pub weight: f64,
    /// Whether to log-scale the normalised score before weighting.
    pub log_scale: bool,
    /// Whether to invert (`1 - x`) the normalised score before weighting.
    pub invert: bool,
}

/// Normalises a population's raw scores to `[0, 1]` via min-max, optionally
/// log-scaling and/or inverting (§4.11's "Score normalisation rule").
#[must_use]
pub fn normalize(raw_scores: &[f64], log_scale: bool, invert: bool) -> Vec<f64> {
    if raw_scores.is_empty() {
        return Vec::new();
    }
    let transformed: Vec<f64> = if log_scale {
        raw_scores.iter().map(|&x| (x.abs() + 1.0).ln() * x.signum()).collect()
    } else {
        raw_scores.to_vec()
    };
    let min = transformed.iter().copied().fold(f64::MAX, f64::min);
    let max = transformed.iter().copied().fold(f64::MIN, f64::max);
    let range = (max - min).max(1e-18);
    transformed
        .iter()
        .map(|&x| {
            let normalized = (x - min) / range;
            if invert { 1.0 - normalized } else { normalized }
        })
        .collect()
}

/// Runs every configured filter over `candidates`, normalises each filter's
/// scores across the population, and returns the aggregate (summed,
/// weighted) score per candidate plus each candidate's overall validity
/// (the logical AND of every filter's `valid`) (§4.11).
///
/// # Errors
/// Propagates any filter's evaluation errors.
pub fn aggregate_scores(
    candidates: &[Magnetic],
    inputs: &Inputs,
    settings: &Settings,
    configurations: &[FilterConfiguration],
) -> Result<Vec<(f64, bool)>> {
    let mut valid = vec![true; candidates.len()];
    let mut aggregate = vec![0.0; candidates.len()];

    for configuration in configurations {
        let mut raw = Vec::with_capacity(candidates.len());
        for (index, candidate) in candidates.iter().enumerate() {
            let outcome = configuration.filter.evaluate(candidate, inputs, settings)?;
            valid[index] &= outcome.valid;
            raw.push(outcome.scoring);
        }
        let normalized = normalize(&raw, configuration.log_scale, configuration.invert);
        for (index, score) in normalized.into_iter().enumerate() {
            aggregate[index] += score * configuration.weight;
        }
    }

    Ok(aggregate.into_iter().zip(valid).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_extremes_to_zero_and_one() {
        let normalized = normalize(&[1.0, 5.0, 10.0], false, false);
        assert!((normalized[0] - 0.0).abs() < 1e-12);
        assert!((normalized[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_invert_flips_extremes() {
        let normalized = normalize(&[1.0, 10.0], false, true);
        assert!((normalized[0] - 1.0).abs() < 1e-12);
        assert!((normalized[1] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_handles_empty_population() {
        assert!(normalize(&[], false, false).is_empty());
    }
}
