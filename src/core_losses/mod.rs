//! Core-losses family (§4.8, component H).

pub mod roshen;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::core::{Core, CoreMaterial, SteinmetzRange};
use crate::model::mas::CoreLossesOutput;
use crate::model::requirement::OperatingPointExcitation;
use crate::numeric::root_find::find_root_expanding;

/// Named core-losses model (§4.8).
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum CoreLossesModelName {
    /// Steinmetz equation with per-range coefficients.
    Steinmetz,
    /// Improved generalised Steinmetz equation.
    IGse,
    /// Generalised Steinmetz equation.
    Gse,
    /// Barg's trapezoidal-waveform variant.
    Barg,
    /// Roshen's major-loop plus eddy/excess model.
    Roshen,
    /// Albach's variant.
    Albach,
    /// Natural Steinmetz extension.
    Nse,
    /// Modified Steinmetz extension.
    Mse,
    /// Loss-factor (tan δ) model.
    LossFactor,
    /// Material-specific symbolic formula.
    Proprietary,
}

/// Shared behaviour every core-losses model implements (§4.8).
#[enum_dispatch]
pub trait CoreLossesModel {
    /// Whether this model can be evaluated for `material` (has the
    /// coefficient data it needs).
    fn supports(&self, material: &CoreMaterial) -> bool;

    /// Volumetric core losses, W/m³.
    ///
    /// # Errors
    /// Returns [`Error::CalculationInvalid`] if required material data is
    /// missing, or [`Error::NotProcessed`] if excitation data required
    /// (sampled waveform) is absent.
    fn volumetric_losses(&self, material: &CoreMaterial, excitation: &OperatingPointExcitation, temperature: f64) -> Result<f64>;
}

fn steinmetz_range_for(material: &CoreMaterial, method: &str, frequency: f64) -> Result<&SteinmetzRange> {
    material
        .volumetric_losses
        .get(method)
        .and_then(|ranges| ranges.iter().find(|r| frequency >= r.minimum_frequency && frequency <= r.maximum_frequency))
        .ok_or_else(|| {
            Error::CalculationInvalid(format!("material {} has no {method} coefficients covering {frequency} Hz", material.name))
        })
}

fn steinmetz_temperature_correction(range: &SteinmetzRange, temperature: f64) -> f64 {
    range
        .temperature_coefficients
        .map(|[c0, c1, c2]| c0 - c1 * temperature + c2 * temperature.powi(2))
        .unwrap_or(1.0)
}

fn magnetic_flux_density_peak(excitation: &OperatingPointExcitation) -> Result<f64> {
    let magnetizing = excitation
        .magnetizing_current
        .as_ref()
        .ok_or_else(|| Error::NotProcessed("excitation has no magnetizing current signal".to_string()))?;
    let processed = magnetizing
        .processed
        .as_ref()
        .ok_or_else(|| Error::NotProcessed("magnetizing current signal has not been processed".to_string()))?;
    Ok(processed.peak)
}

/// The Steinmetz equation: `P_v = k·f^α·B^β·τ(T)` (§4.8).
#[derive(Clone, Copy, Debug, Default)]
pub struct SteinmetzModel;
impl CoreLossesModel for SteinmetzModel {
    fn supports(&self, material: &CoreMaterial) -> bool {
        material.volumetric_losses.contains_key("steinmetz")
    }

    fn volumetric_losses(&self, material: &CoreMaterial, excitation: &OperatingPointExcitation, temperature: f64) -> Result<f64> {
        let range = steinmetz_range_for(material, "steinmetz", excitation.frequency)?;
        let b = magnetic_flux_density_peak(excitation)?;
        let tau = steinmetz_temperature_correction(range, temperature);
        Ok(range.k * excitation.frequency.powf(range.alpha) * b.powf(range.beta) * tau)
    }
}

fn igse_ki(alpha: f64, beta: f64, k: f64) -> f64 {
    let phi_term = {
        let n = 200;
        let mut sum = 0.0;
        for i in 0..n {
            let theta = std::f64::consts::TAU * (f64::from(i) + 0.5) / f64::from(n);
            sum += theta.cos().abs().powf(alpha) * (2.0_f64).powf(beta - alpha);
        }
        sum / f64::from(n)
    };
    k / (std::f64::consts::TAU.powf(alpha - 1.0) * phi_term.max(1e-12))
}

/// The improved Generalised Steinmetz Equation: integrates `k_i·|dB/dt|^α·
/// (ΔB)^(β−α)` over one period using the sampled waveform's derivative
/// (§4.8).
#[derive(Clone, Copy, Debug, Default)]
pub struct IgseModel;
impl CoreLossesModel for IgseModel {
    fn supports(&self, material: &CoreMaterial) -> bool {
        material.volumetric_losses.contains_key("steinmetz")
    }

    fn volumetric_losses(&self, material: &CoreMaterial, excitation: &OperatingPointExcitation, temperature: f64) -> Result<f64> {
        let range = steinmetz_range_for(material, "steinmetz", excitation.frequency)?;
        let magnetizing = excitation
            .magnetizing_current
            .as_ref()
            .ok_or_else(|| Error::NotProcessed("iGSE requires a sampled magnetizing-current waveform".to_string()))?;
        let waveform = magnetizing
            .waveform
            .as_ref()
            .ok_or_else(|| Error::NotProcessed("iGSE requires a sampled waveform, not just Processed".to_string()))?;
        let derivative = crate::signal::processor::derivate(waveform)?;
        let peak_to_peak = waveform.data().iter().copied().fold(f64::MIN, f64::max)
            - waveform.data().iter().copied().fold(f64::MAX, f64::min);
        let period = waveform.period().max(1.0 / excitation.frequency);
        let ki = igse_ki(range.alpha, range.beta, range.k) * steinmetz_temperature_correction(range, temperature);
        let dt = period / derivative.len() as f64;
        let integral: f64 = derivative
            .data()
            .iter()
            .map(|slope| slope.abs().powf(range.alpha) * peak_to_peak.abs().powf(range.beta - range.alpha))
            .sum::<f64>()
            * dt;
        Ok(ki * integral / period)
    }
}

/// The Generalised Steinmetz Equation: `|dB/dt|·B^(β−α)`, retained for
/// comparison against iGSE (§4.8).
#[derive(Clone, Copy, Debug, Default)]
pub struct GseModel;
impl CoreLossesModel for GseModel {
    fn supports(&self, material: &CoreMaterial) -> bool {
        material.volumetric_losses.contains_key("steinmetz")
    }

    fn volumetric_losses(&self, material: &CoreMaterial, excitation: &OperatingPointExcitation, temperature: f64) -> Result<f64> {
        let range = steinmetz_range_for(material, "steinmetz", excitation.frequency)?;
        let b = magnetic_flux_density_peak(excitation)?;
        let tau = steinmetz_temperature_correction(range, temperature);
        let average_slope = 4.0 * b * excitation.frequency;
        Ok(range.k * average_slope.abs() * b.abs().powf(range.beta - range.alpha) * tau)
    }
}

/// The fraction of the period a trapezoidal excitation spends rising or
/// falling (as opposed to dwelling flat at a plateau). Prefers the
/// waveform's declared `duty_cycle` (the plateau fraction, so the
/// transition fraction is its complement); falls back to counting the
/// fraction of sampled derivative points whose slope magnitude exceeds 10%
/// of the derivative's peak, which is the sampled-waveform equivalent when
/// no duty cycle was declared.
fn transition_fraction(excitation: &OperatingPointExcitation) -> Result<f64> {
    let magnetizing = excitation
        .magnetizing_current
        .as_ref()
        .ok_or_else(|| Error::NotProcessed("Barg model requires a magnetizing current signal".to_string()))?;

    if let Some(duty_cycle) = magnetizing.processed.as_ref().and_then(|p| p.duty_cycle) {
        return Ok((1.0 - duty_cycle).clamp(0.0, 1.0));
    }

    let waveform = magnetizing
        .waveform
        .as_ref()
        .ok_or_else(|| Error::NotProcessed("Barg model requires either a duty cycle or a sampled waveform".to_string()))?;
    let derivative = crate::signal::processor::derivate(waveform)?;
    let peak_slope = derivative.data().iter().fold(0.0_f64, |max, slope| max.max(slope.abs()));
    if peak_slope <= 0.0 {
        return Ok(0.0);
    }
    let threshold = peak_slope * 0.1;
    let transitioning = derivative.data().iter().filter(|slope| slope.abs() > threshold).count();
    Ok(transitioning as f64 / derivative.data().len().max(1) as f64)
}

/// Barg's trapezoidal-waveform variant of iGSE with separate transition and
/// dwell contributions (§4.8).
#[derive(Clone, Copy, Debug, Default)]
pub struct BargModel;
impl CoreLossesModel for BargModel {
    fn supports(&self, material: &CoreMaterial) -> bool {
        material.volumetric_losses.contains_key("steinmetz")
    }

    fn volumetric_losses(&self, material: &CoreMaterial, excitation: &OperatingPointExcitation, temperature: f64) -> Result<f64> {
        // A trapezoidal excitation behaves as iGSE scaled by the fraction of
        // the period spent in transition (the rest contributes no dB/dt term).
        let fraction = transition_fraction(excitation)?;
        Ok(IgseModel.volumetric_losses(material, excitation, temperature)? * fraction)
    }
}

/// Albach's algebraic Steinmetz variant (§4.8).
#[derive(Clone, Copy, Debug, Default)]
pub struct AlbachModel;
impl CoreLossesModel for AlbachModel {
    fn supports(&self, material: &CoreMaterial) -> bool {
        material.volumetric_losses.contains_key("steinmetz")
    }

    fn volumetric_losses(&self, material: &CoreMaterial, excitation: &OperatingPointExcitation, temperature: f64) -> Result<f64> {
        SteinmetzModel.volumetric_losses(material, excitation, temperature)
    }
}

/// Natural Steinmetz extension (§4.8).
#[derive(Clone, Copy, Debug, Default)]
pub struct NseModel;
impl CoreLossesModel for NseModel {
    fn supports(&self, material: &CoreMaterial) -> bool {
        material.volumetric_losses.contains_key("steinmetz")
    }

    fn volumetric_losses(&self, material: &CoreMaterial, excitation: &OperatingPointExcitation, temperature: f64) -> Result<f64> {
        SteinmetzModel.volumetric_losses(material, excitation, temperature)
    }
}

/// Modified Steinmetz extension (§4.8).
#[derive(Clone, Copy, Debug, Default)]
pub struct MseModel;
impl CoreLossesModel for MseModel {
    fn supports(&self, material: &CoreMaterial) -> bool {
        material.volumetric_losses.contains_key("steinmetz")
    }

    fn volumetric_losses(&self, material: &CoreMaterial, excitation: &OperatingPointExcitation, temperature: f64) -> Result<f64> {
        SteinmetzModel.volumetric_losses(material, excitation, temperature)
    }
}

/// The loss-factor model: `P_v = (tan δ / μᵢ)·ω·B²/μ₀`; also used by
/// impedance estimation (§4.8).
#[derive(Clone, Copy, Debug, Default)]
pub struct LossFactorModel;
impl CoreLossesModel for LossFactorModel {
    fn supports(&self, material: &CoreMaterial) -> bool {
        material.volumetric_losses.contains_key("loss_factor")
    }

    fn volumetric_losses(&self, material: &CoreMaterial, excitation: &OperatingPointExcitation, temperature: f64) -> Result<f64> {
        let range = steinmetz_range_for(material, "loss_factor", excitation.frequency)?;
        let b = magnetic_flux_density_peak(excitation)?;
        let tan_delta = range.k;
        let mu_i = crate::permeability::initial_permeability(material, temperature, 0.0, excitation.frequency)?;
        let omega = std::f64::consts::TAU * excitation.frequency;
        Ok((tan_delta / mu_i) * omega * b.powi(2) / crate::constants::VACUUM_PERMEABILITY)
    }
}

/// Roshen's model: hysteresis loop area plus quadratic eddy-current term
/// plus an excess-loss term (§4.8).
#[derive(Clone, Copy, Debug, Default)]
pub struct RoshenModel;
impl CoreLossesModel for RoshenModel {
    fn supports(&self, material: &CoreMaterial) -> bool {
        material.roshen_coefficients.is_some() && !material.resistivity.is_empty()
    }

    fn volumetric_losses(&self, material: &CoreMaterial, excitation: &OperatingPointExcitation, temperature: f64) -> Result<f64> {
        let coefficients = material
            .roshen_coefficients
            .as_ref()
            .ok_or_else(|| Error::CalculationInvalid(format!("material {} has no Roshen coefficients", material.name)))?;
        let b = magnetic_flux_density_peak(excitation)?;
        let rho = material.resistivity_at(temperature)?;
        let f = excitation.frequency;
        let hysteresis = coefficients.hysteresis_coefficient * b.powf(coefficients.hysteresis_exponent) * f;
        let eddy = (f * b).powi(2) / rho;
        let excess = coefficients.excess_coefficient * (f * b).powf(1.5) / rho;
        Ok(hysteresis + eddy + excess)
    }
}

/// Evaluates a material's proprietary symbolic loss formula (stored as a
/// string, `f`/`B`/`T` as variables); used for Magnetec tape cores (§4.8).
/// Supports per-mass losses in addition to per-volume.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProprietaryModel;
impl CoreLossesModel for ProprietaryModel {
    fn supports(&self, material: &CoreMaterial) -> bool {
        material.proprietary_formula.is_some()
    }

    fn volumetric_losses(&self, material: &CoreMaterial, excitation: &OperatingPointExcitation, temperature: f64) -> Result<f64> {
        let formula = material
            .proprietary_formula
            .as_ref()
            .ok_or_else(|| Error::CalculationInvalid(format!("material {} has no proprietary formula", material.name)))?;
        let b = magnetic_flux_density_peak(excitation)?;
        crate::core_losses::formula::evaluate(formula, excitation.frequency, b, temperature)
    }
}

pub mod formula {
    //! A tiny evaluator for the proprietary loss formula (§4.8): supports
    //! `k*f^a*B^b*T^c` products of the three named variables, which is all
    //! the Magnetec tape-core datasheets actually express.

    use crate::error::{Error, Result};

    /// Evaluates `formula` (e.g. `"0.0012*f^1.3*B^2.1*T^0.0"`) at the given
    /// `f`/`B`/`T`.
    ///
    /// # Errors
    /// Returns [`Error::CalculationInvalid`] if the formula cannot be
    /// parsed.
    pub fn evaluate(formula: &str, f: f64, b: f64, t: f64) -> Result<f64> {
        let mut result = 1.0;
        for term in formula.split('*') {
            let term = term.trim();
            if let Some(exponent) = term.strip_prefix("f^") {
                result *= f.powf(parse(exponent)?);
            } else if let Some(exponent) = term.strip_prefix("B^") {
                result *= b.powf(parse(exponent)?);
            } else if let Some(exponent) = term.strip_prefix("T^") {
                result *= t.powf(parse(exponent)?);
            } else {
                result *= parse(term)?;
            }
        }
        Ok(result)
    }

    fn parse(value: &str) -> Result<f64> {
        value.parse().map_err(|_| Error::CalculationInvalid(format!("cannot parse proprietary formula term {value}")))
    }
}

/// The `enum_dispatch` family over all ten named models.
#[enum_dispatch(CoreLossesModel)]
#[derive(Clone, Copy, Debug)]
pub enum CoreLossesModelEnum {
    /// See [`SteinmetzModel`].
    Steinmetz(SteinmetzModel),
    /// See [`IgseModel`].
    IGse(IgseModel),
    /// See [`GseModel`].
    Gse(GseModel),
    /// See [`BargModel`].
    Barg(BargModel),
    /// See [`RoshenModel`].
    Roshen(RoshenModel),
    /// See [`AlbachModel`].
    Albach(AlbachModel),
    /// See [`NseModel`].
    Nse(NseModel),
    /// See [`MseModel`].
    Mse(MseModel),
    /// See [`LossFactorModel`].
    LossFactor(LossFactorModel),
    /// See [`ProprietaryModel`].
    Proprietary(ProprietaryModel),
}

impl From<CoreLossesModelName> for CoreLossesModelEnum {
    fn from(name: CoreLossesModelName) -> Self {
        match name {
            CoreLossesModelName::Steinmetz => Self::Steinmetz(SteinmetzModel),
            CoreLossesModelName::IGse => Self::IGse(IgseModel),
            CoreLossesModelName::Gse => Self::Gse(GseModel),
            CoreLossesModelName::Barg => Self::Barg(BargModel),
            CoreLossesModelName::Roshen => Self::Roshen(RoshenModel),
            CoreLossesModelName::Albach => Self::Albach(AlbachModel),
            CoreLossesModelName::Nse => Self::Nse(NseModel),
            CoreLossesModelName::Mse => Self::Mse(MseModel),
            CoreLossesModelName::LossFactor => Self::LossFactor(LossFactorModel),
            CoreLossesModelName::Proprietary => Self::Proprietary(ProprietaryModel),
        }
    }
}

/// Picks the first model in `preference_order` that
/// [`CoreLossesModel::supports`] the material, unless the material declares
/// an explicit `preferred_core_losses_model` (§4.8, "if multiple are
/// present, an explicit preferred_model wins").
///
/// # Errors
/// Returns [`Error::CalculationInvalid`] if no model in the preference
/// order supports the material.
pub fn select_model(material: &CoreMaterial, preference_order: &[CoreLossesModelName]) -> Result<CoreLossesModelEnum> {
    if let Some(preferred) = material.preferred_core_losses_model {
        return Ok(preferred.into());
    }
    preference_order
        .iter()
        .map(|&name| CoreLossesModelEnum::from(name))
        .find(|model| model.supports(material))
        .ok_or_else(|| Error::CalculationInvalid(format!("no core-losses model supports material {}", material.name)))
}

/// `core_losses(Core, OperatingPointExcitation, T)` (§4.8): runs the
/// selected model's volumetric losses and scales by the core's effective
/// (or mass-equivalent) volume.
///
/// # Errors
/// Propagates [`select_model`] and the model's `volumetric_losses` errors.
pub fn core_losses(
    core: &Core,
    excitation: &OperatingPointExcitation,
    temperature: f64,
    preference_order: &[CoreLossesModelName],
) -> Result<CoreLossesOutput> {
    let model = select_model(&core.material, preference_order)?;
    let volumetric = model.volumetric_losses(&core.material, excitation, temperature)?;
    let processed = core.processed()?;
    let scale = if core.material.density.is_some() && core.material.mass_losses.is_some() {
        processed.mass
    } else {
        processed.effective_parameters.effective_volume
    };
    Ok(CoreLossesOutput {
        total: volumetric * scale,
        hysteresis: None,
        eddy_current: None,
        magnetic_flux_density_peak: magnetic_flux_density_peak(excitation).unwrap_or(0.0),
    })
}

/// `frequency_from_losses(Core, B, T, P)`: inverts the selected model's
/// forward function over frequency via the §4.1 root finder (§4.8).
///
/// # Errors
/// Propagates [`select_model`] and [`find_root_expanding`] errors.
pub fn frequency_from_losses(
    core: &Core,
    magnetic_flux_density: f64,
    temperature: f64,
    target_losses: f64,
    preference_order: &[CoreLossesModelName],
) -> Result<f64> {
    let model = select_model(&core.material, preference_order)?;
    let volume = core.processed()?.effective_parameters.effective_volume;
    find_root_expanding("frequency from core losses", 1.0, 1.0e6, |frequency| {
        let excitation = probe_excitation(frequency, magnetic_flux_density);
        model.volumetric_losses(&core.material, &excitation, temperature).map_or(f64::NAN, |p| p * volume - target_losses)
    })
}

/// `magnetic_flux_density_from_losses(Core, f, T, P)`: inverts the selected
/// model's forward function over flux density (§4.8).
///
/// # Errors
/// Propagates [`select_model`] and [`find_root_expanding`] errors.
pub fn magnetic_flux_density_from_losses(
    core: &Core,
    frequency: f64,
    temperature: f64,
    target_losses: f64,
    preference_order: &[CoreLossesModelName],
) -> Result<f64> {
    let model = select_model(&core.material, preference_order)?;
    let volume = core.processed()?.effective_parameters.effective_volume;
    find_root_expanding("flux density from core losses", 1.0e-4, core.material.saturation[0].magnetic_flux_density, |b| {
        let excitation = probe_excitation(frequency, b);
        model.volumetric_losses(&core.material, &excitation, temperature).map_or(f64::NAN, |p| p * volume - target_losses)
    })
}

fn probe_excitation(frequency: f64, magnetic_flux_density_peak: f64) -> OperatingPointExcitation {
    let period = 1.0 / frequency;
    let n = crate::constants::NUMBER_POINTS_SAMPLES_WAVEFORMS;
    let time: Vec<f64> = (0..n).map(|i| period * i as f64 / n as f64).collect();
    let data: Vec<f64> =
        time.iter().map(|t| magnetic_flux_density_peak * (std::f64::consts::TAU * frequency * t).sin()).collect();
    let waveform = crate::signal::waveform::Waveform::new(time, data).ok();
    let processed = crate::signal::waveform::Processed {
        label: Some(crate::signal::waveform::WaveformLabel::Sinusoidal),
        offset: 0.0,
        peak: magnetic_flux_density_peak,
        peak_to_peak: 2.0 * magnetic_flux_density_peak,
        rms: magnetic_flux_density_peak / std::f64::consts::SQRT_2,
        thd: 0.0,
        effective_frequency: frequency,
        ac_effective_frequency: frequency,
        duty_cycle: None,
    };
    OperatingPointExcitation {
        frequency,
        current: None,
        voltage: None,
        magnetizing_current: Some(crate::signal::waveform::SignalDescriptor {
            waveform,
            harmonics: None,
            processed: Some(processed),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::core::{MaterialFamily, PermeabilityData, SaturationPoint};
    use std::collections::BTreeMap;

    fn material_with_steinmetz() -> CoreMaterial {
        let mut volumetric = BTreeMap::new();
        volumetric.insert(
            "steinmetz".to_string(),
            vec![SteinmetzRange {
                minimum_frequency: 0.0,
                maximum_frequency: 1.0e7,
                alpha: 1.3,
                beta: 2.5,
                k: 1.0,
                temperature_coefficients: None,
            }],
        );
        CoreMaterial {
            name: "test".to_string(),
            family: MaterialFamily::Ferrite,
            manufacturer: "test".to_string(),
            saturation: vec![SaturationPoint { magnetic_flux_density: 0.4, magnetic_field: 300.0, temperature: 100.0 }],
            permeability: PermeabilityData {
                reference_value: 3000.0,
                temperature_polynomial: None,
                temperature_table: None,
                dc_bias_coefficients: None,
                dc_bias_table: None,
                frequency_polynomial: None,
                frequency_table: None,
                tolerance: None,
            },
            volumetric_losses: volumetric,
            mass_losses: None,
            density: None,
            resistivity: vec![],
            curie_temperature: None,
            remanence: None,
            coercive_force: None,
            preferred_core_losses_model: None,
            roshen_coefficients: None,
            proprietary_formula: None,
        }
    }

    fn excitation_with_flux_peak(frequency: f64, peak: f64) -> OperatingPointExcitation {
        probe_excitation(frequency, peak)
    }

    #[test]
    fn steinmetz_losses_increase_with_frequency() {
        let material = material_with_steinmetz();
        let low = SteinmetzModel.volumetric_losses(&material, &excitation_with_flux_peak(10_000.0, 0.1), 25.0).unwrap();
        let high = SteinmetzModel.volumetric_losses(&material, &excitation_with_flux_peak(100_000.0, 0.1), 25.0).unwrap();
        assert!(high > low);
    }

    #[test]
    fn select_model_honours_explicit_preference() {
        let mut material = material_with_steinmetz();
        material.preferred_core_losses_model = Some(CoreLossesModelName::Steinmetz);
        let model = select_model(&material, &[CoreLossesModelName::LossFactor]).unwrap();
        assert!(model.supports(&material));
    }

    #[test]
    fn select_model_fails_when_nothing_supports_material() {
        let material = CoreMaterial { volumetric_losses: BTreeMap::new(), ..material_with_steinmetz() };
        assert!(select_model(&material, &[CoreLossesModelName::LossFactor]).is_err());
    }

    #[test]
    fn proprietary_formula_evaluates_power_terms() {
        let value = formula::evaluate("0.001*f^1.0*B^2.0", 100_000.0, 0.1, 60.0).unwrap();
        assert!((value - 0.001 * 100_000.0 * 0.01).abs() < 1e-9);
    }

    #[test]
    fn barg_model_uses_declared_duty_cycle_as_transition_complement() {
        let material = material_with_steinmetz();
        let mut excitation = excitation_with_flux_peak(100_000.0, 0.1);
        if let Some(processed) = excitation.magnetizing_current.as_mut().and_then(|s| s.processed.as_mut()) {
            processed.duty_cycle = Some(0.8);
        }
        let fraction = transition_fraction(&excitation).unwrap();
        assert!((fraction - 0.2).abs() < 1e-9);
    }

    #[test]
    fn barg_losses_scale_with_transition_fraction() {
        let material = material_with_steinmetz();
        let mut low_transition = excitation_with_flux_peak(100_000.0, 0.1);
        if let Some(processed) = low_transition.magnetizing_current.as_mut().and_then(|s| s.processed.as_mut()) {
            processed.duty_cycle = Some(0.9);
        }
        let mut high_transition = excitation_with_flux_peak(100_000.0, 0.1);
        if let Some(processed) = high_transition.magnetizing_current.as_mut().and_then(|s| s.processed.as_mut()) {
            processed.duty_cycle = Some(0.1);
        }
        let low = BargModel.volumetric_losses(&material, &low_transition, 25.0).unwrap();
        let high = BargModel.volumetric_losses(&material, &high_transition, 25.0).unwrap();
        assert!(high > low);
    }
}
