//! Cross-manufacturer core substitution (§4.13's sibling component): given a
//! reference core already designed against, finds the closest equivalents
//! across the rest of the catalogue. Grounded on
//! `original_source/src/advisers/CoreCrossReferencer.h`'s six named filters
//! (`PERMEANCE`, `CORE_LOSSES`, `SATURATION`, `WINDING_WINDOW_AREA`,
//! `EFFECTIVE_AREA`, `ENVELOPING_VOLUME`) and its default weights.

use crate::catalogue::Catalogue;
use crate::core_losses::CoreLossesModelName;
use crate::error::Result;
use crate::filters::normalize;
use crate::log::AdviserLog;
use crate::model::core::{Core, CoreMaterial, CoreShape, CoreType};
use crate::model::requirement::OperatingPointExcitation;
use crate::settings::Settings;

/// One of the six named comparison dimensions (§4.13, `CoreCrossReferencer`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CrossReferencerFilter {
    /// `A_e·μ/l_e`: the core's contribution to inductance per turn², which
    /// a direct substitute must match independent of winding.
    Permeance,
    /// Average volumetric core losses across a probe grid of flux densities
    /// and frequencies.
    CoreLosses,
    /// Saturation flux density at the material's declared reference point.
    Saturation,
    /// Total winding-window area across the shape's windows.
    WindingWindowArea,
    /// Effective cross-sectional area.
    EffectiveArea,
    /// `height·width·depth`, as a proxy for the mounted footprint.
    EnvelopingVolume,
}

/// Relative weight per filter in the aggregate score (§4.13's default
/// weights: `{permeance: 1, saturation: 0.5, core_losses: 0.5,
/// effective_area: 0.5, winding_window_area: 0.5, enveloping_volume: 0.1}`).
#[derive(Clone, Copy, Debug)]
pub struct CrossReferencerWeights {
    /// Weight for [`CrossReferencerFilter::Permeance`].
    pub permeance: f64,
    /// Weight for [`CrossReferencerFilter::CoreLosses`].
    pub core_losses: f64,
    /// Weight for [`CrossReferencerFilter::Saturation`].
    pub saturation: f64,
    /// Weight for [`CrossReferencerFilter::WindingWindowArea`].
    pub winding_window_area: f64,
    /// Weight for [`CrossReferencerFilter::EffectiveArea`].
    pub effective_area: f64,
    /// Weight for [`CrossReferencerFilter::EnvelopingVolume`].
    pub enveloping_volume: f64,
}

impl Default for CrossReferencerWeights {
    fn default() -> Self {
        Self { permeance: 1.0, core_losses: 0.5, saturation: 0.5, winding_window_area: 0.5, effective_area: 0.5, enveloping_volume: 0.1 }
    }
}

const PROBE_FLUX_DENSITIES: [f64; 5] = [0.01, 0.025, 0.05, 0.1, 0.2];
const PROBE_FREQUENCIES: [f64; 5] = [20_000.0, 50_000.0, 100_000.0, 250_000.0, 500_000.0];

fn probe_excitation(frequency: f64, magnetic_flux_density_peak: f64) -> OperatingPointExcitation {
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
        magnetizing_current: Some(crate::signal::waveform::SignalDescriptor { waveform: None, harmonics: None, processed: Some(processed) }),
    }
}

/// Average volumetric core losses over the probe grid of flux densities and
/// frequencies (`original_source`'s `calculate_average_core_losses`).
fn average_volumetric_losses(core: &Core, temperature: f64, preference_order: &[CoreLossesModelName]) -> f64 {
    let mut total = 0.0;
    let mut count = 0;
    for &frequency in &PROBE_FREQUENCIES {
        for &flux_density in &PROBE_FLUX_DENSITIES {
            let excitation = probe_excitation(frequency, flux_density);
            if let Ok(losses) = crate::core_losses::core_losses(core, &excitation, temperature, preference_order) {
                total += losses.total;
                count += 1;
            }
        }
    }
    if count == 0 { f64::NAN } else { total / f64::from(count) }
}

fn permeance(core: &Core, temperature: f64, frequency: f64) -> Option<f64> {
    let processed = core.processed().ok()?;
    let mu_r = crate::permeability::initial_permeability(&core.material, temperature, 0.0, frequency).ok()?;
    Some(crate::constants::VACUUM_PERMEABILITY * mu_r * processed.effective_parameters.effective_area / processed.effective_parameters.effective_length)
}

fn saturation_flux_density(material: &CoreMaterial) -> Option<f64> {
    material.saturation.first().map(|point| point.magnetic_flux_density)
}

fn winding_window_area(core: &Core) -> Option<f64> {
    let processed = core.processed().ok()?;
    Some(processed.winding_windows.iter().map(|w| w.height * w.width).sum())
}

/// Raw (un-normalised) value of `filter` for `core` (§4.13).
fn raw_value(filter: CrossReferencerFilter, core: &Core, temperature: f64, frequency: f64, preference_order: &[CoreLossesModelName]) -> Option<f64> {
    match filter {
        CrossReferencerFilter::Permeance => permeance(core, temperature, frequency),
        CrossReferencerFilter::CoreLosses => {
            let value = average_volumetric_losses(core, temperature, preference_order);
            if value.is_finite() { Some(value) } else { None }
        }
        CrossReferencerFilter::Saturation => saturation_flux_density(&core.material),
        CrossReferencerFilter::WindingWindowArea => winding_window_area(core),
        CrossReferencerFilter::EffectiveArea => core.processed().ok().map(|p| p.effective_parameters.effective_area),
        CrossReferencerFilter::EnvelopingVolume => core.processed().ok().map(|p| p.height * p.width * p.depth),
    }
}

/// `|candidate - reference| / max(|reference|, eps)`: a scale-free distance
/// from the reference value (§4.13, the quantity every named filter reduces
/// to before normalisation/inversion).
fn relative_distance(candidate: f64, reference: f64) -> f64 {
    (candidate - reference).abs() / reference.abs().max(1e-18)
}

/// Builds a one-turn, ungapped [`Core`] from a shape/material pair purely
/// for cross-referencing scoring (no winding is ever wound against it).
fn build_core_variant(shape: CoreShape, material: CoreMaterial) -> Result<Core> {
    let core_type =
        if shape.magnetic_circuit == crate::model::core::MagneticCircuit::Closed { CoreType::Toroidal } else { CoreType::TwoPieceSet };
    let mut core = Core { core_type, shape, material, gapping: vec![], stacks: 1, processed: None, reference: None };
    core.processed = Some(crate::reluctance::geometry::process_core_data(&core)?);
    Ok(core)
}

/// Scores every catalogue core (optionally restricted to `only_manufacturer`
/// and, when `only_reference_material` is set, to the reference core's own
/// material) against `reference_core` across the six named dimensions, and
/// returns up to `maximum_results` closest matches, best first, alongside a
/// log of every skipped/culled candidate (§4.13).
///
/// # Errors
/// Never fails on an empty result; only propagates if `reference_core` has
/// not been geometry-processed.
pub fn cross_reference(
    reference_core: &Core,
    temperature: f64,
    frequency: f64,
    catalogue: &Catalogue<'_>,
    settings: &Settings,
    weights: CrossReferencerWeights,
    only_manufacturer: Option<&str>,
    only_reference_material: bool,
    maximum_results: usize,
) -> Result<(Vec<(Core, f64)>, AdviserLog)> {
    let mut log = AdviserLog::new();
    reference_core.processed()?;

    let reference_values: Vec<(CrossReferencerFilter, f64)> = [
        CrossReferencerFilter::Permeance,
        CrossReferencerFilter::CoreLosses,
        CrossReferencerFilter::Saturation,
        CrossReferencerFilter::WindingWindowArea,
        CrossReferencerFilter::EffectiveArea,
        CrossReferencerFilter::EnvelopingVolume,
    ]
    .into_iter()
    .filter_map(|filter| raw_value(filter, reference_core, temperature, frequency, &settings.core_losses_model_names).map(|v| (filter, v)))
    .collect();

    let mut candidates = Vec::new();
    for shape in catalogue.core_shapes() {
        for material in catalogue.core_materials() {
            if let Some(manufacturer) = only_manufacturer {
                if material.manufacturer != manufacturer {
                    continue;
                }
            }
            if only_reference_material && material.name != reference_core.material.name {
                continue;
            }
            if shape.name == reference_core.shape.name && material.name == reference_core.material.name {
                continue;
            }
            match build_core_variant(shape.clone(), material.clone()) {
                Ok(core) => candidates.push(core),
                Err(err) => log.culled(format!("{}/{}", shape.name, material.name), format!("geometry processing failed: {err}")),
            }
        }
    }

    if candidates.is_empty() || reference_values.is_empty() {
        log.note("no comparable candidates found for cross-referencing");
        return Ok((Vec::new(), log));
    }

    let mut distances_by_filter: Vec<(CrossReferencerFilter, f64, Vec<f64>)> = Vec::new();
    for &(filter, reference_value) in &reference_values {
        let mut present = vec![true; candidates.len()];
        let mut distances = Vec::with_capacity(candidates.len());
        for (index, core) in candidates.iter().enumerate() {
            match raw_value(filter, core, temperature, frequency, &settings.core_losses_model_names) {
                Some(value) => distances.push(relative_distance(value, reference_value)),
                None => {
                    present[index] = false;
                    distances.push(f64::MAX);
                }
            }
        }
        distances_by_filter.push((filter, weight_for(filter, &weights), distances));
    }

    let mut aggregate = vec![0.0; candidates.len()];
    for (_, weight, distances) in &distances_by_filter {
        let normalized = normalize(distances, false, true);
        for (index, score) in normalized.into_iter().enumerate() {
            aggregate[index] += score * weight;
        }
    }

    let mut scored: Vec<(Core, f64)> = candidates.into_iter().zip(aggregate).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    if scored.len() > maximum_results {
        for (core, score) in &scored[maximum_results..] {
            log.culled(format!("{}/{}", core.shape.name, core.material.name), "dropped beyond the requested result count");
        }
    }
    scored.truncate(maximum_results);

    for (core, score) in &scored {
        log.accepted(format!("{}/{}", core.shape.name, core.material.name), *score);
    }

    Ok((scored, log))
}

fn weight_for(filter: CrossReferencerFilter, weights: &CrossReferencerWeights) -> f64 {
    match filter {
        CrossReferencerFilter::Permeance => weights.permeance,
        CrossReferencerFilter::CoreLosses => weights.core_losses,
        CrossReferencerFilter::Saturation => weights.saturation,
        CrossReferencerFilter::WindingWindowArea => weights.winding_window_area,
        CrossReferencerFilter::EffectiveArea => weights.effective_area,
        CrossReferencerFilter::EnvelopingVolume => weights.enveloping_volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::InMemoryCatalogue;
    use crate::model::core::{CoreShapeFamily, MagneticCircuit, MaterialFamily, PermeabilityData, SaturationPoint};
    use std::collections::BTreeMap;

    fn etd_shape(name: &str, scale: f64) -> CoreShape {
        let mut dimensions = BTreeMap::new();
        dimensions.insert("A".to_string(), 0.0294 * scale);
        dimensions.insert("B".to_string(), 0.0215 * scale);
        dimensions.insert("C".to_string(), 0.0225 * scale);
        dimensions.insert("D".to_string(), 0.0110 * scale);
        dimensions.insert("E".to_string(), 0.0155 * scale);
        dimensions.insert("F".to_string(), 0.0195 * scale);
        CoreShape {
            name: name.to_string(),
            aliases: vec![],
            family: CoreShapeFamily::Etd,
            family_subtype: None,
            magnetic_circuit: MagneticCircuit::Open,
            dimensions,
        }
    }

    fn ferrite(name: &str, manufacturer: &str) -> CoreMaterial {
        CoreMaterial {
            name: name.to_string(),
            family: MaterialFamily::Ferrite,
            manufacturer: manufacturer.to_string(),
            saturation: vec![SaturationPoint { magnetic_flux_density: 0.41, magnetic_field: 300.0, temperature: 100.0 }],
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
            volumetric_losses: BTreeMap::new(),
            mass_losses: None,
            density: None,
            resistivity: vec![],
            curie_temperature: Some(220.0),
            remanence: None,
            coercive_force: None,
            preferred_core_losses_model: None,
            roshen_coefficients: None,
            proprietary_formula: None,
        }
    }

    #[test]
    fn closest_shape_by_dimensions_ranks_first() {
        let reference = build_core_variant(etd_shape("ETD 29", 1.0), ferrite("3C97", "Ferroxcube")).unwrap();
        let provider = InMemoryCatalogue {
            core_shapes: vec![etd_shape("ETD 30", 1.02), etd_shape("ETD 60", 2.0)],
            core_materials: vec![ferrite("3C97", "TDK")],
            wires: vec![],
            insulation_materials: vec![],
            wire_materials: vec![],
        };
        let catalogue = Catalogue::new(&provider);
        let (results, log) = cross_reference(
            &reference,
            25.0,
            100_000.0,
            &catalogue,
            &Settings::default(),
            CrossReferencerWeights::default(),
            None,
            false,
            5,
        )
        .unwrap();

        assert!(!results.is_empty());
        assert_eq!(results[0].0.shape.name, "ETD 30");
        assert!(log.entries().iter().any(|e| matches!(e, crate::log::LogEntry::CandidateAccepted { .. })));
    }

    #[test]
    fn only_manufacturer_restricts_candidates() {
        let reference = build_core_variant(etd_shape("ETD 29", 1.0), ferrite("3C97", "Ferroxcube")).unwrap();
        let provider = InMemoryCatalogue {
            core_shapes: vec![etd_shape("ETD 30", 1.02)],
            core_materials: vec![ferrite("3C97", "TDK"), ferrite("N97", "EPCOS")],
            wires: vec![],
            insulation_materials: vec![],
            wire_materials: vec![],
        };
        let catalogue = Catalogue::new(&provider);
        let (results, _) = cross_reference(
            &reference,
            25.0,
            100_000.0,
            &catalogue,
            &Settings::default(),
            CrossReferencerWeights::default(),
            Some("EPCOS"),
            false,
            5,
        )
        .unwrap();

        assert!(results.iter().all(|(core, _)| core.material.manufacturer == "EPCOS"));
    }
}
