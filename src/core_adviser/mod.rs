//! Core adviser (§4.13, component L).

pub mod cross_referencer;

use std::sync::Mutex;

use noisy_float::types::R64;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::catalogue::Catalogue;
use crate::error::Result;
use crate::filters::{aggregate_scores, FilterConfiguration};
use crate::log::AdviserLog;
use crate::model::bobbin::{Bobbin, ColumnShape};
use crate::model::coil::{Coil, CoilAlignment, WindingFunctionalDescription, WindingOrientation};
use crate::model::core::{Core, CoreMaterial, CoreShape, CoreShapeFamily, CoreType};
use crate::model::magnetic::{ManufacturerInfo, Magnetic};
use crate::model::mas::Mas;
use crate::model::requirement::{Inputs, IsolationSide};
use crate::model::wire::{Coating, Wire};
use crate::reluctance::geometry::process_core_data;
use crate::settings::Settings;

/// Families eligible for stacked-variant expansion (§4.13 step 7).
const STACKABLE_FAMILIES: [CoreShapeFamily; 5] =
    [CoreShapeFamily::E, CoreShapeFamily::PlanarE, CoreShapeFamily::T, CoreShapeFamily::U, CoreShapeFamily::C];

fn family_is_stackable(family: CoreShapeFamily) -> bool {
    STACKABLE_FAMILIES.contains(&family)
}

fn candidate_is_eligible(shape: &CoreShape, core_type: CoreType, inputs: &Inputs, settings: &Settings) -> bool {
    if core_type == CoreType::Toroidal && !settings.use_toroidal_cores {
        return false;
    }
    if core_type == CoreType::TwoPieceSet && !settings.use_concentric_cores {
        return false;
    }
    if let Some(max) = &inputs.design_requirements.maximum_dimensions {
        if let Some(height) = shape.dimensions.get("A") {
            if *height > max.height {
                return false;
            }
        }
    }
    true
}

fn build_core(shape: CoreShape, material: CoreMaterial, stacks: u32) -> Result<Core> {
    let core_type = if shape.magnetic_circuit == crate::model::core::MagneticCircuit::Closed {
        CoreType::Toroidal
    } else {
        CoreType::TwoPieceSet
    };
    let mut core = Core { core_type, shape, material, gapping: vec![], stacks, processed: None, reference: None };
    core.processed = Some(process_core_data(&core)?);
    Ok(core)
}

/// The provisional single-turn winding attached to every candidate before
/// turns/gap are resolved (§4.13 step 3): a round wire sized to twice the
/// skin depth at the worst-case operating frequency and temperature.
fn dummy_coil(core: &Core, inputs: &Inputs) -> Result<Coil> {
    let frequency = inputs.maximum_frequency().max(1.0);
    let temperature = inputs.maximum_ambient_temperature();
    let rho = 1.724e-8 * (1.0 + 0.00393 * (temperature - 20.0));
    let skin_depth = (rho / (std::f64::consts::PI * frequency * crate::constants::VACUUM_PERMEABILITY)).sqrt();
    let conducting_diameter = 2.0 * skin_depth;
    let wire = Wire::Round {
        conducting_diameter,
        outer_diameter: conducting_diameter * 1.05,
        coating: Coating::Enamelled { grade: 1, thickness: conducting_diameter * 0.025 },
    };
    let processed_core = core.processed()?;
    let bobbin = Bobbin::quick_bobbin(&processed_core.winding_windows, ColumnShape::Round)?;
    Ok(Coil {
        bobbin,
        functional_description: vec![WindingFunctionalDescription {
            name: "primary".to_string(),
            isolation_side: IsolationSide::Primary,
            number_turns: 1,
            number_parallels: 1,
            wire,
            orientation: WindingOrientation::Overlapping,
        }],
        alignment: CoilAlignment::InnerOrCenter,
        processed: None,
    })
}

/// Assigns initial turns by §4.7's `calculate_number_turns` with a
/// `MINIMUM` preference, then derives additional windings by the
/// turns-ratio ladder (§4.13 step 4).
fn assign_initial_turns(core: &Core, coil: &mut Coil, inputs: &Inputs, settings: &Settings) {
    let temperature = inputs.maximum_ambient_temperature();
    let frequency = inputs.maximum_frequency().max(1.0);
    if let Ok(turns) = crate::inductance::calculate_number_turns(
        core,
        inputs,
        temperature,
        frequency,
        settings,
        crate::model::bounded_value::DimensionalPreference::Minimum,
    ) {
        if let Some(primary) = coil.functional_description.first_mut() {
            primary.number_turns = turns;
        }
        for (index, &ratio) in inputs.design_requirements.turns_ratios.iter().enumerate() {
            let secondary_turns = (f64::from(turns) / ratio.max(1e-6)).round().max(1.0) as u32;
            if let Some(side) = IsolationSide::nth(index + 1) {
                coil.functional_description.push(WindingFunctionalDescription {
                    name: format!("winding_{}", index + 2),
                    isolation_side: side,
                    number_turns: secondary_turns,
                    number_parallels: 1,
                    wire: coil.functional_description[0].wire.clone(),
                    orientation: WindingOrientation::Overlapping,
                });
            }
        }
    }
}

/// Scores `magnetics` with the primary filter, then with the full weighted
/// configuration set, logging every cull along the way. Returns the
/// surviving `(Magnetic, score)` pairs.
///
/// # Errors
/// Propagates filter-evaluation errors.
fn score_population(
    magnetics: &[Magnetic],
    inputs: &Inputs,
    settings: &Settings,
    configurations: &[FilterConfiguration],
    primary: &FilterConfiguration,
    log: &mut AdviserLog,
) -> Result<Vec<(Magnetic, f64)>> {
    let primary_scores = magnetics
        .par_iter()
        .map(|magnetic| primary.filter.evaluate(magnetic, inputs, settings))
        .collect::<Result<Vec<_>>>()?;

    let mut ranked: Vec<(usize, f64, bool)> =
        primary_scores.into_iter().enumerate().map(|(index, outcome)| (index, outcome.scoring, outcome.valid)).collect();
    ranked.sort_by_key(|(_, score, _)| R64::new(*score));

    let before = ranked.len();
    for (index, _, valid) in &ranked {
        if !valid {
            log.culled(magnetics[*index].identity(), "failed the primary filter");
        }
    }
    ranked.retain(|(_, _, valid)| *valid);
    if ranked.len() > settings.core_adviser_maximum_magnetics_after_filtering {
        for (index, _, _) in &ranked[settings.core_adviser_maximum_magnetics_after_filtering..] {
            log.culled(magnetics[*index].identity(), "dropped by the post-primary-filter population cap");
        }
    }
    ranked.truncate(settings.core_adviser_maximum_magnetics_after_filtering);
    log.filter_applied("primary filter", before, ranked.len());

    let filtered: Vec<Magnetic> = ranked.iter().map(|(index, _, _)| magnetics[*index].clone()).collect();

    let scored = aggregate_scores(&filtered, inputs, settings, configurations)?;
    let mut combined = Vec::new();
    for (magnetic, (score, valid)) in filtered.into_iter().zip(scored) {
        if valid {
            combined.push((magnetic, score));
        } else {
            log.culled(magnetic.identity(), "failed the aggregate weighted filter set");
        }
    }
    Ok(combined)
}

/// Builds the stacked-variant expansion of `base` for its stackable family
/// (§4.13 step 7): one additional candidate per stack count in
/// `2..=settings.maximum_number_stacks`, with turns reassigned for the new
/// geometry.
fn stacked_variants(base: &Magnetic, inputs: &Inputs, settings: &Settings) -> Vec<Magnetic> {
    if !family_is_stackable(base.core.shape.family) {
        return Vec::new();
    }
    (2..=settings.maximum_number_stacks)
        .filter_map(|stacks| {
            let mut core = build_core(base.core.shape.clone(), base.core.material.clone(), stacks).ok()?;
            let mut coil = dummy_coil(&core, inputs).ok()?;
            assign_initial_turns(&core, &mut coil, inputs, settings);
            core.processed = Some(process_core_data(&core).ok()?);
            Some(Magnetic { core, coil, manufacturer_info: ManufacturerInfo::default() })
        })
        .collect()
}

/// Runs the core adviser: the §4.13 eight-step candidate-filtering
/// pipeline, including the stacked-variant expansion (step 7) when
/// `settings.core_adviser_include_stacks` is set and the primary result is
/// under-populated.
///
/// # Errors
/// Propagates physical-model errors raised while building the provisional
/// candidate population; never fails on an empty result (§4.13, "no hard
/// failures").
pub fn advise(
    inputs: &Inputs,
    catalogue: &Catalogue<'_>,
    settings: &Settings,
    configurations: &[FilterConfiguration],
    maximum_results: usize,
) -> Result<(Vec<Mas>, AdviserLog)> {
    let mut log = AdviserLog::new();
    let scorings: Mutex<FxHashMap<String, f64>> = Mutex::new(FxHashMap::default());

    let mut candidates: Vec<Core> = Vec::new();
    for shape in catalogue.core_shapes() {
        let core_type =
            if shape.magnetic_circuit == crate::model::core::MagneticCircuit::Closed { CoreType::Toroidal } else { CoreType::TwoPieceSet };
        if !candidate_is_eligible(shape, core_type, inputs, settings) {
            log.culled(shape.name.clone(), "ineligible for these design requirements");
            continue;
        }
        for material in catalogue.core_materials() {
            match build_core(shape.clone(), material.clone(), 1) {
                Ok(core) => candidates.push(core),
                Err(err) => log.culled(format!("{}/{}", shape.name, material.name), format!("geometry processing failed: {err}")),
            }
        }
    }

    log.note(format!("{} candidate cores after eligibility filtering", candidates.len()));

    let temperature = inputs.maximum_ambient_temperature();
    let frequency = inputs.maximum_frequency().max(1.0);

    // Ground-gap every candidate to its initial turns count, and when
    // `core_adviser_include_distributed_gaps` is set, additionally carry a
    // distributed-gap variant of the same core/coil into the population
    // (§4.13 step 7's gapping-strategy half).
    let built: Vec<(Core, Coil)> = candidates
        .par_iter_mut()
        .flat_map_iter(|core| {
            let mut variants = Vec::new();
            let Some(mut coil) = dummy_coil(core, inputs).ok() else { return variants };
            assign_initial_turns(core, &mut coil, inputs, settings);

            // Toroids have no mating piece to introduce a gap across
            // (Core::validate forbids additive/subtractive gaps on a closed
            // magnetic circuit); only two-piece sets are gapped here.
            if core.core_type != CoreType::TwoPieceSet {
                variants.push((core.clone(), coil));
                return variants;
            }

            let mut ground = core.clone();
            let _ = crate::inductance::calculate_gapping(
                &mut ground,
                &coil,
                inputs,
                crate::inductance::GappingType::Ground,
                temperature,
                frequency,
                settings,
            );
            variants.push((ground, coil.clone()));

            if settings.core_adviser_include_distributed_gaps {
                let mut distributed = core.clone();
                if crate::inductance::calculate_gapping(
                    &mut distributed,
                    &coil,
                    inputs,
                    crate::inductance::GappingType::Distributed,
                    temperature,
                    frequency,
                    settings,
                )
                .is_ok()
                {
                    variants.push((distributed, coil));
                }
            }
            variants
        })
        .collect();

    let magnetics: Vec<Magnetic> =
        built.into_iter().map(|(core, coil)| Magnetic { core, coil, manufacturer_info: ManufacturerInfo::default() }).collect();

    if configurations.is_empty() {
        return Ok((Vec::new(), log));
    }

    let primary = configurations
        .iter()
        .max_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(std::cmp::Ordering::Equal))
        .expect("configurations is non-empty");

    let mut combined = score_population(&magnetics, inputs, settings, configurations, primary, &mut log)?;

    if settings.core_adviser_include_stacks && combined.len() < maximum_results {
        let expansion: Vec<Magnetic> =
            combined.iter().flat_map(|(magnetic, _)| stacked_variants(magnetic, inputs, settings)).collect();
        if !expansion.is_empty() {
            log.note(format!("expanding with {} stacked variants (step 7)", expansion.len()));
            let expanded_scores = score_population(&expansion, inputs, settings, configurations, primary, &mut log)?;
            combined.extend(expanded_scores);
        }
    }

    for (magnetic, score) in &combined {
        scorings.lock().expect("scorings mutex poisoned").insert(magnetic.identity(), *score);
    }

    combined.sort_by_key(|(_, score)| std::cmp::Reverse(R64::new(*score)));
    if combined.len() > maximum_results {
        for (magnetic, _) in &combined[maximum_results..] {
            log.culled(magnetic.identity(), "dropped beyond the requested result count");
        }
    }
    combined.truncate(maximum_results);

    for (magnetic, score) in &combined {
        log.accepted(magnetic.identity(), *score);
    }

    let results: Vec<Mas> =
        combined.into_iter().map(|(magnetic, _)| Mas::new(inputs.clone(), magnetic)).collect();

    log.note(format!("returning {} ranked magnetics", results.len()));
    Ok((results, log))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::bounded_value::BoundedValue;
    use crate::model::core::{MagneticCircuit, MaterialFamily, PermeabilityData, SaturationPoint};
    use crate::model::insulation_spec::{CtiGroup, InsulationType, OvervoltageCategory, PollutionDegree, WiringTechnology};
    use crate::model::requirement::{Conditions, DesignRequirement, InsulationRequirement, OperatingPoint, OperatingPointExcitation};
    use std::collections::BTreeMap;

    #[test]
    fn stackable_families_match_spec_list() {
        assert!(family_is_stackable(CoreShapeFamily::E));
        assert!(!family_is_stackable(CoreShapeFamily::Ep));
    }

    fn toroid_material() -> CoreMaterial {
        CoreMaterial {
            name: "3C95".to_string(),
            family: MaterialFamily::Ferrite,
            manufacturer: "Ferroxcube".to_string(),
            saturation: vec![SaturationPoint { magnetic_flux_density: 0.37, magnetic_field: 250.0, temperature: 100.0 }],
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

    fn toroid_shape() -> CoreShape {
        let mut dimensions = BTreeMap::new();
        dimensions.insert("A".to_string(), 0.058);
        dimensions.insert("B".to_string(), 0.041);
        dimensions.insert("C".to_string(), 0.018);
        CoreShape {
            name: "T 58/41/18".to_string(),
            aliases: vec![],
            family: CoreShapeFamily::T,
            family_subtype: None,
            magnetic_circuit: MagneticCircuit::Closed,
            dimensions,
        }
    }

    fn sample_inputs() -> Inputs {
        Inputs {
            design_requirements: DesignRequirement {
                magnetizing_inductance: BoundedValue::exact(6.6e-3),
                turns_ratios: vec![],
                isolation_sides: vec![IsolationSide::Primary],
                insulation: InsulationRequirement {
                    standards: vec![],
                    overvoltage_category: OvervoltageCategory::OvcIi,
                    pollution_degree: PollutionDegree::P2,
                    cti: CtiGroup::GroupIiiA,
                    insulation_type: InsulationType::Basic,
                    main_supply_voltage: BoundedValue::exact(230.0),
                    altitude: BoundedValue::exact(2000.0),
                    wiring_technology: WiringTechnology::Wound,
                },
                maximum_dimensions: None,
                minimum_impedance: None,
            },
            operating_points: vec![OperatingPoint {
                conditions: Conditions { ambient_temperature: 25.0, cooling: None },
                excitations_per_winding: vec![OperatingPointExcitation { frequency: 100_000.0, ..Default::default() }],
            }],
        }
    }

    #[test]
    fn stacked_variants_are_only_built_for_stackable_families() {
        let core = build_core(toroid_shape(), toroid_material(), 1).unwrap();
        let inputs = sample_inputs();
        let settings = Settings { maximum_number_stacks: 3, ..Settings::default() };
        let coil = dummy_coil(&core, &inputs).unwrap();
        let magnetic = Magnetic { core, coil, manufacturer_info: ManufacturerInfo::default() };

        let variants = stacked_variants(&magnetic, &inputs, &settings);
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].core.stacks, 2);
        assert_eq!(variants[1].core.stacks, 3);

        let mut non_stackable = magnetic;
        non_stackable.core.shape.family = CoreShapeFamily::Ep;
        assert!(stacked_variants(&non_stackable, &inputs, &settings).is_empty());
    }
}
