//! Magnetizing-inductance solver (§4.7, component G).

use crate::constants::INITIAL_GAP_LENGTH_FOR_SEARCHING;
use crate::error::{Error, Result};
use crate::model::bounded_value::{BoundedValue, DimensionalPreference};
use crate::model::coil::Coil;
use crate::model::core::{Core, CoreGap, CoreGapType};
use crate::model::requirement::Inputs;
use crate::numeric::root_find::find_root;
use crate::reluctance::total_reluctance;
use crate::settings::Settings;
use crate::signal::waveform::Waveform;

/// Which strategy [`calculate_gapping`] uses to realise a target gap.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GappingType {
    /// Single subtractive gap on the central column, residual gaps on the
    /// lateral columns.
    Ground,
    /// `n` additive gaps on the central column.
    Distributed,
    /// A single gap sized using the combined (central + lateral) area.
    Spacer,
}

/// `L = N² / R_total`, as a [`BoundedValue`] reflecting permeability
/// tolerance when the material declares one (§4.7 item 1).
///
/// # Errors
/// Propagates [`total_reluctance`] errors.
pub fn calculate_inductance(core: &Core, coil: &Coil, temperature: f64, frequency: f64, settings: &Settings) -> Result<BoundedValue> {
    let turns = f64::from(coil.turns_for_winding(0)?);
    let reluctance = total_reluctance(core, temperature, frequency, settings)?;
    let nominal = turns.powi(2) / reluctance;
    match core.material.permeability.tolerance {
        Some(tolerance) => {
            BoundedValue::new(Some(nominal), Some(nominal * (1.0 - tolerance)), Some(nominal * (1.0 + tolerance)), false, false)
        }
        None => BoundedValue::exact(nominal),
    }
}

/// `N = calculate_number_turns(Core, Inputs)` such that `L(N) == L_target`
/// (§4.7 item 2), rounded up to the nearest integer. `preference` selects
/// which bound of the magnetizing-inductance requirement is tried first
/// (falling back through the remaining two, per
/// [`BoundedValue::get_requirement_value_with_preference`]); callers
/// evaluating a single fully specified design use
/// [`DimensionalPreference::Nominal`], while the core adviser's initial
/// sizing pass (§4.13 step 4) uses [`DimensionalPreference::Minimum`].
///
/// # Errors
/// Propagates [`total_reluctance`] or [`BoundedValue::get_requirement_value_with_preference`] errors.
pub fn calculate_number_turns(
    core: &Core,
    inputs: &Inputs,
    temperature: f64,
    frequency: f64,
    settings: &Settings,
    preference: DimensionalPreference,
) -> Result<u32> {
    let target = inputs.design_requirements.magnetizing_inductance.get_requirement_value_with_preference(preference)?;
    let reluctance = total_reluctance(core, temperature, frequency, settings)?;
    let turns = (target * reluctance).sqrt();
    Ok(turns.ceil().max(1.0) as u32)
}

/// Computes the gap length needed to hit `target` within 0.1% (§4.7 item 3),
/// bracketing within `[INITIAL_GAP_LENGTH_FOR_SEARCHING, column_height -
/// safety]`.
///
/// On failure, returns [`Error::RootNotFound`]; callers should fall back to
/// a residual-only gap and report `L_actual`, per §4.7.
///
/// # Errors
/// Returns [`Error::RootNotFound`] if no gap length in the bracket attains
/// the target within tolerance.
pub fn calculate_gapping(
    core: &mut Core,
    coil: &Coil,
    inputs: &Inputs,
    gapping_type: GappingType,
    temperature: f64,
    frequency: f64,
    settings: &Settings,
) -> Result<f64> {
    let target = inputs
        .design_requirements
        .magnetizing_inductance
        .get_requirement_value_with_preference(DimensionalPreference::Nominal)?;
    let processed = core.processed()?.clone();
    let window_height = processed.winding_windows.first().map(|w| w.height).unwrap_or(0.01);
    let safety_margin = window_height * 0.1;
    let max_gap = (window_height - safety_margin).max(INITIAL_GAP_LENGTH_FOR_SEARCHING * 10.0);

    let evaluate = |gap_length: f64, core: &mut Core| -> Result<f64> {
        core.gapping = synthesize_gaps(gap_length, gapping_type);
        let l = calculate_inductance(core, coil, temperature, frequency, settings)?;
        l.get_requirement_value()
    };

    let mut working_core = core.clone();
    let root = find_root("gap length search", INITIAL_GAP_LENGTH_FOR_SEARCHING, max_gap, |gap_length| {
        evaluate(gap_length, &mut working_core).map(|l| (l - target) / target).unwrap_or(f64::NAN)
    });

    match root {
        Ok(gap_length) => {
            core.gapping = synthesize_gaps(gap_length, gapping_type);
            Ok(gap_length)
        }
        Err(_) => {
            core.gapping = vec![residual_gap()];
            Err(Error::RootNotFound {
                context: "gap length search".to_string(),
                low: INITIAL_GAP_LENGTH_FOR_SEARCHING,
                high: max_gap,
                attempts: 0,
            })
        }
    }
}

fn residual_gap() -> CoreGap {
    CoreGap {
        gap_type: CoreGapType::Residual,
        length: crate::constants::RESIDUAL_GAP,
        area: None,
        closest_parallel_surface_distance: Some(0.01),
        closest_normal_surface_distance: Some(0.01),
    }
}

fn synthesize_gaps(gap_length: f64, gapping_type: GappingType) -> Vec<CoreGap> {
    let base = CoreGap {
        gap_type: CoreGapType::Subtractive,
        length: gap_length,
        area: None,
        closest_parallel_surface_distance: Some(0.01),
        closest_normal_surface_distance: Some(0.01),
    };
    match gapping_type {
        GappingType::Ground => vec![base, residual_gap(), residual_gap()],
        GappingType::Distributed => {
            let n = 3;
            (0..n)
                .map(|_| CoreGap { gap_type: CoreGapType::Distributed, length: gap_length / f64::from(n), ..base })
                .collect()
        }
        GappingType::Spacer => vec![CoreGap { gap_type: CoreGapType::Additive, ..base }],
    }
}

/// Returns `L` and the induced flux-density waveform `B(t) =
/// L·i(t)/(N·A_e)`, sampled/harmonic-transformed/processed consistently
/// with §4.2 (§4.7, "a companion routine").
///
/// # Errors
/// Propagates [`calculate_inductance`] and signal-processing errors.
pub fn calculate_inductance_and_magnetic_flux_density(
    core: &Core,
    coil: &Coil,
    current: &Waveform,
    temperature: f64,
    frequency: f64,
    settings: &Settings,
) -> Result<(BoundedValue, Waveform)> {
    let inductance = calculate_inductance(core, coil, temperature, frequency, settings)?;
    let l = inductance.get_requirement_value()?;
    let turns = f64::from(coil.turns_for_winding(0)?);
    let area = core.processed()?.effective_parameters.effective_area;
    let scale = l / (turns * area);
    let flux_density: Vec<f64> = current.data().iter().map(|i| i * scale).collect();
    Ok((inductance, Waveform::new(current.time().to_vec(), flux_density)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gapping_type_variants_are_distinct() {
        assert_ne!(GappingType::Ground, GappingType::Distributed);
    }
}
