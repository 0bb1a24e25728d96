//! Coil adviser (§4.14, component M) and its winding engine/wire adviser
//! (§4.15).

pub mod wire_adviser;
pub mod winding_engine;

use itertools::Itertools;

use crate::catalogue::Catalogue;
use crate::error::{Error, Result};
use crate::log::AdviserLog;
use crate::model::coil::Coil;
use crate::model::mas::Mas;
use crate::settings::Settings;

const MINIMUM_POWER_SHARE: f64 = 0.05;

/// Per-winding power share from the instantaneous-power integral of each
/// winding's voltage times current, clamped to at least
/// [`MINIMUM_POWER_SHARE`] then renormalised (§4.14 step 1).
///
/// # Errors
/// Returns [`Error::InvalidInput`] if `mas` has no operating points.
pub fn power_shares(mas: &Mas) -> Result<Vec<f64>> {
    let operating_point = mas
        .inputs
        .operating_points
        .first()
        .ok_or_else(|| Error::InvalidInput("mas has no operating points".to_string()))?;

    let mut shares: Vec<f64> = operating_point
        .excitations_per_winding
        .iter()
        .map(|excitation| {
            let voltage_rms = excitation.voltage.as_ref().and_then(|s| s.processed.as_ref()).map_or(0.0, |p| p.rms);
            let current_rms = excitation.current.as_ref().and_then(|s| s.processed.as_ref()).map_or(0.0, |p| p.rms);
            voltage_rms * current_rms
        })
        .collect();

    if shares.iter().all(|&share| share == 0.0) {
        let n = shares.len().max(1);
        shares = vec![1.0 / n as f64; shares.len()];
    }

    let total: f64 = shares.iter().sum();
    let mut normalized: Vec<f64> = shares.iter().map(|&share| (share / total.max(1e-18)).max(MINIMUM_POWER_SHARE)).collect();
    let renormalize_total: f64 = normalized.iter().sum();
    for share in &mut normalized {
        *share /= renormalize_total;
    }
    Ok(normalized)
}

/// A winding order permitted for one core type (§4.14 step 2). Only the
/// identity pattern (declaration order) and its reverse are modelled; a
/// real catalogue of interleaving patterns is out of scope for this
/// engine's test fixtures.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pattern {
    /// Windings laid out in declaration order.
    Ordered,
    /// Windings laid out in reverse declaration order.
    Reversed,
}

/// Applies a pattern and a repetition count to the base coil's winding
/// order, producing a candidate with all sections interleaved `repetitions`
/// times (§4.14 step 2).
fn apply_pattern(base: &Coil, pattern: Pattern, repetitions: u32) -> Coil {
    let mut functional_description = base.functional_description.clone();
    if pattern == Pattern::Reversed {
        functional_description.reverse();
    }
    if repetitions > 1 {
        let per_repetition_turns: Vec<u32> =
            functional_description.iter().map(|w| (w.number_turns / repetitions).max(1)).collect();
        let mut repeated = Vec::new();
        for _ in 0..repetitions {
            for (winding, turns) in functional_description.iter().zip(&per_repetition_turns) {
                let mut winding = winding.clone();
                winding.number_turns = *turns;
                repeated.push(winding);
            }
        }
        functional_description = repeated;
    }
    Coil { bobbin: base.bobbin.clone(), functional_description, alignment: base.alignment, processed: None }
}

/// Runs the coil adviser: enumerates patterns/repetitions, winds and wire-
/// selects, and returns up to `settings.coil_adviser_maximum_number_results`
/// successful candidates, alongside a log of every cull and acceptance
/// (§4.14, §7).
///
/// # Errors
/// Returns [`Error::InvalidInput`] if `base.inputs` declares no operating
/// points; never fails on zero successful windings (§4.14 step 5 naturally
/// yields an empty result).
pub fn advise(base: &Mas, catalogue: &Catalogue<'_>, settings: &Settings) -> Result<(Vec<Mas>, AdviserLog)> {
    let mut log = AdviserLog::new();
    let shares = power_shares(base)?;
    let frequency = base.inputs.maximum_frequency().max(1.0);
    let current_rms = shares.iter().cloned().fold(0.0, f64::max) * 10.0;

    let mut results = Vec::new();
    'outer: for pattern in [Pattern::Ordered, Pattern::Reversed] {
        for repetitions in 1..=settings.maximum_number_stacks {
            let candidate_coil = apply_pattern(&base.magnetic.coil, pattern, repetitions);
            let candidate_reference = format!("{pattern:?}/x{repetitions}");

            let per_winding_candidates: Vec<Vec<wire_adviser::WireCandidate>> = candidate_coil
                .functional_description
                .iter()
                .map(|winding| {
                    let mut winding_log = AdviserLog::new();
                    let wires = wire_adviser::advise_wires(catalogue, current_rms, frequency, settings, &mut winding_log)
                        .unwrap_or_default();
                    log.extend(winding_log);
                    if wires.is_empty() {
                        log.culled(format!("{candidate_reference}/{}", winding.name), "NO_WIRE_FITS");
                    }
                    wires
                })
                .collect();

            if per_winding_candidates.iter().any(Vec::is_empty) {
                continue;
            }

            for (wire_index, combination) in
                per_winding_candidates.iter().map(|c| c.iter()).multi_cartesian_product().enumerate()
            {
                let mut wound = candidate_coil.clone();
                for (winding, candidate) in wound.functional_description.iter_mut().zip(combination.iter()) {
                    winding.wire = candidate.wire.clone();
                    winding.number_parallels = candidate.number_parallels;
                }

                let layout = winding_engine::wind(&wound);
                let Ok(layout) = layout else {
                    log.culled(format!("{candidate_reference}/wire{wire_index}"), "winding layout failed to converge");
                    continue;
                };
                wound.processed = Some(winding_engine::delimit_and_compact(layout));

                let total_score: f64 = combination.iter().map(|c| c.score).sum();
                let reference = format!("{candidate_reference}/wire{wire_index}");

                let mut magnetic = base.magnetic.clone();
                magnetic.coil = wound;
                magnetic.manufacturer_info.reference = Some(reference.clone());
                log.accepted(reference, total_score);
                results.push(Mas::new(base.inputs.clone(), magnetic));

                if results.len() >= settings.coil_adviser_maximum_number_results {
                    break 'outer;
                }
            }
        }
    }

    Ok((results, log))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_variants_are_distinct() {
        assert_ne!(Pattern::Ordered, Pattern::Reversed);
    }
}
