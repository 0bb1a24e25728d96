//! The wire adviser (§4.15): selects catalogue wires for one winding.

use crate::catalogue::Catalogue;
use crate::error::Result;
use crate::log::AdviserLog;
use crate::model::coil::WindingFunctionalDescription;
use crate::model::requirement::IsolationSide;
use crate::model::wire::Wire;
use crate::settings::Settings;

const MAXIMUM_CURRENT_DENSITY: f64 = 6.0e6;

fn wire_kind_allowed(wire: &Wire, settings: &Settings) -> bool {
    match wire {
        Wire::Round { .. } => settings.wire_adviser_include_round,
        Wire::Rectangular { .. } => settings.wire_adviser_include_rectangular,
        Wire::Foil { .. } => settings.wire_adviser_include_foil,
        Wire::Planar { .. } => settings.wire_adviser_include_planar,
        Wire::Litz { .. } => settings.wire_adviser_include_litz,
    }
}

/// One wire choice scored for a specific winding (§4.15).
#[derive(Clone, Debug, PartialEq)]
pub struct WireCandidate {
    /// The wire.
    pub wire: Wire,
    /// Number of parallel conductors needed to satisfy the current-density
    /// constraint.
    pub number_parallels: u32,
    /// Composite score: higher is better.
    pub score: f64,
}

/// Enumerates catalogue wires (optionally filtered by the inclusion flags),
/// selects those whose conducting area (times parallels, up to
/// `maximum_number_parallels`) satisfies `J <= J_max`, scores them by area
/// margin / skin-depth headroom / catalogue preference, and returns the top
/// `coil_adviser_maximum_number_wires` candidates (§4.15). Every excluded or
/// culled wire, and the literal `NO_WIRE_FITS` case, is recorded in `log`.
///
/// # Errors
/// Propagates [`Wire::conducting_area`]/[`Wire::effective_conducting_diameter`]
/// errors.
pub fn advise_wires(
    catalogue: &Catalogue<'_>,
    current_rms: f64,
    frequency: f64,
    settings: &Settings,
    log: &mut AdviserLog,
) -> Result<Vec<WireCandidate>> {
    let mut candidates = Vec::new();
    let skin_depth = {
        let rho = 1.724e-8;
        (rho / (std::f64::consts::PI * frequency.max(1.0) * crate::constants::VACUUM_PERMEABILITY)).sqrt()
    };

    for wire in catalogue.wires() {
        if !wire_kind_allowed(wire, settings) {
            log.culled(wire.identity(), "wire kind excluded by settings");
            continue;
        }
        let area = wire.conducting_area()?;
        let required_area = current_rms / MAXIMUM_CURRENT_DENSITY;
        let base_parallels = (required_area / area).ceil().max(1.0) as u32;
        if base_parallels > settings.maximum_number_parallels {
            log.culled(wire.identity(), format!("requires {base_parallels} parallels, exceeding the maximum"));
            continue;
        }
        let diameter = wire.effective_conducting_diameter()?;
        let skin_headroom = (2.0 * skin_depth / diameter).min(2.0);
        let area_margin = (area * f64::from(base_parallels)) / required_area.max(1e-18);
        let score = 0.5 * skin_headroom + 0.5 * (1.0 / area_margin.max(1.0));
        candidates.push(WireCandidate { wire: wire.clone(), number_parallels: base_parallels, score });
    }

    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(settings.coil_adviser_maximum_number_wires as usize);

    if candidates.is_empty() {
        log.note("NO_WIRE_FITS");
    } else {
        for candidate in &candidates {
            log.accepted(candidate.wire.identity(), candidate.score);
        }
    }
    Ok(candidates)
}

/// Builds a fully populated [`WindingFunctionalDescription`] from a wire
/// choice (§4.15's "each paired with a fully-populated
/// CoilFunctionalDescription").
#[must_use]
pub fn functional_description(
    name: &str,
    isolation_side: IsolationSide,
    number_turns: u32,
    candidate: &WireCandidate,
    orientation: crate::model::coil::WindingOrientation,
) -> WindingFunctionalDescription {
    WindingFunctionalDescription {
        name: name.to_string(),
        isolation_side,
        number_turns,
        number_parallels: candidate.number_parallels,
        wire: candidate.wire.clone(),
        orientation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::InMemoryCatalogue;
    use crate::model::wire::Coating;

    #[test]
    fn advise_wires_excludes_disallowed_kinds() {
        let provider = InMemoryCatalogue {
            core_shapes: vec![],
            core_materials: vec![],
            wires: vec![Wire::Planar { conducting_thickness: 0.00007, conducting_width: 0.002 }],
            insulation_materials: vec![],
            wire_materials: vec![],
        };
        let catalogue = Catalogue::new(&provider);
        let mut settings = Settings::default();
        settings.wire_adviser_include_planar = false;
        let mut log = AdviserLog::new();
        let candidates = advise_wires(&catalogue, 1.0, 100_000.0, &settings, &mut log).unwrap();
        assert!(candidates.is_empty());
        assert!(log.entries().iter().any(|e| matches!(e, crate::log::LogEntry::CandidateCulled { .. })));
    }

    #[test]
    fn advise_wires_respects_maximum_parallels() {
        let provider = InMemoryCatalogue {
            core_shapes: vec![],
            core_materials: vec![],
            wires: vec![Wire::Round { conducting_diameter: 0.00005, outer_diameter: 0.00006, coating: Coating::Bare }],
            insulation_materials: vec![],
            wire_materials: vec![],
        };
        let catalogue = Catalogue::new(&provider);
        let mut settings = Settings::default();
        settings.maximum_number_parallels = 1;
        let mut log = AdviserLog::new();
        let candidates = advise_wires(&catalogue, 100.0, 100_000.0, &settings, &mut log).unwrap();
        assert!(candidates.is_empty());
        assert!(log.entries().iter().any(|e| matches!(e, crate::log::LogEntry::Note(note) if note == "NO_WIRE_FITS")));
    }
}
