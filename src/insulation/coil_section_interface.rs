//! `CoilSectionInterface` (§4.10): maps a pair of adjacent sections and a
//! chosen insulation material to a number of insulating layers, a margin
//! distance, and a purpose.

use crate::catalogue::InsulationMaterial;
use crate::error::{Error, Result};
use crate::insulation::InsulationDistances;
use crate::model::wire::Coating;

/// Why an interface's insulation build is present.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InterfacePurpose {
    /// Purely mechanical separation; the wires' own coatings already
    /// satisfy the coordinated requirement.
    Mechanical,
    /// Extra layers/margin are load-bearing for insulation coordination.
    Insulating,
}

/// The result of solving one section-to-section interface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoilSectionInterfaceResult {
    /// Number of insulating layers to add (1-3), beyond the wires' own
    /// coatings.
    pub number_layers: u32,
    /// Total margin-tape distance to reserve, metres.
    pub margin_distance: f64,
    /// Why the build is present.
    pub purpose: InterfacePurpose,
}

const SAFETY_FACTOR: f64 = 1.5;
const MAXIMUM_LAYERS: u32 = 3;

fn coating_breakdown_voltage(coating: &Coating) -> f64 {
    match coating {
        Coating::Bare => 0.0,
        Coating::Enamelled { grade, .. } => 1000.0 * f64::from(*grade),
        Coating::Insulated { breakdown_voltage, .. } => *breakdown_voltage,
        Coating::Served { number_servings, .. } => 500.0 * f64::from(*number_servings),
        Coating::Taped { number_layers, .. } => 1500.0 * f64::from(*number_layers),
    }
}

/// Solves the interface between two adjacent sections' wire coatings
/// against a coordinated insulation requirement (§4.10).
///
/// # Errors
/// Returns [`Error::InvalidInput`] if `insulation_material`'s per-layer
/// breakdown voltage is non-positive (it could never satisfy any
/// requirement).
pub fn solve(
    first_coating: &Coating,
    second_coating: &Coating,
    required: &InsulationDistances,
    required_breakdown_voltage: f64,
    insulation_material: &InsulationMaterial,
) -> Result<CoilSectionInterfaceResult> {
    if insulation_material.breakdown_voltage_per_layer <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "insulation material {} has non-positive per-layer breakdown voltage",
            insulation_material.name
        )));
    }

    let existing_breakdown = coating_breakdown_voltage(first_coating) + coating_breakdown_voltage(second_coating);
    let target = required_breakdown_voltage * SAFETY_FACTOR;

    if existing_breakdown >= target {
        return Ok(CoilSectionInterfaceResult {
            number_layers: 1,
            margin_distance: required.creepage_distance,
            purpose: InterfacePurpose::Mechanical,
        });
    }

    let deficit = target - existing_breakdown;
    let layers_needed = (deficit / insulation_material.breakdown_voltage_per_layer).ceil().max(1.0) as u32;
    let number_layers = layers_needed.min(MAXIMUM_LAYERS);
    let margin_distance =
        required.creepage_distance.max(required.clearance) + f64::from(number_layers) * insulation_material.thickness_per_layer;

    Ok(CoilSectionInterfaceResult { number_layers, margin_distance, purpose: InterfacePurpose::Insulating })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material() -> InsulationMaterial {
        InsulationMaterial {
            name: "polyester film".to_string(),
            breakdown_voltage_per_layer: 2000.0,
            thickness_per_layer: 0.00005,
            is_margin_tape: false,
        }
    }

    #[test]
    fn strong_coatings_need_only_one_mechanical_layer() {
        let required = InsulationDistances { clearance: 0.002, creepage_distance: 0.003, distance_through_insulation: 0.0004 };
        let strong = Coating::Insulated { number_layers: 3, thickness: 0.0002, breakdown_voltage: 6000.0 };
        let result = solve(&strong, &strong, &required, 6000.0, &material()).unwrap();
        assert_eq!(result.purpose, InterfacePurpose::Mechanical);
    }

    #[test]
    fn bare_coatings_need_insulating_layers() {
        let required = InsulationDistances { clearance: 0.002, creepage_distance: 0.003, distance_through_insulation: 0.0004 };
        let result = solve(&Coating::Bare, &Coating::Bare, &required, 4000.0, &material()).unwrap();
        assert_eq!(result.purpose, InterfacePurpose::Insulating);
        assert!(result.number_layers >= 1);
    }
}
