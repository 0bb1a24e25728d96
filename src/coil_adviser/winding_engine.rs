//! The winding engine (§4.15): lays out sections along the bobbin, then
//! layers within each section, then turns within each layer.

use crate::error::{Error, Result};
use crate::model::bobbin::ProcessedBobbin;
use crate::model::coil::{Coil, Layer, ProcessedCoil, Section, Turn, WindingOrientation};

/// Wall-clock-cheap turn-length estimate for a round column: the
/// circumference at the turn's radial position.
fn turn_length(radial_position: f64) -> f64 {
    std::f64::consts::TAU * radial_position
}

/// Lays out every winding's sections, layers and turns over the bobbin's
/// first winding window (§4.15).
///
/// # Errors
/// Returns [`Error::NotProcessed`] if the bobbin has not been processed,
/// and [`Error::CalculationInvalid`] if the required width/height exceeds
/// what the window offers (layout failure, "if winding fails, skip",
/// §4.14 step 2).
pub fn wind(coil: &Coil) -> Result<ProcessedCoil> {
    let processed_bobbin = coil.bobbin.processed()?;
    let window = processed_bobbin
        .winding_windows
        .first()
        .ok_or_else(|| Error::NotProcessed("bobbin has no winding windows".to_string()))?;

    let mut sections = Vec::new();
    let mut layers = Vec::new();
    let mut turns = Vec::new();

    let mut cursor_width = 0.0;
    for (winding_index, winding) in coil.functional_description.iter().enumerate() {
        let outer_dimension = winding_dimension(winding, processed_bobbin);
        let turns_per_layer = (window.height / outer_dimension.1).floor().max(1.0) as u32;
        let number_layers = (f64::from(winding.number_turns) / f64::from(turns_per_layer)).ceil().max(1.0) as u32;
        let section_width = f64::from(number_layers) * outer_dimension.0;

        if cursor_width + section_width > window.width + 1e-12 {
            return Err(Error::CalculationInvalid(format!(
                "winding {} does not fit the available winding window width",
                winding.name
            )));
        }

        let section_index = sections.len();
        sections.push(Section {
            winding_index,
            number_turns: winding.number_turns,
            number_layers,
            inner_radius: window.inner_radius + cursor_width,
            width: section_width,
            height: f64::from(turns_per_layer) * outer_dimension.1,
        });

        let mut remaining_turns = winding.number_turns;
        for layer_number in 0..number_layers {
            let layer_index = layers.len();
            let layer_turns = remaining_turns.min(turns_per_layer);
            remaining_turns -= layer_turns;
            let radial_position = window.inner_radius + cursor_width + (f64::from(layer_number) + 0.5) * outer_dimension.0;
            layers.push(Layer { section_index, number_turns: layer_turns, radial_position });

            for _ in 0..layer_turns {
                turns.push(Turn { layer_index, length: turn_length(radial_position), radial_position });
            }
        }

        cursor_width += section_width;
    }

    Ok(ProcessedCoil { sections, layers, turns })
}

fn winding_dimension(
    winding: &crate::model::coil::WindingFunctionalDescription,
    _bobbin: &ProcessedBobbin,
) -> (f64, f64) {
    let outer_area = winding.wire.outer_area().unwrap_or(1e-8);
    let side = outer_area.sqrt();
    match winding.orientation {
        WindingOrientation::Overlapping => (side, side),
        WindingOrientation::Contiguous => (side, side),
    }
}

/// Shrinks each section's bounding box to the convex hull of its turns and
/// snaps spacings to the turns-alignment rule (§4.14, `delimit_and_compact`).
#[must_use]
pub fn delimit_and_compact(mut processed: ProcessedCoil) -> ProcessedCoil {
    let layers = processed.layers.clone();
    let turns = processed.turns.clone();
    for (section_index, section) in processed.sections.iter_mut().enumerate() {
        let layer_indices: Vec<usize> =
            layers.iter().enumerate().filter(|(_, layer)| layer.section_index == section_index).map(|(i, _)| i).collect();
        let radii: Vec<f64> =
            turns.iter().filter(|turn| layer_indices.contains(&turn.layer_index)).map(|turn| turn.radial_position).collect();
        if radii.is_empty() {
            continue;
        }
        let min_radius = radii.iter().copied().fold(f64::MAX, f64::min);
        let max_radius = radii.iter().copied().fold(f64::MIN, f64::max);
        section.width = (max_radius - min_radius).max(1e-9);
    }
    processed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::bobbin::{Bobbin, ColumnShape};
    use crate::model::coil::{CoilAlignment, WindingFunctionalDescription};
    use crate::model::core::WindingWindow;
    use crate::model::requirement::IsolationSide;
    use crate::model::wire::{Coating, Wire};

    fn single_winding_coil(number_turns: u32) -> Coil {
        let bobbin =
            Bobbin::quick_bobbin(&[WindingWindow { height: 0.01, width: 0.005, inner_radius: 0.002 }], ColumnShape::Round)
                .unwrap();
        Coil {
            bobbin,
            functional_description: vec![WindingFunctionalDescription {
                name: "primary".to_string(),
                isolation_side: IsolationSide::Primary,
                number_turns,
                number_parallels: 1,
                wire: Wire::Round { conducting_diameter: 0.0003, outer_diameter: 0.00033, coating: Coating::Bare },
                orientation: WindingOrientation::Overlapping,
            }],
            alignment: CoilAlignment::InnerOrCenter,
            processed: None,
        }
    }

    #[test]
    fn wind_produces_one_turn_per_declared_turn() {
        let coil = single_winding_coil(10);
        let processed = wind(&coil).unwrap();
        assert_eq!(processed.turns.len(), 10);
    }

    #[test]
    fn wind_fails_when_winding_does_not_fit() {
        let coil = single_winding_coil(100_000);
        assert!(wind(&coil).is_err());
    }
}
