//! [`Coil`]: per-winding functional description plus derived sections,
//! layers and turns (§3, §4.14).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::bobbin::Bobbin;
use crate::model::wire::Wire;

/// How turns of a single winding are distributed across the available
/// sections (§3).
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum WindingOrientation {
    /// Turns stack along the winding-window width (radial builds).
    Overlapping,
    /// Turns stack along the winding-window height (axial builds).
    Contiguous,
}

/// How adjacent turns within a layer are packed.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CoilAlignment {
    /// Packed against the inner edge, remaining space left outer.
    InnerOrCenter,
    /// Packed against the outer edge.
    Outer,
    /// Evenly spread across the available space.
    Spread,
}

/// One winding's functional description: which isolation side it belongs
/// to, how many parallels/turns, and the wire used.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct WindingFunctionalDescription {
    /// Winding name, e.g. `"primary"`.
    pub name: String,
    /// Isolation side this winding belongs to.
    pub isolation_side: crate::model::requirement::IsolationSide,
    /// Number of series turns.
    pub number_turns: u32,
    /// Number of parallel conductors (distinct from litz strand count).
    pub number_parallels: u32,
    /// Wire used for this winding.
    pub wire: Wire,
    /// Orientation of this winding's turns.
    pub orientation: WindingOrientation,
}

/// One physical section of the coil: a contiguous run of turns belonging
/// to one winding, occupying part of a winding window.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Section {
    /// Index into [`Coil::functional_description`] this section belongs to.
    pub winding_index: usize,
    /// Number of turns in this section.
    pub number_turns: u32,
    /// Number of layers this section is split across.
    pub number_layers: u32,
    /// Radial coordinate of the section's inner edge, m.
    pub inner_radius: f64,
    /// Section width (radial build), m.
    pub width: f64,
    /// Section height (axial extent), m.
    pub height: f64,
}

/// A single layer of turns within a [`Section`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Layer {
    /// Index into [`Coil::sections`] this layer belongs to.
    pub section_index: usize,
    /// Number of turns in this layer.
    pub number_turns: u32,
    /// Radial coordinate of this layer's centre, m.
    pub radial_position: f64,
}

/// A single physical turn.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Turn {
    /// Index into [`Coil::layers`] this turn belongs to.
    pub layer_index: usize,
    /// Length of this turn's conductor loop, m (used by resistance and
    /// losses calculations).
    pub length: f64,
    /// Radial coordinate of this turn's centre, m.
    pub radial_position: f64,
}

/// The processed winding structure derived from a [`Coil`]'s functional
/// description by [`crate::coil_adviser::winding_engine`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ProcessedCoil {
    /// Physical sections.
    pub sections: Vec<Section>,
    /// Physical layers.
    pub layers: Vec<Layer>,
    /// Physical turns.
    pub turns: Vec<Turn>,
}

/// A coil: a bobbin plus one functional description per winding, and
/// (once computed) the derived physical structure (§3).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Coil {
    /// Winding former.
    pub bobbin: Bobbin,
    /// One entry per winding, in winding order.
    pub functional_description: Vec<WindingFunctionalDescription>,
    /// Global section-packing alignment.
    pub alignment: CoilAlignment,
    /// Derived physical structure, once computed.
    pub processed: Option<ProcessedCoil>,
}

impl Coil {
    /// Number of windings.
    #[must_use]
    pub fn number_windings(&self) -> usize {
        self.functional_description.len()
    }

    /// Total series turns declared for the winding at `winding_index`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `winding_index` is out of range.
    pub fn turns_for_winding(&self, winding_index: usize) -> Result<u32> {
        self.functional_description
            .get(winding_index)
            .map(|winding| winding.number_turns)
            .ok_or_else(|| Error::InvalidInput(format!("no winding at index {winding_index}")))
    }

    /// Returns the processed structure, or [`Error::NotProcessed`].
    ///
    /// # Errors
    /// See above.
    pub fn processed(&self) -> Result<&ProcessedCoil> {
        self.processed.as_ref().ok_or_else(|| Error::NotProcessed("coil has not been processed".to_string()))
    }

    /// Every physical turn belonging to a given winding, by cross-
    /// referencing layers back to sections (§4.14).
    ///
    /// # Errors
    /// Propagates [`Self::processed`].
    pub fn turns_of_winding(&self, winding_index: usize) -> Result<Vec<&Turn>> {
        let processed = self.processed()?;
        let section_indices: Vec<usize> = processed
            .sections
            .iter()
            .enumerate()
            .filter(|(_, section)| section.winding_index == winding_index)
            .map(|(index, _)| index)
            .collect();
        let layer_indices: Vec<usize> = processed
            .layers
            .iter()
            .enumerate()
            .filter(|(_, layer)| section_indices.contains(&layer.section_index))
            .map(|(index, _)| index)
            .collect();
        Ok(processed.turns.iter().filter(|turn| layer_indices.contains(&turn.layer_index)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::bobbin::{Bobbin, ColumnShape};
    use crate::model::core::WindingWindow;
    use crate::model::requirement::IsolationSide;
    use crate::model::wire::{Coating, Wire};

    fn sample_coil() -> Coil {
        let bobbin =
            Bobbin::quick_bobbin(&[WindingWindow { height: 0.01, width: 0.005, inner_radius: 0.002 }], ColumnShape::Round)
                .unwrap();
        Coil {
            bobbin,
            functional_description: vec![WindingFunctionalDescription {
                name: "primary".to_string(),
                isolation_side: IsolationSide::Primary,
                number_turns: 10,
                number_parallels: 1,
                wire: Wire::Round { conducting_diameter: 0.0005, outer_diameter: 0.00055, coating: Coating::Bare },
                orientation: WindingOrientation::Overlapping,
            }],
            alignment: CoilAlignment::InnerOrCenter,
            processed: None,
        }
    }

    #[test]
    fn turns_for_winding_rejects_out_of_range_index() {
        let coil = sample_coil();
        assert!(coil.turns_for_winding(1).is_err());
        assert_eq!(coil.turns_for_winding(0).unwrap(), 10);
    }

    #[test]
    fn processed_returns_not_processed_before_winding_engine_runs() {
        let coil = sample_coil();
        assert!(coil.processed().is_err());
    }
}
