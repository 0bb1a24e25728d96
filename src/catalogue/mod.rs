//! Catalogue façade (§4.4, component D): typed access to an externally
//! supplied, read-only record store.

mod provider;

pub use provider::{CatalogueProvider, InMemoryCatalogue};

use crate::error::{Error, Result};
use crate::model::core::{CoreMaterial, CoreShape};
use crate::model::wire::Wire;

/// Opaque insulation-material record (§4.10's `CoilSectionInterface` picks
/// one of these).
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct InsulationMaterial {
    /// Catalogue name.
    pub name: String,
    /// Breakdown voltage per layer, volts.
    pub breakdown_voltage_per_layer: f64,
    /// Thickness per layer, metres.
    pub thickness_per_layer: f64,
    /// Whether the material is suitable as margin tape.
    pub is_margin_tape: bool,
}

/// Opaque wire-material record (conductor metal properties).
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct WireMaterial {
    /// Catalogue name, e.g. `"copper"`.
    pub name: String,
    /// Resistivity at 20°C, Ω·m.
    pub resistivity_20c: f64,
    /// Linear temperature coefficient of resistivity, per °C.
    pub temperature_coefficient: f64,
}

/// Read-only, typed view over a [`CatalogueProvider`] (§4.4).
///
/// Wraps the provider rather than owning data: the façade's lifecycle is
/// "initialise once from an external data provider, then read-only
/// thereafter" — this struct never mutates what it wraps.
pub struct Catalogue<'a> {
    provider: &'a dyn CatalogueProvider,
}

impl<'a> Catalogue<'a> {
    /// Wraps a provider.
    #[must_use]
    pub fn new(provider: &'a dyn CatalogueProvider) -> Self {
        Self { provider }
    }

    /// All core shapes.
    #[must_use]
    pub fn core_shapes(&self) -> &[CoreShape] {
        self.provider.core_shapes()
    }

    /// All core materials.
    #[must_use]
    pub fn core_materials(&self) -> &[CoreMaterial] {
        self.provider.core_materials()
    }

    /// All catalogue wires.
    #[must_use]
    pub fn wires(&self) -> &[Wire] {
        self.provider.wires()
    }

    /// All insulation materials.
    #[must_use]
    pub fn insulation_materials(&self) -> &[InsulationMaterial] {
        self.provider.insulation_materials()
    }

    /// All wire (conductor metal) materials.
    #[must_use]
    pub fn wire_materials(&self) -> &[WireMaterial] {
        self.provider.wire_materials()
    }

    /// Finds a core shape by exact name or alias.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no shape matches.
    pub fn find_shape_by_name(&self, name: &str) -> Result<&CoreShape> {
        self.core_shapes()
            .iter()
            .find(|shape| shape.name == name || shape.aliases.iter().any(|alias| alias == name))
            .ok_or_else(|| Error::NotFound(format!("no core shape named {name}")))
    }

    /// Finds a core material by exact name.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no material matches.
    pub fn find_material_by_name(&self, name: &str) -> Result<&CoreMaterial> {
        self.core_materials()
            .iter()
            .find(|material| material.name == name)
            .ok_or_else(|| Error::NotFound(format!("no core material named {name}")))
    }

    /// Returns the wire with the smallest non-negative distance to `d`
    /// (conducting diameter or equivalent), ties broken by smallest outer
    /// dimension (§4.4).
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the catalogue has no wires, or
    /// propagates [`Wire::effective_conducting_diameter`]/
    /// [`Wire::outer_area`] errors.
    pub fn find_wire_by_dimension(&self, d: f64) -> Result<&Wire> {
        let mut best: Option<(&Wire, f64, f64)> = None;
        for wire in self.wires() {
            let diameter = wire.effective_conducting_diameter()?;
            let distance = (diameter - d).abs();
            let outer = wire.outer_area()?;
            let better = match best {
                None => true,
                Some((_, best_distance, best_outer)) => {
                    distance < best_distance || ((distance - best_distance).abs() < 1e-15 && outer < best_outer)
                }
            };
            if better {
                best = Some((wire, distance, outer));
            }
        }
        best.map(|(wire, _, _)| wire).ok_or_else(|| Error::NotFound("catalogue has no wires".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::core::MagneticCircuit;
    use crate::model::wire::Coating;
    use std::collections::BTreeMap;

    fn shape(name: &str) -> CoreShape {
        CoreShape {
            name: name.to_string(),
            aliases: vec![],
            family: crate::model::core::CoreShapeFamily::Etd,
            family_subtype: None,
            magnetic_circuit: MagneticCircuit::Open,
            dimensions: BTreeMap::new(),
        }
    }

    #[test]
    fn find_wire_by_dimension_picks_closest() {
        let wires = vec![
            Wire::Round { conducting_diameter: 0.0003, outer_diameter: 0.00032, coating: Coating::Bare },
            Wire::Round { conducting_diameter: 0.0005, outer_diameter: 0.00052, coating: Coating::Bare },
            Wire::Round { conducting_diameter: 0.0009, outer_diameter: 0.00092, coating: Coating::Bare },
        ];
        let provider = InMemoryCatalogue {
            core_shapes: vec![shape("ETD 29")],
            core_materials: vec![],
            wires,
            insulation_materials: vec![],
            wire_materials: vec![],
        };
        let catalogue = Catalogue::new(&provider);
        let found = catalogue.find_wire_by_dimension(0.00045).unwrap();
        assert_eq!(found.effective_conducting_diameter().unwrap(), 0.0005);
    }

    #[test]
    fn find_shape_by_name_resolves_aliases() {
        let mut aliased = shape("ETD29");
        aliased.aliases.push("ETD 29".to_string());
        let provider = InMemoryCatalogue {
            core_shapes: vec![aliased],
            core_materials: vec![],
            wires: vec![],
            insulation_materials: vec![],
            wire_materials: vec![],
        };
        let catalogue = Catalogue::new(&provider);
        assert!(catalogue.find_shape_by_name("ETD 29").is_ok());
        assert!(catalogue.find_shape_by_name("missing").is_err());
    }
}
