//! [`CatalogueProvider`]: the external collaborator interface (§4.4,
//! Non-goals). No concrete file- or network-backed provider is implemented
//! here; that is explicitly out of scope. [`InMemoryCatalogue`] exists only
//! to exercise [`super::Catalogue`] in tests.

use crate::catalogue::{InsulationMaterial, WireMaterial};
use crate::model::core::{CoreMaterial, CoreShape};
use crate::model::wire::Wire;

/// Source of truth for catalogue records. Implementations own their own
/// loading/caching strategy; the engine only ever reads through this trait.
pub trait CatalogueProvider {
    /// All known core shapes.
    fn core_shapes(&self) -> &[CoreShape];
    /// All known core materials.
    fn core_materials(&self) -> &[CoreMaterial];
    /// All known wires.
    fn wires(&self) -> &[Wire];
    /// All known insulation materials.
    fn insulation_materials(&self) -> &[InsulationMaterial];
    /// All known wire (conductor metal) materials.
    fn wire_materials(&self) -> &[WireMaterial];
}

/// A trivial `Vec`-backed [`CatalogueProvider`], used by tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalogue {
    /// Core shapes.
    pub core_shapes: Vec<CoreShape>,
    /// Core materials.
    pub core_materials: Vec<CoreMaterial>,
    /// Wires.
    pub wires: Vec<Wire>,
    /// Insulation materials.
    pub insulation_materials: Vec<InsulationMaterial>,
    /// Wire materials.
    pub wire_materials: Vec<WireMaterial>,
}

impl CatalogueProvider for InMemoryCatalogue {
    fn core_shapes(&self) -> &[CoreShape] {
        &self.core_shapes
    }

    fn core_materials(&self) -> &[CoreMaterial] {
        &self.core_materials
    }

    fn wires(&self) -> &[Wire] {
        &self.wires
    }

    fn insulation_materials(&self) -> &[InsulationMaterial] {
        &self.insulation_materials
    }

    fn wire_materials(&self) -> &[WireMaterial] {
        &self.wire_materials
    }
}
