//! [`Core`], [`CoreShape`], [`CoreMaterial`] and [`CoreGap`] (§3).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Geometric family a [`CoreShape`] belongs to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CoreShapeFamily {
    /// E core.
    E,
    /// ETD core.
    Etd,
    /// EP core.
    Ep,
    /// EC core.
    Ec,
    /// EFD core.
    Efd,
    /// ER core.
    Er,
    /// PQ core.
    Pq,
    /// PM core.
    Pm,
    /// RM core.
    Rm,
    /// U core.
    U,
    /// UR core.
    Ur,
    /// UI core.
    Ui,
    /// Toroid.
    T,
    /// C core.
    C,
    /// Planar E core.
    PlanarE,
    /// EQ core.
    Eq,
}

/// Whether the shape's magnetic circuit is naturally closed (toroid) or
/// requires a mating piece (two-piece set).
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum MagneticCircuit {
    /// Closed magnetic path (e.g. toroid).
    Closed,
    /// Open magnetic path, requires a second piece to close (e.g. E/ETD).
    Open,
}

/// A named geometric archetype (§3). Dimensions are named per family,
/// following manufacturer datasheet convention (`A`, `B`, `C`, ...).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CoreShape {
    /// Canonical name, e.g. `"ETD 29"`.
    pub name: String,
    /// Alternate manufacturer names resolved at catalogue load time.
    pub aliases: Vec<String>,
    /// Geometric family.
    pub family: CoreShapeFamily,
    /// Optional family subtype (e.g. a low-profile ETD variant).
    pub family_subtype: Option<String>,
    /// Open or closed magnetic circuit.
    pub magnetic_circuit: MagneticCircuit,
    /// Named dimensions, metres.
    pub dimensions: BTreeMap<String, f64>,
}

/// How a material's volumetric-losses data is organised for one named
/// method (e.g. `"steinmetz"`).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SteinmetzRange {
    /// Lower bound of the frequency range this coefficient set applies to.
    pub minimum_frequency: f64,
    /// Upper bound of the frequency range.
    pub maximum_frequency: f64,
    /// Frequency exponent.
    pub alpha: f64,
    /// Flux-density exponent.
    pub beta: f64,
    /// Steinmetz coefficient.
    pub k: f64,
    /// Temperature-coefficient terms, if the material provides them.
    pub temperature_coefficients: Option<[f64; 3]>,
}

/// A material's initial-permeability dependence data (§4.5).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PermeabilityData {
    /// Reference initial permeability at 25°C, zero bias, zero frequency.
    pub reference_value: f64,
    /// Temperature-dependence coefficients `[a, b, c, d, e]` for
    /// `a + bT + cT² + dT³ + eT⁴`, if the Magnetics polynomial method
    /// applies; otherwise a tabulated `(T, factor)` curve.
    pub temperature_polynomial: Option<[f64; 5]>,
    /// Tabulated `(T, factor)` curve, used when no polynomial is given.
    pub temperature_table: Option<Vec<(f64, f64)>>,
    /// DC-bias coefficients `(a, b, c)` for `1 / (1 + a·H^c)^b`.
    pub dc_bias_coefficients: Option<(f64, f64, f64)>,
    /// Tabulated `(H_dc, factor)` curve, used when no closed form is given.
    pub dc_bias_table: Option<Vec<(f64, f64)>>,
    /// Frequency-dependence polynomial coefficients, ascending order,
    /// degree ≤ 4.
    pub frequency_polynomial: Option<Vec<f64>>,
    /// Tabulated `(f, factor)` curve, used when no polynomial is given.
    pub frequency_table: Option<Vec<(f64, f64)>>,
    /// Manufacturer-declared initial-permeability tolerance, as a fraction
    /// of `reference_value` (e.g. `0.25` for ferrite's common "+/-25%").
    /// `None` when the material's datasheet gives no tolerance figure.
    pub tolerance: Option<f64>,
}

/// A `(B_sat, H_sat, T)` saturation data point.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct SaturationPoint {
    /// Saturation flux density, Tesla.
    pub magnetic_flux_density: f64,
    /// Saturation field strength, A/m.
    pub magnetic_field: f64,
    /// Temperature the point was measured at, °C.
    pub temperature: f64,
}

/// A `(resistivity, T)` data point.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct ResistivityPoint {
    /// Volume resistivity, Ω·m.
    pub value: f64,
    /// Temperature the point was measured at, °C.
    pub temperature: f64,
}

/// The broad material family, used to pick defaults (e.g. typical
/// fringing-model tolerance, §8).
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum MaterialFamily {
    /// Sintered ferrite.
    Ferrite,
    /// Pressed iron-powder.
    Powder,
    /// Amorphous alloy ribbon.
    Amorphous,
    /// Nanocrystalline alloy ribbon.
    Nanocrystalline,
    /// Silicon-steel lamination.
    SiliconSteel,
}

/// A magnetic core material (§3).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CoreMaterial {
    /// Catalogue name, e.g. `"3C97"`.
    pub name: String,
    /// Broad material family.
    pub family: MaterialFamily,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Saturation data, at least one point.
    pub saturation: Vec<SaturationPoint>,
    /// Initial-permeability dependence data.
    pub permeability: PermeabilityData,
    /// Per-method volumetric-losses range tables, keyed by method name
    /// (`"steinmetz"`, `"roshen"`, ...).
    pub volumetric_losses: BTreeMap<String, Vec<SteinmetzRange>>,
    /// Mass-losses equivalent, present instead of `volumetric_losses` for
    /// tape-wound materials measured per kilogram.
    pub mass_losses: Option<BTreeMap<String, Vec<SteinmetzRange>>>,
    /// Density, kg/m³, required when `mass_losses` is used.
    pub density: Option<f64>,
    /// Resistivity data.
    pub resistivity: Vec<ResistivityPoint>,
    /// Curie temperature, °C.
    pub curie_temperature: Option<f64>,
    /// Remanent flux density, Tesla.
    pub remanence: Option<f64>,
    /// Coercive force, A/m.
    pub coercive_force: Option<f64>,
    /// Explicit preferred core-losses model, overriding the
    /// `Settings::core_losses_model_names` search order.
    pub preferred_core_losses_model: Option<crate::core_losses::CoreLossesModelName>,
    /// Roshen-specific major-loop and excess-loss coefficients, when the
    /// material supports the Roshen model.
    pub roshen_coefficients: Option<crate::core_losses::roshen::RoshenCoefficients>,
    /// A symbolic proprietary loss formula (Magnetec tape cores), evaluated
    /// by [`crate::core_losses::proprietary`].
    pub proprietary_formula: Option<String>,
}

impl CoreMaterial {
    /// Validates the exclusive-or between `volumetric_losses` and
    /// `mass_losses`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if neither or both are present, or if
    /// `saturation` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.saturation.is_empty() {
            return Err(Error::InvalidInput(format!("material {} has no saturation data", self.name)));
        }
        let has_volumetric = !self.volumetric_losses.is_empty();
        let has_mass = self.mass_losses.as_ref().is_some_and(|m| !m.is_empty());
        if has_volumetric == has_mass {
            return Err(Error::InvalidInput(format!(
                "material {} must declare exactly one of volumetric_losses/mass_losses",
                self.name
            )));
        }
        Ok(())
    }

    /// Resistivity at `temperature`, linearly interpolated over the
    /// tabulated points (clamped at the ends).
    ///
    /// # Errors
    /// Propagates interpolation errors.
    pub fn resistivity_at(&self, temperature: f64) -> Result<f64> {
        let mut points = self.resistivity.clone();
        points.sort_by(|a, b| a.temperature.partial_cmp(&b.temperature).unwrap());
        let x: Vec<f64> = points.iter().map(|p| p.temperature).collect();
        let y: Vec<f64> = points.iter().map(|p| p.value).collect();
        crate::numeric::interpolate::linear_interpolate(&x, &y, temperature)
    }
}

/// Type of functional core: a single closed toroid, or a two-piece set
/// assembled from two shape halves (§3).
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CoreType {
    /// Single-piece toroidal core.
    Toroidal,
    /// Two mating pieces (E-E, E-I, U-U, ...).
    TwoPieceSet,
}

/// How a gap was introduced (§3).
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CoreGapType {
    /// Manufacturing residual gap, not deliberately introduced.
    Residual,
    /// Material added to increase the gap.
    Additive,
    /// Material removed (ground) to increase the gap.
    Subtractive,
    /// One of several small gaps distributed along the central column.
    Distributed,
}

/// A gap in the magnetic circuit (§3).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct CoreGap {
    /// How the gap was introduced.
    pub gap_type: CoreGapType,
    /// Gap length, metres. Invariant: `>= `[`crate::constants::RESIDUAL_GAP`].
    pub length: f64,
    /// Gap area, when already resolved by [`crate::reluctance`].
    pub area: Option<f64>,
    /// Distance to the nearest surface parallel to the gap, used by the
    /// fringing-factor models.
    pub closest_parallel_surface_distance: Option<f64>,
    /// Distance to the nearest surface normal to the gap.
    pub closest_normal_surface_distance: Option<f64>,
}

/// The effective geometric parameters a non-uniform core is reduced to
/// (§3 Glossary).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct EffectiveParameters {
    /// Effective magnetic area, m².
    pub effective_area: f64,
    /// Effective magnetic path length, m.
    pub effective_length: f64,
    /// Effective magnetic volume, m³.
    pub effective_volume: f64,
    /// Minimum cross-sectional area along the path (saturation-limiting).
    pub minimum_area: f64,
}

/// A rectangular winding window available for a coil.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct WindingWindow {
    /// Window height, m.
    pub height: f64,
    /// Window width, m.
    pub width: f64,
    /// Radial coordinate of the window's inner edge (0 for a two-piece set
    /// bobbin centred on the central column).
    pub inner_radius: f64,
}

/// The geometry derived by [`crate::model::core::Core::process_data`]
/// (§3, §4.6).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ProcessedCore {
    /// Effective geometric parameters.
    pub effective_parameters: EffectiveParameters,
    /// Winding window(s) available (more than one for e.g. a U-U set).
    pub winding_windows: Vec<WindingWindow>,
    /// Overall assembled height, m.
    pub height: f64,
    /// Overall assembled width, m.
    pub width: f64,
    /// Overall assembled depth, m.
    pub depth: f64,
    /// Mass of the assembled core, kg.
    pub mass: f64,
}

/// A magnetic core: functional description plus (once computed) its
/// processed geometry (§3).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Core {
    /// Toroid or two-piece set.
    pub core_type: CoreType,
    /// Geometric shape.
    pub shape: CoreShape,
    /// Material.
    pub material: CoreMaterial,
    /// Gaps present in the magnetic circuit.
    pub gapping: Vec<CoreGap>,
    /// Number of stacked shapes (>1 increases effective area linearly).
    pub stacks: u32,
    /// Processed geometry, filled by
    /// [`crate::reluctance::geometry::process_core_data`].
    pub processed: Option<ProcessedCore>,
    /// Manufacturer part reference, when this core came from a catalogue.
    pub reference: Option<String>,
}

impl Core {
    /// Validates the toroid/gapping invariant: a closed toroid has no
    /// additive/subtractive gaps (§3).
    ///
    /// # Errors
    /// Returns [`Error::CalculationInvalid`] if violated, and
    /// [`Error::CalculationInvalid`] if any gap is below
    /// [`crate::constants::RESIDUAL_GAP`].
    pub fn validate(&self) -> Result<()> {
        for gap in &self.gapping {
            if gap.length < crate::constants::RESIDUAL_GAP {
                return Err(Error::CalculationInvalid(format!(
                    "gap length {} is below the residual gap floor",
                    gap.length
                )));
            }
        }
        if self.shape.magnetic_circuit == MagneticCircuit::Closed
            && self
                .gapping
                .iter()
                .any(|g| matches!(g.gap_type, CoreGapType::Additive | CoreGapType::Subtractive))
        {
            return Err(Error::CalculationInvalid(
                "a closed (toroidal) magnetic circuit cannot have additive/subtractive gaps".to_string(),
            ));
        }
        if self.stacks == 0 {
            return Err(Error::CalculationInvalid("core stacks must be >= 1".to_string()));
        }
        Ok(())
    }

    /// Returns the processed geometry, or [`Error::NotProcessed`] if
    /// [`process_data`](crate::reluctance::geometry::process_core_data) has
    /// not been called yet.
    ///
    /// # Errors
    /// See above.
    pub fn processed(&self) -> Result<&ProcessedCore> {
        self.processed
            .as_ref()
            .ok_or_else(|| Error::NotProcessed(format!("core {:?} has no processed description", self.shape.name)))
    }

    /// A stable identity for adviser scoring maps: the manufacturer
    /// reference if known, else a synthesised name from shape and material.
    #[must_use]
    pub fn identity(&self) -> String {
        self.reference
            .clone()
            .unwrap_or_else(|| format!("{}/{}/stack{}", self.shape.name, self.material.name, self.stacks))
    }
}
