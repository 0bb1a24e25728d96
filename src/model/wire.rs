//! [`Wire`] tagged variants and [`Coating`] (§3).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Insulation coating applied over a conductor (§3, §4.10).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Coating {
    /// No coating; bare conductor.
    Bare,
    /// Thin film enamel, number of build layers (grade) given.
    Enamelled {
        /// Number of enamel build layers (1 = single, 2 = double, ...).
        grade: u32,
        /// Coating thickness, metres.
        thickness: f64,
    },
    /// Extruded insulation meeting a declared number of IEC 60664 grades.
    Insulated {
        /// Number of distinct extruded layers.
        number_layers: u32,
        /// Total coating thickness, metres.
        thickness: f64,
        /// Breakdown voltage, volts.
        breakdown_voltage: f64,
    },
    /// Fibre serving wrapped over the conductor.
    Served {
        /// Number of servings.
        number_servings: u32,
        /// Total coating thickness, metres.
        thickness: f64,
    },
    /// Insulating tape wrapped over the conductor (typically foil
    /// conductors).
    Taped {
        /// Number of tape layers.
        number_layers: u32,
        /// Total coating thickness, metres.
        thickness: f64,
    },
}

impl Coating {
    /// Coating thickness, metres; zero for [`Coating::Bare`].
    #[must_use]
    pub fn thickness(&self) -> f64 {
        match self {
            Self::Bare => 0.0,
            Self::Enamelled { thickness, .. }
            | Self::Insulated { thickness, .. }
            | Self::Served { thickness, .. }
            | Self::Taped { thickness, .. } => *thickness,
        }
    }

    /// Whether this coating meets the "insulated" grade used by the
    /// insulation coordinator's reinforced/double logic (§4.10): only a
    /// multi-layer extruded coating with known breakdown voltage counts.
    #[must_use]
    pub fn is_reinforced_grade(&self) -> bool {
        matches!(self, Self::Insulated { number_layers, .. } if *number_layers >= 3)
    }
}

/// A single strand of a litz bundle.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Strand {
    /// Conducting diameter of one strand, metres.
    pub conducting_diameter: f64,
    /// Outer diameter including its own coating, metres.
    pub outer_diameter: f64,
}

/// A conductor family, tagged by cross-section shape (§3). Each variant
/// carries the geometric data needed to compute its own conducting and
/// outer area.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Wire {
    /// Solid round conductor.
    Round {
        /// Bare conducting diameter, metres.
        conducting_diameter: f64,
        /// Outer diameter including coating, metres.
        outer_diameter: f64,
        /// Surface coating.
        coating: Coating,
    },
    /// Solid rectangular conductor.
    Rectangular {
        /// Bare conducting width, metres.
        conducting_width: f64,
        /// Bare conducting height, metres.
        conducting_height: f64,
        /// Outer width including coating, metres.
        outer_width: f64,
        /// Outer height including coating, metres.
        outer_height: f64,
        /// Corner radius, metres.
        edge_radius: f64,
        /// Surface coating.
        coating: Coating,
    },
    /// A single foil conductor wound edge-on (full window height).
    Foil {
        /// Bare conducting thickness, metres (radial direction).
        conducting_thickness: f64,
        /// Bare conducting width, metres (axial direction, ≈ window height).
        conducting_width: f64,
        /// Outer thickness including coating, metres.
        outer_thickness: f64,
        /// Surface coating.
        coating: Coating,
    },
    /// A planar (PCB-track) conductor.
    Planar {
        /// Track thickness, metres.
        conducting_thickness: f64,
        /// Track width, metres.
        conducting_width: f64,
    },
    /// A bundle of individually insulated, twisted/braided strands.
    Litz {
        /// Individual strand geometry.
        strand: Strand,
        /// Number of strands in the bundle.
        number_conductors: u32,
        /// Outer diameter of the whole serving, metres.
        outer_diameter: f64,
        /// Serving applied over the bundle.
        serving: Coating,
    },
}

impl Wire {
    /// Total conducting (copper) cross-sectional area, m².
    ///
    /// # Errors
    /// Returns [`Error::CalculationInvalid`] if any declared dimension is
    /// non-positive.
    pub fn conducting_area(&self) -> Result<f64> {
        let area = match self {
            Self::Round { conducting_diameter, .. } => {
                std::f64::consts::PI * (conducting_diameter / 2.0).powi(2)
            }
            Self::Rectangular { conducting_width, conducting_height, edge_radius, .. } => {
                conducting_width * conducting_height - (4.0 - std::f64::consts::PI) * edge_radius.powi(2)
            }
            Self::Foil { conducting_thickness, conducting_width, .. } => conducting_thickness * conducting_width,
            Self::Planar { conducting_thickness, conducting_width } => conducting_thickness * conducting_width,
            Self::Litz { strand, number_conductors, .. } => {
                std::f64::consts::PI * (strand.conducting_diameter / 2.0).powi(2) * f64::from(*number_conductors)
            }
        };
        if area <= 0.0 {
            return Err(Error::CalculationInvalid("wire conducting area resolved to a non-positive value".to_string()));
        }
        Ok(area)
    }

    /// Total outer (insulated) cross-sectional area, m².
    ///
    /// # Errors
    /// Returns [`Error::CalculationInvalid`] under the same conditions as
    /// [`Self::conducting_area`].
    pub fn outer_area(&self) -> Result<f64> {
        let area = match self {
            Self::Round { outer_diameter, .. } => std::f64::consts::PI * (outer_diameter / 2.0).powi(2),
            Self::Rectangular { outer_width, outer_height, edge_radius, .. } => {
                outer_width * outer_height - (4.0 - std::f64::consts::PI) * edge_radius.powi(2)
            }
            Self::Foil { outer_thickness, conducting_width, .. } => outer_thickness * conducting_width,
            Self::Planar { .. } => self.conducting_area()?,
            Self::Litz { outer_diameter, .. } => std::f64::consts::PI * (outer_diameter / 2.0).powi(2),
        };
        if area <= 0.0 {
            return Err(Error::CalculationInvalid("wire outer area resolved to a non-positive value".to_string()));
        }
        Ok(area)
    }

    /// The effective conducting diameter used by the skin-depth models
    /// (§4.9): the true diameter for `Round`, the strand diameter for
    /// `Litz`, and an equivalent-area diameter for the flat families.
    ///
    /// # Errors
    /// Propagates [`Self::conducting_area`] errors.
    pub fn effective_conducting_diameter(&self) -> Result<f64> {
        match self {
            Self::Round { conducting_diameter, .. } => Ok(*conducting_diameter),
            Self::Litz { strand, .. } => Ok(strand.conducting_diameter),
            _ => Ok(2.0 * (self.conducting_area()? / std::f64::consts::PI).sqrt()),
        }
    }

    /// Number of parallel conductors the skin/proximity model must sum over:
    /// strand count for litz, one otherwise.
    #[must_use]
    pub fn number_parallel_conductors(&self) -> u32 {
        match self {
            Self::Litz { number_conductors, .. } => *number_conductors,
            _ => 1,
        }
    }

    /// A stable identity for catalogue lookups and adviser scoring maps.
    #[must_use]
    pub fn identity(&self) -> String {
        match self {
            Self::Round { conducting_diameter, .. } => format!("round/{conducting_diameter:e}"),
            Self::Rectangular { conducting_width, conducting_height, .. } => {
                format!("rectangular/{conducting_width:e}x{conducting_height:e}")
            }
            Self::Foil { conducting_thickness, .. } => format!("foil/{conducting_thickness:e}"),
            Self::Planar { conducting_thickness, conducting_width } => {
                format!("planar/{conducting_thickness:e}x{conducting_width:e}")
            }
            Self::Litz { strand, number_conductors, .. } => {
                format!("litz/{}x{:e}", number_conductors, strand.conducting_diameter)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_wire_conducting_area_matches_circle_formula() {
        let wire = Wire::Round { conducting_diameter: 0.001, outer_diameter: 0.0011, coating: Coating::Bare };
        let expected = std::f64::consts::PI * (0.0005_f64).powi(2);
        assert!((wire.conducting_area().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn litz_conducting_area_scales_with_strand_count() {
        let wire = Wire::Litz {
            strand: Strand { conducting_diameter: 0.0001, outer_diameter: 0.00012 },
            number_conductors: 100,
            outer_diameter: 0.002,
            serving: Coating::Served { number_servings: 1, thickness: 0.00002 },
        };
        let single = std::f64::consts::PI * (0.00005_f64).powi(2);
        assert!((wire.conducting_area().unwrap() - single * 100.0).abs() < 1e-12);
        assert_eq!(wire.number_parallel_conductors(), 100);
    }

    #[test]
    fn reinforced_grade_requires_three_layers() {
        let two = Coating::Insulated { number_layers: 2, thickness: 0.0001, breakdown_voltage: 3000.0 };
        let three = Coating::Insulated { number_layers: 3, thickness: 0.00015, breakdown_voltage: 6000.0 };
        assert!(!two.is_reinforced_grade());
        assert!(three.is_reinforced_grade());
    }
}
