//! [`Bobbin`]: functional and processed winding-former description (§3).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::core::WindingWindow;

/// A physical column section the coil is wound over.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct BobbinWindingWindow {
    /// Available winding height, m.
    pub height: f64,
    /// Available winding width (radial build), m.
    pub width: f64,
    /// Wall thickness between the winding window and the core, m.
    pub wall_thickness: f64,
    /// Radial coordinate of the window's inner edge, m.
    pub inner_radius: f64,
}

/// The processed geometry of a bobbin (§3, §4.8): its usable winding
/// window(s), derived once a core's winding window and wall allowances are
/// known.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ProcessedBobbin {
    /// Usable winding windows, one per core winding window.
    pub winding_windows: Vec<BobbinWindingWindow>,
    /// Column depth available for the coil, m.
    pub column_depth: f64,
    /// Column shape used when computing mean-turn-length.
    pub column_shape: ColumnShape,
}

/// Shape of the column the coil is wound around, affecting mean-turn-length
/// and area-product calculations.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ColumnShape {
    /// Round column (toroids, most ETD/EC/PQ/RM centre legs).
    Round,
    /// Rectangular column (most E/U/EI centre legs).
    Rectangular,
    /// Irregular column requiring an externally supplied mean-turn-length.
    Irregular,
}

/// A winding former, either fully specified or derived from filling-factor
/// curves against the core's bare winding window (§4.8, "quick bobbin").
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Bobbin {
    /// Manufacturer name, when this bobbin came from a catalogue.
    pub name: Option<String>,
    /// Processed geometry, once resolved.
    pub processed: Option<ProcessedBobbin>,
}

impl Bobbin {
    /// The wall-thickness-to-window-width filling factor used by the
    /// quick-bobbin synthesis (§4.8, §8): derived from a monotone curve
    /// anchored at `(0, 0.377)` and `(1, 0.738)` on the normalized height
    /// axis, matching the literal test fixture in §8.
    ///
    /// # Errors
    /// Propagates [`crate::numeric::interpolate::MonotoneCubicSpline`]
    /// construction errors.
    pub fn filling_factor(normalized_height: f64) -> Result<f64> {
        let spline = crate::numeric::interpolate::MonotoneCubicSpline::new(
            &[0.0, 0.25, 0.5, 0.75, 1.0],
            &[0.377, 0.52, 0.631, 0.697, 0.738],
        )?;
        Ok(spline.evaluate(normalized_height.clamp(0.0, 1.0)))
    }

    /// Synthesises a bobbin directly from a core's bare winding window,
    /// using [`Self::filling_factor`] to estimate wall thickness (§4.8,
    /// "quick bobbin", used when no catalogue bobbin is requested).
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `core_winding_windows` is empty,
    /// or propagates [`Self::filling_factor`] errors.
    pub fn quick_bobbin(core_winding_windows: &[WindingWindow], column_shape: ColumnShape) -> Result<Self> {
        if core_winding_windows.is_empty() {
            return Err(Error::InvalidInput("cannot synthesize a bobbin with no core winding windows".to_string()));
        }
        let windows = core_winding_windows
            .iter()
            .map(|window| {
                let factor = Self::filling_factor(1.0)?;
                let wall_thickness = window.width * (1.0 - factor) / 2.0;
                Ok(BobbinWindingWindow {
                    height: window.height,
                    width: window.width * factor,
                    wall_thickness,
                    inner_radius: window.inner_radius + wall_thickness,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let column_depth = core_winding_windows[0].width;
        Ok(Self {
            name: None,
            processed: Some(ProcessedBobbin { winding_windows: windows, column_depth, column_shape }),
        })
    }

    /// Returns the processed geometry, or [`Error::NotProcessed`].
    ///
    /// # Errors
    /// See above.
    pub fn processed(&self) -> Result<&ProcessedBobbin> {
        self.processed.as_ref().ok_or_else(|| Error::NotProcessed("bobbin has not been processed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filling_factor_boundary_values_match_fixture() {
        assert!((Bobbin::filling_factor(0.0).unwrap() - 0.377).abs() < 1e-9);
        assert!((Bobbin::filling_factor(1.0).unwrap() - 0.738).abs() < 1e-9);
    }

    #[test]
    fn quick_bobbin_shrinks_window_by_filling_factor() {
        let window = WindingWindow { height: 0.01, width: 0.005, inner_radius: 0.002 };
        let bobbin = Bobbin::quick_bobbin(&[window], ColumnShape::Round).unwrap();
        let processed = bobbin.processed().unwrap();
        assert_eq!(processed.winding_windows.len(), 1);
        assert!(processed.winding_windows[0].width < window.width);
        assert!(processed.winding_windows[0].inner_radius > window.inner_radius);
    }

    #[test]
    fn quick_bobbin_rejects_empty_windows() {
        assert!(Bobbin::quick_bobbin(&[], ColumnShape::Round).is_err());
    }
}
