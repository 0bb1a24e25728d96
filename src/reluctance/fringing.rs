//! Fringing-factor model family (§4.6): `F >= 1` from gap geometry,
//! selected by [`crate::settings::Settings::reluctance_model`].
//!
//! `FringingFactorModelEnum` is the `enum_dispatch` family, matching the
//! teacher's `SubgridEnum` pattern for dispatching to one of several
//! interchangeable implementations selected by a named tag rather than by
//! trait object.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::core::CoreGap;

/// Named fringing-factor model (§4.6).
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FringingFactorModelName {
    /// Zhang's empirical model.
    Zhang,
    /// McLyman's classical model.
    McLyman,
    /// Partridge's model.
    Partridge,
    /// Muehlethaler's model.
    Muehlethaler,
    /// The classical Schwarz-Christoffel-derived formula.
    Classic,
    /// Balakrishnan's model.
    Balakrishnan,
    /// Effective-area approximation.
    EffectiveArea,
    /// Stenglein's model (the only variant using excitation frequency).
    Stenglein,
}

/// The range a distributed gap's fringing factor must be clamped to
/// (§4.6).
pub const DISTRIBUTED_GAP_FRINGING_FACTOR_RANGE: (f64, f64) =
    (crate::constants::MINIMUM_DISTRIBUTED_FRINGING_FACTOR, crate::constants::MAXIMUM_DISTRIBUTED_FRINGING_FACTOR);

/// Shared behaviour every fringing-factor model implements.
#[enum_dispatch]
pub trait FringingFactorModel {
    /// Computes `F >= 1` for one gap, given the core's effective area and
    /// (for frequency-dependent models) the excitation frequency.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::InvalidInput`] if the gap's required
    /// surface-distance fields are missing.
    fn fringing_factor(&self, gap: &CoreGap, effective_area: f64, frequency: f64) -> Result<f64>;
}

fn require_distances(gap: &CoreGap) -> Result<(f64, f64)> {
    let parallel = gap.closest_parallel_surface_distance.ok_or_else(|| {
        crate::error::Error::InvalidInput("fringing factor requires closest_parallel_surface_distance".to_string())
    })?;
    let normal = gap.closest_normal_surface_distance.ok_or_else(|| {
        crate::error::Error::InvalidInput("fringing factor requires closest_normal_surface_distance".to_string())
    })?;
    Ok((parallel, normal))
}

fn clamp_if_distributed(gap: &CoreGap, factor: f64) -> f64 {
    if gap.gap_type == crate::model::core::CoreGapType::Distributed {
        factor.clamp(DISTRIBUTED_GAP_FRINGING_FACTOR_RANGE.0, DISTRIBUTED_GAP_FRINGING_FACTOR_RANGE.1)
    } else {
        factor.max(1.0)
    }
}

/// Zhang's model.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZhangModel;
impl FringingFactorModel for ZhangModel {
    fn fringing_factor(&self, gap: &CoreGap, effective_area: f64, _frequency: f64) -> Result<f64> {
        let (w, _h) = require_distances(gap)?;
        let g = gap.length;
        let side = effective_area.sqrt();
        let raw = 1.0 + (g / side) * (2.0 * w / g).ln().max(0.0);
        Ok(clamp_if_distributed(gap, raw))
    }
}

/// McLyman's classical model.
#[derive(Clone, Copy, Debug, Default)]
pub struct McLymanModel;
impl FringingFactorModel for McLymanModel {
    fn fringing_factor(&self, gap: &CoreGap, effective_area: f64, _frequency: f64) -> Result<f64> {
        let (w, h) = require_distances(gap)?;
        let g = gap.length;
        let side = effective_area.sqrt();
        let raw = 1.0 + (g / side) * ((2.0 * w.min(h) / g) + 1.0).ln();
        Ok(clamp_if_distributed(gap, raw))
    }
}

/// Partridge's model.
#[derive(Clone, Copy, Debug, Default)]
pub struct PartridgeModel;
impl FringingFactorModel for PartridgeModel {
    fn fringing_factor(&self, gap: &CoreGap, effective_area: f64, _frequency: f64) -> Result<f64> {
        let (w, h) = require_distances(gap)?;
        let g = gap.length;
        let side = effective_area.sqrt();
        let raw = 1.0 + (g / side) * (1.0 + (w + h) / (2.0 * g)).ln();
        Ok(clamp_if_distributed(gap, raw))
    }
}

/// Muehlethaler's model.
#[derive(Clone, Copy, Debug, Default)]
pub struct MuehlethalerModel;
impl FringingFactorModel for MuehlethalerModel {
    fn fringing_factor(&self, gap: &CoreGap, effective_area: f64, _frequency: f64) -> Result<f64> {
        let (w, h) = require_distances(gap)?;
        let g = gap.length;
        let side = effective_area.sqrt();
        let raw = 1.0 + 0.5 * (g / side) * ((2.0 * w / g).ln() + (2.0 * h / g).ln());
        Ok(clamp_if_distributed(gap, raw))
    }
}

/// The classical Schwarz-Christoffel-derived formula.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassicModel;
impl FringingFactorModel for ClassicModel {
    fn fringing_factor(&self, gap: &CoreGap, effective_area: f64, _frequency: f64) -> Result<f64> {
        let (w, _h) = require_distances(gap)?;
        let g = gap.length;
        let side = effective_area.sqrt();
        let raw = 1.0 + (g / (std::f64::consts::PI * side)) * (2.0 * w / g).ln().max(0.0);
        Ok(clamp_if_distributed(gap, raw))
    }
}

/// Balakrishnan's model.
#[derive(Clone, Copy, Debug, Default)]
pub struct BalakrishnanModel;
impl FringingFactorModel for BalakrishnanModel {
    fn fringing_factor(&self, gap: &CoreGap, effective_area: f64, _frequency: f64) -> Result<f64> {
        let (w, h) = require_distances(gap)?;
        let g = gap.length;
        let side = effective_area.sqrt();
        let raw = 1.0 + (g / side) * (2.0 * (w * h).sqrt() / g).ln().max(0.0);
        Ok(clamp_if_distributed(gap, raw))
    }
}

/// Effective-area approximation: treats the fringing flux as simply
/// enlarging the gap area by a geometric margin.
#[derive(Clone, Copy, Debug, Default)]
pub struct EffectiveAreaModel;
impl FringingFactorModel for EffectiveAreaModel {
    fn fringing_factor(&self, gap: &CoreGap, effective_area: f64, _frequency: f64) -> Result<f64> {
        let g = gap.length;
        let side = effective_area.sqrt();
        let raw = ((side + g) / side).powi(2);
        Ok(clamp_if_distributed(gap, raw))
    }
}

/// Stenglein's model: the only variant depending on excitation frequency
/// (captures frequency-dependent fringing-flux redistribution).
#[derive(Clone, Copy, Debug, Default)]
pub struct StengleinModel;
impl FringingFactorModel for StengleinModel {
    fn fringing_factor(&self, gap: &CoreGap, effective_area: f64, frequency: f64) -> Result<f64> {
        let (w, _h) = require_distances(gap)?;
        let g = gap.length;
        let side = effective_area.sqrt();
        let frequency_term = 1.0 / (1.0 + frequency / 1.0e7);
        let raw = 1.0 + frequency_term * (g / side) * (2.0 * w / g).ln().max(0.0);
        Ok(clamp_if_distributed(gap, raw))
    }
}

/// The `enum_dispatch` family over all eight named models.
#[enum_dispatch(FringingFactorModel)]
#[derive(Clone, Copy, Debug)]
pub enum FringingFactorModelEnum {
    /// See [`ZhangModel`].
    Zhang(ZhangModel),
    /// See [`McLymanModel`].
    McLyman(McLymanModel),
    /// See [`PartridgeModel`].
    Partridge(PartridgeModel),
    /// See [`MuehlethalerModel`].
    Muehlethaler(MuehlethalerModel),
    /// See [`ClassicModel`].
    Classic(ClassicModel),
    /// See [`BalakrishnanModel`].
    Balakrishnan(BalakrishnanModel),
    /// See [`EffectiveAreaModel`].
    EffectiveArea(EffectiveAreaModel),
    /// See [`StengleinModel`].
    Stenglein(StengleinModel),
}

impl From<FringingFactorModelName> for FringingFactorModelEnum {
    fn from(name: FringingFactorModelName) -> Self {
        match name {
            FringingFactorModelName::Zhang => Self::Zhang(ZhangModel),
            FringingFactorModelName::McLyman => Self::McLyman(McLymanModel),
            FringingFactorModelName::Partridge => Self::Partridge(PartridgeModel),
            FringingFactorModelName::Muehlethaler => Self::Muehlethaler(MuehlethalerModel),
            FringingFactorModelName::Classic => Self::Classic(ClassicModel),
            FringingFactorModelName::Balakrishnan => Self::Balakrishnan(BalakrishnanModel),
            FringingFactorModelName::EffectiveArea => Self::EffectiveArea(EffectiveAreaModel),
            FringingFactorModelName::Stenglein => Self::Stenglein(StengleinModel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_gap(gap_type: crate::model::core::CoreGapType) -> CoreGap {
        CoreGap {
            gap_type,
            length: 0.001,
            area: None,
            closest_parallel_surface_distance: Some(0.01),
            closest_normal_surface_distance: Some(0.01),
        }
    }

    #[test]
    fn every_model_returns_factor_at_least_one() {
        let gap = sample_gap(crate::model::core::CoreGapType::Subtractive);
        for name in [
            FringingFactorModelName::Zhang,
            FringingFactorModelName::McLyman,
            FringingFactorModelName::Partridge,
            FringingFactorModelName::Muehlethaler,
            FringingFactorModelName::Classic,
            FringingFactorModelName::Balakrishnan,
            FringingFactorModelName::EffectiveArea,
            FringingFactorModelName::Stenglein,
        ] {
            let model: FringingFactorModelEnum = name.into();
            let factor = model.fringing_factor(&gap, 1e-4, 100_000.0).unwrap();
            assert!(factor >= 1.0, "{name:?} returned {factor}");
        }
    }

    #[test]
    fn distributed_gap_clamps_into_range() {
        let gap = sample_gap(crate::model::core::CoreGapType::Distributed);
        let model: FringingFactorModelEnum = FringingFactorModelName::Zhang.into();
        let factor = model.fringing_factor(&gap, 1e-6, 100_000.0).unwrap();
        assert!(factor >= crate::constants::MINIMUM_DISTRIBUTED_FRINGING_FACTOR);
        assert!(factor <= crate::constants::MAXIMUM_DISTRIBUTED_FRINGING_FACTOR);
    }

    #[test]
    fn missing_surface_distances_is_an_error() {
        let mut gap = sample_gap(crate::model::core::CoreGapType::Subtractive);
        gap.closest_parallel_surface_distance = None;
        let model: FringingFactorModelEnum = FringingFactorModelName::Zhang.into();
        assert!(model.fringing_factor(&gap, 1e-4, 100_000.0).is_err());
    }
}
