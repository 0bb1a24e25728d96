//! Reluctance and gap models (§4.6, component F).

pub mod fringing;
pub mod geometry;

use crate::error::Result;
use crate::model::core::{Core, CoreGapType};
use crate::permeability::initial_permeability;
use crate::settings::Settings;

use fringing::FringingFactorModelEnum;

/// Reluctance of a column segment without any gap: `l_e / (μ₀·μᵢ·A_e)`
/// (§4.6).
#[must_use]
pub fn column_reluctance(effective_length: f64, relative_permeability: f64, effective_area: f64) -> f64 {
    effective_length / (crate::constants::VACUUM_PERMEABILITY * relative_permeability * effective_area)
}

/// Reluctance contributed by a single gap: `g / (μ₀·F·A_g)` (§4.6).
///
/// # Errors
/// Propagates the selected fringing model's errors.
pub fn gap_reluctance(
    core: &Core,
    gap: &crate::model::core::CoreGap,
    effective_area: f64,
    frequency: f64,
    settings: &Settings,
) -> Result<f64> {
    let model: FringingFactorModelEnum = settings.reluctance_model.into();
    let area = gap.area.unwrap_or(effective_area);
    let factor = model.fringing_factor(gap, effective_area, frequency)?;
    let _ = core;
    Ok(gap.length / (crate::constants::VACUUM_PERMEABILITY * factor * area))
}

/// Total magnetic-circuit reluctance: central column plus every gap in
/// series (§4.6). Lateral-leg contributions, when the shape family has a
/// separate return path, are added by [`geometry::process_core_data`] into
/// the core's effective parameters before this is called, so this function
/// only sums the central-column path.
///
/// # Errors
/// Returns [`crate::error::Error::NotProcessed`] if the core has not been
/// processed, or propagates [`gap_reluctance`] errors.
pub fn total_reluctance(core: &Core, temperature: f64, frequency: f64, settings: &Settings) -> Result<f64> {
    let processed = core.processed()?;
    let relative_permeability = initial_permeability(&core.material, temperature, 0.0, frequency)?;
    let residual_gaps: Vec<_> = core.gapping.iter().filter(|g| g.gap_type == CoreGapType::Residual).collect();
    let non_residual_gaps: Vec<_> = core.gapping.iter().filter(|g| g.gap_type != CoreGapType::Residual).collect();

    let ungapped_length = processed.effective_parameters.effective_length
        - core.gapping.iter().map(|g| g.length).sum::<f64>();
    let mut total = column_reluctance(ungapped_length.max(0.0), relative_permeability, processed.effective_parameters.effective_area);

    for gap in residual_gaps.into_iter().chain(non_residual_gaps) {
        total += gap_reluctance(core, gap, processed.effective_parameters.effective_area, frequency, settings)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_reluctance_scales_inversely_with_area() {
        let wide = column_reluctance(0.05, 2000.0, 1e-4);
        let narrow = column_reluctance(0.05, 2000.0, 5e-5);
        assert!(narrow > wide);
    }
}
