//! Initial-permeability model (§4.5, component E): `μᵢ(material, T?, H_dc?,
//! f?)` as the product of independent temperature/DC-bias/frequency
//! factors.

use crate::error::Result;
use crate::model::core::CoreMaterial;
use crate::numeric::interpolate::linear_interpolate;
use crate::numeric::root_find::find_root_expanding;

/// Evaluates the temperature-dependence factor at `temperature`, 1.0 if the
/// material declares no temperature dependency.
///
/// # Errors
/// Propagates interpolation errors from the tabulated fallback path.
pub fn temperature_factor(material: &CoreMaterial, temperature: f64) -> Result<f64> {
    if let Some([a, b, c, d, e]) = material.permeability.temperature_polynomial {
        let t = temperature;
        return Ok(a + b * t + c * t.powi(2) + d * t.powi(3) + e * t.powi(4));
    }
    if let Some(table) = &material.permeability.temperature_table {
        let x: Vec<f64> = table.iter().map(|(t, _)| *t).collect();
        let y: Vec<f64> = table.iter().map(|(_, factor)| *factor).collect();
        return linear_interpolate(&x, &y, temperature);
    }
    Ok(1.0)
}

/// Evaluates the DC-bias factor at `h_dc` (A/m), 1.0 if the material
/// declares no DC-bias dependency.
///
/// # Errors
/// Propagates interpolation errors from the tabulated fallback path.
pub fn dc_bias_factor(material: &CoreMaterial, h_dc: f64) -> Result<f64> {
    if let Some((a, b, c)) = material.permeability.dc_bias_coefficients {
        return Ok(1.0 / (1.0 + a * h_dc.powf(c)).powf(b));
    }
    if let Some(table) = &material.permeability.dc_bias_table {
        let x: Vec<f64> = table.iter().map(|(h, _)| *h).collect();
        let y: Vec<f64> = table.iter().map(|(_, factor)| *factor).collect();
        return linear_interpolate(&x, &y, h_dc);
    }
    Ok(1.0)
}

/// Evaluates the frequency-dependence factor at `frequency` (Hz), 1.0 if the
/// material declares no frequency dependency.
///
/// # Errors
/// Propagates interpolation errors from the tabulated fallback path.
pub fn frequency_factor(material: &CoreMaterial, frequency: f64) -> Result<f64> {
    if let Some(coefficients) = &material.permeability.frequency_polynomial {
        return Ok(coefficients.iter().enumerate().map(|(power, c)| c * frequency.powi(power as i32)).sum());
    }
    if let Some(table) = &material.permeability.frequency_table {
        let x: Vec<f64> = table.iter().map(|(f, _)| *f).collect();
        let y: Vec<f64> = table.iter().map(|(_, factor)| *factor).collect();
        return linear_interpolate(&x, &y, frequency);
    }
    Ok(1.0)
}

/// Whether the material's permeability data declares a temperature
/// dependency.
#[must_use]
pub fn has_temperature_dependency(material: &CoreMaterial) -> bool {
    material.permeability.temperature_polynomial.is_some() || material.permeability.temperature_table.is_some()
}

/// Whether the material's permeability data declares a DC-bias dependency.
#[must_use]
pub fn has_dc_bias_dependency(material: &CoreMaterial) -> bool {
    material.permeability.dc_bias_coefficients.is_some() || material.permeability.dc_bias_table.is_some()
}

/// Whether the material's permeability data declares a frequency
/// dependency.
#[must_use]
pub fn has_frequency_dependency(material: &CoreMaterial) -> bool {
    material.permeability.frequency_polynomial.is_some() || material.permeability.frequency_table.is_some()
}

/// `μᵢ(material, T, H_dc, f)`: the product of the three independent
/// factors, scaled by the material's reference value (§4.5).
///
/// # Errors
/// Propagates errors from any of the three factor functions.
pub fn initial_permeability(material: &CoreMaterial, temperature: f64, h_dc: f64, frequency: f64) -> Result<f64> {
    let reference = material.permeability.reference_value;
    Ok(reference * temperature_factor(material, temperature)? * dc_bias_factor(material, h_dc)? * frequency_factor(material, frequency)?)
}

/// Finds the smallest frequency at which `μᵢ(f)/μᵢ(0) <= 1 - p` (§4.5),
/// bracketing from 1 Hz upward.
///
/// # Errors
/// Propagates [`find_root_expanding`] errors if no such frequency is
/// bracketable.
pub fn calculate_frequency_for_initial_permeability_drop(material: &CoreMaterial, p: f64) -> Result<f64> {
    let reference_ratio = frequency_factor(material, 0.0)?;
    find_root_expanding("initial permeability frequency drop", 1.0, 1_000.0, |frequency| {
        frequency_factor(material, frequency).unwrap_or(reference_ratio) / reference_ratio - (1.0 - p)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::core::{CoreMaterial, MaterialFamily, PermeabilityData, SaturationPoint};
    use std::collections::BTreeMap;

    fn material_with_frequency_rolloff() -> CoreMaterial {
        CoreMaterial {
            name: "test".to_string(),
            family: MaterialFamily::Ferrite,
            manufacturer: "test".to_string(),
            saturation: vec![SaturationPoint { magnetic_flux_density: 0.4, magnetic_field: 300.0, temperature: 100.0 }],
            permeability: PermeabilityData {
                reference_value: 3000.0,
                temperature_polynomial: None,
                temperature_table: None,
                dc_bias_coefficients: None,
                dc_bias_table: None,
                frequency_polynomial: None,
                frequency_table: Some(vec![(0.0, 1.0), (100_000.0, 0.9), (1_000_000.0, 0.5)]),
                tolerance: None,
            },
            volumetric_losses: BTreeMap::new(),
            mass_losses: None,
            density: None,
            resistivity: vec![],
            curie_temperature: None,
            remanence: None,
            coercive_force: None,
            preferred_core_losses_model: None,
            roshen_coefficients: None,
            proprietary_formula: None,
        }
    }

    #[test]
    fn no_dependency_returns_unity_factor() {
        let material = material_with_frequency_rolloff();
        assert_eq!(temperature_factor(&material, 80.0).unwrap(), 1.0);
        assert!(!has_temperature_dependency(&material));
    }

    #[test]
    fn frequency_dependency_is_detected_and_interpolated() {
        let material = material_with_frequency_rolloff();
        assert!(has_frequency_dependency(&material));
        let factor = frequency_factor(&material, 550_000.0).unwrap();
        assert!(factor > 0.5 && factor < 0.9);
    }

    #[test]
    fn initial_permeability_scales_reference_by_all_factors() {
        let material = material_with_frequency_rolloff();
        let mu = initial_permeability(&material, 25.0, 0.0, 0.0).unwrap();
        assert_eq!(mu, 3000.0);
    }
}
