//! Winding ohmic and effective-resistance losses (§4.9, component I).

use num_complex::Complex64;

use crate::catalogue::WireMaterial;
use crate::error::{Error, Result};
use crate::model::coil::Coil;
use crate::model::mas::WindingLossesOutput;
use crate::model::requirement::OperatingPoint;
use crate::model::wire::Wire;
use crate::numeric::special::kelvin_ber_bei_prime;

/// DC resistance per metre of conductor length: `ρ(T) / A_conducting`
/// (§4.9).
///
/// # Errors
/// Propagates [`Wire::conducting_area`] errors.
pub fn dc_resistance_per_meter(wire: &Wire, wire_material: &WireMaterial, temperature: f64) -> Result<f64> {
    let rho = resistivity_at(wire_material, temperature);
    Ok(rho / wire.conducting_area()?)
}

fn resistivity_at(wire_material: &WireMaterial, temperature: f64) -> f64 {
    wire_material.resistivity_20c * (1.0 + wire_material.temperature_coefficient * (temperature - 20.0))
}

/// Classical skin-effect effective conducting area for a round wire,
/// derived from the §4.1 Kelvin functions: `A_eff = A_dc / (1 + skin
/// correction)`, where the correction is built from `ber'`/`bei'` evaluated
/// at the normalized radius `q = r·√2/δ` (§4.9).
///
/// # Errors
/// Propagates [`kelvin_ber_bei_prime`] errors.
pub fn skin_effect_area(wire: &Wire, wire_material: &WireMaterial, frequency: f64, temperature: f64) -> Result<f64> {
    if frequency <= 0.0 {
        return wire.conducting_area();
    }
    let rho = resistivity_at(wire_material, temperature);
    let skin_depth = (rho / (std::f64::consts::PI * frequency * crate::constants::VACUUM_PERMEABILITY)).sqrt();
    let radius = wire.effective_conducting_diameter()? / 2.0;
    let q = radius * std::f64::consts::SQRT_2 / skin_depth;
    let (ber_prime, bei_prime) = kelvin_ber_bei_prime(0.0, q)?;
    let magnitude = (ber_prime.powi(2) + bei_prime.powi(2)).sqrt();
    let resistance_ratio = (q / 2.0) * magnitude;
    let dc_area = wire.conducting_area()?;
    Ok(dc_area / resistance_ratio.max(1.0))
}

/// `Effective resistance per metre (wire, f, T)` (§4.9).
///
/// # Errors
/// Propagates [`skin_effect_area`] errors.
pub fn effective_resistance_per_meter(wire: &Wire, wire_material: &WireMaterial, frequency: f64, temperature: f64) -> Result<f64> {
    let rho = resistivity_at(wire_material, temperature);
    let area = skin_effect_area(wire, wire_material, frequency, temperature)?;
    Ok(rho / area)
}

/// `calculate_ohmic_losses(Coil, OP, T)` (§4.9): per-winding DC and
/// effective-resistance losses, with parallels combined as conductances.
///
/// # Errors
/// Returns [`Error::NotProcessed`] if the coil has no turn geometry;
/// propagates resistance-calculation errors.
pub fn calculate_ohmic_losses(
    coil: &Coil,
    operating_point: &OperatingPoint,
    wire_material: &WireMaterial,
    temperature: f64,
) -> Result<Vec<WindingLossesOutput>> {
    let mut outputs = Vec::with_capacity(coil.number_windings());
    for (winding_index, winding) in coil.functional_description.iter().enumerate() {
        let turns = coil
            .turns_of_winding(winding_index)
            .map_err(|_| Error::NotProcessed("coil has no turn geometry for ohmic-losses calculation".to_string()))?;
        if turns.is_empty() {
            return Err(Error::NotProcessed(format!("winding {winding_index} has no physical turns")));
        }
        let length: f64 = turns.iter().map(|turn| turn.length).sum();
        let frequency = operating_point
            .excitations_per_winding
            .get(winding_index)
            .map(|excitation| excitation.frequency)
            .unwrap_or(0.0);

        let r_dc_per_meter = dc_resistance_per_meter(&winding.wire, wire_material, temperature)?;
        let r_ac_per_meter = effective_resistance_per_meter(&winding.wire, wire_material, frequency, temperature)?;
        let r_dc_series = r_dc_per_meter * length;
        let r_ac_series = r_ac_per_meter * length;

        let parallels = f64::from(winding.number_parallels).max(1.0);
        let r_dc_total = r_dc_series / parallels;
        let r_ac_total = r_ac_series / parallels;

        let current_rms = operating_point
            .excitations_per_winding
            .get(winding_index)
            .and_then(|excitation| excitation.current.as_ref())
            .and_then(|signal| signal.processed.as_ref())
            .map(|processed| processed.rms)
            .unwrap_or(0.0);

        let ohmic_losses = current_rms.powi(2) * r_dc_total;
        let total_ac_losses = current_rms.powi(2) * r_ac_total;
        let resistance_factor = if r_dc_total > 0.0 { r_ac_total / r_dc_total } else { 1.0 };

        outputs.push(WindingLossesOutput {
            ohmic_losses,
            skin_effect_losses: (total_ac_losses - ohmic_losses).max(0.0),
            proximity_effect_losses: 0.0,
            resistance_factor,
        });
    }
    Ok(outputs)
}

/// The per-turn current-divider ratio within one parallel group: `R_parallel
/// / R_series_of_that_parallel` (§4.9). With all parallels built from
/// identical wire, this reduces to `1 / number_parallels`.
#[must_use]
pub fn current_divider_ratio(number_parallels: u32) -> f64 {
    1.0 / f64::from(number_parallels.max(1))
}

/// Evaluates the complex skin-effect impedance ratio directly from the
/// Kelvin functions, exposed for the Dowell/proximity extension (§4.9) to
/// build on without re-deriving `q`.
///
/// # Errors
/// Propagates [`kelvin_ber_bei_prime`] errors.
pub fn skin_effect_impedance_ratio(q: f64) -> Result<Complex64> {
    let (ber_prime, bei_prime) = kelvin_ber_bei_prime(0.0, q)?;
    Ok(Complex64::new(ber_prime, bei_prime) * Complex64::new(0.0, q / 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::wire::Coating;

    fn copper() -> WireMaterial {
        WireMaterial { name: "copper".to_string(), resistivity_20c: 1.724e-8, temperature_coefficient: 0.00393 }
    }

    #[test]
    fn dc_resistance_increases_with_temperature() {
        let wire = Wire::Round { conducting_diameter: 0.0005, outer_diameter: 0.00055, coating: Coating::Bare };
        let cold = dc_resistance_per_meter(&wire, &copper(), 20.0).unwrap();
        let hot = dc_resistance_per_meter(&wire, &copper(), 100.0).unwrap();
        assert!(hot > cold);
    }

    #[test]
    fn skin_effect_area_shrinks_at_high_frequency() {
        let wire = Wire::Round { conducting_diameter: 0.001, outer_diameter: 0.0011, coating: Coating::Bare };
        let dc_area = wire.conducting_area().unwrap();
        let high_frequency_area = skin_effect_area(&wire, &copper(), 1_000_000.0, 20.0).unwrap();
        assert!(high_frequency_area <= dc_area);
    }

    #[test]
    fn current_divider_ratio_is_reciprocal_of_parallels() {
        assert!((current_divider_ratio(4) - 0.25).abs() < 1e-12);
    }
}
