//! Core surface-temperature estimation from thermal resistance (§4.10,
//! component I's `OperatingPointOutput.temperature`).

use crate::model::core::Core;

/// Empirical ferrite-core thermal resistance fit, `R_th ≈ 53·Ve(cm³)^-0.54`
/// (°C/W), matching the order of magnitude of Ferroxcube's published
/// natural-convection thermal-resistance curves across their E/ETD/PQ/RM
/// range. `original_source/src/physical_models/Temperature.h` declares
/// `calculate_temperature_from_core_thermal_resistance` but its body was not
/// part of the retrieved sources, so this closed form is an explicit
/// decision (see DESIGN.md) rather than a direct port.
#[must_use]
pub fn thermal_resistance_from_volume(effective_volume: f64) -> f64 {
    let volume_cm3 = (effective_volume * 1.0e6).max(1.0e-3);
    53.0 * volume_cm3.powf(-0.54)
}

/// `calculate_temperature_from_core_thermal_resistance(R_th, total_losses)`:
/// surface/hot-spot temperature as ambient plus the thermal-resistance
/// voltage-divider analogue `R_th · P_total`.
#[must_use]
pub fn calculate_temperature_from_core_thermal_resistance(
    ambient_temperature: f64,
    thermal_resistance: f64,
    total_losses: f64,
) -> f64 {
    ambient_temperature + thermal_resistance * total_losses
}

/// Overload taking a [`Core`] directly: derives `R_th` from the core's
/// processed effective volume (§4.10).
///
/// # Errors
/// Propagates [`Core::processed`] if the core has not been geometry-processed.
pub fn calculate_temperature_from_core(core: &Core, ambient_temperature: f64, total_losses: f64) -> crate::error::Result<f64> {
    let effective_volume = core.processed()?.effective_parameters.effective_volume;
    let thermal_resistance = thermal_resistance_from_volume(effective_volume);
    Ok(calculate_temperature_from_core_thermal_resistance(ambient_temperature, thermal_resistance, total_losses))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thermal_resistance_decreases_with_volume() {
        let small = thermal_resistance_from_volume(1.0e-6);
        let large = thermal_resistance_from_volume(1.0e-4);
        assert!(large < small);
    }

    #[test]
    fn temperature_rises_with_losses() {
        let cold = calculate_temperature_from_core_thermal_resistance(25.0, 10.0, 0.1);
        let hot = calculate_temperature_from_core_thermal_resistance(25.0, 10.0, 1.0);
        assert!(hot > cold);
        assert!((cold - 26.0).abs() < 1e-9);
    }
}
