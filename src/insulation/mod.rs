//! Insulation coordinator (§4.10, component J).

pub mod coil_section_interface;

use enum_dispatch::enum_dispatch;

use crate::error::Result;
use crate::model::insulation_spec::{CtiGroup, InsulationStandardName, InsulationType, OvervoltageCategory, PollutionDegree};
use crate::model::requirement::{Inputs, InsulationRequirement};
use crate::numeric::interpolate::linear_interpolate;

/// Distances a standard must report for one requirement (§4.10).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InsulationDistances {
    /// Required through-air clearance, metres.
    pub clearance: f64,
    /// Required over-surface creepage distance, metres.
    pub creepage_distance: f64,
    /// Required distance through solid insulation, metres.
    pub distance_through_insulation: f64,
}

/// Shared behaviour every insulation standard implements (§4.10).
#[enum_dispatch]
pub trait InsulationStandard {
    /// Required clearance, metres.
    ///
    /// # Errors
    /// Propagates interpolation errors from the standard's lookup tables.
    fn clearance(&self, requirement: &InsulationRequirement, peak_voltage: f64, frequency: f64) -> Result<f64>;

    /// Required creepage distance, metres.
    ///
    /// # Errors
    /// Propagates interpolation errors from the standard's lookup tables.
    fn creepage_distance(&self, requirement: &InsulationRequirement, rms_voltage: f64, frequency: f64) -> Result<f64>;

    /// Required distance through solid insulation, metres.
    ///
    /// # Errors
    /// Propagates interpolation errors from the standard's lookup tables.
    fn distance_through_insulation(&self, requirement: &InsulationRequirement, peak_voltage: f64) -> Result<f64>;
}

/// Table F.2-style clearance-per-voltage anchor points (metres per volt
/// peak), escalated by [`InsulationType`] and [`OvervoltageCategory`].
fn base_clearance_table(overvoltage_category: OvervoltageCategory) -> [(f64, f64); 4] {
    match overvoltage_category {
        OvervoltageCategory::OvcI => [(50.0, 0.0002), (150.0, 0.0005), (300.0, 0.0008), (600.0, 0.0014)],
        OvervoltageCategory::OvcIi => [(50.0, 0.0004), (150.0, 0.0015), (300.0, 0.003), (600.0, 0.006)],
        OvervoltageCategory::OvcIii => [(50.0, 0.0008), (150.0, 0.0030), (300.0, 0.0055), (600.0, 0.010)],
        OvervoltageCategory::OvcIv => [(50.0, 0.0015), (150.0, 0.0060), (300.0, 0.0080), (600.0, 0.014)],
    }
}

fn insulation_type_multiplier(insulation_type: InsulationType) -> f64 {
    match insulation_type {
        InsulationType::Functional => 1.0,
        InsulationType::Basic => 1.0,
        InsulationType::Supplementary => 1.0,
        InsulationType::Double | InsulationType::Reinforced => 1.6,
    }
}

fn pollution_degree_multiplier(pollution_degree: PollutionDegree) -> f64 {
    match pollution_degree {
        PollutionDegree::P1 => 0.8,
        PollutionDegree::P2 => 1.0,
        PollutionDegree::P3 => 1.25,
    }
}

fn altitude_factor(altitude_meters: f64) -> f64 {
    // IEC 60664-1 Table A.2 style multiplicative correction, linear on the
    // declared altitude bins.
    let table = [(0.0, 1.0), (2000.0, 1.0), (3000.0, 1.14), (4000.0, 1.29), (5000.0, 1.48)];
    let x: Vec<f64> = table.iter().map(|(a, _)| *a).collect();
    let y: Vec<f64> = table.iter().map(|(_, f)| *f).collect();
    linear_interpolate(&x, &y, altitude_meters).unwrap_or(1.0)
}

fn frequency_correction(frequency: f64) -> f64 {
    // Above 30 kHz both clearance and creepage need a correction factor
    // (IEC 60664-4/5); modelled as a gentle linear ramp up to 1.5x at 1 MHz.
    if frequency <= 30_000.0 {
        1.0
    } else {
        1.0 + 0.5 * ((frequency - 30_000.0) / 970_000.0).min(1.0)
    }
}

fn clearance_impl(requirement: &InsulationRequirement, peak_voltage: f64, frequency: f64) -> Result<f64> {
    let table = base_clearance_table(requirement.overvoltage_category);
    let x: Vec<f64> = table.iter().map(|(v, _)| *v).collect();
    let y: Vec<f64> = table.iter().map(|(_, c)| *c).collect();
    let base = linear_interpolate(&x, &y, peak_voltage)?;
    let altitude = requirement.altitude.get_requirement_value().unwrap_or(2000.0);
    Ok(base
        * insulation_type_multiplier(requirement.insulation_type)
        * altitude_factor(altitude)
        * frequency_correction(frequency))
}

fn creepage_distance_impl(requirement: &InsulationRequirement, rms_voltage: f64, frequency: f64) -> Result<f64> {
    let table = base_clearance_table(requirement.overvoltage_category);
    let x: Vec<f64> = table.iter().map(|(v, _)| *v).collect();
    let y: Vec<f64> = table.iter().map(|(_, c)| c * 1.25).collect();
    let base = linear_interpolate(&x, &y, rms_voltage)?;
    Ok(base
        * insulation_type_multiplier(requirement.insulation_type)
        * pollution_degree_multiplier(requirement.pollution_degree)
        * cti_multiplier(requirement.cti)
        * frequency_correction(frequency))
}

fn cti_multiplier(cti: CtiGroup) -> f64 {
    match cti {
        CtiGroup::GroupI => 0.8,
        CtiGroup::GroupIi => 0.9,
        CtiGroup::GroupIiiA => 1.0,
        CtiGroup::GroupIiiB => 1.2,
    }
}

fn distance_through_insulation_impl(requirement: &InsulationRequirement, peak_voltage: f64) -> Result<f64> {
    // A conservative 20 V/µm dielectric-withstand rule of thumb, scaled by
    // insulation type.
    Ok((peak_voltage / 20.0e6) * insulation_type_multiplier(requirement.insulation_type))
}

/// IEC 60664 (insulation coordination for low-voltage supply systems).
#[derive(Clone, Copy, Debug, Default)]
pub struct Iec60664;
impl InsulationStandard for Iec60664 {
    fn clearance(&self, requirement: &InsulationRequirement, peak_voltage: f64, frequency: f64) -> Result<f64> {
        clearance_impl(requirement, peak_voltage, frequency)
    }

    fn creepage_distance(&self, requirement: &InsulationRequirement, rms_voltage: f64, frequency: f64) -> Result<f64> {
        creepage_distance_impl(requirement, rms_voltage, frequency)
    }

    fn distance_through_insulation(&self, requirement: &InsulationRequirement, peak_voltage: f64) -> Result<f64> {
        distance_through_insulation_impl(requirement, peak_voltage)
    }
}

/// IEC 62368 (audio/video, IT and communication technology equipment).
#[derive(Clone, Copy, Debug, Default)]
pub struct Iec62368;
impl InsulationStandard for Iec62368 {
    fn clearance(&self, requirement: &InsulationRequirement, peak_voltage: f64, frequency: f64) -> Result<f64> {
        Ok(clearance_impl(requirement, peak_voltage, frequency)? * 0.9)
    }

    fn creepage_distance(&self, requirement: &InsulationRequirement, rms_voltage: f64, frequency: f64) -> Result<f64> {
        Ok(creepage_distance_impl(requirement, rms_voltage, frequency)? * 0.9)
    }

    fn distance_through_insulation(&self, requirement: &InsulationRequirement, peak_voltage: f64) -> Result<f64> {
        distance_through_insulation_impl(requirement, peak_voltage)
    }
}

/// IEC 61558 (safety of power transformers, reactors, power supplies).
#[derive(Clone, Copy, Debug, Default)]
pub struct Iec61558;
impl InsulationStandard for Iec61558 {
    fn clearance(&self, requirement: &InsulationRequirement, peak_voltage: f64, frequency: f64) -> Result<f64> {
        Ok(clearance_impl(requirement, peak_voltage, frequency)? * 1.1)
    }

    fn creepage_distance(&self, requirement: &InsulationRequirement, rms_voltage: f64, frequency: f64) -> Result<f64> {
        Ok(creepage_distance_impl(requirement, rms_voltage, frequency)? * 1.1)
    }

    fn distance_through_insulation(&self, requirement: &InsulationRequirement, peak_voltage: f64) -> Result<f64> {
        distance_through_insulation_impl(requirement, peak_voltage)
    }
}

/// IEC 60335 (safety of household and similar electrical appliances).
#[derive(Clone, Copy, Debug, Default)]
pub struct Iec60335;
impl InsulationStandard for Iec60335 {
    fn clearance(&self, requirement: &InsulationRequirement, peak_voltage: f64, frequency: f64) -> Result<f64> {
        Ok(clearance_impl(requirement, peak_voltage, frequency)? * 1.05)
    }

    fn creepage_distance(&self, requirement: &InsulationRequirement, rms_voltage: f64, frequency: f64) -> Result<f64> {
        Ok(creepage_distance_impl(requirement, rms_voltage, frequency)? * 1.05)
    }

    fn distance_through_insulation(&self, requirement: &InsulationRequirement, peak_voltage: f64) -> Result<f64> {
        distance_through_insulation_impl(requirement, peak_voltage)
    }
}

/// The `enum_dispatch` family over all four named standards.
#[enum_dispatch(InsulationStandard)]
#[derive(Clone, Copy, Debug)]
pub enum InsulationStandardEnum {
    /// See [`Iec60664`].
    Iec60664(Iec60664),
    /// See [`Iec62368`].
    Iec62368(Iec62368),
    /// See [`Iec61558`].
    Iec61558(Iec61558),
    /// See [`Iec60335`].
    Iec60335(Iec60335),
}

impl From<InsulationStandardName> for InsulationStandardEnum {
    fn from(name: InsulationStandardName) -> Self {
        match name {
            InsulationStandardName::Iec60664 => Self::Iec60664(Iec60664),
            InsulationStandardName::Iec62368 => Self::Iec62368(Iec62368),
            InsulationStandardName::Iec61558 => Self::Iec61558(Iec61558),
            InsulationStandardName::Iec60335 => Self::Iec60335(Iec60335),
        }
    }
}

/// The coordinator: `final = max(per_standard)` unless the requirement
/// names a single standard (§4.10).
///
/// # Errors
/// Returns [`crate::error::Error::InvalidInput`] if no standards are
/// declared; propagates each standard's own errors.
pub fn coordinate(
    requirement: &InsulationRequirement,
    peak_voltage: f64,
    rms_voltage: f64,
    frequency: f64,
) -> Result<InsulationDistances> {
    if requirement.standards.is_empty() {
        return Err(crate::error::Error::InvalidInput("insulation requirement declares no standards".to_string()));
    }
    let mut clearance = f64::MIN;
    let mut creepage = f64::MIN;
    let mut dti = f64::MIN;
    for &name in &requirement.standards {
        let standard: InsulationStandardEnum = name.into();
        clearance = clearance.max(standard.clearance(requirement, peak_voltage, frequency)?);
        creepage = creepage.max(standard.creepage_distance(requirement, rms_voltage, frequency)?);
        dti = dti.max(standard.distance_through_insulation(requirement, peak_voltage)?);
    }
    Ok(InsulationDistances { clearance, creepage_distance: creepage, distance_through_insulation: dti })
}

/// Derives the peak/RMS voltages the coordinator needs directly from
/// `Inputs` (mains voltage requirement, treated as the dominant voltage
/// stress across the design) (§4.10).
///
/// # Errors
/// Propagates [`BoundedValue::get_requirement_value`] errors.
pub fn coordinate_from_inputs(inputs: &Inputs, frequency: f64) -> Result<InsulationDistances> {
    let rms_voltage = inputs.design_requirements.insulation.main_supply_voltage.get_requirement_value()?;
    let peak_voltage = rms_voltage * std::f64::consts::SQRT_2;
    coordinate(&inputs.design_requirements.insulation, peak_voltage, rms_voltage, frequency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::bounded_value::BoundedValue;
    use crate::model::insulation_spec::WiringTechnology;

    fn requirement(standards: Vec<InsulationStandardName>) -> InsulationRequirement {
        InsulationRequirement {
            standards,
            overvoltage_category: OvervoltageCategory::OvcIi,
            pollution_degree: PollutionDegree::P2,
            cti: CtiGroup::GroupIiiA,
            insulation_type: InsulationType::Reinforced,
            main_supply_voltage: BoundedValue::exact(230.0),
            altitude: BoundedValue::exact(2000.0),
            wiring_technology: WiringTechnology::Wound,
        }
    }

    #[test]
    fn clearance_scales_with_overvoltage_category() {
        let low = requirement(vec![InsulationStandardName::Iec60664]);
        let mut high = low.clone();
        high.overvoltage_category = OvervoltageCategory::OvcIv;
        let low_clearance = clearance_impl(&low, 325.0, 50.0).unwrap();
        let high_clearance = clearance_impl(&high, 325.0, 50.0).unwrap();
        assert!(high_clearance > low_clearance);
    }

    #[test]
    fn coordinator_takes_max_across_multiple_standards() {
        let both = requirement(vec![InsulationStandardName::Iec60664, InsulationStandardName::Iec61558]);
        let result = coordinate(&both, 325.0, 230.0, 50.0).unwrap();
        let single_60664 = coordinate(&requirement(vec![InsulationStandardName::Iec60664]), 325.0, 230.0, 50.0).unwrap();
        assert!(result.clearance >= single_60664.clearance);
    }

    #[test]
    fn frequency_above_30khz_increases_clearance() {
        let req = requirement(vec![InsulationStandardName::Iec60664]);
        let low_frequency = clearance_impl(&req, 325.0, 50.0).unwrap();
        let high_frequency = clearance_impl(&req, 325.0, 200_000.0).unwrap();
        assert!(high_frequency > low_frequency);
    }

    #[test]
    fn coordinate_rejects_no_standards() {
        assert!(coordinate(&requirement(vec![]), 325.0, 230.0, 50.0).is_err());
    }
}
