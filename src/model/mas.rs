//! [`Mas`]: the top-level bundle of inputs, a magnetic design and its
//! computed outputs (§3) — the engine's unit of exchange between
//! components.

use serde::{Deserialize, Serialize};

use crate::catalogue::WireMaterial;
use crate::error::Result;
use crate::model::magnetic::Magnetic;
use crate::model::requirement::Inputs;
use crate::settings::Settings;
use crate::signal::waveform::Processed;

/// Core-losses breakdown for one operating point (§4.9).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct CoreLossesOutput {
    /// Total core losses, watts.
    pub total: f64,
    /// Hysteresis-loss component, watts, when the model separates it.
    pub hysteresis: Option<f64>,
    /// Eddy-current component, watts, when the model separates it.
    pub eddy_current: Option<f64>,
    /// Peak flux density reached, Tesla.
    pub magnetic_flux_density_peak: f64,
}

/// Winding-losses breakdown for one winding at one operating point (§4.9).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct WindingLossesOutput {
    /// DC ohmic losses, watts.
    pub ohmic_losses: f64,
    /// Additional skin-effect losses, watts.
    pub skin_effect_losses: f64,
    /// Additional proximity-effect losses, watts.
    pub proximity_effect_losses: f64,
    /// Effective AC resistance factor (`R_ac / R_dc`).
    pub resistance_factor: f64,
}

/// Outputs computed for one operating point (§4).
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OperatingPointOutput {
    /// Resolved magnetizing inductance, henries.
    pub magnetizing_inductance: Option<f64>,
    /// Core losses.
    pub core_losses: Option<CoreLossesOutput>,
    /// Winding losses, one entry per winding.
    pub winding_losses: Vec<WindingLossesOutput>,
    /// Estimated core surface/hot-spot temperature, °C.
    pub temperature: Option<f64>,
    /// Processed excitation waveform per winding, after standardization.
    pub processed_excitations: Vec<Processed>,
    /// Impedance magnitude at the excitation frequency, ohms, for
    /// filter-choke evaluation.
    pub impedance: Option<f64>,
}

/// The top-level exchange format (§3): requirements, a concrete magnetic
/// design, and the outputs computed against each operating point.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Mas {
    /// Inputs the design was produced or evaluated against.
    pub inputs: Inputs,
    /// The magnetic design.
    pub magnetic: Magnetic,
    /// Outputs, one entry per `inputs.operating_points`, in the same order.
    pub outputs: Vec<OperatingPointOutput>,
}

impl Mas {
    /// Builds a `Mas` with empty (not-yet-computed) outputs for every
    /// declared operating point.
    #[must_use]
    pub fn new(inputs: Inputs, magnetic: Magnetic) -> Self {
        let outputs = inputs.operating_points.iter().map(|_| OperatingPointOutput::default()).collect();
        Self { inputs, magnetic, outputs }
    }

    /// Computes and fills `self.outputs`, one entry per declared operating
    /// point: core losses, winding losses, magnetizing inductance,
    /// temperature rise and impedance (§4, §4.8, §4.9, §4.10).
    ///
    /// # Errors
    /// Propagates errors from the core-losses, winding-losses, inductance
    /// and temperature calculations for any operating point that cannot be
    /// evaluated (e.g. missing processed excitation data).
    pub fn evaluate(&mut self, wire_material: &WireMaterial, settings: &Settings) -> Result<()> {
        let mut outputs = Vec::with_capacity(self.inputs.operating_points.len());
        for operating_point in &self.inputs.operating_points {
            let ambient_temperature = operating_point.conditions.ambient_temperature;
            let primary_excitation = operating_point.excitations_per_winding.first();

            let core_losses = primary_excitation
                .map(|excitation| {
                    crate::core_losses::core_losses(
                        &self.magnetic.core,
                        excitation,
                        ambient_temperature,
                        &settings.core_losses_model_names,
                    )
                })
                .transpose()?;

            let winding_losses = crate::winding_losses::calculate_ohmic_losses(
                &self.magnetic.coil,
                operating_point,
                wire_material,
                ambient_temperature,
            )?;

            let frequency = primary_excitation.map_or(0.0, |excitation| excitation.frequency);
            let magnetizing_inductance = if frequency > 0.0 {
                crate::inductance::calculate_inductance(&self.magnetic.core, &self.magnetic.coil, ambient_temperature, frequency, settings)
                    .ok()
                    .and_then(|bound| bound.nominal)
            } else {
                None
            };

            let total_losses =
                core_losses.as_ref().map_or(0.0, |losses| losses.total)
                    + winding_losses.iter().map(|w| w.ohmic_losses + w.skin_effect_losses + w.proximity_effect_losses).sum::<f64>();

            let temperature =
                crate::temperature::calculate_temperature_from_core(&self.magnetic.core, ambient_temperature, total_losses).ok();

            let impedance = magnetizing_inductance.map(|inductance| std::f64::consts::TAU * frequency * inductance);

            let processed_excitations: Vec<Processed> = operating_point
                .excitations_per_winding
                .iter()
                .filter_map(|excitation| {
                    excitation
                        .current
                        .as_ref()
                        .or(excitation.magnetizing_current.as_ref())
                        .and_then(|signal| signal.processed.clone())
                })
                .collect();

            outputs.push(OperatingPointOutput {
                magnetizing_inductance,
                core_losses,
                winding_losses,
                temperature,
                processed_excitations,
                impedance,
            });
        }
        self.outputs = outputs;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::bobbin::{Bobbin, ColumnShape};
    use crate::model::coil::{Coil, CoilAlignment, WindingFunctionalDescription, WindingOrientation};
    use crate::model::core::{Core, CoreMaterial, CoreShape, CoreShapeFamily, CoreType, MagneticCircuit, MaterialFamily, PermeabilityData, SaturationPoint, WindingWindow};
    use crate::model::magnetic::{ManufacturerInfo, Magnetic};
    use crate::model::requirement::{Conditions, DesignRequirement, Inputs, IsolationSide, OperatingPoint, OperatingPointExcitation};
    use crate::model::insulation_spec::{CtiGroup, InsulationType, OvervoltageCategory, PollutionDegree, WiringTechnology};
    use crate::model::requirement::InsulationRequirement;
    use crate::model::bounded_value::BoundedValue;
    use crate::model::wire::{Coating, Wire};
    use std::collections::BTreeMap;

    fn sample_inputs() -> Inputs {
        Inputs {
            design_requirements: DesignRequirement {
                magnetizing_inductance: BoundedValue::exact(1e-3),
                turns_ratios: vec![],
                isolation_sides: vec![IsolationSide::Primary],
                insulation: InsulationRequirement {
                    standards: vec![],
                    overvoltage_category: OvervoltageCategory::OvcIi,
                    pollution_degree: PollutionDegree::P2,
                    cti: CtiGroup::GroupIiiA,
                    insulation_type: InsulationType::Basic,
                    main_supply_voltage: BoundedValue::exact(230.0),
                    altitude: BoundedValue::exact(2000.0),
                    wiring_technology: WiringTechnology::Wound,
                },
                maximum_dimensions: None,
                minimum_impedance: None,
            },
            operating_points: vec![OperatingPoint {
                conditions: Conditions { ambient_temperature: 25.0, cooling: None },
                excitations_per_winding: vec![OperatingPointExcitation { frequency: 100_000.0, ..Default::default() }],
            }],
        }
    }

    fn sample_magnetic() -> Magnetic {
        let shape = CoreShape {
            name: "ETD 29".to_string(),
            aliases: vec![],
            family: CoreShapeFamily::Etd,
            family_subtype: None,
            magnetic_circuit: MagneticCircuit::Open,
            dimensions: BTreeMap::new(),
        };
        let material = CoreMaterial {
            name: "3C97".to_string(),
            family: MaterialFamily::Ferrite,
            manufacturer: "Ferroxcube".to_string(),
            saturation: vec![SaturationPoint { magnetic_flux_density: 0.41, magnetic_field: 300.0, temperature: 100.0 }],
            permeability: PermeabilityData {
                reference_value: 3000.0,
                temperature_polynomial: None,
                temperature_table: None,
                dc_bias_coefficients: None,
                dc_bias_table: None,
                frequency_polynomial: None,
                frequency_table: None,
                tolerance: None,
            },
            volumetric_losses: BTreeMap::new(),
            mass_losses: None,
            density: None,
            resistivity: vec![],
            curie_temperature: Some(220.0),
            remanence: None,
            coercive_force: None,
            preferred_core_losses_model: None,
            roshen_coefficients: None,
            proprietary_formula: None,
        };
        let core = Core { core_type: CoreType::TwoPieceSet, shape, material, gapping: vec![], stacks: 1, processed: None, reference: None };
        let bobbin =
            Bobbin::quick_bobbin(&[WindingWindow { height: 0.01, width: 0.005, inner_radius: 0.002 }], ColumnShape::Round)
                .unwrap();
        let coil = Coil {
            bobbin,
            functional_description: vec![WindingFunctionalDescription {
                name: "primary".to_string(),
                isolation_side: IsolationSide::Primary,
                number_turns: 10,
                number_parallels: 1,
                wire: Wire::Round { conducting_diameter: 0.0005, outer_diameter: 0.00055, coating: Coating::Bare },
                orientation: WindingOrientation::Overlapping,
            }],
            alignment: CoilAlignment::InnerOrCenter,
            processed: None,
        };
        Magnetic { core, coil, manufacturer_info: ManufacturerInfo::default() }
    }

    #[test]
    fn new_seeds_one_empty_output_per_operating_point() {
        let mas = Mas::new(sample_inputs(), sample_magnetic());
        assert_eq!(mas.outputs.len(), 1);
        assert!(mas.outputs[0].core_losses.is_none());
    }

    fn wound_magnetic() -> Magnetic {
        use crate::model::core::SteinmetzRange;
        use crate::reluctance::geometry::process_core_data;

        let mut dimensions = BTreeMap::new();
        dimensions.insert("A".to_string(), 0.0294);
        dimensions.insert("B".to_string(), 0.0215);
        dimensions.insert("C".to_string(), 0.0225);
        dimensions.insert("D".to_string(), 0.0110);
        dimensions.insert("E".to_string(), 0.0155);
        dimensions.insert("F".to_string(), 0.0195);
        let shape = CoreShape {
            name: "ETD 29".to_string(),
            aliases: vec![],
            family: CoreShapeFamily::Etd,
            family_subtype: None,
            magnetic_circuit: MagneticCircuit::Open,
            dimensions,
        };
        let mut volumetric_losses = BTreeMap::new();
        volumetric_losses.insert(
            "steinmetz".to_string(),
            vec![SteinmetzRange {
                minimum_frequency: 0.0,
                maximum_frequency: 1.0e7,
                alpha: 1.3,
                beta: 2.5,
                k: 1.0,
                temperature_coefficients: None,
            }],
        );
        let material = CoreMaterial {
            name: "3C97".to_string(),
            family: MaterialFamily::Ferrite,
            manufacturer: "Ferroxcube".to_string(),
            saturation: vec![SaturationPoint { magnetic_flux_density: 0.41, magnetic_field: 300.0, temperature: 100.0 }],
            permeability: PermeabilityData {
                reference_value: 3000.0,
                temperature_polynomial: None,
                temperature_table: None,
                dc_bias_coefficients: None,
                dc_bias_table: None,
                frequency_polynomial: None,
                frequency_table: None,
                tolerance: None,
            },
            volumetric_losses,
            mass_losses: None,
            density: None,
            resistivity: vec![],
            curie_temperature: Some(220.0),
            remanence: None,
            coercive_force: None,
            preferred_core_losses_model: None,
            roshen_coefficients: None,
            proprietary_formula: None,
        };
        let mut core = Core { core_type: CoreType::TwoPieceSet, shape, material, gapping: vec![], stacks: 1, processed: None, reference: None };
        core.processed = Some(process_core_data(&core).unwrap());

        let bobbin =
            Bobbin::quick_bobbin(&[WindingWindow { height: 0.0155, width: 0.008, inner_radius: 0.0055 }], ColumnShape::Round)
                .unwrap();
        let mut coil = Coil {
            bobbin,
            functional_description: vec![WindingFunctionalDescription {
                name: "primary".to_string(),
                isolation_side: IsolationSide::Primary,
                number_turns: 10,
                number_parallels: 1,
                wire: Wire::Round { conducting_diameter: 0.0005, outer_diameter: 0.00055, coating: Coating::Bare },
                orientation: WindingOrientation::Overlapping,
            }],
            alignment: CoilAlignment::InnerOrCenter,
            processed: None,
        };
        let wound = crate::coil_adviser::winding_engine::wind(&coil).unwrap();
        coil.processed = Some(crate::coil_adviser::winding_engine::delimit_and_compact(wound));

        Magnetic { core, coil, manufacturer_info: ManufacturerInfo::default() }
    }

    fn wire_material() -> crate::catalogue::WireMaterial {
        crate::catalogue::WireMaterial { name: "copper".to_string(), resistivity_20c: 1.724e-8, temperature_coefficient: 0.00393 }
    }

    fn excited_inputs() -> Inputs {
        let current_processed = crate::signal::waveform::Processed {
            label: Some(crate::signal::waveform::WaveformLabel::Sinusoidal),
            offset: 0.0,
            peak: 1.0,
            peak_to_peak: 2.0,
            rms: 0.707,
            thd: 0.0,
            effective_frequency: 100_000.0,
            ac_effective_frequency: 100_000.0,
            duty_cycle: None,
        };
        let flux_processed = crate::signal::waveform::Processed { peak: 0.05, peak_to_peak: 0.1, rms: 0.035, ..current_processed.clone() };
        let mut inputs = sample_inputs();
        inputs.operating_points[0].excitations_per_winding[0] = OperatingPointExcitation {
            frequency: 100_000.0,
            current: Some(crate::signal::waveform::SignalDescriptor { waveform: None, harmonics: None, processed: Some(current_processed) }),
            voltage: None,
            magnetizing_current: Some(crate::signal::waveform::SignalDescriptor { waveform: None, harmonics: None, processed: Some(flux_processed) }),
        };
        inputs
    }

    #[test]
    fn evaluate_fills_every_output_field() {
        let mut mas = Mas::new(excited_inputs(), wound_magnetic());
        mas.evaluate(&wire_material(), &Settings::default()).unwrap();

        assert_eq!(mas.outputs.len(), 1);
        let output = &mas.outputs[0];
        assert!(output.core_losses.is_some());
        assert!(output.core_losses.as_ref().unwrap().total > 0.0);
        assert_eq!(output.winding_losses.len(), 1);
        assert!(output.winding_losses[0].ohmic_losses > 0.0);
        assert!(output.magnetizing_inductance.is_some());
        assert!(output.temperature.unwrap() > 25.0);
        assert!(output.impedance.unwrap() > 0.0);
        assert_eq!(output.processed_excitations.len(), 1);
    }
}
