//! [`DesignRequirement`], [`OperatingPoint`] and [`Inputs`] (§3), plus the
//! inputs pipeline (§4.3, component C) that completes a caller-supplied
//! [`Inputs`] value into one ready for the physical models.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::bounded_value::BoundedValue;
use crate::model::insulation_spec::{CtiGroup, InsulationType, OvervoltageCategory, PollutionDegree, WiringTechnology};
use crate::signal::processor;
use crate::signal::waveform::SignalDescriptor;

/// Which electrically distinct side of the magnetic a winding belongs to
/// (§3 Glossary: "isolation side").
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum IsolationSide {
    /// First winding.
    Primary,
    /// Second winding.
    Secondary,
    /// Third winding.
    Tertiary,
    /// Fourth winding.
    Quaternary,
    /// Fifth winding.
    Quinary,
    /// Sixth winding.
    Senary,
}

impl IsolationSide {
    /// The ordered default sequence used by §4.3 step 1.
    pub const ORDER: [Self; 6] =
        [Self::Primary, Self::Secondary, Self::Tertiary, Self::Quaternary, Self::Quinary, Self::Senary];

    /// Returns the `n`-th (0-indexed) isolation side in [`Self::ORDER`], or
    /// `None` if `n` exceeds the number of named sides.
    #[must_use]
    pub fn nth(n: usize) -> Option<Self> {
        Self::ORDER.get(n).copied()
    }
}

/// Insulation requirements a design must satisfy (§3).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct InsulationRequirement {
    /// Which standards apply; the coordinator (§4.10) takes the max across
    /// all of them unless exactly one is given.
    pub standards: Vec<crate::model::insulation_spec::InsulationStandardName>,
    /// Overvoltage category of the installation.
    pub overvoltage_category: OvervoltageCategory,
    /// Pollution degree of the environment.
    pub pollution_degree: PollutionDegree,
    /// Comparative Tracking Index group of the insulation material.
    pub cti: CtiGroup,
    /// Required insulation type between isolation sides.
    pub insulation_type: InsulationType,
    /// Nominal mains supply voltage.
    pub main_supply_voltage: BoundedValue,
    /// Installation altitude.
    pub altitude: BoundedValue,
    /// Winding manufacturing technology.
    pub wiring_technology: WiringTechnology,
}

/// The electrical and insulation requirements a candidate design must
/// satisfy (§3).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DesignRequirement {
    /// Target magnetizing inductance.
    pub magnetizing_inductance: BoundedValue,
    /// Turns ratio of each secondary/tertiary/... winding relative to the
    /// primary, in winding order.
    pub turns_ratios: Vec<f64>,
    /// Isolation side of each winding, in winding order.
    pub isolation_sides: Vec<IsolationSide>,
    /// Insulation-coordination requirements.
    pub insulation: InsulationRequirement,
    /// Maximum allowed core dimensions, if the caller constrains them.
    pub maximum_dimensions: Option<Dimensions>,
    /// Minimum allowed impedance magnitude at declared frequencies, for
    /// filter-choke designs.
    pub minimum_impedance: Option<Vec<(f64, f64)>>,
}

/// A bounding box in metres.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Dimensions {
    /// Overall height.
    pub height: f64,
    /// Overall width.
    pub width: f64,
    /// Overall depth.
    pub depth: f64,
}

/// Ambient conditions for one operating point.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Conditions {
    /// Ambient temperature in °C.
    pub ambient_temperature: f64,
    /// Optional cooling description (e.g. forced-air velocity); opaque to
    /// the core models beyond being present or absent.
    pub cooling: Option<String>,
}

/// Per-winding excitation for one operating point (§3).
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct OperatingPointExcitation {
    /// Fundamental frequency, Hz.
    pub frequency: f64,
    /// Current through the winding.
    pub current: Option<SignalDescriptor>,
    /// Voltage across the winding.
    pub voltage: Option<SignalDescriptor>,
    /// Magnetizing current (primary only, in general).
    pub magnetizing_current: Option<SignalDescriptor>,
}

/// One operating condition: ambient conditions plus an excitation per
/// winding (§3).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct OperatingPoint {
    /// Ambient conditions.
    pub conditions: Conditions,
    /// Excitation of each winding, in winding order. Invariant:
    /// `excitations_per_winding.len() == number of windings`.
    pub excitations_per_winding: Vec<OperatingPointExcitation>,
}

/// Top-level input to the whole engine (§3): requirements plus the
/// operating points the design must be evaluated/advised against.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Inputs {
    /// Electrical/insulation requirements.
    pub design_requirements: DesignRequirement,
    /// Operating points to evaluate against.
    pub operating_points: Vec<OperatingPoint>,
}

impl OperatingPointExcitation {
    fn is_declared(&self) -> bool {
        self.current.is_some() || self.voltage.is_some() || self.magnetizing_current.is_some()
    }
}

impl Inputs {
    /// Builds a complete `Inputs` from a caller-supplied requirement and
    /// operating points, running the pipeline of §4.3:
    ///
    /// 1. Defaults `isolation_sides` to the ordered PRIMARY, SECONDARY, …
    ///    sequence when the caller left it short.
    /// 2. Standardises every declared excitation's signals so waveform,
    ///    harmonics and processed views all exist and agree (§4.2).
    /// 3. Derives a missing secondary excitation by [`processor::reflect`]
    ///    when exactly one turns ratio is declared.
    /// 4. Fills a missing `magnetizing_current` from voltage, the
    ///    requirement's magnetizing inductance and (if given) a DC current,
    ///    by [`processor::integrate`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if any operating point declares zero
    /// excitations (`MISSING_PRIMARY_EXCITATION`) or if more than one
    /// secondary winding would have to be guessed (`AMBIGUOUS_SECONDARY`),
    /// and propagates [`Error`]s raised while standardising or deriving
    /// signals.
    pub fn new(mut design_requirements: DesignRequirement, operating_points: Vec<OperatingPoint>) -> Result<Self> {
        let number_windings = design_requirements.turns_ratios.len() + 1;
        if design_requirements.isolation_sides.len() < number_windings {
            design_requirements.isolation_sides = (0..number_windings)
                .map(|winding_index| {
                    IsolationSide::nth(winding_index).ok_or_else(|| {
                        Error::InvalidInput(format!(
                            "no named isolation side exists for winding index {winding_index}; \
                             at most {} windings are supported",
                            IsolationSide::ORDER.len()
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
        }

        let magnetizing_inductance = design_requirements.magnetizing_inductance.get_requirement_value()?;

        let operating_points = operating_points
            .into_iter()
            .map(|op| Self::standardize_operating_point(op, &design_requirements, magnetizing_inductance))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { design_requirements, operating_points })
    }

    fn standardize_operating_point(
        mut op: OperatingPoint,
        design_requirements: &DesignRequirement,
        magnetizing_inductance: f64,
    ) -> Result<OperatingPoint> {
        if op.excitations_per_winding.is_empty() || !op.excitations_per_winding.iter().any(Self::is_declared_ref) {
            return Err(Error::InvalidInput(
                "MISSING_PRIMARY_EXCITATION: operating point declares zero excitations".to_string(),
            ));
        }

        // Step 3: derive a missing secondary from the primary by reflect,
        // before standardising, so the derived signal gets standardised too.
        let undeclared_secondaries: Vec<usize> = op
            .excitations_per_winding
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, excitation)| !excitation.is_declared())
            .map(|(index, _)| index)
            .collect();

        if undeclared_secondaries.len() > 1 {
            return Err(Error::InvalidInput(format!(
                "AMBIGUOUS_SECONDARY: {} secondary excitations are undeclared but only one can be \
                 derived by reflection",
                undeclared_secondaries.len()
            )));
        }

        if let [secondary_index] = undeclared_secondaries[..] {
            if design_requirements.turns_ratios.len() != 1 {
                return Err(Error::InvalidInput(
                    "AMBIGUOUS_SECONDARY: a secondary excitation is undeclared and turns_ratios does \
                     not have exactly one entry to derive it from"
                        .to_string(),
                ));
            }
            let ratio = design_requirements.turns_ratios[0];
            let primary_frequency = op.excitations_per_winding[0].frequency;
            let primary = op.excitations_per_winding[0].clone();
            let secondary = &mut op.excitations_per_winding[secondary_index];
            secondary.frequency = primary_frequency;
            if let Some(voltage) = &primary.voltage {
                let waveform = processor::standardize(voltage, primary_frequency)?;
                let reflected = processor::reflect(&waveform, ratio)?;
                secondary.voltage = Some(Self::descriptor_from_waveform(&reflected, primary_frequency)?);
            }
            if let Some(current) = &primary.current {
                let waveform = processor::standardize(current, primary_frequency)?;
                let reflected = processor::reflect(&waveform, 1.0 / ratio)?;
                secondary.current = Some(Self::descriptor_from_waveform(&reflected, primary_frequency)?);
            }
        }

        // Step 2: standardise every declared signal so all three views agree.
        for excitation in &mut op.excitations_per_winding {
            let frequency = excitation.frequency;
            Self::standardize_signal(&mut excitation.voltage, frequency)?;
            Self::standardize_signal(&mut excitation.current, frequency)?;
            Self::standardize_signal(&mut excitation.magnetizing_current, frequency)?;
        }

        // Step 4: fill a missing magnetizing current on the primary from
        // voltage, L_m and any DC bias already present on it.
        if let Some(primary) = op.excitations_per_winding.first_mut() {
            if primary.magnetizing_current.is_none() {
                if let Some(voltage) = &primary.voltage {
                    let frequency = primary.frequency;
                    let waveform = processor::standardize(voltage, frequency)?;
                    let i_dc = primary
                        .current
                        .as_ref()
                        .and_then(|current| current.processed.as_ref())
                        .map_or(0.0, |processed| processed.offset);
                    let integrated = processor::integrate(&waveform, frequency, magnetizing_inductance, i_dc)?;
                    primary.magnetizing_current =
                        Some(Self::descriptor_from_waveform(&integrated, frequency)?);
                }
            }
        }

        Ok(op)
    }

    fn is_declared_ref(excitation: &OperatingPointExcitation) -> bool {
        excitation.is_declared()
    }

    /// Completes `signal` in place so its waveform, harmonics and processed
    /// representations all exist, leaving it untouched if it was never
    /// declared.
    fn standardize_signal(signal: &mut Option<SignalDescriptor>, frequency: f64) -> Result<()> {
        let Some(descriptor) = signal else { return Ok(()) };
        *descriptor = Self::descriptor_from_waveform(&processor::standardize(descriptor, frequency)?, frequency)?;
        Ok(())
    }

    fn descriptor_from_waveform(
        waveform: &crate::signal::waveform::Waveform,
        frequency: f64,
    ) -> Result<SignalDescriptor> {
        let sampled = processor::sample(waveform, frequency)?;
        let spectrum = processor::harmonics(&sampled, frequency)?;
        let processed = processor::processed(&sampled, &spectrum, None, None);
        Ok(SignalDescriptor { waveform: Some(sampled), harmonics: Some(spectrum), processed: Some(processed) })
    }

    /// The maximum frequency declared across every winding of every
    /// operating point — used by the core adviser (§4.13 step 3) to size
    /// the dummy coil to the worst-case skin depth, and by the wire adviser
    /// (§4.15) for hot-spot scoring.
    #[must_use]
    pub fn maximum_frequency(&self) -> f64 {
        self.operating_points
            .iter()
            .flat_map(|op| op.excitations_per_winding.iter())
            .map(|excitation| excitation.frequency)
            .fold(0.0, f64::max)
    }

    /// The maximum ambient temperature declared across every operating
    /// point.
    #[must_use]
    pub fn maximum_ambient_temperature(&self) -> f64 {
        self.operating_points
            .iter()
            .map(|op| op.conditions.ambient_temperature)
            .fold(f64::MIN, f64::max)
    }

    /// The worst-case (maximum-current) excitation declared for `winding_index`
    /// across every operating point — used by the wire adviser (§4.15) for
    /// hot-spot scoring. Returns `None` if `winding_index` is never declared
    /// or never carries a processed current.
    #[must_use]
    pub fn get_maximum_excitation(&self, winding_index: usize) -> Option<&OperatingPointExcitation> {
        self.operating_points
            .iter()
            .filter_map(|op| op.excitations_per_winding.get(winding_index))
            .max_by(|a, b| {
                let rms = |excitation: &OperatingPointExcitation| {
                    excitation.current.as_ref().and_then(|c| c.processed.as_ref()).map_or(0.0, |p| p.rms)
                };
                rms(a).total_cmp(&rms(b))
            })
    }

    /// The excitation of every winding at the operating point with the
    /// highest declared frequency — used by the core adviser (§4.13 step 3)
    /// to size the dummy coil against a single representative point.
    #[must_use]
    pub fn get_excitations_per_winding(&self) -> &[OperatingPointExcitation] {
        self.operating_points
            .iter()
            .max_by(|a, b| {
                let max_frequency = |op: &OperatingPoint| {
                    op.excitations_per_winding.iter().map(|e| e.frequency).fold(0.0, f64::max)
                };
                max_frequency(a).total_cmp(&max_frequency(b))
            })
            .map_or(&[], |op| op.excitations_per_winding.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::insulation_spec::InsulationStandardName;
    use crate::signal::waveform::{Processed, WaveformLabel};

    fn insulation() -> InsulationRequirement {
        InsulationRequirement {
            standards: vec![InsulationStandardName::Iec60664],
            overvoltage_category: OvervoltageCategory::OvcI,
            pollution_degree: PollutionDegree::P2,
            cti: CtiGroup::GroupI,
            insulation_type: InsulationType::Basic,
            main_supply_voltage: BoundedValue::exact(230.0),
            altitude: BoundedValue::exact(0.0),
            wiring_technology: WiringTechnology::Wound,
        }
    }

    fn sinusoidal_excitation(frequency: f64, peak: f64) -> OperatingPointExcitation {
        OperatingPointExcitation {
            frequency,
            current: None,
            voltage: Some(SignalDescriptor {
                waveform: None,
                harmonics: None,
                processed: Some(Processed {
                    label: Some(WaveformLabel::Sinusoidal),
                    offset: 0.0,
                    peak,
                    peak_to_peak: 2.0 * peak,
                    rms: peak / std::f64::consts::SQRT_2,
                    thd: 0.0,
                    effective_frequency: frequency,
                    ac_effective_frequency: frequency,
                    duty_cycle: None,
                }),
            }),
            magnetizing_current: None,
        }
    }

    #[test]
    fn defaults_isolation_sides_when_caller_omits_them() {
        let requirement = DesignRequirement {
            magnetizing_inductance: BoundedValue::exact(1e-3),
            turns_ratios: vec![2.0],
            isolation_sides: vec![],
            insulation: insulation(),
            maximum_dimensions: None,
            minimum_impedance: None,
        };
        let op = OperatingPoint {
            conditions: Conditions { ambient_temperature: 25.0, cooling: None },
            excitations_per_winding: vec![sinusoidal_excitation(100_000.0, 10.0), sinusoidal_excitation(100_000.0, 20.0)],
        };
        let inputs = Inputs::new(requirement, vec![op]).unwrap();
        assert_eq!(inputs.design_requirements.isolation_sides, vec![IsolationSide::Primary, IsolationSide::Secondary]);
    }

    #[test]
    fn standardizes_declared_signals_into_all_three_views() {
        let requirement = DesignRequirement {
            magnetizing_inductance: BoundedValue::exact(1e-3),
            turns_ratios: vec![2.0],
            isolation_sides: vec![],
            insulation: insulation(),
            maximum_dimensions: None,
            minimum_impedance: None,
        };
        let op = OperatingPoint {
            conditions: Conditions { ambient_temperature: 25.0, cooling: None },
            excitations_per_winding: vec![sinusoidal_excitation(100_000.0, 10.0), sinusoidal_excitation(100_000.0, 5.0)],
        };
        let inputs = Inputs::new(requirement, vec![op]).unwrap();
        let primary_voltage = inputs.operating_points[0].excitations_per_winding[0].voltage.as_ref().unwrap();
        assert!(primary_voltage.waveform.is_some());
        assert!(primary_voltage.harmonics.is_some());
        assert!(primary_voltage.processed.is_some());
    }

    #[test]
    fn derives_missing_secondary_by_reflection() {
        let requirement = DesignRequirement {
            magnetizing_inductance: BoundedValue::exact(1e-3),
            turns_ratios: vec![0.5],
            isolation_sides: vec![],
            insulation: insulation(),
            maximum_dimensions: None,
            minimum_impedance: None,
        };
        let mut secondary = sinusoidal_excitation(100_000.0, 10.0);
        secondary.voltage = None;
        let op = OperatingPoint {
            conditions: Conditions { ambient_temperature: 25.0, cooling: None },
            excitations_per_winding: vec![sinusoidal_excitation(100_000.0, 10.0), secondary],
        };
        let inputs = Inputs::new(requirement, vec![op]).unwrap();
        let secondary_voltage =
            inputs.operating_points[0].excitations_per_winding[1].voltage.as_ref().unwrap().processed.as_ref().unwrap();
        assert_relative_eq(secondary_voltage.peak, 5.0, 1e-2);
    }

    #[test]
    fn fills_missing_magnetizing_current_by_integration() {
        let requirement = DesignRequirement {
            magnetizing_inductance: BoundedValue::exact(1e-3),
            turns_ratios: vec![1.0],
            isolation_sides: vec![],
            insulation: insulation(),
            maximum_dimensions: None,
            minimum_impedance: None,
        };
        let op = OperatingPoint {
            conditions: Conditions { ambient_temperature: 25.0, cooling: None },
            excitations_per_winding: vec![sinusoidal_excitation(100_000.0, 10.0), sinusoidal_excitation(100_000.0, 10.0)],
        };
        let inputs = Inputs::new(requirement, vec![op]).unwrap();
        assert!(inputs.operating_points[0].excitations_per_winding[0].magnetizing_current.is_some());
    }

    #[test]
    fn rejects_operating_point_with_zero_excitations() {
        let requirement = DesignRequirement {
            magnetizing_inductance: BoundedValue::exact(1e-3),
            turns_ratios: vec![],
            isolation_sides: vec![],
            insulation: insulation(),
            maximum_dimensions: None,
            minimum_impedance: None,
        };
        let op = OperatingPoint { conditions: Conditions { ambient_temperature: 25.0, cooling: None }, excitations_per_winding: vec![] };
        let error = Inputs::new(requirement, vec![op]).unwrap_err();
        assert!(matches!(error, Error::InvalidInput(message) if message.contains("MISSING_PRIMARY_EXCITATION")));
    }

    #[test]
    fn rejects_more_than_one_undeclared_secondary() {
        let requirement = DesignRequirement {
            magnetizing_inductance: BoundedValue::exact(1e-3),
            turns_ratios: vec![0.5, 0.25],
            isolation_sides: vec![],
            insulation: insulation(),
            maximum_dimensions: None,
            minimum_impedance: None,
        };
        let mut secondary = sinusoidal_excitation(100_000.0, 10.0);
        secondary.voltage = None;
        let mut tertiary = sinusoidal_excitation(100_000.0, 10.0);
        tertiary.voltage = None;
        let op = OperatingPoint {
            conditions: Conditions { ambient_temperature: 25.0, cooling: None },
            excitations_per_winding: vec![sinusoidal_excitation(100_000.0, 10.0), secondary, tertiary],
        };
        let error = Inputs::new(requirement, vec![op]).unwrap_err();
        assert!(matches!(error, Error::InvalidInput(message) if message.contains("AMBIGUOUS_SECONDARY")));
    }

    fn assert_relative_eq(actual: f64, expected: f64, tolerance: f64) {
        assert!((actual - expected).abs() <= tolerance * expected.abs().max(1.0), "{actual} vs {expected}");
    }
}
