//! [`BoundedValue`], the sum-type replacement for the original's
//! optional-getter-soup around nominal/minimum/maximum fields (§3, §9).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A value that may be known exactly (`nominal`), bounded (`minimum`/
/// `maximum`), or both.
///
/// Invariants, enforced by [`BoundedValue::new`]: if both bounds are
/// present, `minimum <= maximum`; if `nominal` is present together with a
/// single bound, `nominal` lies on the correct side of that bound.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct BoundedValue {
    /// Exact value, when known.
    pub nominal: Option<f64>,
    /// Lower bound, when known.
    pub minimum: Option<f64>,
    /// Upper bound, when known.
    pub maximum: Option<f64>,
    /// Whether `minimum` itself is excluded from the valid range.
    pub exclude_minimum: bool,
    /// Whether `maximum` itself is excluded from the valid range.
    pub exclude_maximum: bool,
}

/// Preference order used by [`BoundedValue::get_requirement_value`] and by
/// the magnetizing-inductance solver (§4.7) when more than one of
/// `nominal`/`minimum`/`maximum` is present and a single scalar is needed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DimensionalPreference {
    /// Prefer `nominal`, then `minimum`, then `maximum`.
    Nominal,
    /// Prefer `minimum`, then `nominal`, then `maximum`.
    Minimum,
    /// Prefer `maximum`, then `nominal`, then `minimum`.
    Maximum,
}

impl BoundedValue {
    /// Builds and validates a `BoundedValue`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if no field is set, if `minimum >
    /// maximum`, or if `nominal` falls outside a single present bound.
    pub fn new(
        nominal: Option<f64>,
        minimum: Option<f64>,
        maximum: Option<f64>,
        exclude_minimum: bool,
        exclude_maximum: bool,
    ) -> Result<Self> {
        if nominal.is_none() && minimum.is_none() && maximum.is_none() {
            return Err(Error::InvalidInput("BoundedValue requires at least one of nominal/minimum/maximum".to_string()));
        }
        if let (Some(min), Some(max)) = (minimum, maximum) {
            if min > max {
                return Err(Error::InvalidInput(format!("BoundedValue minimum {min} exceeds maximum {max}")));
            }
        }
        if let Some(nominal_value) = nominal {
            if let Some(min) = minimum {
                let violates = if exclude_minimum { nominal_value <= min } else { nominal_value < min };
                if violates {
                    return Err(Error::InvalidInput(format!(
                        "BoundedValue nominal {nominal_value} violates minimum {min}"
                    )));
                }
            }
            if let Some(max) = maximum {
                let violates = if exclude_maximum { nominal_value >= max } else { nominal_value > max };
                if violates {
                    return Err(Error::InvalidInput(format!(
                        "BoundedValue nominal {nominal_value} violates maximum {max}"
                    )));
                }
            }
        }
        Ok(Self { nominal, minimum, maximum, exclude_minimum, exclude_maximum })
    }

    /// A `BoundedValue` that is just a single known number.
    #[must_use]
    pub fn exact(value: f64) -> Self {
        Self { nominal: Some(value), minimum: None, maximum: None, exclude_minimum: false, exclude_maximum: false }
    }

    /// A `BoundedValue` with only a minimum bound.
    #[must_use]
    pub fn at_least(minimum: f64) -> Self {
        Self { nominal: None, minimum: Some(minimum), maximum: None, exclude_minimum: false, exclude_maximum: false }
    }

    /// A `BoundedValue` bounded on both sides, with no preferred nominal.
    #[must_use]
    pub fn between(minimum: f64, maximum: f64) -> Self {
        Self { nominal: None, minimum: Some(minimum), maximum: Some(maximum), exclude_minimum: false, exclude_maximum: false }
    }

    /// Returns `nominal` if present; else the midpoint of `minimum`/
    /// `maximum` if both are present; else whichever single bound is
    /// present (§4.3's `get_requirement_value`, `Nominal` preference).
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if no field is set (should not
    /// happen for a validly constructed `BoundedValue`).
    pub fn get_requirement_value(&self) -> Result<f64> {
        if let Some(nominal) = self.nominal {
            return Ok(nominal);
        }
        match (self.minimum, self.maximum) {
            (Some(min), Some(max)) => Ok(0.5 * (min + max)),
            (Some(min), None) => Ok(min),
            (None, Some(max)) => Ok(max),
            (None, None) => Err(Error::InvalidInput("BoundedValue has no usable field".to_string())),
        }
    }

    /// As [`BoundedValue::get_requirement_value`], but lets the caller
    /// choose which field wins when several are present (§4.7 step 2: `L`
    /// solver tries `NOMINAL` → `MINIMUM` → `MAXIMUM`).
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if no field is set.
    pub fn get_requirement_value_with_preference(&self, preference: DimensionalPreference) -> Result<f64> {
        let order: [Option<f64>; 3] = match preference {
            DimensionalPreference::Nominal => [self.nominal, self.minimum, self.maximum],
            DimensionalPreference::Minimum => [self.minimum, self.nominal, self.maximum],
            DimensionalPreference::Maximum => [self.maximum, self.nominal, self.minimum],
        };
        order
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| Error::InvalidInput("BoundedValue has no usable field".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_value() {
        assert!(BoundedValue::new(None, None, None, false, false).is_err());
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(BoundedValue::new(None, Some(5.0), Some(1.0), false, false).is_err());
    }

    #[test]
    fn nominal_preference_prefers_nominal() {
        let value = BoundedValue::new(Some(2.0), Some(1.0), Some(3.0), false, false).unwrap();
        assert_eq!(value.get_requirement_value().unwrap(), 2.0);
    }

    #[test]
    fn minimum_preference_falls_back_to_nominal_then_maximum() {
        let minimum_only = BoundedValue::new(None, None, Some(3.0), false, false).unwrap();
        assert_eq!(
            minimum_only.get_requirement_value_with_preference(DimensionalPreference::Minimum).unwrap(),
            3.0
        );
    }

    #[test]
    fn midpoint_when_only_bounds_present() {
        let value = BoundedValue::between(1.0, 3.0);
        assert_eq!(value.get_requirement_value().unwrap(), 2.0);
    }
}
