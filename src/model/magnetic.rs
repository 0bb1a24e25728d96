//! [`Magnetic`]: a core paired with a coil, plus manufacturer metadata
//! (§3).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::coil::Coil;
use crate::model::core::Core;

/// Free-form manufacturer metadata attached to a candidate or catalogue
/// entry.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ManufacturerInfo {
    /// Manufacturer name.
    pub name: Option<String>,
    /// Manufacturer part reference.
    pub reference: Option<String>,
    /// Per-unit cost, in the catalogue's currency, when known.
    pub cost: Option<f64>,
}

/// A complete magnetic component: a core and a coil wound over it (§3).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Magnetic {
    /// The core.
    pub core: Core,
    /// The coil.
    pub coil: Coil,
    /// Manufacturer metadata.
    pub manufacturer_info: ManufacturerInfo,
}

impl Magnetic {
    /// Validates that the coil's declared winding count does not exceed the
    /// number of distinct isolation sides it references, and delegates to
    /// [`Core::validate`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the coil has no windings, or
    /// propagates [`Core::validate`].
    pub fn validate(&self) -> Result<()> {
        if self.coil.functional_description.is_empty() {
            return Err(Error::InvalidInput("a magnetic must have at least one winding".to_string()));
        }
        self.core.validate()
    }

    /// A stable identity for adviser scoring maps, combining the core's and
    /// coil's own identities.
    #[must_use]
    pub fn identity(&self) -> String {
        format!("{}/{}windings", self.core.identity(), self.coil.number_windings())
    }
}
