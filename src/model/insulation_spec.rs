//! Shared enumerations used by both [`crate::model::requirement::DesignRequirement`]
//! and the insulation coordinator (§4.10), so the two stay in lock-step
//! (replacing the original's ad hoc strings with enumerated tags, §9).

use serde::{Deserialize, Serialize};

/// Overvoltage category (ordinal, `OVC_I` lowest).
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum OvervoltageCategory {
    /// OVC-I: equipment protected against transient overvoltages.
    OvcI,
    /// OVC-II: energy-consuming equipment.
    OvcIi,
    /// OVC-III: equipment in fixed installations.
    OvcIii,
    /// OVC-IV: equipment at the origin of the installation.
    OvcIv,
}

/// Pollution degree (ordinal, `P1` lowest).
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum PollutionDegree {
    /// No pollution, or only dry, non-conductive pollution.
    P1,
    /// Non-conductive pollution with occasional condensation.
    P2,
    /// Conductive pollution, or dry pollution that becomes conductive.
    P3,
}

/// Comparative Tracking Index group (ordinal, `GroupI` highest CTI).
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum CtiGroup {
    /// CTI ≥ 600.
    GroupI,
    /// 400 ≤ CTI < 600.
    GroupIi,
    /// 175 ≤ CTI < 400, preferred.
    GroupIiiA,
    /// 100 ≤ CTI < 175.
    GroupIiiB,
}

/// Required insulation grade between two isolation sides.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum InsulationType {
    /// Insulation necessary only for correct operation.
    Functional,
    /// Basic protection against electric shock.
    Basic,
    /// Independent insulation applied in addition to basic insulation.
    Supplementary,
    /// Basic and supplementary insulation combined.
    Double,
    /// Single insulation providing a degree of protection equivalent to
    /// double insulation.
    Reinforced,
}

/// The applicable insulation standard.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum InsulationStandardName {
    /// IEC 60664 (insulation coordination for equipment within low-voltage
    /// supply systems).
    Iec60664,
    /// IEC 62368 (audio/video, IT and communication technology equipment).
    Iec62368,
    /// IEC 61558 (safety of power transformers, reactors, power supplies).
    Iec61558,
    /// IEC 60335 (safety of household and similar electrical appliances).
    Iec60335,
}

/// Manufacturing technology of the winding, affecting creepage tables.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum WiringTechnology {
    /// Conventional wound construction.
    Wound,
    /// Printed-circuit-board winding.
    Printed,
}
