//! Process-wide configuration bag (§6).
//!
//! `Settings` is constructed once (typically with [`Settings::default`]) and
//! then only read; every physical model and adviser takes it by shared
//! reference. This replaces the original's string-keyed model selection
//! ("gapReluctance", "coreLosses") with enumerated tags, per the
//! re-architecture note in spec.md §9.

use serde::{Deserialize, Serialize};

use crate::core_losses::CoreLossesModelName;
use crate::reluctance::fringing::FringingFactorModelName;

/// Process-wide, explicit-lifecycle configuration.
///
/// Lifecycle: `init` (usually via [`Settings::default`] plus field
/// overrides) `then` `read` — nothing in this crate mutates a `Settings`
/// value once physical models start consuming it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Settings {
    /// Whether the core adviser is allowed to propose toroidal cores.
    pub use_toroidal_cores: bool,
    /// Whether the core adviser is allowed to propose concentric
    /// (two-piece-set) cores.
    pub use_concentric_cores: bool,
    /// Restrict catalogue iteration to cores/wires flagged as in stock.
    pub use_only_cores_in_stock: bool,

    /// Whether the core adviser expands the population with stacked
    /// variants (§4.13 step 7).
    pub core_adviser_include_stacks: bool,
    /// Whether the core adviser considers distributed-gap configurations.
    pub core_adviser_include_distributed_gaps: bool,
    /// Hard cap on how many stacks a single core may use.
    pub maximum_number_stacks: u32,
    /// Candidate population ceiling after the primary filter (§4.13 step 5).
    pub core_adviser_maximum_magnetics_after_filtering: usize,

    /// Include planar wires in the wire adviser's search.
    pub wire_adviser_include_planar: bool,
    /// Include foil wires in the wire adviser's search.
    pub wire_adviser_include_foil: bool,
    /// Include rectangular wires in the wire adviser's search.
    pub wire_adviser_include_rectangular: bool,
    /// Include litz wires in the wire adviser's search.
    pub wire_adviser_include_litz: bool,
    /// Include round wires in the wire adviser's search.
    pub wire_adviser_include_round: bool,
    /// Upper bound on how many wires the wire adviser returns per winding.
    pub coil_adviser_maximum_number_wires: u32,
    /// Hard cap on parallel strands/conductors per turn.
    pub maximum_number_parallels: u32,
    /// Hard cap on how many wound designs the coil adviser returns.
    pub coil_adviser_maximum_number_results: usize,

    /// Whether [`crate::inductance`] adds the open-air inductance term.
    pub magnetizing_inductance_include_air_inductance: bool,

    /// Ordered preference list of core-losses models; the first one that
    /// supports the material in question is used.
    pub core_losses_model_names: Vec<CoreLossesModelName>,
    /// The fringing-factor model used by the reluctance/gap solver.
    pub reluctance_model: FringingFactorModelName,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_toroidal_cores: true,
            use_concentric_cores: true,
            use_only_cores_in_stock: false,

            core_adviser_include_stacks: true,
            core_adviser_include_distributed_gaps: true,
            maximum_number_stacks: 3,
            core_adviser_maximum_magnetics_after_filtering: 50,

            wire_adviser_include_planar: true,
            wire_adviser_include_foil: true,
            wire_adviser_include_rectangular: true,
            wire_adviser_include_litz: true,
            wire_adviser_include_round: true,
            coil_adviser_maximum_number_wires: 5,
            maximum_number_parallels: 100,
            coil_adviser_maximum_number_results: 10,

            magnetizing_inductance_include_air_inductance: false,

            core_losses_model_names: vec![
                CoreLossesModelName::Steinmetz,
                CoreLossesModelName::IGse,
                CoreLossesModelName::LossFactor,
            ],
            reluctance_model: FringingFactorModelName::Zhang,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_both_core_families() {
        let settings = Settings::default();
        assert!(settings.use_toroidal_cores);
        assert!(settings.use_concentric_cores);
    }
}
