//! Crate-wide error taxonomy.
//!
//! Every physical model and adviser in this crate returns [`Result`]. Inside
//! an adviser, an error for a single candidate is caught, logged to the
//! adviser's [`crate::log::AdviserLog`] and the candidate is dropped; it
//! never aborts the whole run. Only [`Error::InvalidInput`] raised by the
//! inputs pipeline (§4.3) is fatal, because it precedes any candidate
//! evaluation.

use thiserror::Error;

/// Catch-all error for this crate. Variants correspond to the kinds named in
/// §7 of the specification, not to individual call sites.
#[derive(Debug, Error)]
pub enum Error {
    /// A design requirement or operating point is missing data, or contains
    /// contradictory bounds, and could not be completed by the inputs
    /// pipeline.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A model was invoked on an object whose prerequisite processing step
    /// was skipped (e.g. a [`crate::model::coil::Coil`] with no turns laid
    /// out, or a [`crate::model::core::Core`] with no processed
    /// description).
    #[error("prerequisite step not run: {0}")]
    NotProcessed(String),

    /// A numeric kernel produced a non-finite result (division by zero,
    /// overflow, or a genuine NaN propagation).
    #[error("numeric divergence in {context}: {detail}")]
    NaNResult {
        /// Where the divergence was detected.
        context: String,
        /// Human-readable detail (e.g. which operand was zero).
        detail: String,
    },

    /// A computed result is physically impossible (negative resistance,
    /// negative area, negative core loss).
    #[error("physically invalid result: {0}")]
    CalculationInvalid(String),

    /// A catalogue lookup found no matching record.
    #[error("not found in catalogue: {0}")]
    NotFound(String),

    /// A bracketed root search failed to converge.
    #[error(
        "root not found for {context}: bracket [{low}, {high}] did not converge after {attempts} attempts"
    )]
    RootNotFound {
        /// What was being solved for (e.g. "gap length", "turns").
        context: String,
        /// Lower bracket bound at the point of failure.
        low: f64,
        /// Upper bracket bound at the point of failure.
        high: f64,
        /// Number of bracket expansions/iterations attempted.
        attempts: u32,
    },

    /// Error that does not originate from this crate (e.g. a caller-supplied
    /// [`crate::catalogue::CatalogueProvider`] implementation).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
