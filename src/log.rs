//! Structured, data-first logging for the advisers (§7).
//!
//! The specification requires every adviser decision to be traceable
//! ("counts before and after each filter, reason for each cull, and the
//! winning reference per result") without raising exceptions across the
//! public API. Rather than writing to a global logger, each adviser builds
//! an [`AdviserLog`] value alongside its result and returns both — pure
//! functions in, pure data out, per the teacher's style of returning
//! `Stats`/`Vec` values rather than side-effecting.

use serde::{Deserialize, Serialize};

/// One decision recorded during an adviser run.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum LogEntry {
    /// A filter was run over a population of candidates.
    FilterApplied {
        /// Name of the filter, e.g. `"AreaProduct"`.
        filter: String,
        /// Number of candidates entering the filter.
        candidates_before: usize,
        /// Number of candidates that remained valid afterwards.
        candidates_after: usize,
    },
    /// A single candidate was dropped and will not appear in the result.
    CandidateCulled {
        /// Stable identity of the candidate (manufacturer reference or a
        /// synthesised name).
        candidate: String,
        /// Which filter (or pipeline stage) caused the cull.
        reason: String,
    },
    /// A candidate made it into the final, ordered result list.
    CandidateAccepted {
        /// Stable identity of the candidate.
        candidate: String,
        /// Final aggregate score.
        score: f64,
    },
    /// Free-form note for anything not covered by the structured variants
    /// above (population expansion, stack-count search, pattern skipped).
    Note(String),
}

/// An ordered trace of everything an adviser run decided.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AdviserLog {
    entries: Vec<LogEntry>,
}

impl AdviserLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Records that `filter` reduced the candidate population from
    /// `before` to `after`.
    pub fn filter_applied(&mut self, filter: impl Into<String>, before: usize, after: usize) {
        self.push(LogEntry::FilterApplied {
            filter: filter.into(),
            candidates_before: before,
            candidates_after: after,
        });
    }

    /// Records that `candidate` was dropped, with a human-readable reason.
    pub fn culled(&mut self, candidate: impl Into<String>, reason: impl Into<String>) {
        self.push(LogEntry::CandidateCulled {
            candidate: candidate.into(),
            reason: reason.into(),
        });
    }

    /// Records that `candidate` survived to the final result with `score`.
    pub fn accepted(&mut self, candidate: impl Into<String>, score: f64) {
        self.push(LogEntry::CandidateAccepted {
            candidate: candidate.into(),
            score,
        });
    }

    /// Records a free-form note.
    pub fn note(&mut self, message: impl Into<String>) {
        self.push(LogEntry::Note(message.into()));
    }

    /// All entries recorded so far, in order.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Merges another log's entries into this one, preserving order.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }
}
