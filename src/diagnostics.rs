//! Recoverable problems found while processing a payroll batch.
//!
//! Nothing reported here aborts a run. Callers pass a [`DiagnosticSink`] into
//! every operation that can hit bad data, so two runs never share a channel
//! and tests can inspect exactly what was reported.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Broad class of a recoverable problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A malformed value was skipped or replaced by zero.
    DataQuality,
    /// A referenced employee or period had nothing to compute from.
    LookupMiss,
}

/// A single reported problem.
///
/// # Example
///
/// ```
/// use payroll_engine::diagnostics::{Diagnostic, DiagnosticKind};
///
/// let diagnostic = Diagnostic::lookup_miss("unknown_employee", "no employee 10099");
/// assert_eq!(diagnostic.kind, DiagnosticKind::LookupMiss);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The class of problem.
    pub kind: DiagnosticKind,
    /// A stable code identifying the problem (e.g. `inverted_span`).
    pub code: String,
    /// Human-readable description including the offending values.
    pub message: String,
}

impl Diagnostic {
    /// Creates a data-quality diagnostic.
    pub fn data_quality(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::DataQuality,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a lookup-miss diagnostic.
    pub fn lookup_miss(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::LookupMiss,
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Receives diagnostics from the engine.
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Collects diagnostics in report order and mirrors each one to `tracing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every diagnostic reported so far.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Returns the diagnostics of a single kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    /// Returns true if any diagnostic carries `code`.
    pub fn contains_code(&self, code: &str) -> bool {
        self.entries.iter().any(|d| d.code == code)
    }

    /// Number of diagnostics collected.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the collector, returning the diagnostics.
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(
            kind = ?diagnostic.kind,
            code = %diagnostic.code,
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_report_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(Diagnostic::data_quality("unparsable_time", "bad"));
        diagnostics.report(Diagnostic::lookup_miss("no_hours", "none"));

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.entries()[0].code, "unparsable_time");
        assert_eq!(diagnostics.entries()[1].code, "no_hours");
    }

    #[test]
    fn test_filters_by_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(Diagnostic::data_quality("short_row", "row 3"));
        diagnostics.report(Diagnostic::lookup_miss("unknown_employee", "10099"));
        diagnostics.report(Diagnostic::data_quality("inverted_span", "17:00-08:00"));

        assert_eq!(diagnostics.of_kind(DiagnosticKind::DataQuality).count(), 2);
        assert_eq!(diagnostics.of_kind(DiagnosticKind::LookupMiss).count(), 1);
        assert!(diagnostics.contains_code("short_row"));
        assert!(!diagnostics.contains_code("no_hours"));
    }

    #[test]
    fn test_mutable_reference_is_a_sink() {
        fn report_twice(mut sink: impl DiagnosticSink) {
            sink.report(Diagnostic::data_quality("a", "a"));
            sink.report(Diagnostic::data_quality("b", "b"));
        }

        let mut diagnostics = Diagnostics::new();
        report_twice(&mut diagnostics);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&DiagnosticKind::DataQuality).unwrap(),
            "\"data_quality\""
        );
        assert_eq!(
            serde_json::to_string(&DiagnosticKind::LookupMiss).unwrap(),
            "\"lookup_miss\""
        );
    }
}
