//! Tracking of the row terminators actually present in a stream.

use crate::dialect::Terminator;

/// Something the tracker wants reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreakFinding {
    /// A terminator differs from the declared one, or from the first one seen when
    /// nothing was declared.
    Mismatch {
        /// The terminator rows should end with
        expected: Terminator,
        /// The terminator that was found
        found: Terminator,
    },
    /// Nothing was declared and the stream does not use CRLF.
    NonRfc(Terminator),
}

/// Observes every row terminator and compares it against the declared one.
///
/// Each kind of finding is produced at most once per run.
#[derive(Debug, Clone, Default)]
pub struct LineBreakTracker {
    declared: Option<Terminator>,
    observed: Vec<Terminator>,
    mismatch_reported: bool,
    nonrfc_reported: bool,
}

impl LineBreakTracker {
    /// Creates a tracker, optionally with a declared terminator.
    pub fn new(declared: Option<Terminator>) -> Self {
        Self {
            declared,
            ..Self::default()
        }
    }

    /// Records one terminator and returns a finding if it should be reported.
    pub fn observe(&mut self, terminator: Terminator) -> Option<LineBreakFinding> {
        let first = self.observed.first().copied();
        if !self.observed.contains(&terminator) {
            self.observed.push(terminator);
        }

        let expected = match (self.declared, first) {
            (Some(declared), _) => declared,
            (None, Some(first)) => first,
            (None, None) => {
                if !terminator.is_rfc4180() && !self.nonrfc_reported {
                    self.nonrfc_reported = true;
                    return Some(LineBreakFinding::NonRfc(terminator));
                }
                return None;
            }
        };

        if terminator != expected && !self.mismatch_reported {
            self.mismatch_reported = true;
            return Some(LineBreakFinding::Mismatch {
                expected,
                found: terminator,
            });
        }
        None
    }

    /// The declared terminator, if any.
    pub fn declared(&self) -> Option<Terminator> {
        self.declared
    }

    /// The first terminator seen in the stream.
    pub fn line_break(&self) -> Option<Terminator> {
        self.observed.first().copied()
    }

    /// Every distinct terminator seen so far, in order of first appearance.
    pub fn observed(&self) -> &[Terminator] {
        &self.observed
    }

    /// Returns true if more than one kind of terminator has been seen.
    pub fn is_mixed(&self) -> bool {
        self.observed.len() > 1
    }
}
