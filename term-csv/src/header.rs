//! Header presence decision and header row checks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Message, MessageTag};

/// Whether the first row of the stream is a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderDecision {
    /// No row has been seen yet
    Unresolved,
    /// The first row is a header
    Present,
    /// The first row is data
    Absent,
}

/// Decides, once per run, whether the first row is a header.
#[derive(Debug, Clone)]
pub struct HeaderResolver {
    setting: Option<bool>,
    decision: HeaderDecision,
}

impl HeaderResolver {
    /// Creates a resolver for an explicit setting, or `None` when unspecified.
    pub fn new(setting: Option<bool>) -> Self {
        Self {
            setting,
            decision: HeaderDecision::Unresolved,
        }
    }

    /// Resolves the decision if it is still open.
    ///
    /// Returns an `assumed_header` info message when no setting was given and the
    /// header had to be assumed. Later calls change nothing and return `None`.
    pub fn resolve(&mut self) -> Option<Message> {
        if self.decision != HeaderDecision::Unresolved {
            return None;
        }
        match self.setting {
            Some(true) => {
                self.decision = HeaderDecision::Present;
                None
            }
            Some(false) => {
                self.decision = HeaderDecision::Absent;
                None
            }
            None => {
                debug!("no header setting given, assuming the first row is a header");
                self.decision = HeaderDecision::Present;
                Some(Message::new(MessageTag::AssumedHeader))
            }
        }
    }

    /// The current decision.
    pub fn decision(&self) -> HeaderDecision {
        self.decision
    }

    /// Returns true once the decision is `Present`.
    pub fn has_header(&self) -> bool {
        self.decision == HeaderDecision::Present
    }
}

/// Outcome of [`check_header`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCheck {
    /// The row can serve as a header
    pub usable: bool,
    /// At most one `duplicate_column_name` and one `empty_column_name` warning
    pub warnings: Vec<Message>,
}

/// Checks the column names of a header row.
///
/// Duplicates are case-sensitive. Each kind of problem is reported once per call,
/// with every offending name collected into the message content.
pub fn check_header<S: AsRef<str>>(names: &[S], row: usize) -> HeaderCheck {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for name in names.iter().map(AsRef::as_ref) {
        if name.trim().is_empty() {
            continue;
        }
        if !seen.insert(name) && !duplicates.contains(&name) {
            duplicates.push(name);
        }
    }
    if !duplicates.is_empty() {
        warnings.push(
            Message::new(MessageTag::DuplicateColumnName)
                .at_row(row)
                .with_content(duplicates.join(", ")),
        );
    }

    let empty_columns: Vec<usize> = names
        .iter()
        .enumerate()
        .filter(|(_, name)| name.as_ref().trim().is_empty())
        .map(|(i, _)| i + 1)
        .collect();
    if let Some(&first) = empty_columns.first() {
        let mut msg = Message::new(MessageTag::EmptyColumnName).at_row(row);
        if empty_columns.len() == 1 {
            msg = msg.at_column(first);
        }
        warnings.push(msg);
    }

    HeaderCheck {
        usable: !names.is_empty(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_settings_emit_nothing() {
        let mut present = HeaderResolver::new(Some(true));
        assert_eq!(present.resolve(), None);
        assert_eq!(present.decision(), HeaderDecision::Present);

        let mut absent = HeaderResolver::new(Some(false));
        assert_eq!(absent.resolve(), None);
        assert!(!absent.has_header());
    }

    #[test]
    fn test_unspecified_assumes_header_once() {
        let mut resolver = HeaderResolver::new(None);
        assert_eq!(resolver.decision(), HeaderDecision::Unresolved);
        let info = resolver.resolve().unwrap();
        assert_eq!(info.tag, MessageTag::AssumedHeader);
        assert!(resolver.has_header());
        assert_eq!(resolver.resolve(), None);
    }

    #[test]
    fn test_duplicate_names_aggregate_into_one_warning() {
        let check = check_header(&["a", "b", "a", "b", "a", "B"], 1);
        assert!(check.usable);
        assert_eq!(check.warnings.len(), 1);
        assert_eq!(check.warnings[0].tag, MessageTag::DuplicateColumnName);
        assert_eq!(check.warnings[0].content.as_deref(), Some("a, b"));
    }

    #[test]
    fn test_empty_names() {
        let check = check_header(&["minimum", ""], 1);
        assert!(check.usable);
        assert_eq!(check.warnings.len(), 1);
        assert_eq!(check.warnings[0].tag, MessageTag::EmptyColumnName);
        assert_eq!(check.warnings[0].column, Some(2));

        let several = check_header(&["", "x", " "], 1);
        assert_eq!(several.warnings.len(), 1);
        assert_eq!(several.warnings[0].column, None);
    }

    #[test]
    fn test_blank_names_are_not_duplicates() {
        let check = check_header(&["", ""], 1);
        assert_eq!(check.warnings.len(), 1);
        assert_eq!(check.warnings[0].tag, MessageTag::EmptyColumnName);
    }

    #[test]
    fn test_empty_row_is_not_usable() {
        let names: [&str; 0] = [];
        assert!(!check_header(&names, 1).usable);
    }
}
