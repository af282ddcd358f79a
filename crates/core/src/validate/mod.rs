//! Structural validation of loaded index snapshots.
//!
//! The table has no failure modes of its own, so every problem found here is
//! a generator defect (or a hand-edited file). Errors break the guarantees
//! consumers rely on (unique, non-empty keys; non-empty anchors). Warnings
//! flag data that still loads but will not behave the way the browser search
//! expects.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::mangle_key;
use crate::model::SearchIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Kind of structural problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    EmptyKey,
    DuplicateKey,
    EmptyName,
    NoOccurrences,
    EmptyAnchor,
    MissingFragment,
    KeyNameMismatch,
    UnsortedKeys,
    EmptyScope,
    BucketMismatch,
}

impl IssueKind {
    pub fn severity(self) -> Severity {
        match self {
            IssueKind::EmptyKey
            | IssueKind::DuplicateKey
            | IssueKind::EmptyName
            | IssueKind::NoOccurrences
            | IssueKind::EmptyAnchor
            | IssueKind::MissingFragment => Severity::Error,
            IssueKind::KeyNameMismatch
            | IssueKind::UnsortedKeys
            | IssueKind::EmptyScope
            | IssueKind::BucketMismatch => Severity::Warning,
        }
    }
}

/// A single finding, anchored to the entry that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    /// Position of the entry in the table.
    pub entry: usize,
    pub key: String,
    pub message: String,
    /// File the entry came from, when validating loaded files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ValidationIssue {
    fn new(kind: IssueKind, entry: usize, key: &str, message: String) -> Self {
        Self { severity: kind.severity(), kind, entry, key: key.to_string(), message, source: None }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "{source}: ")?;
        }
        write!(
            f,
            "{} [entry {}, key '{}']: {}",
            self.severity.as_str(),
            self.entry,
            self.key,
            self.message
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub entries_checked: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// No errors (warnings are allowed).
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    /// No errors and no warnings.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn has(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    /// Tag every issue with the file it came from.
    pub fn with_source(mut self, source: &str) -> Self {
        for issue in &mut self.issues {
            issue.source = Some(source.to_string());
        }
        self
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.entries_checked += other.entries_checked;
        self.issues.extend(other.issues);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries checked, {} error(s), {} warning(s)",
            self.entries_checked,
            self.errors().count(),
            self.warnings().count()
        )
    }
}

/// Run every structural check against an index snapshot.
pub fn validate(index: &SearchIndex) -> ValidationReport {
    let mut issues = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut previous_key: Option<&str> = None;

    for (pos, entry) in index.entries().iter().enumerate() {
        let key = entry.key.as_str();

        if key.is_empty() {
            issues.push(ValidationIssue::new(
                IssueKind::EmptyKey,
                pos,
                key,
                format!("entry for '{}' has an empty key", entry.name),
            ));
        } else if !seen.insert(key) {
            issues.push(ValidationIssue::new(
                IssueKind::DuplicateKey,
                pos,
                key,
                "key appears more than once in the table".to_string(),
            ));
        }

        if entry.name.is_empty() {
            issues.push(ValidationIssue::new(
                IssueKind::EmptyName,
                pos,
                key,
                "entry has an empty display name".to_string(),
            ));
        } else if !key.is_empty() && mangle_key(&entry.name) != key {
            issues.push(ValidationIssue::new(
                IssueKind::KeyNameMismatch,
                pos,
                key,
                format!("key does not match mangled name '{}'", mangle_key(&entry.name)),
            ));
        }

        if entry.occurrences.is_empty() {
            issues.push(ValidationIssue::new(
                IssueKind::NoOccurrences,
                pos,
                key,
                "entry has no occurrences".to_string(),
            ));
        }

        for (n, occ) in entry.occurrences.iter().enumerate() {
            if occ.anchor.is_empty() {
                issues.push(ValidationIssue::new(
                    IssueKind::EmptyAnchor,
                    pos,
                    key,
                    format!("occurrence {n} has an empty anchor"),
                ));
            } else if occ.anchor.fragment.as_deref() == Some("") {
                issues.push(ValidationIssue::new(
                    IssueKind::MissingFragment,
                    pos,
                    key,
                    format!("occurrence {n} has an empty fragment in '{}'", occ.anchor),
                ));
            }
            if occ.scope.trim().is_empty() {
                issues.push(ValidationIssue::new(
                    IssueKind::EmptyScope,
                    pos,
                    key,
                    format!("occurrence {n} has no scope in its label"),
                ));
            }
        }

        if let Some(prev) = previous_key {
            if !key.is_empty() && key < prev {
                issues.push(ValidationIssue::new(
                    IssueKind::UnsortedKeys,
                    pos,
                    key,
                    format!("key sorts before previous key '{prev}'"),
                ));
            }
        }
        if !key.is_empty() {
            previous_key = Some(key);
        }
    }

    if index.bucket.is_some() {
        check_bucket(index, &mut issues);
    }

    ValidationReport { entries_checked: index.len(), issues }
}

/// Every key in a bucketed file should start with the same character.
fn check_bucket(index: &SearchIndex, issues: &mut Vec<ValidationIssue>) {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for entry in index.entries() {
        if let Some(first) = entry.key.chars().next() {
            *counts.entry(first).or_default() += 1;
        }
    }
    // Highest count wins; ties go to the smallest character.
    let Some(majority) =
        counts.iter().max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0))).map(|(c, _)| *c)
    else {
        return;
    };

    for (pos, entry) in index.entries().iter().enumerate() {
        match entry.key.chars().next() {
            Some(first) if first != majority => issues.push(ValidationIssue::new(
                IssueKind::BucketMismatch,
                pos,
                &entry.key,
                format!("key does not start with '{majority}' like the rest of this file"),
            )),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Occurrence, SymbolEntry};

    fn entry(key: &str, name: &str) -> SymbolEntry {
        SymbolEntry::new(key, name)
            .with_occurrence(Occurrence::from_label("../x_8c.html#a1", 1, "x.c"))
    }

    #[test]
    fn clean_index_passes() {
        let index = SearchIndex::from_entries(vec![
            entry("io_5fnew", "io_new"),
            entry("io_5fref", "io_ref"),
        ]);
        let report = validate(&index);
        assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
        assert_eq!(report.entries_checked, 2);
    }

    #[test]
    fn empty_and_duplicate_keys_are_errors() {
        let index = SearchIndex::from_entries(vec![
            entry("", "ghost"),
            entry("a", "a"),
            entry("a", "a"),
        ]);
        let report = validate(&index);
        assert!(!report.is_ok());
        assert!(report.has(IssueKind::EmptyKey));
        let dup: Vec<_> =
            report.issues.iter().filter(|i| i.kind == IssueKind::DuplicateKey).collect();
        assert_eq!(dup.len(), 1);
        assert_eq!(dup[0].entry, 2);
    }

    #[test]
    fn empty_anchor_and_missing_occurrences_are_errors() {
        let index = SearchIndex::from_entries(vec![
            SymbolEntry::new("a", "a"),
            SymbolEntry::new("b", "b").with_occurrence(Occurrence::from_label("", 1, "b.c")),
            SymbolEntry::new("c", "c").with_occurrence(Occurrence::from_label("c.html#", 1, "c.c")),
        ]);
        let report = validate(&index);
        assert!(report.has(IssueKind::NoOccurrences));
        assert!(report.has(IssueKind::EmptyAnchor));
        assert!(report.has(IssueKind::MissingFragment));
        assert_eq!(report.errors().count(), 3);
    }

    #[test]
    fn warnings_do_not_fail_report() {
        let index = SearchIndex::from_entries(vec![
            entry("zeta", "zeta"),
            entry("alpha", "Beta"),
            SymbolEntry::new("gamma", "gamma")
                .with_occurrence(Occurrence::from_label("g.html#a", 1, "")),
        ]);
        let report = validate(&index);
        assert!(report.is_ok());
        assert!(report.has(IssueKind::UnsortedKeys));
        assert!(report.has(IssueKind::KeyNameMismatch));
        assert!(report.has(IssueKind::EmptyScope));
        assert_eq!(report.warnings().count(), 3);
    }

    #[test]
    fn bucket_mismatch_flags_minority_keys() {
        let index = SearchIndex::from_entries(vec![
            entry("ia", "ia"),
            entry("ib", "ib"),
            entry("ja", "ja"),
        ])
        .with_origin(None, Some("9".into()));
        let report = validate(&index);
        let mismatches: Vec<_> =
            report.issues.iter().filter(|i| i.kind == IssueKind::BucketMismatch).collect();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].key, "ja");
    }

    #[test]
    fn merge_and_display_summarise() {
        let mut report = validate(&SearchIndex::from_entries(vec![entry("a", "a")]));
        report.merge(
            validate(&SearchIndex::from_entries(vec![SymbolEntry::new("b", "b")]))
                .with_source("b.js"),
        );
        assert_eq!(report.entries_checked, 2);
        assert_eq!(report.to_string(), "2 entries checked, 1 error(s), 0 warning(s)");
        assert_eq!(report.issues[0].source.as_deref(), Some("b.js"));
        assert!(report.issues[0].to_string().starts_with("b.js: error [entry 0, key 'b']"));
    }
}
