//! DiffEngine - line-oriented diff between two text bodies.
//!
//! ## Example
//!
//! ```
//! use textflow::diff::{diff, ChangeKind};
//!
//! let result = diff("one\ntwo\nthree\n", "one\n2\nthree\n");
//! let kinds: Vec<ChangeKind> = result.changes.iter().map(|c| c.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![ChangeKind::Unchanged, ChangeKind::Removed, ChangeKind::Added, ChangeKind::Unchanged]
//! );
//! assert_eq!(result.stats.added_lines, 1);
//! assert_eq!(result.stats.deleted_lines, 1);
//! ```

mod change;
mod stats;

pub use change::{ChangeKind, ChangeRecord};
pub use stats::DiffStats;

use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};

/// Ordered change runs plus their statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub changes: Vec<ChangeRecord>,
    pub stats: DiffStats,
}

impl DiffResult {
    pub fn into_parts(self) -> (Vec<ChangeRecord>, DiffStats) {
        (self.changes, self.stats)
    }

    /// Rebuild the `before` text from the unchanged and removed runs.
    pub fn before_text(&self) -> String {
        self.changes
            .iter()
            .filter(|c| !c.is_added())
            .map(|c| c.value.as_str())
            .collect()
    }

    /// Rebuild the `after` text from the unchanged and added runs.
    pub fn after_text(&self) -> String {
        self.changes
            .iter()
            .filter(|c| !c.is_removed())
            .map(|c| c.value.as_str())
            .collect()
    }
}

/// Diff `before` against `after` line by line.
///
/// Between two unchanged runs every removal is reported before any addition.
pub fn diff(before: &str, after: &str) -> DiffResult {
    // only '\n' ends a line; a lone '\r' stays part of its line
    let old_lines: Vec<&str> = before.split_inclusive('\n').collect();
    let new_lines: Vec<&str> = after.split_inclusive('\n').collect();

    let text_diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_slices(&old_lines[..], &new_lines[..]);

    let changes = collect_runs(
        text_diff
            .iter_all_changes()
            .map(|change| (change.tag(), change.value())),
    );
    let stats = DiffStats::from_changes(&changes, before, after);
    DiffResult { changes, stats }
}

fn collect_runs<'a>(changes: impl IntoIterator<Item = (ChangeTag, &'a str)>) -> Vec<ChangeRecord> {
    let mut runs = Runs::default();
    let mut removed = String::new();
    let mut added = String::new();

    for (tag, line) in changes {
        match tag {
            ChangeTag::Equal => {
                runs.flush_hunk(&mut removed, &mut added);
                runs.push(ChangeKind::Unchanged, line);
            }
            ChangeTag::Delete => removed.push_str(line),
            ChangeTag::Insert => added.push_str(line),
        }
    }
    runs.flush_hunk(&mut removed, &mut added);
    runs.records
}

#[derive(Default)]
struct Runs {
    records: Vec<ChangeRecord>,
}

impl Runs {
    fn push(&mut self, kind: ChangeKind, text: &str) {
        match self.records.last_mut() {
            Some(last) if last.kind == kind => last.value.push_str(text),
            _ => self.records.push(ChangeRecord::new(kind, text)),
        }
    }

    fn flush_hunk(&mut self, removed: &mut String, added: &mut String) {
        if !removed.is_empty() {
            self.records
                .push(ChangeRecord::new(ChangeKind::Removed, std::mem::take(removed)));
        }
        if !added.is_empty() {
            self.records
                .push(ChangeRecord::new(ChangeKind::Added, std::mem::take(added)));
        }
    }
}
