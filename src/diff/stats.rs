use serde::{Deserialize, Serialize};

use super::change::{ChangeKind, ChangeRecord};

/// Aggregate line statistics of a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStats {
    pub added_lines: usize,
    pub deleted_lines: usize,
    /// Percentage of changed lines, rounded to one decimal place.
    pub change_rate: f64,
}

impl DiffStats {
    pub(crate) fn from_changes(changes: &[ChangeRecord], before: &str, after: &str) -> Self {
        if before.is_empty() && after.is_empty() {
            return DiffStats::default();
        }

        let mut stats = DiffStats::default();
        for change in changes {
            match change.kind {
                ChangeKind::Added => stats.added_lines += change.counted_lines(),
                ChangeKind::Removed => stats.deleted_lines += change.counted_lines(),
                ChangeKind::Unchanged => {}
            }
        }

        // an empty side still counts as one (empty) segment
        let total = segments(before).max(segments(after));
        let rate = (stats.added_lines + stats.deleted_lines) as f64 / total as f64 * 100.0;
        stats.change_rate = (rate * 10.0).round() / 10.0;
        stats
    }

    pub fn changed_lines(&self) -> usize {
        self.added_lines + self.deleted_lines
    }

    pub fn is_unchanged(&self) -> bool {
        self.changed_lines() == 0
    }
}

fn segments(text: &str) -> usize {
    text.matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_empty_is_zero() {
        assert_eq!(DiffStats::from_changes(&[], "", ""), DiffStats::default());
    }

    #[test]
    fn rate_rounds_to_one_decimal() {
        // 1 changed line out of 3 segments = 33.333..%
        let changes = vec![
            ChangeRecord::new(ChangeKind::Unchanged, "a\nb\n"),
            ChangeRecord::new(ChangeKind::Added, "c"),
        ];
        let stats = DiffStats::from_changes(&changes, "a\nb\n", "a\nb\nc");
        assert_eq!(stats.added_lines, 1);
        assert_eq!(stats.deleted_lines, 0);
        assert_eq!(stats.change_rate, 33.3);
    }

    #[test]
    fn rate_can_exceed_one_hundred() {
        let changes = vec![
            ChangeRecord::new(ChangeKind::Removed, "a"),
            ChangeRecord::new(ChangeKind::Added, "b"),
        ];
        // a one-line replacement changes two lines out of one segment
        let stats = DiffStats::from_changes(&changes, "a", "b");
        assert_eq!(stats.changed_lines(), 2);
        assert_eq!(stats.change_rate, 200.0);
    }
}
