use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Unchanged,
    Added,
    Removed,
}

/// One run of contiguous lines sharing the same [`ChangeKind`].
///
/// `value` holds whole lines, each with its trailing `'\n'` when the source
/// line had one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub value: String,
    pub kind: ChangeKind,
}

impl ChangeRecord {
    pub fn new(kind: ChangeKind, value: impl Into<String>) -> Self {
        ChangeRecord {
            value: value.into(),
            kind,
        }
    }

    pub fn is_added(&self) -> bool {
        self.kind == ChangeKind::Added
    }

    pub fn is_removed(&self) -> bool {
        self.kind == ChangeKind::Removed
    }

    pub fn is_unchanged(&self) -> bool {
        self.kind == ChangeKind::Unchanged
    }

    /// Lines counted towards the diff statistics: the non-empty
    /// `'\n'`-separated segments of `value`. Blank lines are not counted.
    pub fn counted_lines(&self) -> usize {
        self.value.split('\n').filter(|line| !line.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counted_lines_skip_blank_segments() {
        assert_eq!(ChangeRecord::new(ChangeKind::Added, "a\nb\n").counted_lines(), 2);
        assert_eq!(ChangeRecord::new(ChangeKind::Added, "a\n\n\nb").counted_lines(), 2);
        assert_eq!(ChangeRecord::new(ChangeKind::Removed, "\n").counted_lines(), 0);
        assert_eq!(ChangeRecord::new(ChangeKind::Removed, "").counted_lines(), 0);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let record = ChangeRecord::new(ChangeKind::Removed, "gone\n");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"value":"gone\n","kind":"removed"}"#);
    }
}
