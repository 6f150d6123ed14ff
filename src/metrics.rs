//! TextMetrics - character, word, line and paragraph counts for a text body.
//!
//! [`compute`] makes a single pass over the text so it can run on every
//! keystroke.

use serde::{Deserialize, Serialize};

/// Characters per manuscript page.
pub const MANUSCRIPT_PAGE_CHARS: usize = 400;

/// Character limit of a post on Twitter/X.
pub const TWITTER_LIMIT: usize = 140;

/// Character limit of an Instagram caption.
pub const INSTAGRAM_LIMIT: usize = 2200;

/// Character counts projected against social platform limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsCounts {
    pub twitter: usize,
    pub instagram: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetricsResult {
    /// Unicode code points.
    pub total_chars: usize,
    pub total_chars_without_space: usize,
    /// UTF-8 encoded length.
    pub byte_size: usize,
    pub line_count: usize,
    pub word_count: usize,
    pub paragraph_count: usize,
    pub manuscript_pages: usize,
    pub sns: SnsCounts,
}

impl TextMetricsResult {
    /// Characters left before the Twitter/X limit, zero once exceeded.
    pub fn twitter_remaining(&self) -> usize {
        TWITTER_LIMIT.saturating_sub(self.sns.twitter)
    }

    /// Characters left before the Instagram caption limit, zero once exceeded.
    pub fn instagram_remaining(&self) -> usize {
        INSTAGRAM_LIMIT.saturating_sub(self.sns.instagram)
    }
}

/// Compute all metrics for `text`.
///
/// Paragraphs are separated by runs of whitespace holding at least two
/// newlines; a run with a single newline keeps the paragraph going.
pub fn compute(text: &str) -> TextMetricsResult {
    let mut total_chars = 0;
    let mut whitespace = 0;
    let mut newlines = 0;
    let mut word_count = 0;
    let mut paragraph_count = 0;

    let mut in_word = false;
    let mut in_paragraph = false;
    let mut newlines_in_gap = 0;

    for ch in text.chars() {
        total_chars += 1;
        if ch == '\n' {
            newlines += 1;
        }

        if ch.is_whitespace() {
            whitespace += 1;
            in_word = false;
            if ch == '\n' {
                newlines_in_gap += 1;
                if newlines_in_gap >= 2 {
                    in_paragraph = false;
                }
            }
        } else {
            if !in_word {
                word_count += 1;
                in_word = true;
            }
            if !in_paragraph {
                paragraph_count += 1;
                in_paragraph = true;
            }
            newlines_in_gap = 0;
        }
    }

    TextMetricsResult {
        total_chars,
        total_chars_without_space: total_chars - whitespace,
        byte_size: text.len(),
        line_count: if text.is_empty() { 0 } else { newlines + 1 },
        word_count,
        paragraph_count,
        manuscript_pages: total_chars.div_ceil(MANUSCRIPT_PAGE_CHARS),
        sns: SnsCounts {
            twitter: total_chars,
            instagram: total_chars,
        },
    }
}

/// Number of `'\n'`-separated segments, zero for an empty text.
pub fn line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.matches('\n').count() + 1
    }
}
