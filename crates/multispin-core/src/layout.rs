// SPDX-License-Identifier: MIT

//! Text layout: word wrap, indentation, and visible width.
//!
//! A spinner row looks like this on screen:
//!
//! ```text
//! ␣␣␣␣⠹ first row of the text that wraps
//! ␣␣␣␣␣␣second row, aligned under the text
//! └──┘└┘
//! indent prefix (glyph + space)
//! ```
//!
//! Wrapping happens on the *plain* text at
//! `columns - prefix_len - indent - 1` so the terminal never soft-wraps a
//! row behind our back (that would desynchronise the row count the redraw
//! relies on). Colour is applied after wrapping; everything measured after
//! that goes through [`visible_length`], which ignores escape sequences.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Width assumed when the terminal width cannot be queried.
pub const FALLBACK_COLUMNS: u16 = 95;

/// CSI sequences (colour, cursor motion, erase) and two-byte escapes.
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b[@-Z\\-_]").expect("escape pattern is valid")
});

// ─── Measuring ───────────────────────────────────────────────────────────────

/// Remove escape sequences, borrowing when there are none.
#[must_use]
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_ESCAPE.replace_all(text, "")
}

/// On-screen width of `text`: escape sequences count as zero, wide
/// characters as two.
#[must_use]
pub fn visible_length(text: &str) -> usize {
    strip_ansi(text).width()
}

/// Columns available for text after the prefix and indent, keeping the
/// last column free. Never less than one.
#[must_use]
pub fn available_width(columns: u16, prefix_len: usize, indent: usize) -> usize {
    usize::from(columns)
        .saturating_sub(prefix_len.saturating_add(indent).saturating_add(1))
        .max(1)
}

/// The longest leading run of `text` at most `width` columns wide.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for grapheme in strip_ansi(text).graphemes(true) {
        used += grapheme.width();
        if used > width {
            break;
        }
        out.push_str(grapheme);
    }
    out
}

// ─── Wrapping ────────────────────────────────────────────────────────────────

/// Greedy word wrap to `width` columns.
///
/// Breaks on whitespace; runs of whitespace collapse to one space. Explicit
/// newlines start a new row. A single word wider than `width` is split
/// mid-word. Always returns at least one row, possibly empty.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = visible_length(word);

            if line_width > 0 && line_width + 1 + word_width <= width {
                line.push(' ');
                line.push_str(word);
                line_width += 1 + word_width;
                continue;
            }

            if line_width > 0 {
                rows.push(std::mem::take(&mut line));
                line_width = 0;
            }

            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
            } else {
                let mut chunks = split_word(word, width);
                let last = chunks.pop().unwrap_or_default();
                rows.extend(chunks);
                line_width = visible_length(&last);
                line = last;
            }
        }

        rows.push(line);
    }

    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

/// Split one word into chunks of at most `width` columns.
///
/// Escape sequences ride along with the chunk they appear in. A grapheme
/// wider than `width` gets a chunk of its own rather than looping forever.
fn split_word(word: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut chunk_width = 0;
    let mut cursor = 0;

    let mut push_plain = |plain: &str, chunk: &mut String, chunk_width: &mut usize| {
        for grapheme in plain.graphemes(true) {
            let g_width = grapheme.width();
            if *chunk_width > 0 && *chunk_width + g_width > width {
                chunks.push(std::mem::take(chunk));
                *chunk_width = 0;
            }
            chunk.push_str(grapheme);
            *chunk_width += g_width;
        }
    };

    for escape in ANSI_ESCAPE.find_iter(word) {
        push_plain(&word[cursor..escape.start()], &mut chunk, &mut chunk_width);
        chunk.push_str(escape.as_str());
        cursor = escape.end();
    }
    push_plain(&word[cursor..], &mut chunk, &mut chunk_width);

    chunks.push(chunk);
    chunks
}

// ─── Indentation ─────────────────────────────────────────────────────────────

/// Indent continuation rows so they line up under the first row's text.
///
/// The first row is returned untouched: the caller puts the indent and the
/// status prefix in front of it. Every later row gets `indent + prefix_len`
/// spaces.
#[must_use]
pub fn indent(rows: Vec<String>, prefix_len: usize, indent: usize) -> Vec<String> {
    let pad = " ".repeat(indent + prefix_len);
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| if i == 0 || pad.is_empty() { row } else { format!("{pad}{row}") })
        .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SENTENCE: &str = "im a very long sentence yay yay yay yay";

    // ── visible_length ──────────────────────────────────────────────

    #[test]
    fn visible_length_plain() {
        assert_eq!(visible_length("hello"), 5);
    }

    #[test]
    fn visible_length_ignores_colour() {
        assert_eq!(visible_length("\x1b[36mhello\x1b[39m"), 5);
    }

    #[test]
    fn visible_length_ignores_cursor_motion() {
        assert_eq!(visible_length("\x1b[2A\x1b[Kab\x1b[?25l"), 2);
    }

    #[test]
    fn visible_length_counts_wide_chars_twice() {
        assert_eq!(visible_length("日本"), 4);
    }

    #[test]
    fn visible_length_glyphs() {
        assert_eq!(visible_length("✓ done"), 6);
        assert_eq!(visible_length("⠋"), 1);
    }

    // ── available_width ─────────────────────────────────────────────

    #[test]
    fn available_width_subtracts_prefix_indent_and_margin() {
        assert_eq!(available_width(15, 3, 0), 11);
        assert_eq!(available_width(15, 3, 4), 7);
        assert_eq!(available_width(FALLBACK_COLUMNS, 2, 0), 92);
    }

    #[test]
    fn available_width_never_zero() {
        assert_eq!(available_width(4, 3, 4), 1);
    }

    #[test]
    fn available_width_saturates_on_huge_indent() {
        assert_eq!(available_width(80, 2, usize::MAX), 1);
        assert_eq!(available_width(80, usize::MAX, usize::MAX), 1);
    }

    // ── truncate ────────────────────────────────────────────────────

    #[test]
    fn truncate_keeps_leading_columns() {
        assert_eq!(truncate("[BUILD]", 3), "[BU");
        assert_eq!(truncate("ok", 5), "ok");
        assert_eq!(truncate("anything", 0), "");
    }

    #[test]
    fn truncate_never_splits_wide_chars() {
        assert_eq!(truncate("日本", 3), "日");
    }

    // ── wrap ────────────────────────────────────────────────────────

    #[test]
    fn wrap_sentence_without_indent() {
        let width = available_width(15, 3, 0);
        assert_eq!(
            wrap(SENTENCE, width),
            vec!["im a very", "long", "sentence", "yay yay yay", "yay"]
        );
    }

    #[test]
    fn wrap_sentence_with_indent() {
        let width = available_width(15, 3, 4);
        let rows = wrap(SENTENCE, width);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[..3], ["im a", "very", "long"]);
        assert_eq!(rows[3], "sentenc");
    }

    #[test]
    fn wrap_short_text_is_one_row() {
        assert_eq!(wrap("12345", 11), vec!["12345"]);
    }

    #[test]
    fn wrap_empty_text_is_one_empty_row() {
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("   ", 10), vec![""]);
    }

    #[test]
    fn wrap_force_splits_long_word() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_keeps_explicit_newlines() {
        assert_eq!(wrap("one\ntwo three", 20), vec!["one", "two three"]);
    }

    #[test]
    fn wrap_rows_fit_width() {
        let text = "the quick brown fox jumps over the lazy dog and keeps on running";
        for width in 1..30 {
            for row in wrap(text, width) {
                assert!(visible_length(&row) <= width, "{row:?} wider than {width}");
            }
        }
    }

    #[test]
    fn wrap_loses_no_words() {
        let text = "the  quick brown\tfox jumps over the lazy dog";
        let rows = wrap(text, 9);
        let rejoined = rows.join(" ");
        assert_eq!(
            rejoined.split_whitespace().collect::<Vec<_>>(),
            text.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn wrap_measures_styled_words_by_visible_width() {
        let styled = "\x1b[31mred\x1b[39m word";
        assert_eq!(wrap(styled, 8), vec![styled]);
    }

    #[test]
    fn split_word_keeps_escapes() {
        let chunks = split_word("\x1b[31mabcdef\x1b[39m", 3);
        assert_eq!(chunks, vec!["\x1b[31mabc", "def\x1b[39m"]);
    }

    #[test]
    fn split_word_wide_grapheme_wider_than_width() {
        assert_eq!(split_word("日本", 1), vec!["日", "本"]);
    }

    // ── indent ──────────────────────────────────────────────────────

    #[test]
    fn indent_pads_continuation_rows() {
        let rows = vec!["first".to_owned(), "second".to_owned()];
        assert_eq!(indent(rows, 2, 4), vec!["first", "      second"]);
    }

    #[test]
    fn indent_single_row_untouched() {
        assert_eq!(indent(vec!["only".to_owned()], 2, 4), vec!["only"]);
    }

    #[test]
    fn indent_zero_is_identity() {
        let rows = vec!["a".to_owned(), "b".to_owned()];
        assert_eq!(indent(rows.clone(), 0, 0), rows);
    }
}
