//! Hard wrapping for the message editor.
//!
//! SMS text is counted per character, so the editor wraps per character too:
//! a row breaks exactly where the next character would overflow, never at a
//! word boundary. That keeps every byte of the message on exactly one row and
//! makes cursor mapping a lookup instead of a re-wrap.

use unicode_width::UnicodeWidthChar;

/// Top + bottom borders
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Left + right borders
pub(super) const HORIZONTAL_OVERHEAD: u16 = 2;

/// One visual row, as a byte range into the message. Excludes the `\n`
/// that ended it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Row {
    pub start: usize,
    pub end: usize,
}

pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD).max(1)
}

fn char_width(c: char) -> u16 {
    c.width().unwrap_or(0) as u16
}

/// Split `text` into rows no wider than `width` columns.
pub(super) fn rows(text: &str, width: u16) -> Vec<Row> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut start = 0;
    let mut used = 0u16;

    for (i, c) in text.char_indices() {
        if c == '\n' {
            rows.push(Row { start, end: i });
            start = i + 1;
            used = 0;
            continue;
        }
        let w = char_width(c);
        if used > 0 && used + w > width {
            rows.push(Row { start, end: i });
            start = i;
            used = 0;
        }
        used += w;
    }
    rows.push(Row {
        start,
        end: text.len(),
    });
    rows
}

/// Row index and display column of byte offset `pos`.
pub(super) fn locate(text: &str, rows: &[Row], pos: usize) -> (usize, u16) {
    let row = rows
        .iter()
        .rposition(|r| r.start <= pos)
        .unwrap_or(0);
    let start = rows.get(row).map_or(0, |r| r.start);
    let column = text[start..pos].chars().map(char_width).sum();
    (row, column)
}

/// Byte offset in `row` closest to display column `column` without passing it.
pub(super) fn offset_at_column(text: &str, row: Row, column: u16) -> usize {
    let mut used = 0u16;
    for (i, c) in text[row.start..row.end].char_indices() {
        let w = char_width(c);
        if used + w > column {
            return row.start + i;
        }
        used += w;
    }
    row.end
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map_or(0, |(i, _)| i)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_texts<'a>(text: &'a str, width: u16) -> Vec<&'a str> {
        rows(text, width)
            .into_iter()
            .map(|r| &text[r.start..r.end])
            .collect()
    }

    #[test]
    fn test_rows_break_mid_word() {
        assert_eq!(row_texts("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_rows_respect_newlines() {
        assert_eq!(row_texts("ab\n\ncd", 10), vec!["ab", "", "cd"]);
        assert_eq!(row_texts("ab\n", 10), vec!["ab", ""]);
    }

    #[test]
    fn test_rows_of_empty_text() {
        assert_eq!(rows("", 10), vec![Row { start: 0, end: 0 }]);
    }

    #[test]
    fn test_wide_chars_wrap_by_width() {
        // Each CJK character takes two columns
        assert_eq!(row_texts("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn test_locate_after_soft_wrap() {
        let text = "abcdef";
        let r = rows(text, 3);
        assert_eq!(locate(text, &r, 2), (0, 2));
        // The wrap point belongs to the next row
        assert_eq!(locate(text, &r, 3), (1, 0));
        assert_eq!(locate(text, &r, 6), (1, 3));
    }

    #[test]
    fn test_locate_multibyte() {
        let text = "¡Hola!";
        let r = rows(text, 20);
        assert_eq!(locate(text, &r, "¡Ho".len()), (0, 3));
    }

    #[test]
    fn test_offset_at_column_clamps_to_row_end() {
        let text = "abcdef\nxy";
        let r = rows(text, 10);
        assert_eq!(offset_at_column(text, r[1], 4), text.len());
        assert_eq!(offset_at_column(text, r[0], 4), 4);
    }

    #[test]
    fn test_char_boundaries() {
        let text = "añb";
        assert_eq!(next_char_boundary(text, 1), 3);
        assert_eq!(prev_char_boundary(text, 3), 1);
        assert_eq!(prev_char_boundary(text, 0), 0);
        assert_eq!(next_char_boundary(text, text.len()), text.len());
    }
}
