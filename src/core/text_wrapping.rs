//! Word wrapping for the conversation pane.
//!
//! Text is wrapped ahead of rendering so the renderer knows exactly how many
//! rows a conversation occupies; ratatui's `Paragraph` does not expose the
//! wrapped line count. Rows are measured in terminal columns, not chars.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wraps `text` to rows of at most `width` columns.
///
/// Explicit newlines always start a new row. Words longer than a row are
/// split at the column limit. A zero width returns the input lines unchanged.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.split('\n').map(str::to_string).collect();
    }

    let mut rows = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, width, &mut rows);
    }
    rows
}

/// Number of rows [`wrap_text`] would produce.
pub fn count_wrapped_lines(text: &str, width: usize) -> usize {
    wrap_text(text, width).len()
}

fn wrap_paragraph(paragraph: &str, width: usize, rows: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0;

    for word in paragraph.split_whitespace() {
        let word_width = word.width();

        if current_width > 0 && current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
            continue;
        }

        if current_width > 0 {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && current_width > 0 {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    rows.push(current);
}
