//! Highlight sets for the caret's address and the word under the caret.

use decompview_api::{Highlight, HighlightKind, TextRange};

use crate::document::DecompiledDocument;

/// Every highlight for a caret at `caret` in `text`.
///
/// The address-based set and the same-word set are independent and simply
/// concatenated.
#[must_use]
pub fn derive(document: Option<&DecompiledDocument>, text: &str, caret: usize) -> Vec<Highlight> {
    let mut highlights = document.map_or_else(
        || vec![Highlight::new(caret_line(text, caret), HighlightKind::CaretLine)],
        |document| address_highlights(document, text, caret),
    );
    highlights.extend(same_word_highlights(text, caret));
    highlights
}

/// Lines belonging to the address under the caret.
///
/// Falls back to the caret's own line when the caret resolves to no address.
#[must_use]
pub fn address_highlights(
    document: &DecompiledDocument,
    text: &str,
    caret: usize,
) -> Vec<Highlight> {
    let Some(index) = document.line_at(caret) else {
        return vec![Highlight::new(caret_line(text, caret), HighlightKind::CaretLine)];
    };

    let first = document.first_of_run(index);
    let Some(address) = document.lines()[first].address() else {
        return vec![Highlight::new(
            document.lines()[index].range(),
            HighlightKind::CaretLine,
        )];
    };

    let start = document.caret_target(address).unwrap_or(first);
    document.lines()[document.address_run(start)]
        .iter()
        .map(|line| Highlight::new(line.range(), HighlightKind::AddressRun))
        .collect()
}

/// Every whole-word occurrence of the word under the caret.
#[must_use]
pub fn same_word_highlights(text: &str, caret: usize) -> Vec<Highlight> {
    let chars: Vec<char> = text.chars().collect();
    let Some(word) = word_at(&chars, caret) else {
        return Vec::new();
    };
    let needle = &chars[word.start..word.end];

    word_ranges(&chars)
        .filter(|range| &chars[range.start..range.end] == needle)
        .map(|range| Highlight::new(range, HighlightKind::SameWord))
        .collect()
}

/// Range of the text line containing `caret`, terminator excluded.
#[must_use]
pub fn caret_line(text: &str, caret: usize) -> TextRange {
    let mut start = 0;
    for (position, ch) in text.chars().enumerate() {
        if ch != '\n' {
            continue;
        }
        if position >= caret {
            return TextRange::new(start, position);
        }
        start = position + 1;
    }
    TextRange::new(start, text.chars().count().max(start))
}

const fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Word containing `caret`, or ending right at it.
fn word_at(chars: &[char], caret: usize) -> Option<TextRange> {
    let anchor = if chars.get(caret).copied().is_some_and(is_word_char) {
        caret
    } else if caret > 0 && chars.get(caret - 1).copied().is_some_and(is_word_char) {
        caret - 1
    } else {
        return None;
    };

    let mut start = anchor;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = anchor + 1;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    Some(TextRange::new(start, end))
}

fn word_ranges(chars: &[char]) -> impl Iterator<Item = TextRange> + '_ {
    let mut position = 0;
    std::iter::from_fn(move || {
        while position < chars.len() && !is_word_char(chars[position]) {
            position += 1;
        }
        if position >= chars.len() {
            return None;
        }
        let start = position;
        while position < chars.len() && is_word_char(chars[position]) {
            position += 1;
        }
        Some(TextRange::new(start, position))
    })
}
