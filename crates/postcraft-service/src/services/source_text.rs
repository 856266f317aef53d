//! Source text truncation before prompting

use std::borrow::Cow;

const TRUNCATION_NOTE: &str = "\n\n[Source truncated due to length]";

/// Cut `text` to at most `max_chars` characters
///
/// Prefers the last sentence end when it falls in the final 20% of the
/// window, then the last space in the final 10%, then a hard cut. Truncated
/// text always ends with a note saying so.
pub fn truncate_source(text: &str, max_chars: usize) -> Cow<'_, str> {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return Cow::Borrowed(text);
    };
    let window = &text[..cut];

    // Positions compared in chars, sliced in bytes
    let char_pos = |byte_idx: usize| window[..byte_idx].chars().count();

    if let Some(period) = window.rfind('.') {
        if char_pos(period) * 5 > max_chars * 4 {
            return Cow::Owned(format!("{}{TRUNCATION_NOTE}", &window[..=period]));
        }
    }
    if let Some(space) = window.rfind(' ') {
        if char_pos(space) * 10 > max_chars * 9 {
            return Cow::Owned(format!("{}...{TRUNCATION_NOTE}", &window[..space]));
        }
    }
    Cow::Owned(format!("{window}...{TRUNCATION_NOTE}"))
}
