use std::fmt;

/// Longest preview, in characters, before it is cut and given an ellipsis.
pub const PREVIEW_LEN: usize = 40;

const ELLIPSIS: char = '…';

/// One captured unit of pasteboard text.
///
/// The preview is derived once at construction: surrounding whitespace is
/// trimmed, only the first line is kept and it is cut to [`PREVIEW_LEN`]
/// characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipping {
    full_text: String,
    preview: String,
}

impl Clipping {
    pub fn new(text: impl Into<String>) -> Self {
        let full_text = text.into();
        let preview = derive_preview(&full_text);

        Self { full_text, preview }
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// True when the text is nothing but whitespace and newlines.
    pub fn is_blank(text: &str) -> bool {
        text.trim().is_empty()
    }
}

impl fmt::Display for Clipping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview)
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

fn derive_preview(text: &str) -> String {
    let first_line = text.trim().split(is_line_break).next().unwrap_or_default();

    let mut chars = first_line.char_indices();
    match chars.nth(PREVIEW_LEN) {
        Some((cut, _)) => {
            let mut preview = String::with_capacity(cut + ELLIPSIS.len_utf8());
            preview.push_str(&first_line[..cut]);
            preview.push(ELLIPSIS);
            preview
        }
        None => first_line.to_owned(),
    }
}
