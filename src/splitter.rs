use crate::NUM_LETTERS;

/// Whitespace as the C locale sees it; `u8::is_ascii_whitespace` leaves out `\v`.
fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Strip every byte that is not an ASCII letter and lowercase the rest.
/// Returns an empty string when nothing alphabetic remains.
pub fn normalize_bytes(token: &[u8]) -> String {
    token
        .iter()
        .filter(|b| b.is_ascii_alphabetic())
        .map(|b| b.to_ascii_lowercase() as char)
        .collect()
}

pub fn normalize(token: &str) -> String {
    normalize_bytes(token.as_bytes())
}

/// Bucket index of an already normalized word, `None` for the empty word.
pub fn letter_index(word: &str) -> Option<usize> {
    let first = *word.as_bytes().first()?;
    let index = first.wrapping_sub(b'a') as usize;
    (index < NUM_LETTERS).then_some(index)
}

pub fn letter_for(index: usize) -> char {
    (b'a' + index as u8) as char
}

pub struct Splitter;

impl Splitter {
    pub fn new() -> Self {
        Splitter
    }

    /// Normalized, non-empty words of `text` in order of appearance.
    pub fn words<'a>(&self, text: &'a [u8]) -> impl Iterator<Item = String> + 'a {
        text.split(|b| is_separator(*b))
            .filter(|token| !token.is_empty())
            .map(normalize_bytes)
            .filter(|word| !word.is_empty())
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new()
    }
}
