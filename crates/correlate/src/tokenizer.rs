use crate::aggregate::Profile;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Normalized word -> occurrences within a single bio.
pub type WordMultiset = HashMap<String, u32>;

/// Split free text into a multiset of normalized words.
///
/// `/` counts as a separator (`hiking/climbing` is two words). Each
/// whitespace-separated field loses its leading and trailing non-letters,
/// so `don't` and `well-read` keep their inner punctuation. A letter is a
/// character of the Unicode Letter category (`\p{L}`); digits, Roman
/// numerals, circled letters and combining marks are not.
pub fn tokenize(text: &str) -> WordMultiset {
    let mut words = WordMultiset::new();
    let text = text.replace('/', " ");
    for field in text.split_whitespace() {
        if let Some(word) = normalize(field) {
            *words.entry(word).or_insert(0) += 1;
        }
    }
    words
}

/// Words of the profile's bio; empty when the profile has no bio.
pub fn words_in_bio<P: Profile + ?Sized>(profile: &P) -> WordMultiset {
    profile.bio().map(tokenize).unwrap_or_default()
}

fn normalize(field: &str) -> Option<String> {
    let trimmed = trim_to_letters(field);
    if trimmed.is_empty() {
        return None;
    }
    // Lowercasing can expand a letter into letter + combining mark (`İ`).
    let lowered = trimmed.to_lowercase();
    let word = trim_to_letters(&lowered);
    (!word.is_empty()).then(|| word.to_string())
}

fn letter_span() -> &'static Regex {
    static LETTER_SPAN: OnceLock<Regex> = OnceLock::new();
    // First letter through last letter.
    LETTER_SPAN
        .get_or_init(|| Regex::new(r"(?s)\p{L}(?:.*\p{L})?").expect("letter span pattern"))
}

fn trim_to_letters(field: &str) -> &str {
    letter_span().find(field).map_or("", |span| span.as_str())
}
