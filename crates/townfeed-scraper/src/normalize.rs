//! Text cleanup applied to every block before parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::vocab::{alternation, BOILERPLATE_PATTERNS, BUSINESS_SUFFIXES};

static BOILERPLATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BOILERPLATE_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("valid boilerplate regex"))
        .collect()
});

/// A business suffix immediately followed by a capitalized word.
static GLUED_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b((?i:{})\.?)([A-Z][a-z])",
        alternation(BUSINESS_SUFFIXES)
    ))
    .expect("valid glued-suffix regex")
});

/// Code points that render as nothing and are removed outright.
const ZERO_WIDTH: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// Cleans raw DOM text into a single trimmed line.
///
/// Every Unicode space variant becomes an ASCII space, zero-width characters
/// are dropped, boilerplate from [`BOILERPLATE_PATTERNS`] is removed and runs
/// of whitespace collapse to one space.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let mut text: String = raw
        .chars()
        .filter(|c| !ZERO_WIDTH.contains(c))
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    for pattern in BOILERPLATE.iter() {
        if pattern.is_match(&text) {
            text = pattern.replace_all(&text, " ").into_owned();
        }
    }

    collapse_whitespace(&text)
}

/// Collapses whitespace runs to one ASCII space and trims both ends.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Re-inserts word breaks lost when a directory concatenates its cells.
///
/// A space goes in front of an uppercase letter that
/// - starts a capitalized word right after a lowercase letter or closing
///   punctuation (`ShopTammy`, `Ltd.Larry`),
/// - starts a run of capitals right after a lowercase letter (`BakeryABC`),
///
/// and after a business suffix glued to the next word (`LTDLarry`).
/// `Mc`/`Mac` surname prefixes are left joined.
#[must_use]
pub fn reinsert_spaces(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);
    let mut word_start = 0usize;

    for (i, &c) in chars.iter().enumerate() {
        if c.is_whitespace() {
            word_start = i + 1;
        } else if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let starts_word = next.is_some_and(char::is_lowercase)
                && (prev.is_lowercase() || matches!(prev, '.' | ')' | ']' | ','));
            let starts_caps_run = prev.is_lowercase() && next.is_some_and(char::is_uppercase);

            if (starts_word || starts_caps_run) && !is_surname_prefix(&chars[word_start..i]) {
                out.push(' ');
                word_start = i;
            }
        }
        out.push(c);
    }

    GLUED_SUFFIX.replace_all(&out, "$1 $2").into_owned()
}

fn is_surname_prefix(word: &[char]) -> bool {
    matches!(word, ['M', 'c'] | ['M', 'a', 'c'])
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
