//! Business directory rows: phone, address and name/contact disambiguation.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use scraper::Html;
use townfeed_core::{BusinessRecord, Locale};

use crate::blocks::{business_blocks, Extraction};
use crate::error::ScraperError;
use crate::normalize::{collapse_whitespace, normalize_text, reinsert_spaces};
use crate::vocab::{
    alternation, is_business_suffix, is_conjunction, ADDRESS_FIELD_LABELS, BUSINESS_SUFFIXES,
    STREET_DIRECTIONS, STREET_TYPES,
};

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Phone\s*:\s*(\d{3})[-.\s]?(\d{3})[-.\s]?(\d{4})").expect("valid phone regex")
});

/// One capitalized personal-name token, including `McDonald`, `O'Brien` and
/// hyphenated surnames.
const NAME_TOKEN: &str = r"(?:(?:Mc|Mac)[A-Z][a-z]+|[A-Z]'[A-Z][a-z]+|[A-Z][a-z]+(?:-[A-Z][a-z]+)?)";

static NAME_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NAME_TOKEN}$")).expect("valid name token regex"));

/// `<name ending in a suffix> <0-2 name tokens, optionally joined by and/&>`.
static SUFFIX_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<name>.*\b(?i:{suffixes})\.?)(?:\s+(?P<contact>{tok}(?:\s+(?:(?:and|&)\s+)?{tok})?))?$",
        suffixes = alternation(BUSINESS_SUFFIXES),
        tok = NAME_TOKEN,
    ))
    .expect("valid suffix split regex")
});

/// Trailing-token counts tried when no suffix splits the text.
const TRAILING_CONTACT_LENGTHS: [usize; 3] = [2, 3, 1];

const MIN_NAME_CHARS: usize = 2;

/// Turns a normalized directory row into a [`BusinessRecord`].
///
/// Addresses must sit in the configured locale; rows for other towns or
/// with incomplete addresses are unparseable.
#[derive(Debug, Clone)]
pub struct BusinessParser {
    address: Regex,
    city: String,
    province: String,
}

impl BusinessParser {
    /// # Errors
    ///
    /// Returns [`ScraperError::Pattern`] if the locale produces an invalid
    /// address pattern.
    pub fn new(locale: &Locale) -> Result<Self, ScraperError> {
        let address = Regex::new(&address_pattern(locale))?;
        Ok(Self {
            address,
            city: locale.city.trim().to_owned(),
            province: locale.province.trim().to_ascii_uppercase(),
        })
    }

    /// Parses one normalized row. Returns `None` when the row has no full
    /// address or no usable name.
    #[must_use]
    pub fn parse(&self, text: &str, source_url: &str) -> Option<BusinessRecord> {
        let (phone, rest) = extract_phone(text);

        let Some(caps) = self.address.captures(&rest) else {
            tracing::debug!(block = %text, "no address match; row unparseable");
            return None;
        };
        let matched = caps.get(0)?;
        let address = self.canonical_address(&caps);

        let remaining = format!("{} {}", &rest[..matched.start()], &rest[matched.end()..]);
        let remaining = reinsert_spaces(&collapse_whitespace(&remaining));
        let (name, contact) = split_name_contact(trim_separators(&remaining));

        if name.chars().count() < MIN_NAME_CHARS {
            tracing::debug!(block = %text, "business name too short; row unparseable");
            return None;
        }

        Some(BusinessRecord {
            name,
            contact,
            phone,
            address,
            source_url: source_url.to_owned(),
        })
    }

    fn canonical_address(&self, caps: &Captures<'_>) -> String {
        let street = caps
            .name("street")
            .map(|m| collapse_whitespace(m.as_str()))
            .unwrap_or_default();
        let postal: String = caps
            .name("postal")
            .map(|m| m.as_str())
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        let (fsa, ldu) = postal.split_at(postal.len().min(3));
        format!("{street}, {}, {} {fsa} {ldu}", self.city, self.province)
    }
}

/// Extracts every business from a directory page.
#[must_use]
pub fn extract_businesses(
    html: &str,
    source_url: &str,
    parser: &BusinessParser,
) -> Extraction<BusinessRecord> {
    let document = Html::parse_document(html);
    let mut extraction = Extraction::default();

    for raw in business_blocks(&document) {
        extraction.blocks += 1;
        let text = normalize_text(&raw);
        match parser.parse(&text, source_url) {
            Some(record) => extraction.records.push(record),
            None => extraction.skipped += 1,
        }
    }

    extraction
}

/// Removes the `Phone:` clause, returning the number as `ddd-ddd-dddd`
/// together with the remaining text.
#[must_use]
pub fn extract_phone(text: &str) -> (Option<String>, String) {
    match PHONE.captures(text) {
        Some(caps) => {
            let phone = format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
            let rest = PHONE.replace(text, " ").into_owned();
            (Some(phone), rest)
        }
        None => (None, text.to_owned()),
    }
}

/// Splits a business name from a trailing contact person.
///
/// Tries, in order: a known business suffix followed by up to two name
/// tokens; a short run of trailing name tokens; otherwise the whole text is
/// the name.
#[must_use]
pub fn split_name_contact(text: &str) -> (String, String) {
    if let Some(caps) = SUFFIX_SPLIT.captures(text) {
        let name = caps.name("name").map_or("", |m| m.as_str()).trim();
        let contact = caps.name("contact").map_or("", |m| m.as_str()).trim();
        return (name.to_owned(), contact.to_owned());
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    for len in TRAILING_CONTACT_LENGTHS {
        if len >= tokens.len() {
            continue;
        }
        let (name, contact) = tokens.split_at(tokens.len() - len);
        if is_contact_run(contact) {
            return (name.join(" "), contact.join(" "));
        }
    }

    (text.to_owned(), String::new())
}

fn is_contact_run(tokens: &[&str]) -> bool {
    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return false;
    };
    if is_conjunction(first) || is_conjunction(last) || is_business_suffix(last) {
        return false;
    }
    if tokens.len() == 3 && !is_conjunction(tokens[1]) {
        return false;
    }
    tokens
        .iter()
        .all(|t| is_conjunction(t) || NAME_TOKEN_RE.is_match(t))
}

fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '-' | '|' | ':' | ';'))
}

/// Street, city, province and postal code in that order, with optional
/// field labels and punctuation between the parts.
fn address_pattern(locale: &Locale) -> String {
    let label = format!(r"(?:\b(?i:{})\s*:?\s*)?", alternation(ADDRESS_FIELD_LABELS));
    let sep = format!(r"[\s,]*{label}");
    format!(
        concat!(
            r"{label}(?P<street>",
            r"(?:(?:#|(?i:unit|suite|bay)\s*)\d{{1,5}}[A-Za-z]?\s*[-,]?\s*)?",
            r"\d{{1,6}}[A-Za-z]?(?:\s*-\s*\d{{1,6}})?\s+",
            r"(?:(?:\d{{1,3}}(?:st|nd|rd|th)?|[A-Z][A-Za-z'.]*)\s+){{0,3}}",
            r"(?:{types})\.?(?:\s+(?:{dirs})\b)?",
            r")",
            r"{sep}(?P<city>(?i:{city}))",
            r"{sep}(?P<province>(?i:{province}))\.?",
            r"{sep}(?P<postal>[A-Za-z]\d[A-Za-z]\s?\d[A-Za-z]\d)",
        ),
        types = alternation(STREET_TYPES),
        dirs = alternation(STREET_DIRECTIONS),
        label = label,
        sep = sep,
        city = regex::escape(locale.city.trim()),
        province = regex::escape(locale.province.trim()),
    )
}

#[cfg(test)]
#[path = "business_test.rs"]
mod tests;
