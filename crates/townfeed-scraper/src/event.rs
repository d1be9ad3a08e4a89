//! Event listings: a linked heading followed by a few sibling paragraphs,
//! one of which carries the date and time.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::{Captures, Regex};
use reqwest::Url;
use scraper::Html;
use townfeed_core::{CivilZone, EventRecord, Locale, MOUNTAIN};

use crate::blocks::{event_blocks, Extraction};
use crate::error::ParseError;
use crate::normalize::normalize_text;
use crate::tree::{is_heading_tag, scan_forward, TreeNode};

/// Siblings inspected after each heading.
pub const MAX_SIBLINGS: usize = 5;

pub const DEFAULT_EVENT_CATEGORY: &str = "community";

pub(crate) const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

const WEEKDAY: &str =
    r"(?:(?:mon|tues?|wed(?:nes)?|thu(?:rs)?|fri|sat(?:ur)?|sun)(?:day)?\.?,?\s+)?";

const RANGE_SEPARATOR: &str = r"\s*(?:-|–|—|to)\s*";

fn date_pattern(prefix: &str) -> String {
    format!(
        r"{WEEKDAY}(?P<{prefix}month>{MONTH})\s+(?P<{prefix}day>\d{{1,2}})(?:st|nd|rd|th)?,?\s+(?P<{prefix}year>\d{{4}})"
    )
}

fn time_pattern(prefix: &str) -> String {
    format!(
        r"(?P<{prefix}time>(?P<{prefix}hour>\d{{1,2}}):(?P<{prefix}minute>\d{{2}})\s*(?P<{prefix}meridiem>[ap])\.?\s*m\.?)"
    )
}

/// Date/time patterns in priority order: full date and time with optional
/// end time and `@ location`; a same-day range of two full date-times; a
/// bare date and time anywhere in the text.
static TIMING_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    let full = format!(
        r"(?i)^{date},?\s+(?:at\s+)?{start}(?:{sep}{end})?(?:\s*@\s*(?P<location>.+))?$",
        date = date_pattern(""),
        start = time_pattern(""),
        end = time_pattern("end_"),
        sep = RANGE_SEPARATOR,
    );
    let range = format!(
        r"(?i)^{date},?\s+(?:at\s+)?{start}{sep}{end_date},?\s+(?:at\s+)?{end}$",
        date = date_pattern(""),
        start = time_pattern(""),
        end_date = date_pattern("end_"),
        end = time_pattern("end_"),
        sep = RANGE_SEPARATOR,
    );
    let minimal = format!(
        r"(?i){date},?\s+(?:at\s+)?{start}",
        date = date_pattern(""),
        start = time_pattern(""),
    );
    [full, range, minimal].map(|p| Regex::new(&p).expect("valid event timing regex"))
});

/// Date, display time and optional location found in one line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTiming {
    /// Wall-clock start in the listing's civil zone.
    pub local: NaiveDateTime,
    /// Time as listed, e.g. `"7:00 PM - 9:00 PM"`.
    pub time: String,
    pub location: Option<String>,
}

/// Finds an event date and time in `text`.
///
/// Returns `Ok(None)` when nothing looks like a date and time.
///
/// # Errors
///
/// Returns [`ParseError`] when a date/time matched but names an impossible
/// calendar date or clock time.
pub fn parse_event_timing(text: &str) -> Result<Option<EventTiming>, ParseError> {
    let Some(caps) = TIMING_PATTERNS.iter().find_map(|re| re.captures(text)) else {
        return Ok(None);
    };

    let date = calendar_date(&caps)?;
    let clock = clock_time(&caps)?;

    let mut time = group(&caps, "time").to_owned();
    if let Some(end) = caps.name("end_time") {
        time = format!("{time} - {}", end.as_str());
    }

    let location = caps
        .name("location")
        .map(|m| m.as_str().trim().to_owned())
        .filter(|loc| !loc.is_empty());

    Ok(Some(EventTiming {
        local: date.and_time(clock),
        time,
        location,
    }))
}

/// Converts a 12-hour clock value to 0..=23: 12 AM is 0, 12 PM stays 12.
#[must_use]
pub fn to_24_hour(hour: u32, pm: bool) -> Option<u32> {
    match (hour, pm) {
        (0 | 13.., _) => None,
        (12, false) => Some(0),
        (12, true) => Some(12),
        (h, true) => Some(h + 12),
        (h, false) => Some(h),
    }
}

fn calendar_date(caps: &Captures<'_>) -> Result<NaiveDate, ParseError> {
    let invalid = || ParseError::InvalidDate {
        text: format!(
            "{} {}, {}",
            group(caps, "month"),
            group(caps, "day"),
            group(caps, "year")
        ),
    };
    let month = month_number(group(caps, "month")).ok_or_else(invalid)?;
    let day: u32 = group(caps, "day").parse().map_err(|_| invalid())?;
    let year: i32 = group(caps, "year").parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn clock_time(caps: &Captures<'_>) -> Result<NaiveTime, ParseError> {
    let invalid = || ParseError::InvalidTime {
        text: group(caps, "time").to_owned(),
    };
    let hour: u32 = group(caps, "hour").parse().map_err(|_| invalid())?;
    let minute: u32 = group(caps, "minute").parse().map_err(|_| invalid())?;
    let pm = group(caps, "meridiem").eq_ignore_ascii_case("p");
    let hour = to_24_hour(hour, pm).ok_or_else(invalid)?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

pub(crate) fn month_number(name: &str) -> Option<u32> {
    let key: String = name.chars().take(3).collect::<String>().to_ascii_lowercase();
    let month = match key.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

/// Builds [`EventRecord`]s for one events page.
#[derive(Debug, Clone)]
pub struct EventParser {
    zone: CivilZone,
    fallback_location: String,
    source_name: String,
    page_url: Option<Url>,
}

impl EventParser {
    #[must_use]
    pub fn new(locale: &Locale, source_name: &str, page_url: &str) -> Self {
        Self {
            zone: MOUNTAIN,
            fallback_location: locale.fallback_location(),
            source_name: source_name.to_owned(),
            page_url: Url::parse(page_url).ok(),
        }
    }

    /// Parses the event introduced by `heading`.
    ///
    /// Scans up to [`MAX_SIBLINGS`] following siblings, stopping at the next
    /// heading. The first sibling with a date and time fixes the start and
    /// ends the scan; the sibling texts before it become the description.
    /// Events that do not start strictly after `now` are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the first sibling that looks like a date
    /// holds an impossible date or time.
    pub fn parse_group<N: TreeNode>(
        &self,
        heading: &N,
        title: &str,
        href: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<EventRecord>, ParseError> {
        let mut description = Vec::new();
        let found = scan_forward(
            heading,
            MAX_SIBLINGS,
            |node| is_heading_tag(&node.tag_name()),
            |node| {
                let text = normalize_text(&node.text());
                if text.is_empty() {
                    return None;
                }
                match parse_event_timing(&text) {
                    Ok(None) => {
                        description.push(text);
                        None
                    }
                    other => other.transpose(),
                }
            },
        );

        let Some(timing) = found.transpose()? else {
            tracing::debug!(title, "no date found near event heading");
            return Ok(None);
        };

        let starts_at = self.zone.local_to_utc(timing.local);
        if starts_at <= now {
            tracing::debug!(title, %starts_at, "dropping event that has already started");
            return Ok(None);
        }

        Ok(Some(EventRecord {
            title: title.to_owned(),
            description: description.join(" "),
            starts_at,
            time: timing.time,
            location: timing
                .location
                .unwrap_or_else(|| self.fallback_location.clone()),
            category: DEFAULT_EVENT_CATEGORY.to_owned(),
            organizer: self.source_name.clone(),
            source_url: self.resolve(href),
            source_name: self.source_name.clone(),
        }))
    }

    fn resolve(&self, href: &str) -> String {
        self.page_url
            .as_ref()
            .and_then(|base| base.join(href).ok())
            .map_or_else(|| href.to_owned(), String::from)
    }
}

/// Extracts every upcoming event from an events page. A block whose date
/// cannot be converted is reported in `errors` and does not stop the page.
#[must_use]
pub fn extract_events(
    html: &str,
    parser: &EventParser,
    now: DateTime<Utc>,
) -> Extraction<EventRecord> {
    let document = Html::parse_document(html);
    let mut extraction = Extraction::default();

    for heading in event_blocks(&document) {
        extraction.blocks += 1;
        match parser.parse_group(&heading.node, &heading.title, &heading.href, now) {
            Ok(Some(record)) => extraction.records.push(record),
            Ok(None) => extraction.skipped += 1,
            Err(e) => {
                tracing::warn!(title = %heading.title, error = %e, "failed to parse event block");
                extraction.errors.push(format!("{}: {e}", heading.title));
            }
        }
    }

    extraction
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
