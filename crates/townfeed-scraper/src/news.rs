//! Municipal news listings.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use reqwest::Url;
use scraper::Html;
use townfeed_core::{NewsRecord, MOUNTAIN};

use crate::blocks::{news_blocks, Extraction, NewsBlock};
use crate::error::ParseError;
use crate::event::{month_number, MONTH};

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})").expect("valid ISO date regex")
});

static LONG_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?P<month>{MONTH})\s+(?P<day>\d{{1,2}})(?:st|nd|rd|th)?,?\s+(?P<year>\d{{4}})\b"
    ))
    .expect("valid long date regex")
});

/// Publication date as local midnight, from `2025-08-14` or `August 14, 2025`.
///
/// # Errors
///
/// Returns [`ParseError::InvalidDate`] for a date-shaped string that names
/// no real day.
pub fn parse_published_date(text: &str) -> Result<Option<DateTime<Utc>>, ParseError> {
    let parts = if let Some(caps) = ISO_DATE.captures(text) {
        (
            caps["year"].to_owned(),
            caps["month"].parse::<u32>().ok(),
            caps["day"].to_owned(),
            caps[0].to_owned(),
        )
    } else if let Some(caps) = LONG_DATE.captures(text) {
        (
            caps["year"].to_owned(),
            month_number(&caps["month"]),
            caps["day"].to_owned(),
            caps[0].to_owned(),
        )
    } else {
        return Ok(None);
    };

    let (year, month, day, matched) = parts;
    let invalid = || ParseError::InvalidDate {
        text: matched.clone(),
    };
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;
    let date = month
        .and_then(|m| NaiveDate::from_ymd_opt(year, m, day))
        .ok_or_else(invalid)?;

    Ok(Some(MOUNTAIN.local_to_utc(date.and_time(NaiveTime::MIN))))
}

/// Converts one listing block into a [`NewsRecord`].
///
/// # Errors
///
/// Returns [`ParseError`] when the block carries an impossible date.
pub fn parse_news(
    block: &NewsBlock,
    source_name: &str,
    page_url: &str,
) -> Result<NewsRecord, ParseError> {
    let date_source = block.date_text.as_deref().unwrap_or(&block.text);
    let published_at = parse_published_date(date_source)?;

    let source_url = Url::parse(page_url)
        .and_then(|base| base.join(&block.href))
        .map_or_else(|_| block.href.clone(), String::from);

    Ok(NewsRecord {
        title: block.title.clone(),
        summary: block.summary.clone(),
        published_at,
        source_url,
        source_name: source_name.to_owned(),
    })
}

/// Extracts every news item from a listing page.
#[must_use]
pub fn extract_news(html: &str, source_name: &str, page_url: &str) -> Extraction<NewsRecord> {
    let document = Html::parse_document(html);
    let mut extraction = Extraction::default();

    for block in news_blocks(&document) {
        extraction.blocks += 1;
        match parse_news(&block, source_name, page_url) {
            Ok(record) => extraction.records.push(record),
            Err(e) => {
                tracing::warn!(title = %block.title, error = %e, "failed to parse news block");
                extraction.errors.push(format!("{}: {e}", block.title));
            }
        }
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://www.example.ca/news";

    fn at(s: &str) -> DateTime<Utc> {
        s.parse::<DateTime<Utc>>().unwrap()
    }

    #[test]
    fn long_date_is_local_midnight() {
        // Midnight MDT = 06:00 UTC.
        assert_eq!(
            parse_published_date("Posted August 14, 2025 by Staff").unwrap(),
            Some(at("2025-08-14T06:00:00Z"))
        );
    }

    #[test]
    fn iso_date_from_datetime_attribute() {
        // Midnight MST = 07:00 UTC.
        assert_eq!(
            parse_published_date("2025-01-09T10:30:00-07:00").unwrap(),
            Some(at("2025-01-09T07:00:00Z"))
        );
    }

    #[test]
    fn missing_date_is_none() {
        assert_eq!(parse_published_date("No date here").unwrap(), None);
    }

    #[test]
    fn impossible_date_is_error() {
        assert!(matches!(
            parse_published_date("2025-02-30"),
            Err(ParseError::InvalidDate { .. })
        ));
    }

    #[test]
    fn extracts_listing() {
        let html = r#"
            <div class="news-listing"><ul>
              <li>
                <h3><a href="/news/road-closure">Road Closure on 50 Street</a></h3>
                <span class="date">August 14, 2025</span>
                <p>Crews will be repaving 50 Street next week.</p>
              </li>
              <li><a href="/news/bad">Bad Date</a><span class="date">2025-13-01</span></li>
              <li><a href="https://other.example.ca/notice">Water Notice</a></li>
            </ul></div>
        "#;
        let extraction = extract_news(html, "Wetaskiwin News", PAGE);
        assert_eq!(extraction.blocks, 3);
        assert_eq!(extraction.errors.len(), 1);
        assert_eq!(extraction.records.len(), 2);

        let first = &extraction.records[0];
        assert_eq!(first.title, "Road Closure on 50 Street");
        assert_eq!(first.summary, "Crews will be repaving 50 Street next week.");
        assert_eq!(first.published_at, Some(at("2025-08-14T06:00:00Z")));
        assert_eq!(first.source_url, "https://www.example.ca/news/road-closure");
        assert_eq!(first.source_name, "Wetaskiwin News");

        let second = &extraction.records[1];
        assert_eq!(second.source_url, "https://other.example.ca/notice");
        assert!(second.published_at.is_none());
        assert_eq!(second.summary, "");
    }
}
