//! Isolates candidate entity fragments from a parsed page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::normalize::normalize_text;

static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static LISTING: LazyLock<Selector> =
    LazyLock::new(|| selector(".business-listing, .directory-listing, .listing"));
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| selector("th"));
static EVENT_HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h2, h3, h4"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static ARTICLE: LazyLock<Selector> =
    LazyLock::new(|| selector("article, .news-item, .news-listing li"));
static HEADING_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector("h1 a[href], h2 a[href], h3 a[href], h4 a[href]"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static DATE_ELEMENT: LazyLock<Selector> =
    LazyLock::new(|| selector("time, .date, .news-date, .published"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

/// Records parsed from one page plus per-block bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<T> {
    pub records: Vec<T>,
    /// One message per block that looked like an entity but failed to convert.
    pub errors: Vec<String>,
    /// Candidate blocks examined.
    pub blocks: usize,
    /// Blocks that matched no entity pattern.
    pub skipped: usize,
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            errors: Vec::new(),
            blocks: 0,
            skipped: 0,
        }
    }
}

/// Raw text of each directory row, cells concatenated as the page renders
/// them. Table header rows are skipped; pages without tables fall back to
/// listing containers.
#[must_use]
pub fn business_blocks(document: &Html) -> Vec<String> {
    let rows: Vec<ElementRef<'_>> = document
        .select(&ROW)
        .filter(|row| row.select(&HEADER_CELL).next().is_none())
        .collect();

    let rows = if rows.is_empty() {
        document.select(&LISTING).collect()
    } else {
        rows
    };

    rows.into_iter()
        .map(|row| row.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
        .collect()
}

/// An event heading and the link it carries.
#[derive(Debug, Clone)]
pub struct EventHeading<'a> {
    pub node: ElementRef<'a>,
    pub title: String,
    pub href: String,
}

/// Headings (`h2`..`h4`) that contain a link to an event page.
#[must_use]
pub fn event_blocks(document: &Html) -> Vec<EventHeading<'_>> {
    document
        .select(&EVENT_HEADING)
        .filter_map(|heading| {
            let link = heading
                .select(&LINK)
                .find(|a| a.value().attr("href").is_some_and(is_followable_href))?;
            let href = link.value().attr("href")?.trim().to_owned();

            let mut title = normalize_text(&link.text().collect::<String>());
            if title.is_empty() {
                title = normalize_text(&heading.text().collect::<String>());
            }
            if title.is_empty() {
                return None;
            }

            Some(EventHeading {
                node: heading,
                title,
                href,
            })
        })
        .collect()
}

/// One article teaser from a news listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsBlock {
    pub title: String,
    pub href: String,
    pub summary: String,
    /// Text of a dedicated date element, if the block has one.
    pub date_text: Option<String>,
    /// Normalized text of the whole block.
    pub text: String,
}

/// Article teasers with a followable link.
#[must_use]
pub fn news_blocks(document: &Html) -> Vec<NewsBlock> {
    document
        .select(&ARTICLE)
        .filter_map(|article| {
            let link = article
                .select(&HEADING_LINK)
                .chain(article.select(&LINK))
                .find(|a| a.value().attr("href").is_some_and(is_followable_href))?;
            let href = link.value().attr("href")?.trim().to_owned();
            let title = normalize_text(&link.text().collect::<String>());
            if title.is_empty() {
                return None;
            }

            let summary = article
                .select(&PARAGRAPH)
                .map(|p| normalize_text(&p.text().collect::<String>()))
                .find(|text| !text.is_empty() && *text != title)
                .unwrap_or_default();

            let date_text = article.select(&DATE_ELEMENT).next().map(|el| {
                el.value()
                    .attr("datetime")
                    .map_or_else(|| normalize_text(&el.text().collect::<String>()), str::to_owned)
            });

            Some(NewsBlock {
                title,
                href,
                summary,
                date_text,
                text: normalize_text(&article.text().collect::<String>()),
            })
        })
        .collect()
}

fn is_followable_href(href: &str) -> bool {
    let href = href.trim();
    !(href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:"))
}
