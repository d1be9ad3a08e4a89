//! Integration tests for `HttpFetcher`.
//!
//! A local `wiremock` server stands in for the municipal site so no real
//! network traffic is made.

use std::time::Duration;

use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use townfeed_scraper::{Fetch, HttpFetcher, RetryPolicy, ScraperError};

const UA: &str = "Mozilla/5.0 (X11; Linux x86_64) townfeed-test";

fn fetcher(max_attempts: u32) -> HttpFetcher {
    HttpFetcher::new(5, UA, RetryPolicy::new(max_attempts, Duration::ZERO))
        .expect("failed to build test HttpFetcher")
}

#[tokio::test]
async fn returns_html_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/community-events"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h3>Fall Fair</h3>"))
        .mount(&server)
        .await;

    let url = format!("{}/community-events", server.uri());
    let page = fetcher(1).fetch(&url).await.expect("fetch should succeed");

    assert_eq!(page.status, 200);
    assert_eq!(page.html, "<h3>Fall Fair</h3>");
    assert_eq!(page.url, url);
}

#[tokio::test]
async fn sends_browser_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .and(header("user-agent", UA))
        .and(header_exists("accept-language"))
        .and(header_exists("accept"))
        .and(header("referer", format!("{}/", server.uri()).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetcher(1).fetch(&format!("{}/news", server.uri())).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");

    // The header matcher splits values on commas, so compare the raw value.
    let requests = server.received_requests().await.expect("recording enabled");
    let language = requests[0]
        .headers
        .get("accept-language")
        .and_then(|v| v.to_str().ok());
    assert_eq!(language, Some("en-CA,en;q=0.9"));
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetcher(3).fetch(&format!("{}/gone", server.uri())).await;
    assert!(
        matches!(result, Err(ScraperError::NotFound { .. })),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let page = fetcher(3)
        .fetch(&format!("{}/flaky", server.uri()))
        .await
        .expect("third attempt should succeed");
    assert_eq!(page.html, "recovered");
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let result = fetcher(3).fetch(&format!("{}/down", server.uri())).await;
    assert!(
        matches!(result, Err(ScraperError::UnexpectedStatus { status: 500, .. })),
        "expected UnexpectedStatus(500), got: {result:?}"
    );
}

#[tokio::test]
async fn rejects_unparseable_url() {
    let result = fetcher(3).fetch("not a url").await;
    assert!(matches!(result, Err(ScraperError::InvalidUrl { .. })));
}
