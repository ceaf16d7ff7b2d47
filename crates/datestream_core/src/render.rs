//! Result renderers: translate result payloads into structural view rows.
//!
//! Nothing here knows about terminals or markup; the app layer decides how a
//! row or block is drawn.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use url::Url;

use crate::{ExtractionOutcome, ExtractionResult, RichText, SearchHit};

pub const EXTRACTION_COLUMNS: [&str; 5] = [
    "Link",
    "Result",
    "Request Time",
    "Compute Time",
    "Strategy Used",
];

pub const NO_SNIPPET_TEXT: &str = "No suitable preview snippet could be generated.";

const DATE_FORMAT: &str = "%b %d, %Y";

/// Offset-less date-time layouts, with `T` or a space between date and time.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

/// Content of the `Result` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultCell {
    Date(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRow {
    pub link: Link,
    pub result: ResultCell,
    pub request_time: String,
    pub compute_time: String,
    /// Only present for rows with a date.
    pub strategy: Option<String>,
}

impl ExtractionRow {
    /// Cell texts in `EXTRACTION_COLUMNS` order.
    pub fn cells(&self) -> [&str; 5] {
        let result = match &self.result {
            ResultCell::Date(date) => date.as_str(),
            ResultCell::Error(message) => message.as_str(),
        };
        [
            self.link.text.as_str(),
            result,
            self.request_time.as_str(),
            self.compute_time.as_str(),
            self.strategy.as_deref().unwrap_or(""),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBlock {
    pub url: Link,
    pub title: Link,
    pub date_prefix: Option<String>,
    pub snippet: RichText,
}

pub fn render_extraction_row(result: &ExtractionResult) -> ExtractionRow {
    let (cell, strategy) = match &result.outcome {
        ExtractionOutcome::Dated {
            date,
            date_source_text,
        } => (
            ResultCell::Date(format_date(date)),
            Some(date_source_text.clone()),
        ),
        ExtractionOutcome::Failed { message, .. } => (ResultCell::Error(message.clone()), None),
    };

    ExtractionRow {
        link: Link {
            href: result.uri.clone(),
            text: result.uri.clone(),
        },
        result: cell,
        request_time: format_ms(result.timing.request_ms),
        compute_time: format_ms(result.timing.compute_ms),
        strategy,
    }
}

pub fn render_search_block(hit: &SearchHit) -> SearchBlock {
    SearchBlock {
        url: Link {
            href: hit.uri.clone(),
            text: shorten_url(&hit.uri),
        },
        title: Link {
            href: hit.uri.clone(),
            text: hit
                .title
                .as_deref()
                .filter(|title| !title.is_empty())
                .unwrap_or(&hit.uri)
                .to_string(),
        },
        date_prefix: hit
            .date
            .as_deref()
            .filter(|date| !date.is_empty())
            .map(|date| format!("{} - ", format_date(date))),
        snippet: hit
            .snippet
            .clone()
            .filter(|snippet| !snippet.is_empty())
            .unwrap_or_else(|| RichText::plain(NO_SNIPPET_TEXT)),
    }
}

/// Formats a date as `MMM DD, YYYY`.
///
/// Accepts RFC 3339, ISO-8601 date-times with or without seconds (and with a
/// space instead of `T`), plain `YYYY-MM-DD` and RFC 2822. Values that do not
/// parse are returned unchanged.
pub fn format_date(raw: &str) -> String {
    parse_date(raw.trim())
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(dt.date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

pub fn format_ms(ms: f64) -> String {
    format!("{ms}ms")
}

/// Host plus path, with the query string only when it is non-empty.
pub fn shorten_url(raw: &str) -> String {
    let Ok(url) = Url::parse(raw) else {
        return raw.to_string();
    };
    let mut short = format!("{}{}", url.host_str().unwrap_or_default(), url.path());
    if let Some(query) = url.query().filter(|query| !query.is_empty()) {
        short.push('?');
        short.push_str(query);
    }
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timing;

    fn result(outcome: ExtractionOutcome) -> ExtractionResult {
        ExtractionResult {
            uri: "http://a.test/post".to_string(),
            outcome,
            timing: Timing {
                request_ms: 120.0,
                compute_ms: 4.5,
            },
        }
    }

    #[test]
    fn dated_row_fills_date_and_strategy() {
        let row = render_extraction_row(&result(ExtractionOutcome::Dated {
            date: "2021-01-05".to_string(),
            date_source_text: "json-ld".to_string(),
        }));

        assert_eq!(row.result, ResultCell::Date("Jan 05, 2021".to_string()));
        assert_eq!(row.strategy.as_deref(), Some("json-ld"));
        assert_eq!(
            row.cells(),
            ["http://a.test/post", "Jan 05, 2021", "120ms", "4.5ms", "json-ld"]
        );
    }

    #[test]
    fn failed_row_has_error_cell_and_both_timings() {
        let row = render_extraction_row(&result(ExtractionOutcome::Failed {
            code: "404".to_string(),
            message: "page not found".to_string(),
        }));

        assert_eq!(row.result, ResultCell::Error("page not found".to_string()));
        assert_eq!(row.strategy, None);
        assert_eq!(row.request_time, "120ms");
        assert_eq!(row.compute_time, "4.5ms");
    }

    #[test]
    fn dates_accept_iso_variants() {
        assert_eq!(format_date("2020-02-29T23:10:00Z"), "Feb 29, 2020");
        assert_eq!(format_date("2020-02-29T23:10:00+02:00"), "Feb 29, 2020");
        assert_eq!(format_date("2019-12-01T08:00:00.250"), "Dec 01, 2019");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn dates_accept_short_and_space_separated_times() {
        assert_eq!(format_date("2021-01-05T10:00"), "Jan 05, 2021");
        assert_eq!(format_date("2021-01-05 10:00:00"), "Jan 05, 2021");
        assert_eq!(format_date("2021-01-05 10:00"), "Jan 05, 2021");
        assert_eq!(format_date("Tue, 05 Jan 2021 10:00:00 +0000"), "Jan 05, 2021");
        assert_eq!(format_date("2021-13-05 10:00"), "2021-13-05 10:00");
    }

    #[test]
    fn short_url_keeps_query_only_when_present() {
        assert_eq!(shorten_url("https://a.test/x/y"), "a.test/x/y");
        assert_eq!(shorten_url("https://a.test/x?"), "a.test/x");
        assert_eq!(shorten_url("https://a.test/x?q=1&r=2"), "a.test/x?q=1&r=2");
        assert_eq!(shorten_url("not a url"), "not a url");
    }

    #[test]
    fn search_block_falls_back_for_missing_parts() {
        let block = render_search_block(&SearchHit {
            uri: "https://a.test/p".to_string(),
            title: None,
            date: None,
            snippet: None,
        });

        assert_eq!(block.title.text, "https://a.test/p");
        assert_eq!(block.date_prefix, None);
        assert_eq!(block.snippet.to_plain_string(), NO_SNIPPET_TEXT);

        let block = render_search_block(&SearchHit {
            uri: "https://a.test/p".to_string(),
            title: Some("Budget".to_string()),
            date: Some("2022-03-04".to_string()),
            snippet: Some(RichText::plain("over budget")),
        });
        assert_eq!(block.title.text, "Budget");
        assert_eq!(block.date_prefix.as_deref(), Some("Mar 04, 2022 - "));
        assert_eq!(block.snippet.to_plain_string(), "over budget");
    }
}
