use std::collections::HashSet;

use crate::status::{EMPTY_INPUT_TEXT, EMPTY_QUERY_TEXT};

/// Pre-submission validation failures. No request is sent when one occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{}", EMPTY_INPUT_TEXT)]
    EmptyInput,
    #[error("{}", EMPTY_QUERY_TEXT)]
    EmptyQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    Extract,
    Search { search_term: String },
}

/// A validated job: a non-empty set of distinct, non-empty URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub kind: JobKind,
    pub urls: Vec<String>,
}

impl JobRequest {
    pub fn extract(raw_urls: &str) -> Result<Self, InputError> {
        let urls = non_empty_urls(raw_urls)?;
        Ok(Self {
            kind: JobKind::Extract,
            urls,
        })
    }

    /// The query is sent exactly as typed; only an empty one is rejected.
    pub fn search(raw_urls: &str, query: &str) -> Result<Self, InputError> {
        let urls = non_empty_urls(raw_urls)?;
        if query.is_empty() {
            return Err(InputError::EmptyQuery);
        }
        Ok(Self {
            kind: JobKind::Search {
                search_term: query.to_string(),
            },
            urls,
        })
    }

    pub fn search_term(&self) -> Option<&str> {
        match &self.kind {
            JobKind::Extract => None,
            JobKind::Search { search_term } => Some(search_term),
        }
    }
}

/// Splits newline-separated URL text into a duplicate-free list.
///
/// Lines are trimmed and blank lines dropped; the first occurrence of each URL
/// keeps its position.
pub fn normalize_urls(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(ToOwned::to_owned)
        .collect()
}

fn non_empty_urls(raw: &str) -> Result<Vec<String>, InputError> {
    let urls = normalize_urls(raw);
    if urls.is_empty() {
        Err(InputError::EmptyInput)
    } else {
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_and_blank_lines_collapse() {
        let urls = normalize_urls("http://a.test\nhttp://a.test\n\nhttp://b.test");
        assert_eq!(urls, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn crlf_and_padding_are_ignored() {
        let urls = normalize_urls("  http://a.test \r\nhttp://a.test\r\n\t\r\n");
        assert_eq!(urls, vec!["http://a.test"]);
    }

    #[test]
    fn blank_input_is_rejected() {
        assert_eq!(JobRequest::extract(""), Err(InputError::EmptyInput));
        assert_eq!(JobRequest::extract("\n  \n\n"), Err(InputError::EmptyInput));
    }

    #[test]
    fn search_requires_a_query_after_urls() {
        assert_eq!(JobRequest::search("", ""), Err(InputError::EmptyInput));
        assert_eq!(
            JobRequest::search("http://a.test", ""),
            Err(InputError::EmptyQuery)
        );
        let request = JobRequest::search("http://a.test", "budget").unwrap();
        assert_eq!(request.search_term(), Some("budget"));
        assert_eq!(request.urls, vec!["http://a.test"]);
    }

    #[test]
    fn search_term_is_kept_as_typed() {
        let request = JobRequest::search("http://a.test", " new york ").unwrap();
        assert_eq!(request.search_term(), Some(" new york "));

        let request = JobRequest::search("http://a.test", "   ").unwrap();
        assert_eq!(request.search_term(), Some("   "));
    }
}
