/// A decoded push notification on a job's channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// One per-URL outcome; the stream continues.
    Result(ExtractionResult),
    /// Any non-`result` message. Always ends the stream for its job.
    Terminal { kind: String, message: String },
}

impl Notification {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Notification::Terminal { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub uri: String,
    pub outcome: ExtractionOutcome,
    pub timing: Timing,
}

/// Per-URL outcome. A failure here is a normal row, never a job failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Dated {
        date: String,
        date_source_text: String,
    },
    Failed {
        code: String,
        message: String,
    },
}

/// Milliseconds spent by the backend; present for successes and failures alike.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Timing {
    pub request_ms: f64,
    pub compute_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub uri: String,
    pub title: Option<String>,
    pub date: Option<String>,
    /// Already sanitized; backend markup never reaches this type.
    pub snippet: Option<RichText>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub server_time_ms: f64,
}

/// Text with optional emphasis runs, the only structure kept from a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichText {
    spans: Vec<RichSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichSpan {
    pub text: String,
    pub emphasis: bool,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        let mut rich = Self::new();
        rich.push(text, false);
        rich
    }

    /// Appends text, merging it into the last span when the emphasis matches.
    pub fn push(&mut self, text: impl Into<String>, emphasis: bool) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.emphasis == emphasis => last.text.push_str(&text),
            _ => self.spans.push(RichSpan { text, emphasis }),
        }
    }

    pub fn spans(&self) -> &[RichSpan] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn to_plain_string(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}
