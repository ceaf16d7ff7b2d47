//! Wire formats: Amber socket frames, the push envelope and HTTP bodies.

use datestream_core::{
    ExtractionOutcome, ExtractionResult, Notification, SearchHit, SearchOutcome, Timing,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sanitize::sanitize_snippet;
use crate::WireError;

/// Subject carrying job notifications on a `frontend_stream:*` topic.
pub const MESSAGE_SUBJECT: &str = "message_new";

const RESULT_TYPE: &str = "result";

/// Error row content for a result that carries neither a date nor an error code.
const MISSING_DATE_CODE: &str = "missing_date";
const MISSING_DATE_MESSAGE: &str = "missing date";

/// One socket frame, in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SocketFrame {
    Join {
        topic: String,
    },
    Leave {
        topic: String,
    },
    Message {
        topic: String,
        subject: String,
        #[serde(default)]
        payload: Value,
    },
}

impl SocketFrame {
    pub fn to_text(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_text(text: &str) -> Result<Self, WireError> {
        serde_json::from_str(text).map_err(|err| {
            // Distinguish valid json with an event we do not speak.
            match serde_json::from_str::<Value>(text) {
                Ok(value) => WireError::UnexpectedEvent(
                    value
                        .get("event")
                        .and_then(Value::as_str)
                        .unwrap_or("<none>")
                        .to_string(),
                ),
                Err(_) => WireError::from(err),
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    result: Option<WireExtractionResult>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireExtractionResult {
    uri: String,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    date_source_text: Option<String>,
    request_time_needed: f64,
    compute_time_needed: f64,
    #[serde(default)]
    message: Option<String>,
}

impl WireExtractionResult {
    /// Every result becomes a row; one without a date or code is shown as an error.
    fn into_domain(self) -> ExtractionResult {
        let outcome = match (self.code, self.date) {
            (Some(code), _) => ExtractionOutcome::Failed {
                code: match code {
                    Value::String(code) => code,
                    other => other.to_string(),
                },
                message: self.message.unwrap_or_default(),
            },
            (None, Some(date)) => ExtractionOutcome::Dated {
                date,
                date_source_text: self.date_source_text.unwrap_or_default(),
            },
            (None, None) => ExtractionOutcome::Failed {
                code: MISSING_DATE_CODE.to_string(),
                message: self
                    .message
                    .unwrap_or_else(|| MISSING_DATE_MESSAGE.to_string()),
            },
        };

        ExtractionResult {
            uri: self.uri,
            outcome,
            timing: Timing {
                request_ms: self.request_time_needed,
                compute_ms: self.compute_time_needed,
            },
        }
    }
}

/// Decodes the `payload` of a `message_new` frame.
///
/// The payload's `message` field is itself JSON, normally as an encoded string;
/// an already-decoded object is accepted too.
pub fn decode_notification(payload: &Value) -> Result<Notification, WireError> {
    let inner = payload
        .get("message")
        .ok_or(WireError::MissingField("message"))?;
    let envelope: Envelope = match inner {
        Value::String(text) => serde_json::from_str(text)?,
        other => Envelope::deserialize(other)?,
    };

    if envelope.kind == RESULT_TYPE {
        let result = envelope.result.ok_or(WireError::MissingField("result"))?;
        return Ok(Notification::Result(result.into_domain()));
    }

    Ok(Notification::Terminal {
        kind: envelope.kind,
        message: envelope.message.unwrap_or_default(),
    })
}

#[derive(Debug, Serialize)]
pub(crate) struct ExtractRequestBody<'a> {
    pub(crate) urls: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchRequestBody<'a> {
    pub(crate) urls: &'a [String],
    pub(crate) search_term: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponseBody {
    results: Vec<WireSearchHit>,
    server_time: f64,
}

#[derive(Debug, Deserialize)]
struct WireSearchHit {
    uri: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

impl SearchResponseBody {
    /// Converts to the domain outcome; snippets cross the sanitizer here.
    pub(crate) fn into_domain(self) -> SearchOutcome {
        SearchOutcome {
            hits: self
                .results
                .into_iter()
                .map(|hit| SearchHit {
                    uri: hit.uri,
                    title: hit.title,
                    date: hit.date,
                    snippet: hit.snippet.as_deref().map(sanitize_snippet),
                })
                .collect(),
            server_time_ms: self.server_time,
        }
    }
}
