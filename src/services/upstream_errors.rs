//! Upstream Error Normalization
//!
//! Typed failures for calls to odds/stats endpoints and the AI parser, plus
//! the mapping from any failure to a message that is safe to show users.
//!
//! Classification reads the error's message text and walks an ordered rule
//! table; the first matching rule decides the message.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

/// Failure of an upstream call
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// Transport failure (timeout, DNS, connection refused)
    #[error("Failed to fetch {endpoint}: {reason}")]
    Network { endpoint: String, reason: String },
    /// Upstream answered with a non-success status
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body did not match the expected payload
    #[error("invalid response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
    /// A collaborator is not configured or refused to run
    #[error("{0} is unavailable")]
    Unavailable(String),
}

/// Upstream JSON error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl UpstreamError {
    /// Build an error from a non-success HTTP response
    pub fn from_response(endpoint: &str, status: u16, body: &str) -> Self {
        let body = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.error.or(parsed.message).unwrap_or_default(),
            Err(_) => body.to_string(),
        };

        UpstreamError::Status {
            endpoint: endpoint.to_string(),
            status,
            body,
        }
    }

    /// Build an error from a reqwest transport failure
    pub fn from_network_error(endpoint: &str, err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else if err.is_decode() {
            return UpstreamError::Decode {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            };
        } else {
            err.to_string()
        };

        UpstreamError::Network {
            endpoint: endpoint.to_string(),
            reason,
        }
    }

    /// Whether the call is worth repeating with backoff
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Network { .. } => true,
            UpstreamError::Status { status, .. } => *status == 429 || *status >= 500,
            UpstreamError::Decode { .. } | UpstreamError::Unavailable(_) => false,
        }
    }
}

/// Category a failure was classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RateLimited,
    Unauthorized,
    AiUnavailable,
    Network,
    NotFound,
    Unknown,
}

impl ErrorKind {
    /// Message shown to users. `context` describes what was being attempted.
    pub fn user_message(&self, context: &str) -> String {
        match self {
            ErrorKind::RateLimited => {
                "Too many requests right now. Please wait a moment and try again.".to_string()
            }
            ErrorKind::Unauthorized => {
                "Access denied by the data provider. Please check the API configuration.".to_string()
            }
            ErrorKind::AiUnavailable => {
                "AI analysis is temporarily unavailable. Using basic bet parsing instead.".to_string()
            }
            ErrorKind::Network => {
                "Unable to reach the data service. Please check your connection and try again.".to_string()
            }
            ErrorKind::NotFound => {
                "No data was found for this bet. Try a different team, player or sport.".to_string()
            }
            ErrorKind::Unknown => format!("Failed to {}. Please try again.", context),
        }
    }
}

struct ErrorRule {
    kind: ErrorKind,
    /// Receives the lower-cased error message
    matches: fn(&str) -> bool,
}

fn is_rate_limited(msg: &str) -> bool {
    msg.contains("429") || msg.contains("rate limit") || msg.contains("too many requests")
}

fn is_unauthorized(msg: &str) -> bool {
    msg.contains("401") || msg.contains("unauthorized")
}

fn is_ai_failure(msg: &str) -> bool {
    msg.contains("openai")
}

fn is_network(msg: &str) -> bool {
    msg.contains("failed to fetch") || msg.contains("network")
}

fn is_not_found(msg: &str) -> bool {
    msg.contains("404") || msg.contains("not found")
}

/// Checked top to bottom; first match wins. Anything unmatched is `Unknown`.
const RULES: &[ErrorRule] = &[
    ErrorRule { kind: ErrorKind::RateLimited, matches: is_rate_limited },
    ErrorRule { kind: ErrorKind::Unauthorized, matches: is_unauthorized },
    ErrorRule { kind: ErrorKind::AiUnavailable, matches: is_ai_failure },
    ErrorRule { kind: ErrorKind::Network, matches: is_network },
    ErrorRule { kind: ErrorKind::NotFound, matches: is_not_found },
];

/// A failure translated for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMessage {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for DisplayMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Classify a failure by its message text
pub fn classify(message: &str) -> ErrorKind {
    let msg = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&msg))
        .map(|rule| rule.kind)
        .unwrap_or(ErrorKind::Unknown)
}

/// Turn any failure into a user-safe message and log the original
pub fn normalize<E: fmt::Display + ?Sized>(err: &E, context: &str) -> DisplayMessage {
    let raw = err.to_string();
    let kind = classify(&raw);

    if kind == ErrorKind::RateLimited {
        warn!(context, kind = ?kind, "Upstream call failed: {}", raw);
    } else {
        error!(context, kind = ?kind, "Upstream call failed: {}", raw);
    }

    DisplayMessage {
        kind,
        message: kind.user_message(context),
    }
}
