//! HTTP client for the external form relay.
//!
//! The relay is an opaque third-party service that delivers contact messages.
//! It accepts a POST of form fields and answers with a JSON body carrying a
//! boolean success indicator and an optional human-readable message.

use crate::config::Config;
use crate::error::{RelayError, RelayResult};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Name of the hidden bot-detection field included in every payload.
///
/// Humans never fill it, so the relay drops any submission where it is
/// non-empty. It is a payload-shape concern only and never surfaces in the
/// session state machine.
pub const HONEYPOT_FIELD: &str = "botcheck";

/// One outbound contact message, shaped for the relay.
#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub message: String,

    /// Hidden subject constant attached by the form, not typed by the user.
    pub subject: String,

    /// Access key identifying this form to the relay.
    pub access_key: String,
}

impl SubmissionPayload {
    /// Flatten the payload into wire form fields.
    ///
    /// The honeypot field is always present and always empty; there is no way
    /// for a caller to populate it.
    pub fn form_fields(&self) -> Vec<(&str, &str)> {
        vec![
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("message", self.message.as_str()),
            ("subject", self.subject.as_str()),
            (HONEYPOT_FIELD, ""),
            ("access_key", self.access_key.as_str()),
        ]
    }
}

/// What the relay acknowledged on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReceipt {
    /// Optional human-readable confirmation from the relay
    pub message: Option<String>,
}

/// JSON body the relay answers with.
#[derive(Debug, Deserialize)]
struct RelayResponse {
    success: bool,

    #[serde(default)]
    message: Option<String>,
}

/// Transport seam for submitting to the relay.
///
/// Abstracting the transport lets tests substitute a mock that counts calls
/// and scripts outcomes without any network.
pub trait RelayTransport: Send + Sync {
    /// Deliver one submission. Blocks until the relay answers or the
    /// transport gives up.
    fn submit(&self, payload: &SubmissionPayload) -> RelayResult<RelayReceipt>;
}

/// HTTP implementation of [`RelayTransport`] using `ureq`.
#[derive(Clone)]
pub struct RelayClient {
    endpoint: String,
    agent: Arc<ureq::Agent>,
}

impl RelayClient {
    /// Create a client from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            endpoint: config.relay_url.clone(),
            agent: Arc::new(agent),
        }
    }

    /// Create a client with a custom endpoint (useful for testing).
    #[doc(hidden)]
    pub fn with_endpoint(endpoint: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            endpoint,
            agent: Arc::new(agent),
        }
    }

    /// Map a ureq error to a RelayError.
    fn map_error(error: ureq::Error) -> RelayError {
        match error {
            ureq::Error::Status(code, response) => {
                let body = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                // The relay usually wraps its message in a JSON body even on
                // error statuses; fall back to the raw body otherwise.
                let message = serde_json::from_str::<RelayResponse>(&body)
                    .ok()
                    .and_then(|r| r.message)
                    .unwrap_or(body);

                match code {
                    429 => RelayError::RateLimited,
                    code if code >= 500 => RelayError::ServerError {
                        status: code,
                        message,
                    },
                    _ => RelayError::Rejected {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    RelayError::ConnectionFailed("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    RelayError::Timeout
                } else {
                    RelayError::ConnectionFailed(transport.to_string())
                }
            }
        }
    }
}

impl RelayTransport for RelayClient {
    fn submit(&self, payload: &SubmissionPayload) -> RelayResult<RelayReceipt> {
        tracing::debug!("POST {}", self.endpoint);

        let fields = payload.form_fields();
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Accept", "application/json")
            .send_form(&fields)
            .map_err(Self::map_error)?;

        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| RelayError::InvalidResponse(e.to_string()))?;

        let parsed: RelayResponse = serde_json::from_str(&body)
            .map_err(|e| RelayError::InvalidResponse(e.to_string()))?;

        if parsed.success {
            tracing::debug!("Relay accepted submission (status: {})", status);
            Ok(RelayReceipt {
                message: parsed.message,
            })
        } else {
            tracing::debug!("Relay declined submission (status: {})", status);
            Err(RelayError::Rejected {
                status,
                message: parsed
                    .message
                    .unwrap_or_else(|| "Submission was not accepted".to_string()),
            })
        }
    }
}
