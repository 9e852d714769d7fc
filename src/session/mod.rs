//! Form session manager.
//!
//! Drives one contact-form submission end-to-end: draft autosave on every
//! field change, connectivity gating, delivery through the relay transport,
//! error classification, and recovery. All transitions happen synchronously
//! in response to discrete events; the only blocking point is the relay call,
//! and at most one attempt is in flight because `submit` is a no-op while an
//! attempt is running.

use crate::client::{RelayTransport, SubmissionPayload};
use crate::config::Config;
use crate::connectivity::ConnectivityMonitor;
use crate::draft::{DraftFormData, DraftStore};
use crate::error::RelayError;
use crate::storage::KeyValueStore;
use std::sync::Arc;

/// Form field carrying the sender's name.
pub const NAME_FIELD: &str = "name";

/// Form field carrying the sender's email address.
pub const EMAIL_FIELD: &str = "email";

/// Form field carrying the message body.
pub const MESSAGE_FIELD: &str = "message";

const OFFLINE_MESSAGE: &str = "You appear to be offline. Check your connection and try again.";
const NETWORK_MESSAGE: &str = "Error sending message. Check your connection and try again.";
const RATE_LIMIT_MESSAGE: &str = "Too many messages sent. Please wait a moment before trying again.";
const SERVER_MESSAGE: &str = "The message service is temporarily unavailable. Please try again later.";
const CONFIG_MESSAGE: &str = "The contact form is not configured correctly. Please try again later.";
const GENERIC_MESSAGE: &str = "Error sending message. Please try again.";

/// Classification of a failed attempt, for banner styling.
///
/// Exactly one class is active at a time, never a composite. `Validation` is
/// reserved for relay-side payload rejections and is not produced by any
/// current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorClass {
    #[default]
    None,
    Network,
    Server,
    Validation,
}

/// Where the session state machine currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Untouched form, no draft in play
    Idle,

    /// User input exists; the draft is being kept in sync
    Editing,

    /// An attempt is in flight; the submit affordance is disabled
    Submitting,

    /// The relay accepted the message; awaiting dismissal
    Succeeded,

    /// The attempt failed; the draft is preserved for resubmission
    Failed { class: ErrorClass, message: String },
}

/// Status portion of a [`SubmissionAttempt`] snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Snapshot of the current attempt, replaced wholesale on each submit.
///
/// The message is human-readable and safe to render directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAttempt {
    pub status: SubmissionStatus,
    pub error_class: ErrorClass,
    pub message: String,
}

/// Assistive-focus hand-off scheduled by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// Move focus to the success confirmation after delivery
    SuccessConfirmation,
}

/// Convert a relay failure into exactly one class and display string.
fn classify(error: &RelayError) -> (ErrorClass, String) {
    match error {
        RelayError::ConnectionFailed(_) | RelayError::Timeout => {
            (ErrorClass::Network, NETWORK_MESSAGE.to_string())
        }
        RelayError::RateLimited => (ErrorClass::Server, RATE_LIMIT_MESSAGE.to_string()),
        RelayError::ServerError { .. } => (ErrorClass::Server, SERVER_MESSAGE.to_string()),
        RelayError::Rejected { message, .. } => {
            let message = if message.trim().is_empty() {
                GENERIC_MESSAGE.to_string()
            } else {
                message.clone()
            };
            (ErrorClass::Server, message)
        }
        RelayError::MissingAccessKey => (ErrorClass::Server, CONFIG_MESSAGE.to_string()),
        RelayError::InvalidResponse(_) | RelayError::Other(_) => {
            (ErrorClass::Server, GENERIC_MESSAGE.to_string())
        }
    }
}

/// Owns the lifecycle of one contact-form submission.
pub struct FormSession {
    fields: DraftFormData,
    state: SessionState,
    drafts: DraftStore,
    relay: Arc<dyn RelayTransport>,
    connectivity: Arc<ConnectivityMonitor>,
    subject: String,
    access_key: Option<String>,
    pending_focus: Option<FocusTarget>,
}

impl FormSession {
    /// Create a session for one form.
    ///
    /// The subject line and access key come from configuration; a missing
    /// access key is not an error here — it surfaces as a classified failure
    /// when a submission is attempted.
    pub fn new(
        form_id: &str,
        store: Arc<dyn KeyValueStore>,
        relay: Arc<dyn RelayTransport>,
        connectivity: Arc<ConnectivityMonitor>,
        config: &Config,
    ) -> Self {
        Self {
            fields: DraftFormData::new(),
            state: SessionState::Idle,
            drafts: DraftStore::new(store, form_id),
            relay,
            connectivity,
            subject: config.subject.clone(),
            access_key: config.access_key.clone(),
            pending_focus: None,
        }
    }

    /// Repopulate fields from a persisted draft, once, on (re)mount.
    ///
    /// A non-empty draft puts the session in `Editing`. Does nothing if the
    /// session has already left `Idle`.
    pub fn restore(&mut self) {
        if self.state != SessionState::Idle {
            return;
        }

        if let Some(draft) = self.drafts.load() {
            if !draft.is_empty() {
                tracing::debug!("Restored draft with {} field(s)", draft.len());
                self.fields = draft;
                self.state = SessionState::Editing;
            }
        }
    }

    /// Record a field change and overwrite the persisted draft.
    pub fn edit_field(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
        self.drafts.save(&self.fields);

        if self.state == SessionState::Idle {
            self.state = SessionState::Editing;
        }
    }

    /// Attempt delivery through the relay.
    ///
    /// No-op while an attempt is in flight or while an undismissed success is
    /// showing. Preconditions (connectivity, configuration) fail the attempt
    /// without contacting the relay. On failure the draft is preserved so the
    /// user can resubmit — the only retry mechanism, unbounded and manual.
    pub fn submit(&mut self) -> &SessionState {
        match self.state {
            SessionState::Submitting => {
                tracing::debug!("Submit ignored: attempt already in flight");
                return &self.state;
            }
            SessionState::Succeeded => {
                tracing::debug!("Submit ignored: success not yet dismissed");
                return &self.state;
            }
            _ => {}
        }

        if !self.connectivity.is_online() {
            tracing::warn!("Submission blocked: device is offline");
            self.state = SessionState::Failed {
                class: ErrorClass::Network,
                message: OFFLINE_MESSAGE.to_string(),
            };
            return &self.state;
        }

        let Some(access_key) = self.access_key.clone() else {
            tracing::error!("Submission blocked: relay access key is not configured");
            let (class, message) = classify(&RelayError::MissingAccessKey);
            self.state = SessionState::Failed { class, message };
            return &self.state;
        };

        self.state = SessionState::Submitting;

        let payload = SubmissionPayload {
            name: self.field_value(NAME_FIELD),
            email: self.field_value(EMAIL_FIELD),
            message: self.field_value(MESSAGE_FIELD),
            subject: self.subject.clone(),
            access_key,
        };

        match self.relay.submit(&payload) {
            Ok(receipt) => {
                if let Some(note) = receipt.message {
                    tracing::debug!("Relay confirmation: {}", note);
                }
                tracing::info!("Submission delivered");
                self.drafts.clear();
                self.fields.clear();
                self.pending_focus = Some(FocusTarget::SuccessConfirmation);
                self.state = SessionState::Succeeded;
            }
            Err(e) => {
                let (class, message) = classify(&e);
                tracing::error!("Submission failed ({:?}): {}", class, e);
                self.state = SessionState::Failed { class, message };
            }
        }

        &self.state
    }

    /// Dismiss a success confirmation, returning to `Idle` and dropping any
    /// residual draft.
    pub fn dismiss(&mut self) {
        if self.state == SessionState::Succeeded {
            self.drafts.clear();
            self.pending_focus = None;
            self.state = SessionState::Idle;
        }
    }

    /// Advisory submit affordance: false while offline or mid-attempt.
    pub fn can_submit(&self) -> bool {
        self.connectivity.is_online() && self.state != SessionState::Submitting
    }

    /// Current machine state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current field values.
    pub fn fields(&self) -> &DraftFormData {
        &self.fields
    }

    /// Value of one field, if set.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Snapshot of the current attempt.
    pub fn attempt(&self) -> SubmissionAttempt {
        match &self.state {
            SessionState::Idle | SessionState::Editing => SubmissionAttempt {
                status: SubmissionStatus::Idle,
                error_class: ErrorClass::None,
                message: String::new(),
            },
            SessionState::Submitting => SubmissionAttempt {
                status: SubmissionStatus::Submitting,
                error_class: ErrorClass::None,
                message: String::new(),
            },
            SessionState::Succeeded => SubmissionAttempt {
                status: SubmissionStatus::Succeeded,
                error_class: ErrorClass::None,
                message: String::new(),
            },
            SessionState::Failed { class, message } => SubmissionAttempt {
                status: SubmissionStatus::Failed,
                error_class: *class,
                message: message.clone(),
            },
        }
    }

    /// Consume the scheduled assistive-focus hand-off, if any.
    pub fn take_pending_focus(&mut self) -> Option<FocusTarget> {
        self.pending_focus.take()
    }

    fn field_value(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }
}
