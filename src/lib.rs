//! formrelay - client-side contact form session management.
//!
//! This library owns the lifecycle of one contact-form submission (draft
//! autosave, connectivity gating, delivery through an external relay, error
//! classification, recovery) together with a persisted set of accessibility
//! preferences applied to an explicitly-owned presentation context.
//!
//! # Architecture
//!
//! - **storage**: Key-value persistence (file-backed, in-memory)
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **preferences**: Persisted accessibility preference store
//! - **draft**: Autosaved form drafts for recovery across reloads
//! - **client**: HTTP transport to the external form relay
//! - **connectivity**: Online/offline tracking
//! - **session**: The submission state machine

// Re-export commonly used types
pub mod client;
pub mod config;
pub mod connectivity;
pub mod draft;
pub mod error;
pub mod preferences;
pub mod session;
pub mod storage;

pub use client::{RelayClient, RelayReceipt, RelayTransport, SubmissionPayload, HONEYPOT_FIELD};
pub use config::Config;
pub use connectivity::ConnectivityMonitor;
pub use draft::{DraftFormData, DraftStore};
pub use error::{ConfigError, RelayError, StorageError};
pub use preferences::{
    DisplayMode, PreferenceSet, PreferenceStore, PreferenceUpdate, PresentationContext,
};
pub use session::{
    ErrorClass, FocusTarget, FormSession, SessionState, SubmissionAttempt, SubmissionStatus,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
