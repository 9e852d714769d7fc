//! formrelay - Demo driver
//!
//! Wires the library together the way a page shell would: applies persisted
//! accessibility preferences, restores any saved draft, merges command-line
//! field values, and runs one submission through the relay.

use anyhow::Result;
use formrelay::client::{RelayClient, RelayTransport};
use formrelay::session::{EMAIL_FIELD, MESSAGE_FIELD, NAME_FIELD};
use formrelay::{
    Config, ConnectivityMonitor, ErrorClass, FileStore, FormSession, KeyValueStore,
    PreferenceStore, PresentationContext, SessionState,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Initialize logging (stderr only, so stdout stays clean for output)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!("Relay endpoint: {}", config.relay_url);

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.storage_dir.clone()));

    // Apply persisted accessibility preferences to a fresh presentation context
    let preferences = PreferenceStore::new(store.clone(), PresentationContext::new());
    info!(
        "Applied preferences (font scale: {}%)",
        preferences.context().font_scale_percent()
    );

    let relay = Arc::new(RelayClient::new(&config)) as Arc<dyn RelayTransport>;
    let connectivity = Arc::new(ConnectivityMonitor::new());

    let mut session = FormSession::new("contact", store, relay, connectivity, &config);
    session.restore();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [name, email, message] => {
            session.edit_field(NAME_FIELD, name);
            session.edit_field(EMAIL_FIELD, email);
            session.edit_field(MESSAGE_FIELD, message);
        }
        [] if !session.fields().is_empty() => {
            info!("Submitting restored draft");
        }
        _ => {
            eprintln!("usage: formrelay <name> <email> <message>");
            eprintln!("       formrelay            (resubmit a saved draft)");
            anyhow::bail!("expected three arguments or a saved draft");
        }
    }

    session.submit();

    match session.state() {
        SessionState::Succeeded => {
            println!("Message sent.");
            session.dismiss();
            Ok(())
        }
        SessionState::Failed { class, message } => {
            let tone = match class {
                ErrorClass::Network | ErrorClass::Validation => "warning",
                _ => "error",
            };
            eprintln!("{}: {}", tone, message);
            anyhow::bail!("submission failed: {}", message)
        }
        state => anyhow::bail!("unexpected session state after submit: {:?}", state),
    }
}
