//! Terminal implementations of the credential and notification ports.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::ports::{CredentialAuthority, Notifier};

/// Credential authority backed by the key resolved from env/config.
///
/// There is no interactive picker in a terminal, so "opening the selector"
/// prints how to provide a key. The hint is printed at most once per run.
pub struct TerminalCredentials {
    key_present: bool,
    hinted: AtomicBool,
}

impl TerminalCredentials {
    /// Create an authority that knows whether a key was resolved.
    #[must_use]
    pub fn new(key_present: bool) -> Self {
        Self { key_present, hinted: AtomicBool::new(false) }
    }
}

impl CredentialAuthority for TerminalCredentials {
    fn has_selected_credential(&self) -> bool {
        self.key_present
    }

    fn open_credential_selector(&self) {
        if self.hinted.swap(true, Ordering::SeqCst) {
            debug!("credential hint already shown");
            return;
        }
        eprintln!(
            "Select a Gemini API key: set GEMINI_API_KEY, or add `gemini = \"...\"` under [keys] \
             in your config file. Keys: https://aistudio.google.com/apikey"
        );
    }
}

/// Prints failure notices to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify_failure(&self, message: &str) {
        eprintln!("{message}");
    }
}
