//! Port for the environment-provided credential-authorization collaborator.

/// Knows whether a usage credential is selected and can ask the user for one.
pub trait CredentialAuthority: Send + Sync {
    /// Whether a usage credential is currently selected.
    fn has_selected_credential(&self) -> bool;

    /// Start the interactive credential selection flow.
    ///
    /// The outcome is not reported back; callers proceed regardless.
    fn open_credential_selector(&self);
}
