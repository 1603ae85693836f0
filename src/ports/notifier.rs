//! Port for surfacing blocking, user-visible failure notices.

/// Shows a notification the user has to acknowledge.
pub trait Notifier: Send + Sync {
    /// Surface a failure message.
    fn notify_failure(&self, message: &str);
}
