//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system. Implementations live in `src/adapters/`.

pub mod credentials;
pub mod generative_model;
pub mod notifier;

pub use credentials::CredentialAuthority;
pub use generative_model::GenerativeModel;
pub use notifier::Notifier;
