//! Live adapters that talk to real services.

pub mod gemini;
pub mod terminal;
