//! Conversation session management.
//!
//! A `SessionHandle` is the provider-side conversational context: model,
//! system instruction, and the turns exchanged so far. The
//! `SessionManager` owns exactly one live handle and swaps it out when the
//! model variant changes or the conversation is cleared.

mod handle;
mod manager;

pub use handle::SessionHandle;
pub use manager::{ModelCatalog, SessionManager};
