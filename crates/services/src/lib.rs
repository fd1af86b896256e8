//! Domain services for the Helix Insight gateway.
//!
//! `auth` covers the GitHub sign-in flow (code exchange, identity resolution,
//! session token issuance); `chat` selects feature system prompts and
//! orchestrates streamed completions. Both expose trait seams in `ports` so
//! the HTTP layer and tests can substitute implementations.

pub mod auth;
pub mod chat;
