//! # Outfitter
//!
//! A rule-based conversational shopping assistant for a fashion catalog.
//!
//! The crate turns one free-text message at a time into a reply payload:
//! text is normalized and spell-corrected against the store vocabulary,
//! screened by a lexical frustration classifier, then routed through a
//! priority-ordered intent cascade that covers product search, per-product
//! follow-up questions (with a size-recommendation sub-flow), a slot-filling
//! outfit builder, and store FAQs. Conversation state is kept per session id
//! in an in-memory store; the HTTP layer in [`server`] is a thin boundary
//! around the core.

pub mod catalog;
pub mod dialogue;
pub mod lexicon;
pub mod nlp;
pub mod outfit;
pub mod server;

pub use catalog::{Catalog, CatalogError, Product, QueryFilter};
pub use dialogue::context::{ConversationContext, ConversationState, OutfitStep, SessionStore};
pub use dialogue::engine::Engine;
pub use dialogue::reply::{Button, Reply};
pub use outfit::{Occasion, Outfit, OutfitPreferences, Style, Weather};

/// Crate version, exposed by the `/health` endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
