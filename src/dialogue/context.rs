//! Per-conversation state and the session-keyed store.
//!
//! Conversation state is a sum type: the outfit slot-filling flow and the
//! measurement sub-flow are distinct variants, so impossible flag
//! combinations (awaiting measurements with no product, outfit step outside
//! outfit mode) cannot be represented. Contexts live in a store keyed by
//! session id with exclusive per-key access; turns for different sessions
//! never share state.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::outfit::{Outfit, OutfitPreferences};

/// Slot currently being filled by the outfit builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutfitStep {
    Occasion,
    Weather,
    Colors,
    Budget,
}

/// What the conversation is in the middle of, if anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConversationState {
    #[default]
    Idle,
    /// The outfit builder is collecting preferences one slot at a time.
    BuildingOutfit {
        step: OutfitStep,
        prefs: OutfitPreferences,
    },
    /// The size helper asked for height and weight for a specific product.
    /// Partial answers are sticky until both quantities arrive.
    AwaitingMeasurements {
        product_id: u32,
        height_cm: Option<f32>,
        weight_kg: Option<f32>,
    },
}

/// Mutable state carried between the turns of one conversation.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    pub last_category: Option<String>,
    pub last_product: Option<String>,
    pub last_intent: Option<String>,
    /// Product names from the most recent listing, for deictic references
    /// ("that one", "the black one").
    pub last_product_list: Vec<String>,
    pub state: ConversationState,
    pub last_outfit: Option<Outfit>,
    pub last_outfit_prefs: Option<OutfitPreferences>,
    /// Set externally when the user opens a product detail view.
    pub active_product_id: Option<u32>,
}

impl ConversationContext {
    pub fn is_building_outfit(&self) -> bool {
        matches!(self.state, ConversationState::BuildingOutfit { .. })
    }

    /// Leave any product-scoped flow: drops the active product and cancels
    /// a pending measurement request.
    pub fn clear_product_context(&mut self) {
        self.active_product_id = None;
        if matches!(self.state, ConversationState::AwaitingMeasurements { .. }) {
            self.state = ConversationState::Idle;
        }
    }

    /// External "view product" action: focus follow-up questions on this
    /// product and cancel any pending measurement request.
    pub fn set_active_product(&mut self, id: u32, name: &str) {
        self.active_product_id = Some(id);
        self.last_product = Some(name.to_string());
        if matches!(self.state, ConversationState::AwaitingMeasurements { .. }) {
            self.state = ConversationState::Idle;
        }
    }
}

/// Conversation contexts keyed by session id.
///
/// Each context sits behind its own mutex; the `Arc` is cloned out of the
/// map before locking so no map shard lock is held across a turn. Turns for
/// one session serialize, turns for different sessions are independent.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Arc<Mutex<ConversationContext>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `session_id`'s context, created on first use.
    pub fn context(&self, session_id: &str) -> Arc<Mutex<ConversationContext>> {
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();

        {
            let handle = store.context("alice");
            handle.lock().last_product = Some("Plain Tee".into());
        }

        assert_eq!(store.context("bob").lock().last_product, None);
        assert_eq!(
            store.context("alice").lock().last_product.as_deref(),
            Some("Plain Tee")
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_active_product_cancels_measurements() {
        let mut ctx = ConversationContext {
            state: ConversationState::AwaitingMeasurements {
                product_id: 3,
                height_cm: Some(180.0),
                weight_kg: None,
            },
            ..Default::default()
        };

        ctx.set_active_product(5, "Puffer Jacket");
        assert_eq!(ctx.state, ConversationState::Idle);
        assert_eq!(ctx.active_product_id, Some(5));
        assert_eq!(ctx.last_product.as_deref(), Some("Puffer Jacket"));
    }

    #[test]
    fn test_clear_product_context() {
        let mut ctx = ConversationContext {
            active_product_id: Some(2),
            state: ConversationState::AwaitingMeasurements {
                product_id: 2,
                height_cm: None,
                weight_kg: None,
            },
            ..Default::default()
        };
        ctx.clear_product_context();
        assert_eq!(ctx.active_product_id, None);
        assert_eq!(ctx.state, ConversationState::Idle);
    }
}
