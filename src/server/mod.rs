//! HTTP boundary around the conversational core.
//!
//! # Endpoints
//!
//! - `GET  /health`         — Liveness probe
//! - `POST /chat`           — One conversation turn
//! - `POST /active-product` — External "view product" action

pub mod routes;

pub use routes::{app_router, AppState};
