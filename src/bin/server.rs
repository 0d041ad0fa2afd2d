//! Outfitter HTTP server binary.
//!
//! # Environment Variables
//!
//! - `OUTFITTER_ADDR`             — Bind address (default: `0.0.0.0:8080`)
//! - `OUTFITTER_CATALOG`          — Catalog JSON path (default: `data/products.json`)
//! - `OUTFITTER_DICTIONARY`       — Frequency dictionary override (optional)
//! - `OUTFITTER_POLARITY_LEXICON` — MPQA-style `.tff` wordlist (optional)
//! - `RUST_LOG`                   — Tracing filter (default: `info,outfitter=debug`)
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use outfitter::server::{app_router, AppState};
use outfitter::{Catalog, Engine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,outfitter=debug".into()),
        )
        .init();

    let catalog_path =
        std::env::var("OUTFITTER_CATALOG").unwrap_or_else(|_| "data/products.json".to_string());
    let catalog = Catalog::load(&catalog_path)
        .with_context(|| format!("loading catalog from '{catalog_path}'"))?;
    tracing::info!(path = %catalog_path, products = catalog.len(), "catalog loaded");

    let dictionary = std::env::var_os("OUTFITTER_DICTIONARY").map(PathBuf::from);
    let polarity = std::env::var_os("OUTFITTER_POLARITY_LEXICON").map(PathBuf::from);
    let engine = Engine::with_resources(
        Arc::new(catalog),
        dictionary.as_deref(),
        polarity.as_deref(),
    );

    let state = AppState::new(Arc::new(engine));
    let app = app_router(state);

    let addr = std::env::var("OUTFITTER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    tracing::info!(%addr, "outfitter server starting");
    tracing::info!("  GET  /health          — liveness probe");
    tracing::info!("  POST /chat            — conversation turn");
    tracing::info!("  POST /active-product  — view-product action");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding '{addr}'"))?;
    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
