//! JSON REST API for Placebook.
//!
//! Exposes an axum [`Router`] backed by any [`PlaceStore`]. Caller identity
//! comes from an [`IdentityResolver`]; TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState::new(store, JwtResolver::new(&secret));
//! axum::serve(listener, placebook_api::router(state)).await?;
//! ```

pub mod auth;
pub mod error;
pub mod places;
pub mod validation;

use std::sync::Arc;

use axum::{Json, Router, extract::FromRef, routing::get};
use placebook_core::store::PlaceStore;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

pub use auth::{Caller, IdentityResolver, JwtResolver};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S: PlaceStore> {
  pub store: Arc<S>,
  pub auth:  Arc<dyn IdentityResolver>,
}

impl<S: PlaceStore> AppState<S> {
  pub fn new(store: S, auth: impl IdentityResolver + 'static) -> Self {
    Self { store: Arc::new(store), auth: Arc::new(auth) }
  }
}

// Derived `Clone` would demand `S: Clone`; only the `Arc`s are cloned.
impl<S: PlaceStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), auth: self.auth.clone() }
  }
}

impl<S: PlaceStore> FromRef<AppState<S>> for Arc<S> {
  fn from_ref(state: &AppState<S>) -> Self { state.store.clone() }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PlaceStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .route("/places", get(places::list::<S>).post(places::create::<S>))
    .route(
      "/places/{id}",
      get(places::get_one::<S>)
        .put(places::update::<S>)
        .delete(places::delete_one::<S>),
    )
    .route("/places/category/{category}", get(places::by_category::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// `GET /health`
async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ────────────────────────────────────────────────────────
