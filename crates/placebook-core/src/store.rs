//! The `PlaceStore` trait.
//!
//! Implemented by storage backends (e.g. `placebook-store-sqlite`). The API
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::place::{NewPlace, Place, PlaceUpdate, PlaceView};

/// Abstraction over a Placebook persistence backend.
///
/// Every method is a single request/response exchange with the backend.
/// Ownership rules are enforced by callers; the store only persists.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PlaceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new place. The id and both timestamps are set by the store.
  fn create_place(
    &self,
    input: NewPlace,
  ) -> impl Future<Output = Result<Place, Self::Error>> + Send + '_;

  /// Merge `update` into the stored place and refresh `updated_at`.
  /// Returns `None` if no place has this id.
  fn update_place(
    &self,
    id: Uuid,
    update: PlaceUpdate,
  ) -> impl Future<Output = Result<Option<Place>, Self::Error>> + Send + '_;

  /// Permanently remove a place. Returns `false` if it did not exist.
  fn delete_place(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Fetch the stored record, without expanding the creator.
  fn get_place(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Place>, Self::Error>> + Send + '_;

  /// Fetch a place with its creator expanded to a username.
  fn get_place_view(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PlaceView>, Self::Error>> + Send + '_;

  /// All places in insertion order, creators expanded.
  fn list_places(
    &self,
  ) -> impl Future<Output = Result<Vec<PlaceView>, Self::Error>> + Send + '_;

  /// The oldest place whose category equals `category` exactly.
  fn find_place_by_category<'a>(
    &'a self,
    category: &'a str,
  ) -> impl Future<Output = Result<Option<PlaceView>, Self::Error>> + Send + 'a;
}
