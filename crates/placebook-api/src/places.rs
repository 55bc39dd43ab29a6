//! Handlers for `/places` endpoints.
//!
//! | Method   | Path | Auth | Notes |
//! |----------|------|------|-------|
//! | `POST`   | `/places` | yes | Body: [`CreatePlaceBody`]; returns the stored place |
//! | `GET`    | `/places` | no  | All places, creator expanded |
//! | `GET`    | `/places/:id` | no | 404 if absent or malformed |
//! | `GET`    | `/places/category/:category` | no | First match only |
//! | `PUT`    | `/places/:id` | yes | Body: [`UpdatePlaceBody`], may be omitted; creator only |
//! | `DELETE` | `/places/:id` | yes | Creator only |

use std::sync::Arc;

use axum::{
  Json,
  body::Bytes,
  extract::{
    Path, State,
    rejection::{BytesRejection, JsonRejection, PathRejection},
  },
  http::{HeaderMap, header},
};
use placebook_core::{
  place::{NewPlace, Place, PlaceUpdate, PlaceView},
  store::PlaceStore,
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
  auth::Caller,
  error::{ApiError, FieldError},
  validation::{Fields, Rule, validate},
};

/// Ids that do not parse are reported exactly like ids that do not exist,
/// including path segments that do not decode to UTF-8.
fn parse_place_id(raw: Result<Path<String>, PathRejection>) -> Result<Uuid, ApiError> {
  let Path(raw) = raw.map_err(|_| ApiError::NotFound)?;
  Uuid::parse_str(&raw).map_err(|_| ApiError::NotFound)
}

fn body_error(msg: impl Into<String>) -> ApiError {
  ApiError::Validation(vec![FieldError::body("body", msg)])
}

/// Unwrap a JSON body, turning a malformed payload into a validation error.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
  payload
    .map(|Json(body)| body)
    .map_err(|rejection| body_error(rejection.body_text()))
}

/// Like [`json_body`], but an empty body stands for `T::default()`.
fn optional_json_body<T>(
  headers: &HeaderMap,
  payload: Result<Bytes, BytesRejection>,
) -> Result<T, ApiError>
where
  T: DeserializeOwned + Default,
{
  let bytes = payload.map_err(|rejection| body_error(rejection.body_text()))?;
  if bytes.is_empty() {
    return Ok(T::default());
  }

  let is_json = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|ct| ct.starts_with("application/json"));
  if !is_json {
    return Err(body_error("Expected request with `Content-Type: application/json`"));
  }

  Json::<T>::from_bytes(&bytes)
    .map(|Json(body)| body)
    .map_err(|rejection| body_error(rejection.body_text()))
}

/// Load a place and check the caller created it. Existence is checked first,
/// so non-owners get 403 rather than 404.
async fn owned_place<S>(store: &S, id: Uuid, caller: Caller) -> Result<Place, ApiError>
where
  S: PlaceStore,
{
  let place = store
    .get_place(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;

  if place.created_by != caller.0 {
    tracing::debug!(place_id = %id, caller = %caller.0, "ownership check failed");
    return Err(ApiError::Forbidden);
  }
  Ok(place)
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /places`.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePlaceBody {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub location:    Option<String>,
  pub image:       Option<String>,
  pub category:    Option<String>,
}

const CREATE_RULES: &[Rule] = &[
  Rule::required("name", "Name is required"),
  Rule::required("location", "Location is required"),
  Rule::required("image", "Image is required"),
  Rule::required("category", "Category is required"),
];

impl Fields for CreatePlaceBody {
  fn field(&self, param: &str) -> Option<&str> {
    match param {
      "name" => self.name.as_deref(),
      "description" => self.description.as_deref(),
      "location" => self.location.as_deref(),
      "image" => self.image.as_deref(),
      "category" => self.category.as_deref(),
      _ => None,
    }
  }
}

impl CreatePlaceBody {
  /// Validate the body and bind it to its creator.
  pub fn into_new_place(self, created_by: Uuid) -> Result<NewPlace, ApiError> {
    validate(CREATE_RULES, &self)?;
    let place = NewPlace::new(
      self.name.unwrap_or_default(),
      self.location.unwrap_or_default(),
      self.image.unwrap_or_default(),
      self.category.unwrap_or_default(),
      created_by,
    )?;
    Ok(match self.description {
      Some(d) => place.with_description(d),
      None => place,
    })
  }
}

/// `POST /places`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  payload: Result<Json<CreatePlaceBody>, JsonRejection>,
) -> Result<Json<Place>, ApiError>
where
  S: PlaceStore,
{
  let input = json_body(payload)?.into_new_place(caller.0)?;

  let place = store.create_place(input).await.map_err(ApiError::store)?;
  tracing::info!(place_id = %place.id, created_by = %place.created_by, "place created");
  Ok(Json(place))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /places`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<PlaceView>>, ApiError>
where
  S: PlaceStore,
{
  let places = store.list_places().await.map_err(ApiError::store)?;
  Ok(Json(places))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /places/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<String>, PathRejection>,
) -> Result<Json<PlaceView>, ApiError>
where
  S: PlaceStore,
{
  let id = parse_place_id(id)?;
  let place = store
    .get_place_view(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;
  Ok(Json(place))
}

// ─── By category ──────────────────────────────────────────────────────────────

/// `GET /places/category/:category` — the oldest place in the category.
pub async fn by_category<S>(
  State(store): State<Arc<S>>,
  category: Result<Path<String>, PathRejection>,
) -> Result<Json<PlaceView>, ApiError>
where
  S: PlaceStore,
{
  let Path(category) = category.map_err(|_| ApiError::NotFound)?;
  let place = store
    .find_place_by_category(&category)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;
  Ok(Json(place))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /places/:id`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlaceBody {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub location:    Option<String>,
  pub image:       Option<String>,
  pub category:    Option<String>,
}

const UPDATE_RULES: &[Rule] = &[
  Rule::non_empty("name", "Name cannot be empty"),
  Rule::non_empty("location", "Location cannot be empty"),
  Rule::non_empty("image", "Image cannot be empty"),
  Rule::non_empty("category", "Category cannot be empty"),
];

impl Fields for UpdatePlaceBody {
  fn field(&self, param: &str) -> Option<&str> {
    match param {
      "name" => self.name.as_deref(),
      "description" => self.description.as_deref(),
      "location" => self.location.as_deref(),
      "image" => self.image.as_deref(),
      "category" => self.category.as_deref(),
      _ => None,
    }
  }
}

impl TryFrom<UpdatePlaceBody> for PlaceUpdate {
  type Error = ApiError;

  fn try_from(b: UpdatePlaceBody) -> Result<Self, Self::Error> {
    validate(UPDATE_RULES, &b)?;
    Ok(PlaceUpdate {
      name:        b.name,
      description: b.description,
      location:    b.location,
      image:       b.image,
      category:    b.category,
    })
  }
}

/// `PUT /places/:id`. A missing body is an empty update.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  id: Result<Path<String>, PathRejection>,
  headers: HeaderMap,
  payload: Result<Bytes, BytesRejection>,
) -> Result<Json<Place>, ApiError>
where
  S: PlaceStore,
{
  let body: UpdatePlaceBody = optional_json_body(&headers, payload)?;
  let update = PlaceUpdate::try_from(body)?;
  let id = parse_place_id(id)?;
  owned_place(&*store, id, caller).await?;

  // Deleted between the ownership check and the write.
  let place = store
    .update_place(id, update)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound)?;

  tracing::info!(place_id = %id, "place updated");
  Ok(Json(place))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /places/:id` — returns `{"msg": "Place removed"}`.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  caller: Caller,
  id: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError>
where
  S: PlaceStore,
{
  let id = parse_place_id(id)?;
  owned_place(&*store, id, caller).await?;

  if !store.delete_place(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound);
  }

  tracing::info!(place_id = %id, "place removed");
  Ok(Json(json!({ "msg": "Place removed" })))
}
