//! Place types: the stored record, its inputs, and the expanded read model.
//!
//! The wire shape keeps the document-store conventions existing clients
//! expect: camelCase keys and `_id` for the identifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, user::UserSummary};

// ─── Stored record ───────────────────────────────────────────────────────────

/// A persisted place. `created_by` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
  #[serde(rename = "_id")]
  pub id:          Uuid,
  pub name:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub location:    String,
  pub image:       String,
  pub category:    String,
  pub created_by:  Uuid,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Place {
  /// Merge the fields present in `update` into this place.
  ///
  /// `updated_at` is left alone; the store stamps it when it writes.
  pub fn apply(&mut self, update: PlaceUpdate) -> Result<()> {
    update.check()?;

    if let Some(name) = update.name {
      self.name = name;
    }
    if let Some(description) = update.description {
      self.description = Some(description);
    }
    if let Some(location) = update.location {
      self.location = location;
    }
    if let Some(image) = update.image {
      self.image = image;
    }
    if let Some(category) = update.category {
      self.category = category;
    }
    Ok(())
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input for [`PlaceStore::create_place`](crate::store::PlaceStore::create_place).
/// The id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPlace {
  pub name:        String,
  pub description: Option<String>,
  pub location:    String,
  pub image:       String,
  pub category:    String,
  pub created_by:  Uuid,
}

impl NewPlace {
  /// Build a new place input, rejecting empty required fields.
  ///
  /// Whitespace counts as content: `" "` is a valid name.
  pub fn new(
    name: impl Into<String>,
    location: impl Into<String>,
    image: impl Into<String>,
    category: impl Into<String>,
    created_by: Uuid,
  ) -> Result<Self> {
    let place = Self {
      name: name.into(),
      description: None,
      location: location.into(),
      image: image.into(),
      category: category.into(),
      created_by,
    };
    place.check()?;
    Ok(place)
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// Verify the required fields are non-empty.
  pub fn check(&self) -> Result<()> {
    require_text("name", &self.name)?;
    require_text("location", &self.location)?;
    require_text("image", &self.image)?;
    require_text("category", &self.category)?;
    Ok(())
  }
}

/// A partial update. `None` means "leave the field as it is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceUpdate {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub location:    Option<String>,
  pub image:       Option<String>,
  pub category:    Option<String>,
}

impl PlaceUpdate {
  /// Verify that every present required field is non-empty. The description
  /// is free text and may be empty.
  pub fn check(&self) -> Result<()> {
    let present = [
      ("name", &self.name),
      ("location", &self.location),
      ("image", &self.image),
      ("category", &self.category),
    ];
    for (field, value) in present {
      if let Some(v) = value {
        require_text(field, v)?;
      }
    }
    Ok(())
  }
}

fn require_text(field: &'static str, value: &str) -> Result<()> {
  if value.is_empty() {
    return Err(Error::EmptyField(field));
  }
  Ok(())
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// A place with its creator reference expanded. Computed on read, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceView {
  #[serde(rename = "_id")]
  pub id:          Uuid,
  pub name:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub location:    String,
  pub image:       String,
  pub category:    String,
  pub created_by:  UserSummary,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl PlaceView {
  /// Compose a view from a stored place and the creator's username, if the
  /// referenced user is known.
  pub fn from_place(place: Place, username: Option<String>) -> Self {
    Self {
      id:          place.id,
      name:        place.name,
      description: place.description,
      location:    place.location,
      image:       place.image,
      category:    place.category,
      created_by:  UserSummary { id: place.created_by, username },
      created_at:  place.created_at,
      updated_at:  place.updated_at,
    }
  }
}
