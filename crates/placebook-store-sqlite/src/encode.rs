//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and UUIDs as hyphenated
//! lowercase strings.

use chrono::{DateTime, Utc};
use placebook_core::{
  place::{Place, PlaceView},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `places` read; [`RawPlace::from_row`] depends
/// on this order.
pub const PLACE_COLUMNS: &str = "p.place_id, p.name, p.description, p.location, \
   p.image, p.category, p.created_by, p.created_at, p.updated_at";

/// Raw strings read directly from a `places` row.
pub struct RawPlace {
  pub place_id:    String,
  pub name:        String,
  pub description: Option<String>,
  pub location:    String,
  pub image:       String,
  pub category:    String,
  pub created_by:  String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawPlace {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      place_id:    row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      location:    row.get(3)?,
      image:       row.get(4)?,
      category:    row.get(5)?,
      created_by:  row.get(6)?,
      created_at:  row.get(7)?,
      updated_at:  row.get(8)?,
    })
  }

  pub fn into_place(self) -> Result<Place> {
    Ok(Place {
      id:          decode_uuid(&self.place_id)?,
      name:        self.name,
      description: self.description,
      location:    self.location,
      image:       self.image,
      category:    self.category,
      created_by:  decode_uuid(&self.created_by)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// A `places` row joined with the creator's `users` row.
pub struct RawPlaceView {
  pub place:    RawPlace,
  pub username: Option<String>,
}

impl RawPlaceView {
  /// Reads [`PLACE_COLUMNS`] followed by `u.username`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      place:    RawPlace::from_row(row)?,
      username: row.get(9)?,
    })
  }

  pub fn into_view(self) -> Result<PlaceView> {
    Ok(PlaceView::from_place(self.place.into_place()?, self.username))
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub username:   String,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:         decode_uuid(&self.user_id)?,
      username:   self.username,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
