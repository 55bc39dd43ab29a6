//! [`SqliteStore`] — the SQLite implementation of [`PlaceStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use placebook_core::{
  place::{NewPlace, Place, PlaceUpdate, PlaceView},
  store::PlaceStore,
  user::User,
};

use crate::{
  Result,
  encode::{PLACE_COLUMNS, RawPlace, RawPlaceView, RawUser, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Placebook store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// Register a user so that places referencing it resolve a username.
  ///
  /// Users belong to the auth service; this exists for provisioning and
  /// tests. Fails if the username is taken.
  pub async fn add_user(&self, username: impl Into<String>) -> Result<User> {
    let user = User {
      id:         Uuid::new_v4(),
      username:   username.into(),
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(user.id);
    let name   = user.username.clone();
    let at_str = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, username, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(user_id = %user.id, username = %user.username, "user added");
    Ok(user)
  }

  /// Look up a user by username.
  pub async fn find_user(&self, username: impl Into<String>) -> Result<Option<User>> {
    let name = username.into();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, username, created_at FROM users WHERE username = ?1",
            rusqlite::params![name],
            |row| {
              Ok(RawUser {
                user_id:    row.get(0)?,
                username:   row.get(1)?,
                created_at: row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  /// Overwrite every mutable column of an existing place.
  async fn write_place(&self, place: &Place) -> Result<bool> {
    let id_str      = encode_uuid(place.id);
    let name        = place.name.clone();
    let description = place.description.clone();
    let location    = place.location.clone();
    let image       = place.image.clone();
    let category    = place.category.clone();
    let updated_str = encode_dt(place.updated_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE places
             SET name = ?2, description = ?3, location = ?4,
                 image = ?5, category = ?6, updated_at = ?7
           WHERE place_id = ?1",
          rusqlite::params![
            id_str,
            name,
            description,
            location,
            image,
            category,
            updated_str,
          ],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}

// ─── PlaceStore impl ─────────────────────────────────────────────────────────

impl PlaceStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create_place(&self, input: NewPlace) -> Result<Place> {
    input.check()?;

    let now = Utc::now();
    let place = Place {
      id:          Uuid::new_v4(),
      name:        input.name,
      description: input.description,
      location:    input.location,
      image:       input.image,
      category:    input.category,
      created_by:  input.created_by,
      created_at:  now,
      updated_at:  now,
    };

    let id_str      = encode_uuid(place.id);
    let name        = place.name.clone();
    let description = place.description.clone();
    let location    = place.location.clone();
    let image       = place.image.clone();
    let category    = place.category.clone();
    let creator_str = encode_uuid(place.created_by);
    let at_str      = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO places (
             place_id, name, description, location, image, category,
             created_by, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str,
            name,
            description,
            location,
            image,
            category,
            creator_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(place)
  }

  async fn update_place(&self, id: Uuid, update: PlaceUpdate) -> Result<Option<Place>> {
    let mut place = match self.get_place(id).await? {
      Some(p) => p,
      None    => return Ok(None),
    };

    place.apply(update)?;
    place.updated_at = Utc::now();

    // The row may have been deleted between the read and the write.
    if !self.write_place(&place).await? {
      return Ok(None);
    }
    Ok(Some(place))
  }

  async fn delete_place(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM places WHERE place_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_place(&self, id: Uuid) -> Result<Option<Place>> {
    let id_str = encode_uuid(id);
    let sql    = format!("SELECT {PLACE_COLUMNS} FROM places p WHERE p.place_id = ?1");

    let raw: Option<RawPlace> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![id_str], RawPlace::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawPlace::into_place).transpose()
  }

  async fn get_place_view(&self, id: Uuid) -> Result<Option<PlaceView>> {
    let id_str = encode_uuid(id);
    let sql    = format!(
      "SELECT {PLACE_COLUMNS}, u.username
       FROM places p
       LEFT JOIN users u ON u.user_id = p.created_by
       WHERE p.place_id = ?1"
    );

    let raw: Option<RawPlaceView> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![id_str], RawPlaceView::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawPlaceView::into_view).transpose()
  }

  async fn list_places(&self) -> Result<Vec<PlaceView>> {
    let sql = format!(
      "SELECT {PLACE_COLUMNS}, u.username
       FROM places p
       LEFT JOIN users u ON u.user_id = p.created_by
       ORDER BY p.rowid"
    );

    let raws: Vec<RawPlaceView> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawPlaceView::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlaceView::into_view).collect()
  }

  async fn find_place_by_category<'a>(
    &'a self,
    category: &'a str,
  ) -> Result<Option<PlaceView>> {
    let category = category.to_owned();
    let sql      = format!(
      "SELECT {PLACE_COLUMNS}, u.username
       FROM places p
       LEFT JOIN users u ON u.user_id = p.created_by
       WHERE p.category = ?1
       ORDER BY p.rowid
       LIMIT 1"
    );

    let raw: Option<RawPlaceView> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![category], RawPlaceView::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawPlaceView::into_view).transpose()
  }
}
