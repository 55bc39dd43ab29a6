//! Caller-identity extraction.
//!
//! Tokens are issued by the external auth service; this module only verifies
//! them. The token travels in `x-auth-token` (or `Authorization: Bearer`) and
//! is an HS256 JWT whose claims carry `{"user": {"id": "<uuid>"}}`.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use placebook_core::store::PlaceStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Header the auth service's clients send their token in.
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Resolves the authenticated user id for a request.
pub trait IdentityResolver: Send + Sync {
  fn resolve(&self, headers: &HeaderMap) -> Result<Uuid, ApiError>;
}

// ─── JWT resolver ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUser {
  pub id: Uuid,
}

/// Claims set by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub user: TokenUser,
  /// Expiry, seconds since the Unix epoch.
  pub exp:  i64,
}

/// Verifies HS256 tokens against a shared secret.
pub struct JwtResolver {
  key:        DecodingKey,
  validation: Validation,
}

impl JwtResolver {
  pub fn new(secret: &str) -> Self {
    Self {
      key:        DecodingKey::from_secret(secret.as_bytes()),
      validation: Validation::new(Algorithm::HS256),
    }
  }
}

impl IdentityResolver for JwtResolver {
  fn resolve(&self, headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let token = token_from_headers(headers).ok_or(ApiError::MissingToken)?;

    let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
      tracing::debug!(error = %e, "token rejected");
      ApiError::InvalidToken
    })?;

    Ok(data.claims.user.id)
  }
}

fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
  let raw = headers
    .get(TOKEN_HEADER)
    .and_then(|v| v.to_str().ok())
    .or_else(|| {
      headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    })?
    .trim();

  (!raw.is_empty()).then_some(raw)
}

// ─── Extractor ────────────────────────────────────────────────────────────────

/// The authenticated caller. Present in a handler means the token verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Uuid);

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: PlaceStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    state.auth.resolve(&parts.headers).map(Caller)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;
  use jsonwebtoken::{EncodingKey, Header, encode};

  const SECRET: &str = "test-secret";

  fn token(secret: &str, user: Uuid, exp: i64) -> String {
    let claims = Claims { user: TokenUser { id: user }, exp };
    encode(
      &Header::new(Algorithm::HS256),
      &claims,
      &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
  }

  fn future() -> i64 { chrono::Utc::now().timestamp() + 3600 }

  fn headers(name: &'static str, value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(name, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn accepts_token_in_custom_header() {
    let user = Uuid::new_v4();
    let h = headers(TOKEN_HEADER, &token(SECRET, user, future()));
    assert_eq!(JwtResolver::new(SECRET).resolve(&h).unwrap(), user);
  }

  #[test]
  fn accepts_bearer_token() {
    let user = Uuid::new_v4();
    let h = headers("authorization", &format!("Bearer {}", token(SECRET, user, future())));
    assert_eq!(JwtResolver::new(SECRET).resolve(&h).unwrap(), user);
  }

  #[test]
  fn missing_token() {
    let err = JwtResolver::new(SECRET).resolve(&HeaderMap::new()).unwrap_err();
    assert!(matches!(err, ApiError::MissingToken));
  }

  #[test]
  fn wrong_secret() {
    let h = headers(TOKEN_HEADER, &token("other", Uuid::new_v4(), future()));
    let err = JwtResolver::new(SECRET).resolve(&h).unwrap_err();
    assert!(matches!(err, ApiError::InvalidToken));
  }

  #[test]
  fn expired_token() {
    let past = chrono::Utc::now().timestamp() - 3600;
    let h = headers(TOKEN_HEADER, &token(SECRET, Uuid::new_v4(), past));
    let err = JwtResolver::new(SECRET).resolve(&h).unwrap_err();
    assert!(matches!(err, ApiError::InvalidToken));
  }

  #[test]
  fn token_without_expiry() {
    let claims = serde_json::json!({ "user": { "id": Uuid::new_v4() } });
    let raw = encode(
      &Header::new(Algorithm::HS256),
      &claims,
      &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    let err = JwtResolver::new(SECRET).resolve(&headers(TOKEN_HEADER, &raw)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidToken));
  }

  #[test]
  fn garbage_token() {
    let h = headers(TOKEN_HEADER, "not-a-jwt");
    let err = JwtResolver::new(SECRET).resolve(&h).unwrap_err();
    assert!(matches!(err, ApiError::InvalidToken));
  }
}
