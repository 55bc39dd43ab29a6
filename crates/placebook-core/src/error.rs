//! Error types for `placebook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required text field was empty.
  #[error("{0} must not be empty")]
  EmptyField(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
