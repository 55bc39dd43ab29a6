//! Declarative field rules for request bodies.
//!
//! Each body type lists its rules once; [`validate`] reports every failing
//! field in a single pass, so the caller sees all problems at once.

use crate::error::{ApiError, FieldError};

/// Whether a field must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
  /// Must be present and non-empty.
  Required,
  /// May be absent; if present it must be non-empty. Whitespace counts
  /// as content.
  NonEmptyIfPresent,
}

/// A rule on one text field of a request body.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
  pub param:    &'static str,
  pub msg:      &'static str,
  pub presence: Presence,
}

impl Rule {
  pub const fn required(param: &'static str, msg: &'static str) -> Self {
    Self { param, msg, presence: Presence::Required }
  }

  pub const fn non_empty(param: &'static str, msg: &'static str) -> Self {
    Self { param, msg, presence: Presence::NonEmptyIfPresent }
  }
}

/// Read access to a body's text fields by name.
pub trait Fields {
  fn field(&self, param: &str) -> Option<&str>;
}

/// Apply `rules` to `body`, collecting one [`FieldError`] per failing rule.
pub fn validate<B: Fields>(rules: &[Rule], body: &B) -> Result<(), ApiError> {
  let errors: Vec<FieldError> = rules
    .iter()
    .filter_map(|rule| match (body.field(rule.param), rule.presence) {
      (None, Presence::Required) => Some(FieldError::body(rule.param, rule.msg)),
      (None, Presence::NonEmptyIfPresent) => None,
      (Some(v), _) if v.is_empty() => {
        Some(FieldError::body(rule.param, rule.msg).with_value(v))
      }
      (Some(_), _) => None,
    })
    .collect();

  if errors.is_empty() {
    Ok(())
  } else {
    Err(ApiError::Validation(errors))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Body {
    name:  Option<String>,
    image: Option<String>,
  }

  impl Fields for Body {
    fn field(&self, param: &str) -> Option<&str> {
      match param {
        "name" => self.name.as_deref(),
        "image" => self.image.as_deref(),
        _ => None,
      }
    }
  }

  const RULES: &[Rule] = &[
    Rule::required("name", "Name is required"),
    Rule::non_empty("image", "Image cannot be empty"),
  ];

  fn errors(body: &Body) -> Vec<FieldError> {
    match validate(RULES, body) {
      Err(ApiError::Validation(e)) => e,
      Err(other) => panic!("unexpected {other:?}"),
      Ok(()) => vec![],
    }
  }

  #[test]
  fn passes_when_rules_hold() {
    let body = Body { name: Some("Cafe".into()), image: None };
    assert!(errors(&body).is_empty());
  }

  #[test]
  fn reports_missing_required() {
    let body = Body { name: None, image: None };
    let errs = errors(&body);
    assert_eq!(errs, vec![FieldError::body("name", "Name is required")]);
  }

  #[test]
  fn reports_every_empty_field() {
    let body = Body { name: Some(String::new()), image: Some(String::new()) };
    let errs = errors(&body);
    let params: Vec<_> = errs.iter().map(|e| e.param.as_str()).collect();
    assert_eq!(params, ["name", "image"]);
    assert_eq!(errs[0].value.as_deref(), Some(""));
  }

  #[test]
  fn whitespace_satisfies_rules() {
    let body = Body { name: Some(" ".into()), image: Some("\t".into()) };
    assert!(errors(&body).is_empty());
  }
}
