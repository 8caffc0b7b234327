//! Payload validation.
//!
//! Request bodies arrive as raw JSON. Each payload type declares which
//! properties are required and which may not be `null`; the shape and types
//! are then enforced by deserializing into the typed payload, and
//! [`Payload::check`] applies the remaining constraints (string lengths).

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Per-field validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationError {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add(field, message);
        err
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A request body shape.
pub trait Payload: DeserializeOwned {
    /// Properties that must be present and non-null. Properties with a
    /// default value are not listed here.
    const REQUIRED: &'static [&'static str];

    /// Properties that may be omitted but never set to `null`.
    const NON_NULLABLE: &'static [&'static str] = &[];

    /// Constraints that the type system does not express.
    fn check(&self, _errors: &mut ValidationError) {}
}

/// Validate a JSON body and deserialize it into `P`.
pub fn parse<P: Payload>(body: Value) -> Result<P, ValidationError> {
    let Value::Object(map) = &body else {
        return Err(ValidationError::single("body", "must be an object"));
    };

    let mut errors = ValidationError::new();
    for field in P::REQUIRED {
        match map.get(*field) {
            None | Some(Value::Null) => errors.add(*field, "is a required property"),
            Some(_) => {}
        }
    }
    for field in P::NON_NULLABLE {
        if matches!(map.get(*field), Some(Value::Null)) {
            errors.add(*field, "must not be null");
        }
    }
    errors.clone().into_result()?;

    let payload: P =
        serde_json::from_value(body).map_err(|e| ValidationError::single("body", e.to_string()))?;
    payload.check(&mut errors);
    errors.into_result()?;
    Ok(payload)
}

/// Record a failure when `value` is shorter than `min` or longer than `max`
/// characters.
pub fn check_length(
    errors: &mut ValidationError,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min {
        errors.add(field, format!("should NOT be shorter than {min} characters"));
    } else if len > max {
        errors.add(field, format!("should NOT be longer than {max} characters"));
    }
}

/// Deserialize a field that distinguishes "absent" from "explicitly null".
/// Pair with `#[serde(default)]`: absent stays `None`, `null` becomes
/// `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Widget {
        title: String,
        #[serde(default)]
        sub_title: Option<String>,
        #[serde(default, deserialize_with = "nullable")]
        owner: Option<Option<String>>,
    }

    impl Payload for Widget {
        const REQUIRED: &'static [&'static str] = &["title"];
        const NON_NULLABLE: &'static [&'static str] = &["subTitle"];

        fn check(&self, errors: &mut ValidationError) {
            check_length(errors, "title", &self.title, 1, 5);
        }
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = parse::<Widget>(json!({ "subTitle": "x" })).unwrap_err();
        assert_eq!(
            err.fields().get("title"),
            Some(&vec!["is a required property".to_string()])
        );
    }

    #[test]
    fn null_counts_as_missing() {
        let err = parse::<Widget>(json!({ "title": null })).unwrap_err();
        assert!(err.fields().contains_key("title"));
    }

    #[test]
    fn non_nullable_rejects_null() {
        let err = parse::<Widget>(json!({ "title": "ok", "subTitle": null })).unwrap_err();
        assert!(err.fields().contains_key("subTitle"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = parse::<Widget>(json!({ "title": 42 })).unwrap_err();
        assert!(err.fields().contains_key("body"));
    }

    #[test]
    fn length_is_checked_after_deserialization() {
        let err = parse::<Widget>(json!({ "title": "too long" })).unwrap_err();
        assert!(err.to_string().starts_with("title: should NOT be longer"));
        let err = parse::<Widget>(json!({ "title": "" })).unwrap_err();
        assert!(err.to_string().contains("shorter than 1"));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = parse::<Widget>(json!(["title"])).unwrap_err();
        assert_eq!(err.to_string(), "body: must be an object");
    }

    #[test]
    fn nullable_distinguishes_absent_from_null() {
        let absent = parse::<Widget>(json!({ "title": "a" })).unwrap();
        assert_eq!(absent.owner, None);
        assert_eq!(absent.sub_title, None);

        let cleared = parse::<Widget>(json!({ "title": "a", "owner": null })).unwrap();
        assert_eq!(cleared.owner, Some(None));

        let set = parse::<Widget>(json!({ "title": "a", "owner": "me" })).unwrap();
        assert_eq!(set.owner, Some(Some("me".to_string())));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let w = parse::<Widget>(json!({ "title": "a", "id": "client-id" })).unwrap();
        assert_eq!(w.title, "a");
    }

    #[test]
    fn serializes_as_field_map() {
        let err = ValidationError::single("slug", "is a required property");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({ "slug": ["is a required property"] })
        );
    }
}
