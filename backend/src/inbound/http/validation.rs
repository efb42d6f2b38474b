//! Shared validation helpers for inbound HTTP adapters.
//!
//! Builds the `{ field, code, … }` detail payloads that accompany 400
//! responses so clients can pin a failure to a specific request field.

use serde_json::json;

use crate::domain::{CardId, Error, UserId};

/// Newtype wrapper for HTTP field names to keep call sites typo-resistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// 400 error for a field that fails its value-type validation.
pub(crate) fn field_error(field: FieldName, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": "invalid_field",
    }))
}

fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_uuid",
    }))
}

/// Parse a path segment into a [`UserId`].
pub(crate) fn parse_user_id(raw: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::parse(raw).map_err(|_| invalid_uuid_error(field, raw))
}

/// Parse a path segment into a [`CardId`].
pub(crate) fn parse_card_id(raw: &str, field: FieldName) -> Result<CardId, Error> {
    CardId::parse(raw).map_err(|_| invalid_uuid_error(field, raw))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    fn uuid_errors_carry_field_and_value_details() {
        let err = parse_card_id("nope", FieldName::new("id")).expect_err("must fail");
        let details = err.details().expect("details present");
        assert_eq!(details["field"], Value::from("id"));
        assert_eq!(details["value"], Value::from("nope"));
        assert_eq!(details["code"], Value::from("invalid_uuid"));
    }

    #[rstest]
    fn canonical_uuids_parse() {
        let id = parse_user_id("3fa85f64-5717-4562-b3fc-2c963f66afa6", FieldName::new("id"))
            .expect("valid uuid");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }
}
