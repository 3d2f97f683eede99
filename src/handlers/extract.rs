use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;
use crate::validation::{Validate, ValidationError};

/// JSON body extractor for request payloads.
///
/// Malformed bodies, missing or null fields and failed `Validate` checks are all rejected as
/// `AppError::Validation`, so clients always get a 400 with the field name.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;

        if let Some(field) = first_null_field(&value) {
            return Err(ValidationError::new(field, "must not be null").into());
        }

        let payload: T = serde_json::from_value(value).map_err(deserialize_error)?;
        payload.validate()?;

        Ok(Self(payload))
    }
}

fn first_null_field(value: &Value) -> Option<&str> {
    value
        .as_object()?
        .iter()
        .find(|(_, v)| v.is_null())
        .map(|(key, _)| key.as_str())
}

fn deserialize_error(err: serde_json::Error) -> ValidationError {
    let message = err.to_string();
    match message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
    {
        Some((field, _)) => ValidationError::new(field, "must not be null"),
        None => ValidationError::new("body", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{AuthorizeRequest, TransactionRequest};
    use serde_json::json;

    #[test]
    fn test_missing_field_is_named() {
        let err = serde_json::from_value::<AuthorizeRequest>(json!({
            "cardNumber": "4111111111111111",
            "cardExpiry": "12/99",
            "cvv": "123"
        }))
        .unwrap_err();

        let validation = deserialize_error(err);
        assert_eq!(validation.field, "amount");
        assert_eq!(validation.to_string(), "amount: must not be null");
    }

    #[test]
    fn test_type_mismatch_reported_against_body() {
        let err = serde_json::from_value::<TransactionRequest>(json!({ "transactionId": 7 }))
            .unwrap_err();
        assert_eq!(deserialize_error(err).field, "body");
    }

    #[test]
    fn test_first_null_field() {
        assert_eq!(
            first_null_field(&json!({ "transactionId": null })),
            Some("transactionId")
        );
        assert_eq!(first_null_field(&json!({ "transactionId": "abc" })), None);
        assert_eq!(first_null_field(&json!([null])), None);
    }
}
