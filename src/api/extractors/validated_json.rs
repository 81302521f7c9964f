//! JSON body extractor that runs `validator` rules before the handler sees it.
//!
//! Error messages are shared with the multipart boat form so both surfaces
//! answer with the same `VALIDATION_ERROR` text.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Deserialized and validated JSON body.
///
/// ```rust,ignore
/// async fn update_user(
///     Path(id): Path<Uuid>,
///     ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
/// ) -> AppResult<Json<UserResponse>> {
///     // payload.email, when present, is a well-formed address
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Joins field messages, ordered by field name so responses are stable.
pub(crate) fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::user_handler::UpdateUserRequest;
    use axum::{body::Body, http::header};

    fn json(body: &str) -> Request {
        Request::builder()
            .method("PUT")
            .uri("/users/me")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        let ValidatedJson(payload) =
            ValidatedJson::<UpdateUserRequest>::from_request(json(r#"{"email":"a@example.com"}"#), &())
                .await
                .unwrap();

        assert_eq!(payload.email.as_deref(), Some("a@example.com"));
        assert!(payload.phone_number.is_none());
    }

    #[tokio::test]
    async fn test_messages_are_ordered_by_field() {
        let result = ValidatedJson::<UpdateUserRequest>::from_request(
            json(r#"{"phone_number":"","email":"not-an-email"}"#),
            &(),
        )
        .await;

        match result {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Invalid email format, Phone number cannot be empty")
            }
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_validation_error() {
        let result = ValidatedJson::<UpdateUserRequest>::from_request(json("{"), &()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
