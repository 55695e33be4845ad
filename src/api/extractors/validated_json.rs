//! JSON body extractors that report rejections as [`AppError`]s.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::{AppError, FieldErrors};

/// JSON body whose field rules are checked by the workflow itself, so every
/// failure can be reported together with the data needed to redisplay it.
///
/// Only malformed bodies are rejected here.
pub struct JsonInput<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonInput<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(malformed)?;
        Ok(JsonInput(value))
    }
}

/// JSON body validated before the handler runs.
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
            .map_err(malformed)?;

        if let Err(e) = value.validate() {
            FieldErrors::from(&e).into_result()?;
        }

        Ok(ValidatedJson(value))
    }
}

fn malformed(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Malformed request body");
    AppError::bad_request(rejection.body_text())
}
