//! Query string extractor that reports rejections as [`AppError`]s.

use axum::{
    async_trait,
    extract::{rejection::QueryRejection, FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// Query parameters; a missing or unparsable parameter is a BadRequest in
/// the usual error envelope.
pub struct QueryInput<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryInput<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(malformed)?;
        Ok(QueryInput(value))
    }
}

fn malformed(rejection: QueryRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Malformed query string");
    AppError::bad_request(rejection.body_text())
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Lookup {
        class_id: i32,
    }

    async fn extract(uri: &str) -> Result<QueryInput<Lookup>, AppError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        QueryInput::<Lookup>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_query_parses() {
        let QueryInput(lookup) = extract("/Classes/ManageEnrollments?classId=7").await.unwrap();
        assert_eq!(lookup.class_id, 7);
    }

    #[tokio::test]
    async fn test_bad_query_is_bad_request() {
        let missing = extract("/Classes/ManageEnrollments").await;
        assert!(matches!(missing, Err(AppError::BadRequest(_))));

        let not_a_number = extract("/Classes/ManageEnrollments?classId=seven").await;
        assert!(matches!(not_a_number, Err(AppError::BadRequest(_))));
    }
}
