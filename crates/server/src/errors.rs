use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;

/// Error response rendered as `{"error": .., "detail": ..}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub detail: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    detail: &'a str,
}

impl JsonApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, error: "invalid_input", detail: detail.into() }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let status = match e {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::DuplicateEntry(_) => StatusCode::CONFLICT,
            ServiceError::Cancelled(_) => StatusCode::GATEWAY_TIMEOUT,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, error: e.kind(), detail: e.to_string() }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self { Self::bad_request(e.body_text()) }
}

impl From<QueryRejection> for JsonApiError {
    fn from(e: QueryRejection) -> Self { Self::bad_request(e.body_text()) }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.error, detail: &self.detail };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::DuplicateEntry("x".into()), StatusCode::CONFLICT),
            (ServiceError::Cancelled("x".into()), StatusCode::GATEWAY_TIMEOUT),
            (ServiceError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn error_kind_is_the_error_field() {
        let e = JsonApiError::from(ServiceError::DuplicateEntry("uniq".into()));
        assert_eq!(e.error, "duplicate_entry");
        assert_eq!(e.detail, "duplicate entry: uniq");
    }
}
