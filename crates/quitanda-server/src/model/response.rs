//! HTTP response types for the Quitanda server
//!
//! This module provides common response structures for API responses.

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use serde::{Deserialize, Serialize};

use quitanda_common::{QuitandaError, error};

/// Generic result wrapper for API responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Result<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl<T> Result<T> {
    pub fn new(code: i32, message: String, data: T) -> Self {
        Result::<T> {
            code,
            message,
            data,
        }
    }

    pub fn success(data: T) -> Result<T> {
        Result::<T> {
            code: 0,
            message: "success".to_string(),
            data,
        }
    }

    pub fn http_success(data: impl Serialize) -> HttpResponse {
        HttpResponse::Ok().json(Result::success(data))
    }

    pub fn http_response(
        status: u16,
        code: i32,
        message: String,
        data: impl Serialize,
    ) -> HttpResponse {
        HttpResponseBuilder::new(StatusCode::from_u16(status).unwrap_or_default())
            .json(Result::new(code, message, data))
    }
}

/// Error result for API error responses
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResult {
    pub timestamp: String,
    pub status: i32,
    pub error: String,
    pub message: String,
    pub path: String,
}

impl ErrorResult {
    pub fn new(status: i32, error: String, message: String, path: String) -> Self {
        ErrorResult {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status,
            error,
            message,
            path,
        }
    }
}

/// Map a service error onto the HTTP envelope with a structured error code.
pub fn http_error(err: &anyhow::Error) -> HttpResponse {
    let Some(quitanda_err) = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<QuitandaError>())
    else {
        return Result::<String>::http_response(
            500,
            error::SERVER_ERROR.code,
            format!("caused: {}", err),
            String::new(),
        );
    };

    let (status, code) = match quitanda_err {
        QuitandaError::IllegalArgument(_) => (400, error::PARAMETER_VALIDATE_ERROR.code),
        QuitandaError::OrderNotFound(_)
        | QuitandaError::BatchNotFound(_)
        | QuitandaError::ProductNotFound(_) => (404, error::RESOURCE_NOT_FOUND.code),
        QuitandaError::InsufficientStock { .. } => (409, error::INSUFFICIENT_STOCK.code),
        QuitandaError::ConcurrencyConflict(_) | QuitandaError::DatabaseError(_) => {
            (500, error::DATA_ACCESS_ERROR.code)
        }
        _ => (500, error::SERVER_ERROR.code),
    };

    Result::<String>::http_response(
        status,
        code,
        format!("caused: {}", quitanda_err),
        String::new(),
    )
}

/// 400 envelope for request validation failures.
pub fn http_validation_error(message: String) -> HttpResponse {
    Result::<String>::http_response(
        400,
        error::PARAMETER_VALIDATE_ERROR.code,
        format!("caused: {}", message),
        String::new(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_has_code_zero() {
        let result = Result::success("ok".to_string());
        assert_eq!(result.code, 0);
        assert_eq!(result.message, "success");
    }

    #[test]
    fn http_error_maps_not_found() {
        let err: anyhow::Error = QuitandaError::OrderNotFound("o-1".to_string()).into();
        let response = http_error(&err);
        assert_eq!(response.status().as_u16(), 404);
    }

    #[test]
    fn http_error_maps_unknown_to_500() {
        let err = anyhow::anyhow!("boom");
        let response = http_error(&err);
        assert_eq!(response.status().as_u16(), 500);
    }
}
