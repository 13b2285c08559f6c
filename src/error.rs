//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way
//! to handle and represent the error conditions that can occur, from
//! database issues to validation failures.
//!
//! `AppError` implements `actix_web::error::ResponseError` to seamlessly
//! convert application errors into appropriate HTTP responses with JSON
//! bodies. `From` implementations for collaborator error types
//! (`sqlx::Error`, `validator::ValidationErrors`, the credential authority's
//! `TokenError`, `bcrypt::BcryptError`, and lettre's transport errors) allow
//! conversion with the `?` operator.
//!
//! The credential authority's three verification categories (expired,
//! invalid, session-expired) all map to 401 but keep their distinct
//! messages, so clients can tell a renewable failure from a terminal one.

use crate::auth::token::TokenError;
use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or is required but missing (HTTP 401).
    Unauthorized(String),
    /// Malformed or invalid request (HTTP 400).
    BadRequest(String),
    /// A requested resource was not found (HTTP 404).
    NotFound(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// An error originating from database operations (HTTP 500).
    DatabaseError(String),
    /// Failed input validation (HTTP 422 Unprocessable Entity).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects so handlers can
/// return `Result<_, AppError>` directly.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            // Database errors are presented as generic internal server errors.
            AppError::DatabaseError(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
        }
    }
}

/// `sqlx::Error::RowNotFound` maps to `NotFound`; everything else is a
/// database error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Credential verification failures. All three categories are 401s, with
/// the session-expired message telling the client to log in again.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::Expired => AppError::Unauthorized("Token has expired".into()),
            TokenError::Invalid => AppError::Unauthorized("Invalid token".into()),
            TokenError::SessionExpired => {
                AppError::Unauthorized("Invalid session, please log in again".into())
            }
        }
    }
}

/// Signing failures while minting a credential. These are server-side
/// problems (bad key material), never a client fault.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::InternalServerError(format!("Failed to sign credential: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for AppError {
    fn from(error: lettre::transport::smtp::Error) -> AppError {
        AppError::InternalServerError(format!("Failed to send email: {}", error))
    }
}

impl From<lettre::error::Error> for AppError {
    fn from(error: lettre::error::Error) -> AppError {
        AppError::InternalServerError(format!("Failed to build email: {}", error))
    }
}

impl From<lettre::address::AddressError> for AppError {
    fn from(error: lettre::address::AddressError) -> AppError {
        AppError::BadRequest(format!("Invalid email address: {}", error))
    }
}
