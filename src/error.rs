// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Salesboard

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::codec::DecodeError;
use crate::store::StoreError;

/// Authentication error type.
///
/// Every expected rejection (bad credentials, expired token, missing
/// permission) is a variant here and is returned, never thrown. Only
/// `Unavailable` and `Internal` represent infrastructure trouble; the
/// rest map to client-visible 4xx responses and are not server errors.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Unknown identifier or wrong secret (deliberately indistinguishable)
    InvalidCredentials,
    /// Account exists but is deactivated
    AccountInactive,
    /// Token is malformed or its signature is invalid
    InvalidToken,
    /// Token has expired
    TokenExpired,
    /// Access token presented where a refresh token is required, or vice versa
    WrongTokenType,
    /// Refresh token has been revoked
    TokenRevoked,
    /// Authenticated but lacking the required role
    Forbidden,
    /// Credential store or revocation ledger timed out or is unreachable
    Unavailable(String),
    /// Internal error
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::AccountInactive => "account_inactive",
            AuthError::InvalidToken => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::WrongTokenType => "wrong_token_type",
            AuthError::TokenRevoked => "token_revoked",
            AuthError::Forbidden => "forbidden",
            AuthError::Unavailable(_) => "unavailable",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::WrongTokenType
            | AuthError::TokenRevoked => StatusCode::UNAUTHORIZED,
            AuthError::AccountInactive => StatusCode::BAD_REQUEST,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller may retry the request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::Unavailable(_))
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::InvalidCredentials => write!(f, "Incorrect email or password"),
            AuthError::AccountInactive => write!(f, "Account is inactive"),
            AuthError::InvalidToken => write!(f, "Token is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::WrongTokenType => write!(f, "Token type is not valid for this operation"),
            AuthError::TokenRevoked => write!(f, "Token has been revoked"),
            AuthError::Forbidden => write!(f, "Insufficient permissions for this operation"),
            AuthError::Unavailable(msg) => write!(f, "Authentication backend unavailable: {msg}"),
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<DecodeError> for AuthError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Expired => AuthError::TokenExpired,
            DecodeError::InvalidSignature | DecodeError::Malformed => AuthError::InvalidToken,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Unavailable(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
