// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! # API errors.
//!
//! These are the failures that surface as direct HTTP responses. Flow
//! failures that redirect back to a validated client redirect URI with an
//! OAuth 2.0 `error=` parameter are built in the handlers themselves, since
//! only they hold the trusted redirect target.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::client::error::ClientProviderError;
use crate::storage::error::StorageError;
use crate::token::error::TokenProviderError;

/// API operation errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Untrusted request fault: surfaced as a plain 400 because no
    /// registered redirect target can be trusted.
    #[error("{0}")]
    BadRequest(String),

    /// Internal fault. The message is our own context, never a backend
    /// message.
    #[error("internal server error: {0}")]
    InternalError(String),

    /// RFC 6749 §5.2 token endpoint error.
    #[error("{error}: {error_description}")]
    TokenEndpoint {
        error: &'static str,
        error_description: String,
    },

    /// Request validation error.
    #[error("request validation failed: {source}")]
    Validator {
        /// The source of the error.
        #[from]
        source: validator::ValidationErrors,
    },
}

impl ApiError {
    pub fn token_endpoint(error: &'static str, description: impl Into<String>) -> Self {
        Self::TokenEndpoint {
            error,
            error_description: description.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Error happened during request processing: {:#?}", self);

        match self {
            ApiError::TokenEndpoint {
                error,
                error_description,
            } => {
                let status = if error == "invalid_client" {
                    StatusCode::UNAUTHORIZED
                } else {
                    StatusCode::BAD_REQUEST
                };
                let mut response = (
                    status,
                    [
                        (header::CACHE_CONTROL, "no-store"),
                        (header::PRAGMA, "no-cache"),
                    ],
                    Json(json!({
                        "error": error,
                        "error_description": error_description,
                    })),
                )
                    .into_response();
                if status == StatusCode::UNAUTHORIZED {
                    response.headers_mut().insert(
                        header::WWW_AUTHENTICATE,
                        header::HeaderValue::from_static("Basic realm=\"authbroker\""),
                    );
                }
                response
            }
            other => {
                let status_code = match other {
                    ApiError::BadRequest(..) | ApiError::Validator { .. } => {
                        StatusCode::BAD_REQUEST
                    }
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status_code,
                    Json(json!({
                        "error": {"code": status_code.as_u16(), "message": other.to_string()}
                    })),
                )
                    .into_response()
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(..) | StorageError::Deserialize { .. } => {
                Self::BadRequest("authorization state is missing or expired".to_string())
            }
            _ => Self::InternalError("transient storage failure".to_string()),
        }
    }
}

impl From<TokenProviderError> for ApiError {
    fn from(_value: TokenProviderError) -> Self {
        Self::InternalError("access token encoding failed".to_string())
    }
}

impl From<ClientProviderError> for ApiError {
    fn from(_value: ClientProviderError) -> Self {
        Self::InternalError("client registry failure".to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for ApiError {
    fn from(_value: serde_urlencoded::ser::Error) -> Self {
        Self::InternalError("redirect parameter encoding failed".to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(_value: url::ParseError) -> Self {
        Self::InternalError("redirect target construction failed".to_string())
    }
}
