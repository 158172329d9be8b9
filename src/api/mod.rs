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
//! # HTTP API
//!
//! The OAuth 2.0 surface of the service: the authorization endpoint, the
//! per-IdP callback endpoint and the token endpoint. Endpoints answer with
//! 303 redirects wherever RFC 6749 makes the user agent carry the result
//! back to the client.

use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

pub use crate::api::error::ApiError;
use crate::service::ServiceState;

mod authorize;
mod callback;
pub(crate) mod common;
pub mod error;
mod token;
pub mod types;

/// OpenApi specification.
#[derive(OpenApi)]
#[openapi(info(
    title = "authbroker",
    description = "OAuth 2.0 authorization service",
    version = "0.1.0"
))]
pub struct ApiDoc;

/// Main API router.
pub fn openapi_router() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .merge(authorize::openapi_router())
        .merge(callback::openapi_router())
        .merge(token::openapi_router())
}
