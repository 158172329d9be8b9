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
//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters of the authorization endpoint.
///
/// All parameters are optional at the type level: the handler validates
/// them in the order RFC 6749 prescribes so that each failure gets its
/// defined treatment (direct 400 versus redirect with an `error`
/// parameter).
#[derive(Debug, Default, Deserialize, IntoParams, Validate)]
pub struct AuthorizeRequest {
    /// Identifier of the requesting client.
    #[validate(length(max = 255))]
    pub client_id: Option<String>,

    /// One of the client's registered redirect URIs.
    #[validate(length(max = 2048))]
    pub redirect_uri: Option<String>,

    /// `token` (implicit) or `code`.
    #[validate(length(max = 32))]
    pub response_type: Option<String>,

    /// Space-delimited requested scopes.
    #[validate(length(max = 1024))]
    pub scope: Option<String>,

    /// Opaque client value echoed back on every redirect.
    #[validate(length(max = 1024))]
    pub state: Option<String>,

    /// Identifier of the identity provider to authenticate against.
    #[validate(length(max = 255))]
    pub idp_id: Option<String>,
}

/// Form body of the token endpoint (RFC 6749 §4.1.3).
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct TokenRequest {
    /// Must be `authorization_code`.
    pub grant_type: Option<String>,

    /// The authorization code delivered on the callback redirect.
    #[validate(length(max = 255))]
    pub code: Option<String>,

    /// The redirect URI the code was delivered to.
    #[validate(length(max = 2048))]
    pub redirect_uri: Option<String>,

    /// Client identifier, when not authenticating via HTTP Basic.
    #[validate(length(max = 255))]
    pub client_id: Option<String>,

    /// Client secret, when not authenticating via HTTP Basic.
    pub client_secret: Option<String>,
}

/// Successful token endpoint response (RFC 6749 §5.1).
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    /// The issued bearer token.
    pub access_token: String,

    /// Always `bearer`.
    pub token_type: String,

    /// Remaining token lifetime in seconds.
    pub expires_in: u64,

    /// Space-delimited granted scopes.
    pub scope: String,
}
