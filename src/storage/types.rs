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

use serde::{Deserialize, Serialize};

use crate::common::types::ResponseType;

/// The record carrying one in-flight authorization flow across the user
/// agent's redirects.
///
/// Written exactly once by the authorization endpoint under a fresh random
/// key, read exactly once by the IdP callback handler and then discarded (or
/// left to expire).
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AuthorizationState {
    /// Identifier of the requesting client.
    pub client_id: String,

    /// The redirect URI selected from the client's registered redirects.
    pub redirect_uri: String,

    /// Requested response type.
    pub response_type: ResponseType,

    /// Requested scopes, ordered and deduplicated.
    pub scope: Vec<String>,

    /// Client-supplied echo value, passed back unmodified.
    pub state: Option<String>,

    /// Opaque bytes produced by the identity provider's redirect step.
    pub idp_state: Vec<u8>,
}

/// The record bound to a single-use authorization code, persisted when the
/// code is issued and consumed on redemption at the token endpoint.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AuthorizationCode {
    /// The client the code was issued to.
    pub client_id: String,

    /// The redirect URI the code was delivered to.
    pub redirect_uri: String,

    /// The authenticated subject.
    pub user_uid: String,

    /// The granted scopes.
    pub scope: Vec<String>,
}
