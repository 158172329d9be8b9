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

/// The claims carried by an access token.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AccessTokenClaims {
    /// Token issuer.
    pub iss: String,

    /// The authenticated subject (user identifier).
    pub sub: String,

    /// Scopes granted to the bearer.
    pub scopes: Vec<String>,

    /// Issuance time, seconds since the epoch.
    pub iat: i64,

    /// Expiry time, seconds since the epoch.
    pub exp: i64,
}
