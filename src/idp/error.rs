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
//! Identity provider errors.

use thiserror::Error;

/// Identity provider error.
///
/// Note that a user declining authentication is not an error: adapters
/// report that as an absent user. These variants cover registry misses,
/// configuration faults and transport or protocol failures against the
/// external provider.
#[derive(Debug, Error)]
pub enum IdpProviderError {
    /// Unknown IdP driver requested in the configuration.
    #[error("identity provider driver {0} is not supported")]
    UnsupportedDriver(String),

    /// The identifier is not registered.
    #[error("identity provider {0} is not registered")]
    IdpNotFound(String),

    /// The configured identifier cannot be used in a URL path.
    #[error("identity provider id {0} is not URL-path-safe")]
    InvalidIdpId(String),

    /// The callback does not carry the opaque authorization reference.
    #[error("callback request is missing the authorization reference")]
    CallbackRefMissing,

    /// Outbound call to the provider failed.
    #[error("identity provider transport failure: {0}")]
    Transport(String),

    /// The provider returned something the adapter cannot trust or parse.
    #[error("invalid identity provider response: {0}")]
    InvalidProviderResponse(String),

    /// Url building error.
    #[error(transparent)]
    UrlParse {
        #[from]
        source: url::ParseError,
    },
}
