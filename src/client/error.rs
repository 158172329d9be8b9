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
//! Client registry errors.

use thiserror::Error;

/// Client registry error.
#[derive(Debug, Error)]
pub enum ClientProviderError {
    /// Unknown client identifier.
    #[error("client {0} is not registered")]
    ClientNotFound(String),

    /// The presented client credentials do not match the registration.
    #[error("client {0} failed to authenticate")]
    InvalidClientSecret(String),

    /// A registered redirect URI is not an absolute URL.
    #[error("client {client} registers an invalid redirect {uri}: {}", source)]
    InvalidRedirect {
        /// Client identifier.
        client: String,
        /// The offending redirect entry.
        uri: String,
        /// The source of the error.
        source: url::ParseError,
    },
}
