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
//! # Error
//!
//! Errors that can occur while assembling and running the service (not the
//! API layer).
use thiserror::Error;

use crate::authz::error::AuthzProviderError;
use crate::client::error::ClientProviderError;
use crate::idp::error::IdpProviderError;
use crate::storage::error::StorageError;
use crate::token::error::TokenProviderError;

/// Service error.
#[derive(Debug, Error)]
pub enum AuthBrokerError {
    #[error(transparent)]
    AuthzProvider {
        #[from]
        source: AuthzProviderError,
    },

    #[error(transparent)]
    ClientProvider {
        #[from]
        source: ClientProviderError,
    },

    #[error(transparent)]
    IdpProvider {
        #[from]
        source: IdpProviderError,
    },

    #[error(transparent)]
    Storage {
        #[from]
        source: StorageError,
    },

    #[error(transparent)]
    TokenProvider {
        #[from]
        source: TokenProviderError,
    },

    #[error(transparent)]
    IO {
        #[from]
        source: std::io::Error,
    },

    /// Url parsing error.
    #[error(transparent)]
    UrlParse {
        #[from]
        source: url::ParseError,
    },
}
