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
//! Token provider backends.

use crate::token::{TokenProviderError, types::AccessTokenClaims};

pub mod jwt;

/// Token provider backend interface.
pub trait TokenBackend: Send + Sync {
    /// Serialize and sign the claims into a compact credential.
    fn encode(&self, claims: &AccessTokenClaims) -> Result<String, TokenProviderError>;

    /// Verify a credential and extract the claims.
    fn decode(&self, credential: &str) -> Result<AccessTokenClaims, TokenProviderError>;
}
