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
//! Token provider errors.

use thiserror::Error;

/// Token provider error.
#[derive(Debug, Error)]
pub enum TokenProviderError {
    /// Invalid, expired or foreign token.
    #[error("invalid token: {}", source)]
    InvalidToken {
        /// The source of the error.
        #[from]
        source: jsonwebtoken::errors::Error,
    },

    /// Configured lifetime does not fit the claim arithmetic.
    #[error("token lifetime {value} overflows the expiry calculation: {}", source)]
    LifetimeOverflow {
        /// Configured lifetime.
        value: u64,
        /// The source of the error.
        source: std::num::TryFromIntError,
    },
}
