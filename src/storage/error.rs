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
//! Transient storage errors.

use thiserror::Error;

/// Transient storage error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key is unknown or its record has expired.
    #[error("transient record {0} is missing or expired")]
    NotFound(String),

    /// Record serialization error.
    #[error("state serialization error: {}", source)]
    Serialize {
        /// The source of the error.
        #[from]
        source: rmp_serde::encode::Error,
    },

    /// Record deserialization error.
    #[error("state deserialization error: {}", source)]
    Deserialize {
        /// The source of the error.
        #[from]
        source: rmp_serde::decode::Error,
    },

    /// Unknown storage driver requested in the configuration.
    #[error("storage driver {0} is not supported")]
    UnsupportedDriver(String),

    /// The backing engine failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}
