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
//! Transient storage backends.

use async_trait::async_trait;
use std::time::Duration;

use crate::storage::error::StorageError;

pub mod memory;

/// The key-value engine contract behind the state store.
///
/// A successful `persist` must be visible to a subsequent `restore` under
/// the same key until the TTL elapses; `restore` must never return a value
/// past its TTL.
#[async_trait]
pub trait TransientBackend: Send + Sync {
    /// Store a value under the key for at most `ttl`.
    async fn persist<'a>(
        &self,
        key: &'a str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), StorageError>;

    /// Fetch the value stored under the key.
    async fn restore<'a>(&self, key: &'a str) -> Result<Vec<u8>, StorageError>;

    /// Remove the record stored under the key.
    async fn delete<'a>(&self, key: &'a str) -> Result<(), StorageError>;

    /// Drop expired records eagerly.
    async fn cleanup(&self) -> Result<(), StorageError>;
}
