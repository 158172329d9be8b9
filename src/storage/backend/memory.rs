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
//! Process-local transient storage.
//!
//! Keeps records in a TTL map inside the process. State does not survive a
//! restart and is not shared between replicas, which is fine for development
//! and single-instance deployments; anything else wants an external engine.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::storage::backend::TransientBackend;
use crate::storage::error::StorageError;

struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Entry>>,
}

#[async_trait]
impl TransientBackend for MemoryBackend {
    async fn persist<'a>(
        &self,
        key: &'a str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn restore<'a>(&self, key: &'a str) -> Result<Vec<u8>, StorageError> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                Err(StorageError::NotFound(key.to_string()))
            }
            None => Err(StorageError::NotFound(key.to_string())),
        }
    }

    async fn delete<'a>(&self, key: &'a str) -> Result<(), StorageError> {
        match self.entries.lock().await.remove(key) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(key.to_string())),
        }
    }

    async fn cleanup(&self) -> Result<(), StorageError> {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .retain(|_, entry| entry.expires_at > now);
        Ok(())
    }
}
