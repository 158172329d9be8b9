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
//! # Transient state store.
//!
//! Persists the opaque records that carry an authorization flow across the
//! user agent's redirects. Records are serialized into a self-describing,
//! field-tagged MessagePack blob and handed to a key-value backend with a
//! fixed TTL, so that an abandoned flow disappears on its own.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;

pub mod backend;
pub mod error;
pub mod types;

use backend::TransientBackend;
use backend::memory::MemoryBackend;
pub use error::StorageError;
pub use types::{AuthorizationCode, AuthorizationState};

#[derive(Clone)]
pub struct StorageProvider {
    backend_driver: Arc<dyn TransientBackend>,
    ttl: Duration,
}

/// Transient state operations.
///
/// `persist_*` writes a record under a caller-chosen key; `restore_*` reads
/// it back, failing with [`StorageError::NotFound`] once the TTL elapsed.
/// `discard_*` is a best-effort removal: the TTL guarantees eventual cleanup
/// when the delete is lost.
#[async_trait]
pub trait StorageApi: Send + Sync + Clone {
    async fn persist_authorization_state<'a>(
        &self,
        key: &'a str,
        state: &AuthorizationState,
    ) -> Result<(), StorageError>;

    async fn restore_authorization_state<'a>(
        &self,
        key: &'a str,
    ) -> Result<AuthorizationState, StorageError>;

    async fn discard_authorization_state<'a>(&self, key: &'a str);

    async fn persist_authorization_code<'a>(
        &self,
        code: &'a str,
        grant: &AuthorizationCode,
    ) -> Result<(), StorageError>;

    async fn restore_authorization_code<'a>(
        &self,
        code: &'a str,
    ) -> Result<AuthorizationCode, StorageError>;

    async fn discard_authorization_code<'a>(&self, code: &'a str);

    /// Drop expired records eagerly.
    async fn cleanup(&self) -> Result<(), StorageError>;
}

#[cfg(test)]
mockall::mock! {
    pub StorageProvider {
        pub fn new(cfg: &Config) -> Result<Self, StorageError>;
    }

    #[async_trait]
    impl StorageApi for StorageProvider {
        async fn persist_authorization_state<'a>(
            &self,
            key: &'a str,
            state: &AuthorizationState,
        ) -> Result<(), StorageError>;

        async fn restore_authorization_state<'a>(
            &self,
            key: &'a str,
        ) -> Result<AuthorizationState, StorageError>;

        async fn discard_authorization_state<'a>(&self, key: &'a str);

        async fn persist_authorization_code<'a>(
            &self,
            code: &'a str,
            grant: &AuthorizationCode,
        ) -> Result<(), StorageError>;

        async fn restore_authorization_code<'a>(
            &self,
            code: &'a str,
        ) -> Result<AuthorizationCode, StorageError>;

        async fn discard_authorization_code<'a>(&self, code: &'a str);

        async fn cleanup(&self) -> Result<(), StorageError>;
    }

    impl Clone for StorageProvider {
        fn clone(&self) -> Self;
    }
}

impl StorageProvider {
    pub fn new(config: &Config) -> Result<Self, StorageError> {
        let backend_driver: Arc<dyn TransientBackend> = match config.storage.driver.as_str() {
            "memory" => {
                warn!("using in-memory transient storage");
                Arc::new(MemoryBackend::default())
            }
            other => return Err(StorageError::UnsupportedDriver(other.to_string())),
        };
        Ok(Self {
            backend_driver,
            ttl: Duration::from_secs(config.storage.ttl),
        })
    }

    async fn persist<T: serde::Serialize + Sync>(
        &self,
        key: &str,
        record: &T,
    ) -> Result<(), StorageError> {
        let encoded = rmp_serde::to_vec_named(record)?;
        self.backend_driver.persist(key, encoded, self.ttl).await
    }

    async fn restore<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<T, StorageError> {
        let encoded = self.backend_driver.restore(key).await?;
        Ok(rmp_serde::from_slice(&encoded)?)
    }

    async fn discard(&self, key: &str) {
        if let Err(err) = self.backend_driver.delete(key).await {
            debug!("discarding transient record failed: {}", err);
        }
    }
}

#[async_trait]
impl StorageApi for StorageProvider {
    /// Persist an in-flight authorization flow record.
    #[tracing::instrument(level = "debug", skip(self, state))]
    async fn persist_authorization_state<'a>(
        &self,
        key: &'a str,
        state: &AuthorizationState,
    ) -> Result<(), StorageError> {
        self.persist(key, state).await
    }

    /// Restore an in-flight authorization flow record.
    #[tracing::instrument(level = "debug", skip(self))]
    async fn restore_authorization_state<'a>(
        &self,
        key: &'a str,
    ) -> Result<AuthorizationState, StorageError> {
        self.restore(key).await
    }

    /// Best-effort removal of a consumed flow record.
    #[tracing::instrument(level = "debug", skip(self))]
    async fn discard_authorization_state<'a>(&self, key: &'a str) {
        self.discard(key).await;
    }

    /// Persist the grant behind an issued authorization code.
    #[tracing::instrument(level = "debug", skip(self, grant))]
    async fn persist_authorization_code<'a>(
        &self,
        code: &'a str,
        grant: &AuthorizationCode,
    ) -> Result<(), StorageError> {
        self.persist(code, grant).await
    }

    /// Restore the grant behind an authorization code.
    #[tracing::instrument(level = "debug", skip(self, code))]
    async fn restore_authorization_code<'a>(
        &self,
        code: &'a str,
    ) -> Result<AuthorizationCode, StorageError> {
        self.restore(code).await
    }

    /// Best-effort removal of a redeemed authorization code.
    #[tracing::instrument(level = "debug", skip(self, code))]
    async fn discard_authorization_code<'a>(&self, code: &'a str) {
        self.discard(code).await;
    }

    /// Drop expired records eagerly.
    #[tracing::instrument(level = "debug", skip(self))]
    async fn cleanup(&self) -> Result<(), StorageError> {
        self.backend_driver.cleanup().await
    }
}
