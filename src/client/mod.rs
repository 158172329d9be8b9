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
//! # Client registry.
//!
//! Resolves OAuth 2.0 client identifiers to their registration: redirect
//! URIs, secret and allowed grant. The registry is read-only for the
//! lifetime of the service.

use secrecy::ExposeSecret;
use std::sync::Arc;

use crate::config::Config;

pub mod backend;
pub mod error;
pub mod types;

use backend::ClientBackend;
use backend::config::ConfigBackend;
pub use error::ClientProviderError;
pub use types::Client;

#[derive(Clone)]
pub struct ClientProvider {
    backend_driver: Arc<dyn ClientBackend>,
}

/// Client registry operations.
pub trait ClientApi: Send + Sync + Clone {
    /// Resolve a client identifier. O(1) expected.
    fn get_client<'a>(&self, id: &'a str) -> Result<Option<Client>, ClientProviderError>;

    /// Resolve a client and verify the presented secret.
    ///
    /// Public clients (no registered secret) pass regardless of what is
    /// presented; confidential clients must present their registered secret.
    fn authenticate_client<'a>(
        &self,
        id: &'a str,
        secret: Option<&'a str>,
    ) -> Result<Client, ClientProviderError>;
}

#[cfg(test)]
mockall::mock! {
    pub ClientProvider {
        pub fn new(cfg: &Config) -> Result<Self, ClientProviderError>;
    }

    impl ClientApi for ClientProvider {
        fn get_client<'a>(&self, id: &'a str) -> Result<Option<Client>, ClientProviderError>;

        fn authenticate_client<'a>(
            &self,
            id: &'a str,
            secret: Option<&'a str>,
        ) -> Result<Client, ClientProviderError>;
    }

    impl Clone for ClientProvider {
        fn clone(&self) -> Self;
    }
}

impl ClientProvider {
    pub fn new(config: &Config) -> Result<Self, ClientProviderError> {
        Ok(Self {
            backend_driver: Arc::new(ConfigBackend::new(config)?),
        })
    }
}

impl ClientApi for ClientProvider {
    /// Resolve a client identifier.
    #[tracing::instrument(level = "debug", skip(self))]
    fn get_client<'a>(&self, id: &'a str) -> Result<Option<Client>, ClientProviderError> {
        self.backend_driver.get(id)
    }

    /// Resolve a client and verify the presented secret.
    #[tracing::instrument(level = "debug", skip(self, secret))]
    fn authenticate_client<'a>(
        &self,
        id: &'a str,
        secret: Option<&'a str>,
    ) -> Result<Client, ClientProviderError> {
        let client = self
            .backend_driver
            .get(id)?
            .ok_or_else(|| ClientProviderError::ClientNotFound(id.to_string()))?;
        match &client.secret {
            None => Ok(client),
            Some(registered) if Some(registered.expose_secret()) == secret => Ok(client),
            Some(_) => Err(ClientProviderError::InvalidClientSecret(id.to_string())),
        }
    }
}
