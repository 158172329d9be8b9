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
//! # Provider manager
//!
//! Provider manager gives access to the individual service providers. It is
//! assembled exactly once at startup and read-only from then on, while also
//! allowing an easy injection of mocked providers in tests.
use derive_builder::Builder;
use mockall_double::double;

use crate::authz::AuthzApi;
#[double]
use crate::authz::AuthzProvider;
use crate::client::ClientApi;
#[double]
use crate::client::ClientProvider;
use crate::config::Config;
use crate::error::AuthBrokerError;
use crate::idp::IdpApi;
#[double]
use crate::idp::IdpProvider;
use crate::storage::StorageApi;
#[double]
use crate::storage::StorageProvider;
use crate::token::TokenApi;
#[double]
use crate::token::TokenProvider;

/// Global provider manager.
#[derive(Builder, Clone)]
// It is necessary to use the owned pattern since otherwise builder invokes clone which
// immediately confuses mockall used in tests
#[builder(pattern = "owned")]
pub struct Provider {
    /// Configuration.
    pub config: Config,
    /// Authorization provider.
    authz: AuthzProvider,
    /// Client registry.
    client: ClientProvider,
    /// Identity provider registry.
    idp: IdpProvider,
    /// Transient state store.
    storage: StorageProvider,
    /// Access token provider.
    token: TokenProvider,
}

impl Provider {
    pub fn new(cfg: Config) -> Result<Self, AuthBrokerError> {
        let authz_provider = AuthzProvider::new(&cfg)?;
        let client_provider = ClientProvider::new(&cfg)?;
        let idp_provider = IdpProvider::new(&cfg)?;
        let storage_provider = StorageProvider::new(&cfg)?;
        let token_provider = TokenProvider::new(&cfg)?;

        Ok(Self {
            config: cfg,
            authz: authz_provider,
            client: client_provider,
            idp: idp_provider,
            storage: storage_provider,
            token: token_provider,
        })
    }

    /// Get the authorization provider.
    pub fn get_authz_provider(&self) -> &impl AuthzApi {
        &self.authz
    }

    /// Get the client registry.
    pub fn get_client_provider(&self) -> &impl ClientApi {
        &self.client
    }

    /// Get the identity provider registry.
    pub fn get_idp_provider(&self) -> &impl IdpApi {
        &self.idp
    }

    /// Get the transient state store.
    pub fn get_storage_provider(&self) -> &impl StorageApi {
        &self.storage
    }

    /// Get the access token provider.
    pub fn get_token_provider(&self) -> &impl TokenApi {
        &self.token
    }
}

#[cfg(test)]
impl Provider {
    pub fn mocked_builder() -> ProviderBuilder {
        let config = Config::default();
        let authz_mock = crate::authz::MockAuthzProvider::default();
        let client_mock = crate::client::MockClientProvider::default();
        let idp_mock = crate::idp::MockIdpProvider::default();
        let storage_mock = crate::storage::MockStorageProvider::default();
        let token_mock = crate::token::MockTokenProvider::default();

        ProviderBuilder::default()
            .config(config)
            .authz(authz_mock)
            .client(client_mock)
            .idp(idp_mock)
            .storage(storage_mock)
            .token(token_mock)
    }
}
