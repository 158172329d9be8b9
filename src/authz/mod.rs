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
//! # Authorization provider.
//!
//! Answers two questions: is a requested scope part of the scope set this
//! deployment supports at all, and which scopes is a particular
//! authenticated user allowed to request. Both operations are read-only and
//! safe in parallel.

use std::sync::Arc;
use tracing::warn;

use crate::common::types::User;
use crate::config::Config;

pub mod backend;
pub mod error;
pub mod types;

use backend::AuthzBackend;
use backend::config::ConfigBackend;
use backend::empty::EmptyBackend;
pub use error::AuthzProviderError;
pub use types::ScopeSet;

#[derive(Clone)]
pub struct AuthzProvider {
    backend_driver: Arc<dyn AuthzBackend>,
}

/// Authorization operations.
pub trait AuthzApi: Send + Sync + Clone {
    /// Whether every given scope is a member of the total scope set.
    fn valid_scope(&self, scopes: &[String]) -> bool;

    /// The scope set the given user is authorized to request. Always a
    /// subset of the total scope set.
    fn scope_set_for(&self, user: &User) -> ScopeSet;
}

#[cfg(test)]
mockall::mock! {
    pub AuthzProvider {
        pub fn new(cfg: &Config) -> Result<Self, AuthzProviderError>;
    }

    impl AuthzApi for AuthzProvider {
        fn valid_scope(&self, scopes: &[String]) -> bool;

        fn scope_set_for(&self, user: &User) -> ScopeSet;
    }

    impl Clone for AuthzProvider {
        fn clone(&self) -> Self;
    }
}

impl AuthzProvider {
    pub fn new(config: &Config) -> Result<Self, AuthzProviderError> {
        let backend_driver: Arc<dyn AuthzBackend> = match config.authz.driver.as_str() {
            "config" => Arc::new(ConfigBackend::new(&config.authz)?),
            "empty" => {
                warn!("no authorization provider configured, using the empty scope set");
                Arc::new(EmptyBackend::default())
            }
            other => return Err(AuthzProviderError::UnsupportedDriver(other.to_string())),
        };
        Ok(Self { backend_driver })
    }
}

impl AuthzApi for AuthzProvider {
    /// Whether every given scope is a member of the total scope set.
    #[tracing::instrument(level = "debug", skip(self))]
    fn valid_scope(&self, scopes: &[String]) -> bool {
        self.backend_driver.valid_scope(scopes)
    }

    /// The scope set the given user is authorized to request.
    #[tracing::instrument(level = "debug", skip(self, user))]
    fn scope_set_for(&self, user: &User) -> ScopeSet {
        self.backend_driver.scope_set_for(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_driver_is_default() {
        let sot = AuthzProvider::new(&Config::default()).unwrap();
        assert!(!sot.valid_scope(&["read".to_string()]));
    }

    #[test]
    fn test_config_driver() {
        let mut config = Config::default();
        config.authz.driver = "config".into();
        config.authz.scopes = vec!["read".into()];
        let sot = AuthzProvider::new(&config).unwrap();
        assert!(sot.valid_scope(&["read".to_string()]));
        assert!(!sot.valid_scope(&["write".to_string()]));
    }

    #[test]
    fn test_unsupported_driver() {
        let mut config = Config::default();
        config.authz.driver = "ldap".into();
        assert!(matches!(
            AuthzProvider::new(&config),
            Err(AuthzProviderError::UnsupportedDriver(_))
        ));
    }
}
