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
//! # Identity provider registry.
//!
//! Identity providers authenticate end users through their own
//! redirect-based dance. An adapter implements [`IdentityProvider`]; the
//! registry assembles the configured adapters once at startup and dispatches
//! handler calls to them by identifier.
//!
//! The callback contract is two-phase on purpose: [`IdentityProvider::callback_ref`]
//! recovers the opaque authorization reference from the callback request
//! without trusting (or fetching) any identity claim, so the handler can
//! locate its persisted state first; only then does
//! [`IdentityProvider::authn_callback`] run the full validation with the
//! adapter state that was persisted alongside. Adapters that receive signed
//! identity tokens must verify them against the provider's keys before
//! reporting a user.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use url::Url;

use crate::common::types::User;
use crate::config::Config;

pub mod anonymous;
pub mod error;
pub mod types;

use anonymous::AnonymousIdentityProvider;
pub use error::IdpProviderError;
pub use types::AuthnRedirect;

/// The contract every identity provider adapter supplies.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Stable identifier, used in registry keys and the callback URL path.
    /// Must be URL-path-safe.
    fn id(&self) -> &str;

    /// Build the URL the user agent is sent to for authentication. The
    /// adapter must arrange for `authz_ref` to come back with the callback,
    /// typically inside its own `state` parameter.
    async fn authn_redirect(
        &self,
        callback_url: &Url,
        authz_ref: &str,
    ) -> Result<AuthnRedirect, IdpProviderError>;

    /// Recover the authorization reference from callback parameters without
    /// trusting any identity claim. No I/O.
    fn callback_ref(&self, query: &HashMap<String, String>)
    -> Result<String, IdpProviderError>;

    /// Complete the authentication. `None` means the user declined; errors
    /// are reserved for transport and protocol faults.
    async fn authn_callback(
        &self,
        query: &HashMap<String, String>,
        idp_state: &[u8],
    ) -> Result<Option<User>, IdpProviderError>;
}

#[derive(Clone)]
pub struct IdpProvider {
    idps: HashMap<String, Arc<dyn IdentityProvider>>,
}

/// Identity provider registry operations.
#[async_trait]
pub trait IdpApi: Send + Sync + Clone {
    /// Whether the identifier names a registered identity provider.
    fn has_idp<'a>(&self, id: &'a str) -> bool;

    /// Dispatch [`IdentityProvider::authn_redirect`] to the named provider.
    async fn authn_redirect<'a>(
        &self,
        idp_id: &'a str,
        callback_url: &Url,
        authz_ref: &'a str,
    ) -> Result<AuthnRedirect, IdpProviderError>;

    /// Dispatch [`IdentityProvider::callback_ref`] to the named provider.
    fn callback_ref<'a>(
        &self,
        idp_id: &'a str,
        query: &HashMap<String, String>,
    ) -> Result<String, IdpProviderError>;

    /// Dispatch [`IdentityProvider::authn_callback`] to the named provider.
    async fn authn_callback<'a>(
        &self,
        idp_id: &'a str,
        query: &HashMap<String, String>,
        idp_state: &'a [u8],
    ) -> Result<Option<User>, IdpProviderError>;
}

#[cfg(test)]
mockall::mock! {
    pub IdpProvider {
        pub fn new(cfg: &Config) -> Result<Self, IdpProviderError>;
    }

    #[async_trait]
    impl IdpApi for IdpProvider {
        fn has_idp<'a>(&self, id: &'a str) -> bool;

        async fn authn_redirect<'a>(
            &self,
            idp_id: &'a str,
            callback_url: &Url,
            authz_ref: &'a str,
        ) -> Result<AuthnRedirect, IdpProviderError>;

        fn callback_ref<'a>(
            &self,
            idp_id: &'a str,
            query: &HashMap<String, String>,
        ) -> Result<String, IdpProviderError>;

        async fn authn_callback<'a>(
            &self,
            idp_id: &'a str,
            query: &HashMap<String, String>,
            idp_state: &'a [u8],
        ) -> Result<Option<User>, IdpProviderError>;
    }

    impl Clone for IdpProvider {
        fn clone(&self) -> Self;
    }
}

fn url_path_safe(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl IdpProvider {
    pub fn new(config: &Config) -> Result<Self, IdpProviderError> {
        let mut idps: HashMap<String, Arc<dyn IdentityProvider>> = HashMap::new();
        for (id, section) in &config.idp {
            if !url_path_safe(id) {
                return Err(IdpProviderError::InvalidIdpId(id.clone()));
            }
            let adapter: Arc<dyn IdentityProvider> = match section.driver.as_str() {
                "anonymous" => Arc::new(AnonymousIdentityProvider::new(id.clone())),
                other => return Err(IdpProviderError::UnsupportedDriver(other.to_string())),
            };
            idps.insert(id.clone(), adapter);
        }
        if idps.is_empty() {
            warn!("no identity provider configured, using anonymous authentication");
            idps.insert(
                "anonymous".to_string(),
                Arc::new(AnonymousIdentityProvider::new("anonymous")),
            );
        }
        Ok(Self { idps })
    }

    fn get(&self, id: &str) -> Result<&Arc<dyn IdentityProvider>, IdpProviderError> {
        self.idps
            .get(id)
            .ok_or_else(|| IdpProviderError::IdpNotFound(id.to_string()))
    }
}

#[async_trait]
impl IdpApi for IdpProvider {
    fn has_idp<'a>(&self, id: &'a str) -> bool {
        self.idps.contains_key(id)
    }

    /// Build the authentication redirect for the named provider.
    #[tracing::instrument(level = "debug", skip(self))]
    async fn authn_redirect<'a>(
        &self,
        idp_id: &'a str,
        callback_url: &Url,
        authz_ref: &'a str,
    ) -> Result<AuthnRedirect, IdpProviderError> {
        self.get(idp_id)?
            .authn_redirect(callback_url, authz_ref)
            .await
    }

    /// Recover the authorization reference from a callback.
    #[tracing::instrument(level = "debug", skip(self, query))]
    fn callback_ref<'a>(
        &self,
        idp_id: &'a str,
        query: &HashMap<String, String>,
    ) -> Result<String, IdpProviderError> {
        self.get(idp_id)?.callback_ref(query)
    }

    /// Complete the authentication for the named provider.
    #[tracing::instrument(level = "debug", skip(self, query, idp_state))]
    async fn authn_callback<'a>(
        &self,
        idp_id: &'a str,
        query: &HashMap<String, String>,
        idp_state: &'a [u8],
    ) -> Result<Option<User>, IdpProviderError> {
        self.get(idp_id)?.authn_callback(query, idp_state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdpSection;

    #[test]
    fn test_anonymous_fallback_when_unconfigured() {
        let sot = IdpProvider::new(&Config::default()).unwrap();
        assert!(sot.has_idp("anonymous"));
    }

    #[test]
    fn test_configured_registry() {
        let mut config = Config::default();
        config.idp.insert(
            "anon".into(),
            IdpSection {
                driver: "anonymous".into(),
            },
        );
        let sot = IdpProvider::new(&config).unwrap();
        assert!(sot.has_idp("anon"));
        assert!(!sot.has_idp("anonymous"));
        assert!(!sot.has_idp("google"));
    }

    #[test]
    fn test_unsupported_driver() {
        let mut config = Config::default();
        config.idp.insert(
            "corp".into(),
            IdpSection {
                driver: "saml".into(),
            },
        );
        assert!(matches!(
            IdpProvider::new(&config),
            Err(IdpProviderError::UnsupportedDriver(_))
        ));
    }

    #[test]
    fn test_path_unsafe_id_rejected() {
        let mut config = Config::default();
        config.idp.insert(
            "an/on".into(),
            IdpSection {
                driver: "anonymous".into(),
            },
        );
        assert!(matches!(
            IdpProvider::new(&config),
            Err(IdpProviderError::InvalidIdpId(_))
        ));
    }

    #[tokio::test]
    async fn test_dispatch_to_unknown_idp() {
        let sot = IdpProvider::new(&Config::default()).unwrap();
        let callback = Url::parse("http://localhost/callback/ghost").unwrap();
        assert!(matches!(
            sot.authn_redirect("ghost", &callback, "ref").await,
            Err(IdpProviderError::IdpNotFound(_))
        ));
    }
}
