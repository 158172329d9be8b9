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
//! Anonymous identity provider.
//!
//! Authenticates everyone as the same anonymous user without any external
//! dance: the "authentication" redirect points straight back at the callback
//! URL with the authorization reference attached. Fallback driver when no
//! identity provider is configured; also handy in development. The callback
//! may carry `denied=1` to exercise the denial path.

use async_trait::async_trait;
use std::collections::HashMap;
use url::Url;

use crate::common::types::User;
use crate::idp::IdentityProvider;
use crate::idp::error::IdpProviderError;
use crate::idp::types::AuthnRedirect;

const REF_PARAM: &str = "ref";

pub struct AnonymousIdentityProvider {
    id: String,
}

impl AnonymousIdentityProvider {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl IdentityProvider for AnonymousIdentityProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn authn_redirect(
        &self,
        callback_url: &Url,
        authz_ref: &str,
    ) -> Result<AuthnRedirect, IdpProviderError> {
        let mut url = callback_url.clone();
        url.query_pairs_mut().append_pair(REF_PARAM, authz_ref);
        Ok(AuthnRedirect {
            url,
            idp_state: Vec::new(),
        })
    }

    fn callback_ref(
        &self,
        query: &HashMap<String, String>,
    ) -> Result<String, IdpProviderError> {
        query
            .get(REF_PARAM)
            .cloned()
            .ok_or(IdpProviderError::CallbackRefMissing)
    }

    async fn authn_callback(
        &self,
        query: &HashMap<String, String>,
        _idp_state: &[u8],
    ) -> Result<Option<User>, IdpProviderError> {
        if !query.contains_key(REF_PARAM) {
            return Err(IdpProviderError::CallbackRefMissing);
        }
        if query.get("denied").is_some() {
            return Ok(None);
        }
        Ok(Some(User {
            uid: "anonymous".to_string(),
            data: vec!["anonymous".to_string()],
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_redirect_returns_to_callback() {
        let sot = AnonymousIdentityProvider::new("anon");
        let callback = Url::parse("http://localhost:8080/callback/anon").unwrap();
        let redirect = sot.authn_redirect(&callback, "ref123").await.unwrap();
        assert_eq!(
            redirect.url.as_str(),
            "http://localhost:8080/callback/anon?ref=ref123"
        );
        assert!(redirect.idp_state.is_empty());
    }

    #[tokio::test]
    async fn test_callback_roundtrips_ref() {
        let sot = AnonymousIdentityProvider::new("anon");
        assert_eq!(
            sot.callback_ref(&query(&[("ref", "ref123")])).unwrap(),
            "ref123"
        );
        assert!(matches!(
            sot.callback_ref(&query(&[])),
            Err(IdpProviderError::CallbackRefMissing)
        ));
    }

    #[tokio::test]
    async fn test_callback_authenticates_anonymous() {
        let sot = AnonymousIdentityProvider::new("anon");
        let user = sot
            .authn_callback(&query(&[("ref", "ref123")]), &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.uid, "anonymous");
        assert_eq!(user.data, vec!["anonymous"]);
    }

    #[tokio::test]
    async fn test_callback_denial() {
        let sot = AnonymousIdentityProvider::new("anon");
        let outcome = sot
            .authn_callback(&query(&[("ref", "ref123"), ("denied", "1")]), &[])
            .await
            .unwrap();
        assert!(outcome.is_none(), "denial is not an error");
    }
}
