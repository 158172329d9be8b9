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
//! # Access token provider.
//!
//! Produces the self-contained bearer credentials handed to clients at the
//! end of a successful authorization flow. A token carries the authenticated
//! subject, the granted scope list and the validity window, signed so that
//! resource servers can validate it without calling back into this service.

use chrono::Utc;
use std::sync::Arc;

use crate::config::{Config, TokenProviderDriver};

pub mod backend;
pub mod error;
pub mod types;

use backend::TokenBackend;
use backend::jwt::JwtTokenProvider;
pub use error::TokenProviderError;
pub use types::AccessTokenClaims;

#[derive(Clone)]
pub struct TokenProvider {
    config: Config,
    backend_driver: Arc<dyn TokenBackend>,
}

/// Access token operations.
///
/// The provider is pure and stateless; all operations are safe to call in
/// parallel.
pub trait TokenApi: Send + Sync + Clone {
    /// Encode an access token for the subject carrying the granted scopes.
    fn encode<'a>(
        &self,
        subject: &'a str,
        scopes: &[String],
    ) -> Result<String, TokenProviderError>;

    /// Verify a token and extract its claims.
    fn decode<'a>(&self, credential: &'a str) -> Result<AccessTokenClaims, TokenProviderError>;

    /// The configured token lifetime in seconds.
    fn lifetime(&self) -> u64;
}

#[cfg(test)]
mockall::mock! {
    pub TokenProvider {
        pub fn new(cfg: &Config) -> Result<Self, TokenProviderError>;
    }

    impl TokenApi for TokenProvider {
        fn encode<'a>(
            &self,
            subject: &'a str,
            scopes: &[String],
        ) -> Result<String, TokenProviderError>;

        fn decode<'a>(
            &self,
            credential: &'a str,
        ) -> Result<AccessTokenClaims, TokenProviderError>;

        fn lifetime(&self) -> u64;
    }

    impl Clone for TokenProvider {
        fn clone(&self) -> Self;
    }
}

impl TokenProvider {
    pub fn new(config: &Config) -> Result<Self, TokenProviderError> {
        let backend_driver = match config.access_token.provider {
            TokenProviderDriver::Jwt => JwtTokenProvider::new(config),
        };
        Ok(Self {
            config: config.clone(),
            backend_driver: Arc::new(backend_driver),
        })
    }
}

impl TokenApi for TokenProvider {
    /// Encode an access token.
    #[tracing::instrument(level = "debug", skip(self))]
    fn encode<'a>(
        &self,
        subject: &'a str,
        scopes: &[String],
    ) -> Result<String, TokenProviderError> {
        let iat = Utc::now().timestamp();
        let lifetime =
            i64::try_from(self.config.access_token.lifetime).map_err(|source| {
                TokenProviderError::LifetimeOverflow {
                    value: self.config.access_token.lifetime,
                    source,
                }
            })?;
        let claims = AccessTokenClaims {
            iss: self.config.access_token.issuer.clone(),
            sub: subject.to_string(),
            scopes: scopes.to_vec(),
            iat,
            exp: iat + lifetime,
        };
        self.backend_driver.encode(&claims)
    }

    /// Verify a token and extract its claims.
    #[tracing::instrument(level = "debug", skip(self, credential))]
    fn decode<'a>(&self, credential: &'a str) -> Result<AccessTokenClaims, TokenProviderError> {
        self.backend_driver.decode(credential)
    }

    fn lifetime(&self) -> u64 {
        self.config.access_token.lifetime
    }
}
