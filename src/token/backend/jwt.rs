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
//! HS256 JWT token backend.
//!
//! Produces the compact three-segment credential `header.payload.signature`
//! with every segment base64url-encoded without padding and the signature an
//! HMAC-SHA256 over `header.payload` under the configured shared secret.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use secrecy::ExposeSecret;
use std::fmt;
use tracing::warn;

use crate::config::Config;
use crate::token::backend::TokenBackend;
use crate::token::{TokenProviderError, types::AccessTokenClaims};

pub struct JwtTokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("JwtTokenProvider").finish()
    }
}

impl JwtTokenProvider {
    pub fn new(config: &Config) -> Self {
        let secret: Vec<u8> = match &config.access_token.secret {
            Some(secret) => secret.expose_secret().as_bytes().to_vec(),
            None => {
                warn!("access_token.secret is not configured, using a random secret");
                let mut buf = vec![0u8; 16];
                rand::rng().fill_bytes(&mut buf);
                buf
            }
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&config.access_token.issuer]);

        Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            validation,
        }
    }
}

impl TokenBackend for JwtTokenProvider {
    fn encode(&self, claims: &AccessTokenClaims) -> Result<String, TokenProviderError> {
        Ok(encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding_key,
        )?)
    }

    fn decode(&self, credential: &str) -> Result<AccessTokenClaims, TokenProviderError> {
        Ok(decode::<AccessTokenClaims>(credential, &self.decoding_key, &self.validation)?.claims)
    }
}
