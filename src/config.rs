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

use config::{File, FileFormat};
use eyre::{Report, WrapErr};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

use crate::common::types::GrantType;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// Global configuration options.
    #[serde(rename = "DEFAULT", default)]
    pub default: DefaultSection,

    /// Access token signing configuration.
    #[serde(default)]
    pub access_token: AccessTokenSection,

    /// Transient state storage configuration.
    #[serde(default)]
    pub storage: StorageSection,

    /// Authorization provider configuration.
    #[serde(default)]
    pub authz: AuthzSection,

    /// Identity provider registry, keyed by the IdP identifier.
    #[serde(default)]
    pub idp: HashMap<String, IdpSection>,

    /// OAuth 2.0 client registry, keyed by the client identifier.
    #[serde(default)]
    pub clients: HashMap<String, ClientSection>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DefaultSection {
    /// Absolute external URL of the service. Used to construct the callback
    /// URLs handed to identity providers. Derived from the bind address when
    /// unset.
    pub base_url: Option<Url>,

    /// TCP address the listener binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for DefaultSection {
    fn default() -> Self {
        Self {
            base_url: None,
            bind_address: default_bind_address(),
        }
    }
}

impl DefaultSection {
    /// The effective external base URL of the service.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(&format!("http://{}/", self.bind_address)),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// Access token configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AccessTokenSection {
    /// HMAC signing secret. A random single-process secret is generated when
    /// unset (issued tokens then do not survive a restart).
    pub secret: Option<SecretString>,

    /// Token lifetime in seconds.
    #[serde(default = "default_token_lifetime")]
    pub lifetime: u64,

    /// Value of the `iss` claim.
    #[serde(default = "default_token_issuer")]
    pub issuer: String,

    /// Token encoder driver.
    #[serde(default)]
    pub provider: TokenProviderDriver,
}

impl Default for AccessTokenSection {
    fn default() -> Self {
        Self {
            secret: None,
            lifetime: default_token_lifetime(),
            issuer: default_token_issuer(),
            provider: TokenProviderDriver::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TokenProviderDriver {
    /// HS256-signed JWT.
    #[default]
    Jwt,
}

fn default_token_lifetime() -> u64 {
    3600
}

fn default_token_issuer() -> String {
    "authbroker".to_string()
}

/// Transient storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSection {
    #[serde(default = "default_storage_driver")]
    pub driver: String,

    /// Lifetime of persisted authorization state in seconds.
    #[serde(default = "default_storage_ttl")]
    pub ttl: u64,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            driver: default_storage_driver(),
            ttl: default_storage_ttl(),
        }
    }
}

fn default_storage_driver() -> String {
    "memory".to_string()
}

fn default_storage_ttl() -> u64 {
    300
}

/// Authorization provider configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthzSection {
    #[serde(default = "default_authz_driver")]
    pub driver: String,

    /// The total scope set the provider supports.
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Scopes granted per role hint reported by identity providers.
    #[serde(default)]
    pub roles: HashMap<String, Vec<String>>,
}

impl Default for AuthzSection {
    fn default() -> Self {
        Self {
            driver: default_authz_driver(),
            scopes: Vec::new(),
            roles: HashMap::new(),
        }
    }
}

fn default_authz_driver() -> String {
    "empty".to_string()
}

/// Configuration of a single identity provider registry entry.
#[derive(Debug, Deserialize, Clone)]
pub struct IdpSection {
    pub driver: String,
}

/// Configuration of a single registered OAuth 2.0 client.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientSection {
    /// Registered absolute redirect URIs.
    pub redirects: Vec<String>,

    /// Client secret for the authorization code flow.
    pub secret: Option<SecretString>,

    /// The grant the client is allowed to use.
    pub grant_type: GrantType,
}

impl Config {
    pub fn new(path: PathBuf) -> Result<Self, Report> {
        let mut builder = config::Config::builder();

        if std::path::Path::new(&path).is_file() {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder.try_into()
    }

    /// The callback URL handed to the identity provider registered as
    /// `idp_id`.
    pub fn callback_url(&self, idp_id: &str) -> Result<Url, url::ParseError> {
        let base = self.default.base_url()?;
        let mut base_str = base.to_string();
        if !base_str.ends_with('/') {
            base_str.push('/');
        }
        Url::parse(&format!("{base_str}callback/{idp_id}"))
    }
}

impl TryFrom<config::ConfigBuilder<config::builder::DefaultState>> for Config {
    type Error = Report;

    fn try_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, Self::Error> {
        builder
            .build()
            .wrap_err("Failed to read configuration file")?
            .try_deserialize()
            .wrap_err("Failed to parse configuration file")
    }
}
