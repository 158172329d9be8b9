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
//! Configuration-file backed client registry.

use std::collections::HashMap;
use url::Url;

use crate::client::backend::ClientBackend;
use crate::client::error::ClientProviderError;
use crate::client::types::Client;
use crate::config::Config;

/// Registry loaded once from the `clients.<id>` configuration sections.
pub struct ConfigBackend {
    clients: HashMap<String, Client>,
}

impl ConfigBackend {
    pub fn new(config: &Config) -> Result<Self, ClientProviderError> {
        let mut clients = HashMap::with_capacity(config.clients.len());
        for (id, section) in &config.clients {
            for uri in &section.redirects {
                Url::parse(uri).map_err(|source| ClientProviderError::InvalidRedirect {
                    client: id.clone(),
                    uri: uri.clone(),
                    source,
                })?;
            }
            clients.insert(
                id.clone(),
                Client {
                    id: id.clone(),
                    redirects: section.redirects.clone(),
                    secret: section.secret.clone(),
                    grant_type: section.grant_type,
                },
            );
        }
        Ok(Self { clients })
    }
}

impl ClientBackend for ConfigBackend {
    fn get(&self, id: &str) -> Result<Option<Client>, ClientProviderError> {
        Ok(self.clients.get(id).cloned())
    }
}
