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

use secrecy::SecretString;

use crate::common::types::GrantType;

/// A registered OAuth 2.0 client application.
#[derive(Clone, Debug)]
pub struct Client {
    /// Client identifier.
    pub id: String,

    /// Registered absolute redirect URIs.
    pub redirects: Vec<String>,

    /// Client secret, present for confidential clients.
    pub secret: Option<SecretString>,

    /// The grant the client is allowed to use.
    pub grant_type: GrantType,
}

impl Client {
    /// Whether the URI exactly matches one of the registered redirects.
    pub fn has_redirect(&self, uri: &str) -> bool {
        self.redirects.iter().any(|registered| registered == uri)
    }
}
