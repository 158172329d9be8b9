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

use url::Url;

/// The outcome of an identity provider's redirect step.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthnRedirect {
    /// The URL the user agent must be sent to for authentication.
    pub url: Url,

    /// Opaque adapter state, persisted alongside the authorization record
    /// and handed back on callback. May be empty.
    pub idp_state: Vec<u8>,
}
