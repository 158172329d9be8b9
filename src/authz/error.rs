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
//! Authorization provider errors.

use thiserror::Error;

/// Authorization provider error.
#[derive(Debug, Error)]
pub enum AuthzProviderError {
    /// Unknown authorization driver requested in the configuration.
    #[error("authorization driver {0} is not supported")]
    UnsupportedDriver(String),

    /// A role grants a scope outside the configured total scope set.
    #[error("role {role} grants scope {scope} outside the total scope set")]
    RoleScopeOutsideTotal {
        /// The offending role.
        role: String,
        /// The scope missing from the total set.
        scope: String,
    },
}
