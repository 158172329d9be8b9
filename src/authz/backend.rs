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
//! Authorization provider backends.

use crate::authz::types::ScopeSet;
use crate::common::types::User;

pub mod config;
pub mod empty;

/// Authorization backend interface. Read-only after construction.
pub trait AuthzBackend: Send + Sync {
    /// Whether every given scope is a member of the total scope set.
    fn valid_scope(&self, scopes: &[String]) -> bool;

    /// The scope set the given user is authorized to request.
    fn scope_set_for(&self, user: &User) -> ScopeSet;
}
