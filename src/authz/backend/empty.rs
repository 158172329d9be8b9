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
//! The empty scope set.
//!
//! Fallback driver when no authorization provider is configured: the total
//! scope set is empty, so every non-empty scope request is rejected at the
//! authorization endpoint.

use crate::authz::backend::AuthzBackend;
use crate::authz::types::ScopeSet;
use crate::common::types::User;

#[derive(Default)]
pub struct EmptyBackend {}

impl AuthzBackend for EmptyBackend {
    fn valid_scope(&self, scopes: &[String]) -> bool {
        scopes.is_empty()
    }

    fn scope_set_for(&self, _user: &User) -> ScopeSet {
        ScopeSet::default()
    }
}
