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
//! Configuration-file backed authorization provider.
//!
//! The total scope set comes from `authz.scopes`; a user's authorized set is
//! the union of the `authz.roles.<role>` grants over the role hints the
//! identity provider reported for them.

use std::collections::HashMap;

use crate::authz::backend::AuthzBackend;
use crate::authz::error::AuthzProviderError;
use crate::authz::types::ScopeSet;
use crate::common::types::User;
use crate::config::AuthzSection;

pub struct ConfigBackend {
    total: ScopeSet,
    roles: HashMap<String, Vec<String>>,
}

impl ConfigBackend {
    pub fn new(section: &AuthzSection) -> Result<Self, AuthzProviderError> {
        let total: ScopeSet = section.scopes.iter().cloned().collect();
        for (role, scopes) in &section.roles {
            for scope in scopes {
                if !total.valid_scope(std::slice::from_ref(scope)) {
                    return Err(AuthzProviderError::RoleScopeOutsideTotal {
                        role: role.clone(),
                        scope: scope.clone(),
                    });
                }
            }
        }
        Ok(Self {
            total,
            roles: section.roles.clone(),
        })
    }
}

impl AuthzBackend for ConfigBackend {
    fn valid_scope(&self, scopes: &[String]) -> bool {
        self.total.valid_scope(scopes)
    }

    fn scope_set_for(&self, user: &User) -> ScopeSet {
        user.data
            .iter()
            .filter_map(|role| self.roles.get(role))
            .flatten()
            .cloned()
            .collect()
    }
}
