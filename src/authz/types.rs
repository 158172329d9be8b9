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

use std::collections::HashSet;

/// A membership oracle over OAuth 2.0 scope strings.
///
/// Used both for the provider's total scope set and for the per-user
/// authorized subset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScopeSet {
    scopes: HashSet<String>,
}

impl ScopeSet {
    /// Whether every given scope is a member of this set. Vacuously true for
    /// an empty argument list.
    pub fn valid_scope(&self, scopes: &[String]) -> bool {
        scopes.iter().all(|scope| self.scopes.contains(scope))
    }

    /// The members of `requested` present in this set, in request order.
    pub fn filter(&self, requested: &[String]) -> Vec<String> {
        requested
            .iter()
            .filter(|scope| self.scopes.contains(*scope))
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            scopes: iter.into_iter().map(Into::into).collect(),
        }
    }
}
