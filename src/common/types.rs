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
//! # Common types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An authenticated end user as reported by an identity provider.
///
/// Constructed transiently per IdP callback and never persisted by the
/// service.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct User {
    /// Opaque user identifier, stable per identity provider.
    pub uid: String,

    /// Opaque role or group hints consumed by the authorization provider.
    pub data: Vec<String>,
}

/// The OAuth 2.0 response type requested on the authorization endpoint.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Implicit grant: the access token is delivered in the redirect
    /// fragment.
    #[default]
    Token,
    /// Authorization code grant: the redirect delivers a single-use code.
    Code,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Code => "code",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "token" => Ok(Self::Token),
            "code" => Ok(Self::Code),
            _ => Err(()),
        }
    }
}

/// The grant a client is registered for.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    Implicit,
    AuthorizationCode,
    ClientCredentials,
}

impl GrantType {
    /// Whether a client registered for this grant may use the given response
    /// type on the authorization endpoint.
    pub fn allows(&self, response_type: ResponseType) -> bool {
        matches!(
            (self, response_type),
            (Self::Implicit, ResponseType::Token)
                | (Self::AuthorizationCode, ResponseType::Code)
        )
    }
}

/// Split a space-delimited scope parameter into an ordered, deduplicated
/// scope list.
pub fn parse_scope(raw: &str) -> Vec<String> {
    let mut scopes: Vec<String> = Vec::new();
    for scope in raw.split_whitespace() {
        if !scopes.iter().any(|known| known == scope) {
            scopes.push(scope.to_string());
        }
    }
    scopes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scope() {
        assert_eq!(parse_scope("read write"), vec!["read", "write"]);
        assert_eq!(
            parse_scope("  read   write  "),
            vec!["read", "write"],
            "surrounding and repeated whitespace is ignored"
        );
        assert_eq!(
            parse_scope("read write read"),
            vec!["read", "write"],
            "duplicates are dropped, first occurrence wins"
        );
        assert!(parse_scope("").is_empty());
    }

    #[test]
    fn test_response_type_from_str() {
        assert_eq!("token".parse(), Ok(ResponseType::Token));
        assert_eq!("code".parse(), Ok(ResponseType::Code));
        assert!("password".parse::<ResponseType>().is_err());
        assert!("".parse::<ResponseType>().is_err());
    }

    #[test]
    fn test_grant_allows_response_type() {
        assert!(GrantType::Implicit.allows(ResponseType::Token));
        assert!(!GrantType::Implicit.allows(ResponseType::Code));
        assert!(GrantType::AuthorizationCode.allows(ResponseType::Code));
        assert!(!GrantType::AuthorizationCode.allows(ResponseType::Token));
        assert!(!GrantType::ClientCredentials.allows(ResponseType::Token));
        assert!(!GrantType::ClientCredentials.allows(ResponseType::Code));
    }
}
