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

//! # authbroker
//!
//! authbroker is an OAuth 2.0 authorization service (RFC 6749) implementing
//! the authorization-code and implicit grant flows. It sits between end
//! users, the identity providers that authenticate them, and the client
//! applications that want to act on their behalf, and issues HMAC-signed JWT
//! bearer tokens that downstream resource servers can validate without a
//! callback to this service.
//!
//! The service itself stores no users and no credentials. Authentication is
//! delegated to pluggable identity providers (IdPs) performing their own
//! redirect-based dance; authorization (which scopes a given user may
//! request) is delegated to a pluggable authorization provider; the only
//! state the service holds is the short-lived, single-use authorization
//! record that carries an in-flight flow across the user agent's redirects,
//! kept in a transient key-value store under an unguessable random key.
//!
//! Each of those collaborators is a provider module with a driver backend
//! selected through the configuration file:
//!
//! - [`client`]: the registry of relying applications and their registered
//!   redirect URIs,
//! - [`authz`]: scope validation and per-user authorized scope sets,
//! - [`idp`]: the identity provider registry and adapter contract,
//! - [`storage`]: the transient state store,
//! - [`token`]: the access token encoder.
//!
//! The [`provider::Provider`] aggregate owns one of each and is assembled
//! exactly once at startup; everything request handlers can reach through
//! [`service::ServiceState`] is read-only from then on, so the request path
//! needs no synchronization.

pub mod api;
pub mod authz;
pub mod client;
pub mod common;
pub mod config;
pub mod error;
pub mod idp;
pub mod provider;
pub mod service;
pub mod storage;
pub mod token;

#[cfg(test)]
mod tests;
