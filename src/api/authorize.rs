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

//! The authorization endpoint.

use axum::{
    debug_handler,
    extract::{Query, State},
    response::Response,
};
use tracing::error;
use utoipa_axum::{router::OpenApiRouter, routes};
use validator::Validate;

use crate::api::common::{error_redirect, generate_ref, see_other};
use crate::api::error::ApiError;
use crate::api::types::AuthorizeRequest;
use crate::authz::AuthzApi;
use crate::client::ClientApi;
use crate::common::types::{ResponseType, parse_scope};
use crate::idp::IdpApi;
use crate::service::ServiceState;
use crate::storage::{StorageApi, types::AuthorizationState};

pub(super) fn openapi_router() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().routes(routes!(get))
}

/// Begin an authorization flow.
///
/// Validates the request, persists the flow state under a fresh opaque
/// reference and sends the user agent to the selected identity provider.
///
/// The failure treatment depends on how far validation got: while the
/// client and its redirect URI are unverified the response is a plain 400
/// (an unregistered redirect target must never be redirected to); every
/// later failure redirects back to the verified redirect URI with an OAuth
/// 2.0 `error` parameter and the client's `state` echoed.
#[utoipa::path(
    get,
    path = "/authorize",
    operation_id = "authorize",
    params(AuthorizeRequest),
    responses(
        (status = 303, description = "Redirect to the identity provider, or to the client redirect URI with an error parameter"),
        (status = 400, description = "Unknown client or unregistered redirect URI"),
        (status = 500, description = "Flow state could not be persisted"),
    ),
    tag = "oauth2"
)]
#[tracing::instrument(name = "api::authorize", level = "debug", skip(state), err(Debug))]
#[debug_handler]
pub(super) async fn get(
    State(state): State<ServiceState>,
    Query(req): Query<AuthorizeRequest>,
) -> Result<Response, ApiError> {
    req.validate()?;

    let client_id = req
        .client_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("client_id is missing".to_string()))?;
    let client = state
        .provider
        .get_client_provider()
        .get_client(client_id)?
        .ok_or_else(|| ApiError::BadRequest(format!("client {client_id} is not registered")))?;

    let redirect_uri = req
        .redirect_uri
        .as_deref()
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| ApiError::BadRequest("redirect_uri is missing".to_string()))?;
    if !client.has_redirect(redirect_uri) {
        return Err(ApiError::BadRequest(
            "redirect_uri is not registered for the client".to_string(),
        ));
    }

    // The redirect target is trusted from here on; flow failures go back to
    // the client.
    let echo = req.state.as_deref();

    let response_type = match req
        .response_type
        .as_deref()
        .and_then(|value| value.parse::<ResponseType>().ok())
    {
        Some(response_type) if client.grant_type.allows(response_type) => response_type,
        _ => return error_redirect(redirect_uri, "unsupported_response_type", echo),
    };

    let scope = parse_scope(req.scope.as_deref().unwrap_or_default());
    if scope.is_empty() || !state.provider.get_authz_provider().valid_scope(&scope) {
        return error_redirect(redirect_uri, "invalid_scope", echo);
    }

    let idps = state.provider.get_idp_provider();
    let idp_id = match req.idp_id.as_deref().filter(|id| idps.has_idp(id)) {
        Some(idp_id) => idp_id,
        None => return error_redirect(redirect_uri, "invalid_request", echo),
    };

    let authz_ref = generate_ref();
    let callback_url = state
        .config
        .callback_url(idp_id)
        .map_err(|_| ApiError::InternalError("callback URL construction failed".to_string()))?;
    let authn = match idps.authn_redirect(idp_id, &callback_url, &authz_ref).await {
        Ok(authn) => authn,
        Err(err) => {
            error!("identity provider failed to build the redirect: {}", err);
            return error_redirect(redirect_uri, "server_error", echo);
        }
    };

    state
        .provider
        .get_storage_provider()
        .persist_authorization_state(
            &authz_ref,
            &AuthorizationState {
                client_id: client.id.clone(),
                redirect_uri: redirect_uri.to_string(),
                response_type,
                scope,
                state: req.state.clone(),
                idp_state: authn.idp_state,
            },
        )
        .await
        .map_err(|err| {
            error!("persisting authorization state failed: {}", err);
            ApiError::InternalError("persisting authorization state failed".to_string())
        })?;

    Ok(see_other(&authn.url))
}
