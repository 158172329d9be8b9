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

//! The identity provider callback endpoint.

use axum::{
    debug_handler,
    extract::{Path, Query, State},
    response::Response,
};
use std::collections::HashMap;
use tracing::error;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::common::{error_redirect, fragment_redirect, generate_ref, query_redirect};
use crate::api::error::ApiError;
use crate::authz::AuthzApi;
use crate::common::types::ResponseType;
use crate::idp::IdpApi;
use crate::service::ServiceState;
use crate::storage::{StorageApi, types::AuthorizationCode};
use crate::token::TokenApi;

pub(super) fn openapi_router() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().routes(routes!(get))
}

/// Complete an authorization flow.
///
/// The identity provider sends the user agent here after its
/// authentication dance. The opaque reference round-tripped through the
/// IdP locates the persisted flow state; the state is consumed, the IdP
/// adapter materializes the authenticated user, the requested scopes are
/// narrowed to what that user is authorized for, and the user agent is
/// finally redirected to the client with an access token (implicit grant)
/// or a single-use authorization code.
///
/// Before the flow state is restored nothing about the request is trusted,
/// so failures up to that point are a plain 400. Afterwards the registered
/// redirect URI is known and failures travel there as OAuth 2.0 `error`
/// parameters: `access_denied` when the user declined or has none of the
/// requested scopes, `server_error` on backend faults.
#[utoipa::path(
    get,
    path = "/callback/{idp_id}",
    operation_id = "callback",
    params(
        ("idp_id" = String, Path, description = "Identity provider identifier"),
    ),
    responses(
        (status = 303, description = "Redirect to the client redirect URI with a token, a code, or an error parameter"),
        (status = 400, description = "Unknown identity provider, or the flow state is missing or expired"),
    ),
    tag = "oauth2"
)]
#[tracing::instrument(name = "api::callback", level = "debug", skip(state, params), err(Debug))]
#[debug_handler]
pub(super) async fn get(
    State(state): State<ServiceState>,
    Path(idp_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let idps = state.provider.get_idp_provider();
    if !idps.has_idp(&idp_id) {
        return Err(ApiError::BadRequest(format!(
            "identity provider {idp_id} is not registered"
        )));
    }

    // Recover the opaque reference without trusting any identity claim yet.
    let authz_ref = idps.callback_ref(&idp_id, &params).map_err(|err| {
        error!("callback reference recovery failed: {}", err);
        ApiError::BadRequest("callback is missing the authorization reference".to_string())
    })?;

    let store = state.provider.get_storage_provider();
    let auth_state = match store.restore_authorization_state(&authz_ref).await {
        Ok(auth_state) => auth_state,
        Err(err) => {
            error!("authorization state restore failed: {}", err);
            return Err(ApiError::BadRequest(
                "authorization state is missing or expired".to_string(),
            ));
        }
    };
    // The record is single-use; consume it no matter how the flow ends.
    store.discard_authorization_state(&authz_ref).await;

    let redirect_uri = auth_state.redirect_uri.as_str();
    let echo = auth_state.state.as_deref();

    let user = match idps
        .authn_callback(&idp_id, &params, &auth_state.idp_state)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return error_redirect(redirect_uri, "access_denied", echo),
        Err(err) => {
            error!("identity provider callback failed: {}", err);
            return error_redirect(redirect_uri, "server_error", echo);
        }
    };

    let authorized = state.provider.get_authz_provider().scope_set_for(&user);
    let granted = authorized.filter(&auth_state.scope);
    if granted.is_empty() {
        return error_redirect(redirect_uri, "access_denied", echo);
    }

    match auth_state.response_type {
        ResponseType::Token => {
            let tokens = state.provider.get_token_provider();
            let access_token = match tokens.encode(&user.uid, &granted) {
                Ok(access_token) => access_token,
                Err(err) => {
                    error!("access token encoding failed: {}", err);
                    return error_redirect(redirect_uri, "server_error", echo);
                }
            };
            let expires_in = tokens.lifetime().to_string();
            let scope = granted.join(" ");
            let mut fragment = vec![
                ("access_token", access_token.as_str()),
                ("token_type", "bearer"),
                ("expires_in", expires_in.as_str()),
                ("scope", scope.as_str()),
            ];
            if let Some(echo) = echo {
                fragment.push(("state", echo));
            }
            fragment_redirect(redirect_uri, &fragment)
        }
        ResponseType::Code => {
            let code = generate_ref();
            let persisted = store
                .persist_authorization_code(
                    &code,
                    &AuthorizationCode {
                        client_id: auth_state.client_id.clone(),
                        redirect_uri: auth_state.redirect_uri.clone(),
                        user_uid: user.uid.clone(),
                        scope: granted,
                    },
                )
                .await;
            if let Err(err) = persisted {
                error!("persisting authorization code failed: {}", err);
                return error_redirect(redirect_uri, "server_error", echo);
            }
            let mut query = vec![("code", code.as_str())];
            if let Some(echo) = echo {
                query.push(("state", echo));
            }
            query_redirect(redirect_uri, &query)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt; // for `oneshot`
    use tower_http::trace::TraceLayer;
    use tracing_test::traced_test;
    use url::Url;

    use crate::api::openapi_router;
    use crate::authz::{MockAuthzProvider, types::ScopeSet};
    use crate::common::types::{ResponseType, User};
    use crate::idp::{IdpProviderError, MockIdpProvider};
    use crate::provider::Provider;
    use crate::storage::{
        MockStorageProvider, StorageError,
        types::{AuthorizationCode, AuthorizationState},
    };
    use crate::tests::api::get_mocked_state;
    use crate::token::MockTokenProvider;

    fn persisted_state(response_type: ResponseType, scope: &[&str]) -> AuthorizationState {
        AuthorizationState {
            client_id: "app1".into(),
            redirect_uri: "https://app1.example.com/cb".into(),
            response_type,
            scope: scope.iter().map(ToString::to_string).collect(),
            state: Some("xyz".into()),
            idp_state: b"idp-blob".to_vec(),
        }
    }

    fn idp_mock_with_user(user: Option<User>) -> MockIdpProvider {
        let mut mock = MockIdpProvider::default();
        mock.expect_has_idp().returning(|id| id == "stub");
        mock.expect_callback_ref().returning(|_, query| {
            query
                .get("ref")
                .cloned()
                .ok_or(IdpProviderError::CallbackRefMissing)
        });
        mock.expect_authn_callback()
            .withf(|_, _, idp_state: &[u8]| idp_state == b"idp-blob")
            .returning(move |_, _, _| Ok(user.clone()));
        mock
    }

    fn storage_mock_with_state(state: AuthorizationState) -> MockStorageProvider {
        let mut mock = MockStorageProvider::default();
        mock.expect_restore_authorization_state()
            .withf(|key: &str| key == "ref123")
            .returning(move |_| Ok(state.clone()));
        mock.expect_discard_authorization_state()
            .withf(|key: &str| key == "ref123")
            .returning(|_| ());
        mock
    }

    fn authz_mock_granting(scopes: &[&str]) -> MockAuthzProvider {
        let granted: ScopeSet = scopes.iter().copied().collect();
        let mut mock = MockAuthzProvider::default();
        mock.expect_scope_set_for()
            .returning(move |_| granted.clone());
        mock
    }

    fn token_mock() -> MockTokenProvider {
        let mut mock = MockTokenProvider::default();
        mock.expect_encode()
            .returning(|subject, scopes| Ok(format!("jwt-{}-{}", subject, scopes.join("+"))));
        mock.expect_lifetime().return_const(600u64);
        mock
    }

    async fn callback(provider: Provider, uri: &str) -> axum::response::Response {
        let state = get_mocked_state(provider);
        let mut api = openapi_router()
            .layer(TraceLayer::new_for_http())
            .with_state(state);
        api.as_service()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .expect("a redirect response")
            .to_str()
            .unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn test_implicit_happy_path() {
        let user = User {
            uid: "u1".into(),
            data: vec![],
        };
        let provider = Provider::mocked_builder()
            .idp(idp_mock_with_user(Some(user)))
            .storage(storage_mock_with_state(persisted_state(
                ResponseType::Token,
                &["read"],
            )))
            .authz(authz_mock_granting(&["read", "write"]))
            .token(token_mock())
            .build()
            .unwrap();

        let response = callback(provider, "/callback/stub?ref=ref123").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let target = Url::parse(location(&response)).unwrap();
        assert!(
            target.query().is_none(),
            "the token travels in the fragment, never the query"
        );
        let fragment: Vec<(String, String)> =
            serde_urlencoded::from_str(target.fragment().unwrap()).unwrap();
        let get = |key: &str| {
            fragment
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(get("access_token").as_deref(), Some("jwt-u1-read"));
        assert_eq!(get("token_type").as_deref(), Some("bearer"));
        assert_eq!(get("expires_in").as_deref(), Some("600"));
        assert_eq!(get("scope").as_deref(), Some("read"));
        assert_eq!(get("state").as_deref(), Some("xyz"));
    }

    #[tokio::test]
    async fn test_scope_narrowing() {
        // read+write requested, the user is only authorized for read.
        let user = User {
            uid: "u1".into(),
            data: vec![],
        };
        let provider = Provider::mocked_builder()
            .idp(idp_mock_with_user(Some(user)))
            .storage(storage_mock_with_state(persisted_state(
                ResponseType::Token,
                &["read", "write"],
            )))
            .authz(authz_mock_granting(&["read"]))
            .token(token_mock())
            .build()
            .unwrap();

        let response = callback(provider, "/callback/stub?ref=ref123").await;
        let target = Url::parse(location(&response)).unwrap();
        let fragment = target.fragment().unwrap();
        assert!(fragment.contains("access_token=jwt-u1-read"));
        assert!(fragment.contains("scope=read"));
    }

    #[tokio::test]
    async fn test_user_denial() {
        let provider = Provider::mocked_builder()
            .idp(idp_mock_with_user(None))
            .storage(storage_mock_with_state(persisted_state(
                ResponseType::Token,
                &["read"],
            )))
            .build()
            .unwrap();

        let response = callback(provider, "/callback/stub?ref=ref123").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            "https://app1.example.com/cb?error=access_denied&state=xyz"
        );
    }

    #[tokio::test]
    async fn test_no_authorized_scope_is_denied() {
        let user = User {
            uid: "u1".into(),
            data: vec![],
        };
        let provider = Provider::mocked_builder()
            .idp(idp_mock_with_user(Some(user)))
            .storage(storage_mock_with_state(persisted_state(
                ResponseType::Token,
                &["read"],
            )))
            .authz(authz_mock_granting(&[]))
            .build()
            .unwrap();

        let response = callback(provider, "/callback/stub?ref=ref123").await;
        assert_eq!(
            location(&response),
            "https://app1.example.com/cb?error=access_denied&state=xyz"
        );
    }

    #[tokio::test]
    async fn test_expired_state() {
        let mut storage_mock = MockStorageProvider::default();
        storage_mock
            .expect_restore_authorization_state()
            .returning(|key| Err(StorageError::NotFound(key.to_string())));
        let mut idp_mock = MockIdpProvider::default();
        idp_mock.expect_has_idp().returning(|id| id == "stub");
        idp_mock.expect_callback_ref().returning(|_, query| {
            query
                .get("ref")
                .cloned()
                .ok_or(IdpProviderError::CallbackRefMissing)
        });

        let provider = Provider::mocked_builder()
            .idp(idp_mock)
            .storage(storage_mock)
            .build()
            .unwrap();

        let response = callback(provider, "/callback/stub?ref=gone").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    #[tokio::test]
    async fn test_unknown_idp() {
        let mut idp_mock = MockIdpProvider::default();
        idp_mock.expect_has_idp().return_const(false);
        let provider = Provider::mocked_builder().idp(idp_mock).build().unwrap();

        let response = callback(provider, "/callback/ghost?ref=ref123").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_ref() {
        let mut idp_mock = MockIdpProvider::default();
        idp_mock.expect_has_idp().returning(|id| id == "stub");
        idp_mock
            .expect_callback_ref()
            .returning(|_, _| Err(IdpProviderError::CallbackRefMissing));
        let provider = Provider::mocked_builder().idp(idp_mock).build().unwrap();

        let response = callback(provider, "/callback/stub").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_idp_transport_failure() {
        let mut idp_mock = MockIdpProvider::default();
        idp_mock.expect_has_idp().returning(|id| id == "stub");
        idp_mock.expect_callback_ref().returning(|_, query| {
            query
                .get("ref")
                .cloned()
                .ok_or(IdpProviderError::CallbackRefMissing)
        });
        idp_mock.expect_authn_callback().returning(|_, _, _| {
            Err(IdpProviderError::Transport(
                "token endpoint unreachable".to_string(),
            ))
        });

        let provider = Provider::mocked_builder()
            .idp(idp_mock)
            .storage(storage_mock_with_state(persisted_state(
                ResponseType::Token,
                &["read"],
            )))
            .build()
            .unwrap();

        let response = callback(provider, "/callback/stub?ref=ref123").await;
        assert_eq!(
            location(&response),
            "https://app1.example.com/cb?error=server_error&state=xyz"
        );
    }

    #[tokio::test]
    async fn test_code_flow_issues_code() {
        let user = User {
            uid: "u1".into(),
            data: vec![],
        };
        let mut storage_mock = storage_mock_with_state(persisted_state(
            ResponseType::Code,
            &["read"],
        ));
        storage_mock
            .expect_persist_authorization_code()
            .withf(|code: &str, grant: &AuthorizationCode| {
                !code.is_empty()
                    && grant.client_id == "app1"
                    && grant.redirect_uri == "https://app1.example.com/cb"
                    && grant.user_uid == "u1"
                    && grant.scope == vec!["read".to_string()]
            })
            .returning(|_, _| Ok(()));

        let provider = Provider::mocked_builder()
            .idp(idp_mock_with_user(Some(user)))
            .storage(storage_mock)
            .authz(authz_mock_granting(&["read"]))
            .build()
            .unwrap();

        let response = callback(provider, "/callback/stub?ref=ref123").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let target = Url::parse(location(&response)).unwrap();
        assert!(target.fragment().is_none());
        let code: String = target
            .query_pairs()
            .find(|(k, _)| k == "code")
            .expect("a code parameter")
            .1
            .into_owned();
        assert!(!code.is_empty());
        let echoed: String = target
            .query_pairs()
            .find(|(k, _)| k == "state")
            .unwrap()
            .1
            .into_owned();
        assert_eq!(echoed, "xyz");
    }
}
