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

//! The token endpoint: authorization code redemption (RFC 6749 §4.1.3).

use axum::{
    Form, Json, debug_handler,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::error;
use utoipa_axum::{router::OpenApiRouter, routes};
use validator::Validate;

use crate::api::error::ApiError;
use crate::api::types::{TokenRequest, TokenResponse};
use crate::client::ClientApi;
use crate::service::ServiceState;
use crate::storage::{StorageApi, StorageError};
use crate::token::TokenApi;

pub(super) fn openapi_router() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().routes(routes!(post))
}

/// Exchange an authorization code for an access token.
///
/// The client authenticates with HTTP Basic or with `client_id` /
/// `client_secret` form fields. The code is single-use: it is consumed on
/// the first redemption attempt, and the bound `client_id` and
/// `redirect_uri` must match the redeeming request.
#[utoipa::path(
    post,
    path = "/token",
    operation_id = "token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token", body = TokenResponse),
        (status = 400, description = "Malformed request or invalid grant"),
        (status = 401, description = "Client authentication failed"),
    ),
    tag = "oauth2"
)]
#[tracing::instrument(name = "api::token", level = "debug", skip(state, headers, req), err(Debug))]
#[debug_handler]
pub(super) async fn post(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Form(req): Form<TokenRequest>,
) -> Result<Response, ApiError> {
    req.validate()?;

    let (client_id, client_secret) = client_credentials(&headers, &req)?;
    let client = state
        .provider
        .get_client_provider()
        .authenticate_client(&client_id, client_secret.as_deref())
        .map_err(|err| {
            error!("client authentication failed: {}", err);
            ApiError::token_endpoint("invalid_client", "client authentication failed")
        })?;

    if req.grant_type.as_deref() != Some("authorization_code") {
        return Err(ApiError::token_endpoint(
            "unsupported_grant_type",
            "only authorization_code is supported",
        ));
    }
    let code = req.code.as_deref().filter(|code| !code.is_empty()).ok_or_else(|| {
        ApiError::token_endpoint("invalid_request", "code is missing")
    })?;

    let store = state.provider.get_storage_provider();
    let grant = match store.restore_authorization_code(code).await {
        Ok(grant) => grant,
        Err(StorageError::NotFound(..)) | Err(StorageError::Deserialize { .. }) => {
            return Err(ApiError::token_endpoint(
                "invalid_grant",
                "authorization code is unknown, expired or already used",
            ));
        }
        Err(err) => {
            error!("authorization code restore failed: {}", err);
            return Err(ApiError::InternalError(
                "transient storage failure".to_string(),
            ));
        }
    };
    // Single use: consume the code before anything can fail.
    store.discard_authorization_code(code).await;

    if grant.client_id != client.id {
        return Err(ApiError::token_endpoint(
            "invalid_grant",
            "authorization code was issued to another client",
        ));
    }
    if req.redirect_uri.as_deref() != Some(grant.redirect_uri.as_str()) {
        return Err(ApiError::token_endpoint(
            "invalid_grant",
            "redirect_uri does not match the authorization request",
        ));
    }

    let tokens = state.provider.get_token_provider();
    let access_token = tokens.encode(&grant.user_uid, &grant.scope)?;
    Ok((
        StatusCode::OK,
        [
            (header::CACHE_CONTROL, "no-store"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: tokens.lifetime(),
            scope: grant.scope.join(" "),
        }),
    )
        .into_response())
}

/// Extract the client credentials from HTTP Basic authentication, falling
/// back to the form fields.
fn client_credentials(
    headers: &HeaderMap,
    req: &TokenRequest,
) -> Result<(String, Option<String>), ApiError> {
    if let Some(authorization) = headers.get(header::AUTHORIZATION) {
        let encoded = authorization
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Basic "))
            .ok_or_else(|| {
                ApiError::token_endpoint("invalid_request", "malformed authorization header")
            })?;
        let decoded = STANDARD
            .decode(encoded)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(|| {
                ApiError::token_endpoint("invalid_request", "malformed authorization header")
            })?;
        let (id, secret) = decoded.split_once(':').ok_or_else(|| {
            ApiError::token_endpoint("invalid_request", "malformed authorization header")
        })?;
        return Ok((id.to_string(), Some(secret.to_string())));
    }
    let id = req.client_id.clone().filter(|id| !id.is_empty()).ok_or_else(|| {
        ApiError::token_endpoint("invalid_client", "client authentication is missing")
    })?;
    Ok((id, req.client_secret.clone()))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt; // for `collect`
    use tower::ServiceExt; // for `oneshot`
    use tower_http::trace::TraceLayer;
    use tracing_test::traced_test;

    use super::*;
    use crate::client::{ClientProviderError, MockClientProvider, types::Client};
    use crate::common::types::GrantType;
    use crate::provider::Provider;
    use crate::storage::{MockStorageProvider, types::AuthorizationCode};
    use crate::tests::api::get_mocked_state;
    use crate::token::MockTokenProvider;

    fn code_client() -> Client {
        Client {
            id: "app2".into(),
            redirects: vec!["https://app2.example.com/cb".into()],
            secret: Some("s3cr3t".into()),
            grant_type: GrantType::AuthorizationCode,
        }
    }

    fn client_mock() -> MockClientProvider {
        let mut mock = MockClientProvider::default();
        mock.expect_authenticate_client()
            .returning(|id, secret| match (id, secret) {
                ("app2", Some("s3cr3t")) => Ok(code_client()),
                ("app2", _) => Err(ClientProviderError::InvalidClientSecret(id.to_string())),
                _ => Err(ClientProviderError::ClientNotFound(id.to_string())),
            });
        mock
    }

    fn storage_mock_with_code() -> MockStorageProvider {
        let mut mock = MockStorageProvider::default();
        mock.expect_restore_authorization_code()
            .withf(|code: &str| code == "code123")
            .returning(|_| {
                Ok(AuthorizationCode {
                    client_id: "app2".into(),
                    redirect_uri: "https://app2.example.com/cb".into(),
                    user_uid: "u1".into(),
                    scope: vec!["read".into()],
                })
            });
        mock.expect_discard_authorization_code()
            .withf(|code: &str| code == "code123")
            .returning(|_| ());
        mock
    }

    fn token_mock() -> MockTokenProvider {
        let mut mock = MockTokenProvider::default();
        mock.expect_encode()
            .returning(|subject, scopes| Ok(format!("jwt-{}-{}", subject, scopes.join("+"))));
        mock.expect_lifetime().return_const(600u64);
        mock
    }

    fn basic(id: &str, secret: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{id}:{secret}")))
    }

    async fn redeem(
        provider: Provider,
        authorization: Option<String>,
        body: &str,
    ) -> axum::response::Response {
        let state = get_mocked_state(provider);
        let mut api = crate::api::openapi_router()
            .layer(TraceLayer::new_for_http())
            .with_state(state);
        let mut builder = Request::builder()
            .method("POST")
            .uri("/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(authorization) = authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }
        api.as_service()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    const VALID_BODY: &str =
        "grant_type=authorization_code&code=code123&redirect_uri=https%3A%2F%2Fapp2.example.com%2Fcb";

    #[tokio::test]
    #[traced_test]
    async fn test_redeem_happy_path() {
        let provider = Provider::mocked_builder()
            .client(client_mock())
            .storage(storage_mock_with_code())
            .token(token_mock())
            .build()
            .unwrap();

        let response = redeem(provider, Some(basic("app2", "s3cr3t")), VALID_BODY).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let res: TokenResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.access_token, "jwt-u1-read");
        assert_eq!(res.token_type, "bearer");
        assert_eq!(res.expires_in, 600);
        assert_eq!(res.scope, "read");
    }

    #[tokio::test]
    async fn test_form_credentials() {
        let provider = Provider::mocked_builder()
            .client(client_mock())
            .storage(storage_mock_with_code())
            .token(token_mock())
            .build()
            .unwrap();

        let body = format!("{VALID_BODY}&client_id=app2&client_secret=s3cr3t");
        let response = redeem(provider, None, &body).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_secret() {
        let provider = Provider::mocked_builder()
            .client(client_mock())
            .build()
            .unwrap();

        let response = redeem(provider, Some(basic("app2", "wrong")), VALID_BODY).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let res: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(res["error"], "invalid_client");
    }

    #[tokio::test]
    async fn test_unknown_code() {
        let mut storage_mock = MockStorageProvider::default();
        storage_mock
            .expect_restore_authorization_code()
            .returning(|code| Err(StorageError::NotFound(code.to_string())));

        let provider = Provider::mocked_builder()
            .client(client_mock())
            .storage(storage_mock)
            .build()
            .unwrap();

        let body =
            "grant_type=authorization_code&code=gone&redirect_uri=https%3A%2F%2Fapp2.example.com%2Fcb";
        let response = redeem(provider, Some(basic("app2", "s3cr3t")), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let res: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(res["error"], "invalid_grant");
    }

    #[tokio::test]
    async fn test_redirect_uri_mismatch() {
        let provider = Provider::mocked_builder()
            .client(client_mock())
            .storage(storage_mock_with_code())
            .build()
            .unwrap();

        let body = "grant_type=authorization_code&code=code123&redirect_uri=https%3A%2F%2Fevil%2Fcb";
        let response = redeem(provider, Some(basic("app2", "s3cr3t")), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let res: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(res["error"], "invalid_grant");
    }

    #[tokio::test]
    async fn test_unsupported_grant_type() {
        let provider = Provider::mocked_builder()
            .client(client_mock())
            .build()
            .unwrap();

        let body = "grant_type=password&code=code123&redirect_uri=https%3A%2F%2Fapp2.example.com%2Fcb";
        let response = redeem(provider, Some(basic("app2", "s3cr3t")), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let res: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(res["error"], "unsupported_grant_type");
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let provider = Provider::mocked_builder().build().unwrap();
        let response = redeem(provider, None, VALID_BODY).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
