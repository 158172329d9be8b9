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
//! Shared handler helpers: redirect construction and reference generation.

use axum::response::{IntoResponse, Redirect, Response};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use url::Url;

use crate::api::error::ApiError;

/// Generate a fresh opaque reference: 24 bytes from the OS CSPRNG,
/// base64url-encoded without padding. Used for authorization state keys and
/// authorization codes.
pub(crate) fn generate_ref() -> String {
    let mut buf = [0u8; 24];
    rand::rng().fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

/// A 303 redirect to the given URL.
pub(crate) fn see_other(url: &Url) -> Response {
    Redirect::to(url.as_str()).into_response()
}

/// A 303 redirect to the redirect URI with parameters appended to the query
/// component, preserving any query the registered redirect already carries.
pub(crate) fn query_redirect(
    redirect_uri: &str,
    params: &[(&str, &str)],
) -> Result<Response, ApiError> {
    let mut url = Url::parse(redirect_uri)?;
    for (key, value) in params {
        url.query_pairs_mut().append_pair(key, value);
    }
    Ok(see_other(&url))
}

/// A 303 redirect to the redirect URI with parameters delivered in the URL
/// fragment, as the implicit grant requires. Fragments never reach the
/// resource server in requests, which keeps the token out of query logs.
pub(crate) fn fragment_redirect(
    redirect_uri: &str,
    params: &[(&str, &str)],
) -> Result<Response, ApiError> {
    let mut url = Url::parse(redirect_uri)?;
    let fragment = serde_urlencoded::to_string(params)?;
    url.set_fragment(Some(&fragment));
    Ok(see_other(&url))
}

/// The flow-failure redirect: `error=` plus the echoed client state.
pub(crate) fn error_redirect(
    redirect_uri: &str,
    error: &str,
    state: Option<&str>,
) -> Result<Response, ApiError> {
    let mut params = vec![("error", error)];
    if let Some(state) = state {
        params.push(("state", state));
    }
    query_redirect(redirect_uri, &params)
}

#[cfg(test)]
mod tests {
    use axum::http::{StatusCode, header};
    use std::collections::HashSet;

    use super::*;

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[test]
    fn test_generate_ref_entropy() {
        let refs: HashSet<String> = (0..64).map(|_| generate_ref()).collect();
        assert_eq!(refs.len(), 64, "fresh references never repeat");
        // 24 raw bytes make 32 base64url characters.
        assert!(refs.iter().all(|r| r.len() == 32));
        assert!(
            refs.iter()
                .all(|r| r.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        );
    }

    #[test]
    fn test_query_redirect_preserves_existing_query() {
        let response =
            query_redirect("https://app.example.com/cb?keep=1", &[("code", "abc")]).unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            "https://app.example.com/cb?keep=1&code=abc"
        );
    }

    #[test]
    fn test_fragment_redirect() {
        let response = fragment_redirect(
            "https://app.example.com/cb",
            &[("access_token", "tok en"), ("token_type", "bearer")],
        )
        .unwrap();
        assert_eq!(
            location(&response),
            "https://app.example.com/cb#access_token=tok+en&token_type=bearer"
        );
    }

    #[test]
    fn test_error_redirect_echoes_state() {
        let response =
            error_redirect("https://app.example.com/cb", "invalid_scope", Some("xyz")).unwrap();
        assert_eq!(
            location(&response),
            "https://app.example.com/cb?error=invalid_scope&state=xyz"
        );

        let response = error_redirect("https://app.example.com/cb", "access_denied", None).unwrap();
        assert_eq!(
            location(&response),
            "https://app.example.com/cb?error=access_denied"
        );
    }
}
