//! CZDS credential exchange.
//!
//! The zone program API authenticates with a username and password posted as
//! JSON and answers with a bearer token. Every later request carries that
//! token in an `Authorization` header.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{Error, Result};

/// Default endpoint of the ICANN account API.
pub const DEFAULT_AUTH_URL: &str = "https://account-api.icann.org/api/authenticate";

/// A bearer token issued by the account API.
///
/// The token never appears in debug output or logs.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the headers carrying this token.
    ///
    /// The `Authorization` value is marked sensitive so middleware and logs
    /// redact it.
    pub fn bearer_headers(&self) -> Result<HeaderMap> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0))
            .map_err(|e| Error::AuthFailure(format!("access token is not a valid header: {e}")))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(***)")
    }
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
}

/// Exchange credentials for an [`AccessToken`].
///
/// Every failure mode, from transport errors to a rejected login to a
/// malformed response body, surfaces as [`Error::AuthFailure`].
pub async fn authenticate(
    client: &ClientWithMiddleware,
    auth_url: &str,
    username: &str,
    password: &str,
) -> Result<AccessToken> {
    debug!("Authenticating {username} against {auth_url}");

    let response = client
        .post(auth_url)
        .json(&AuthRequest { username, password })
        .send()
        .await
        .map_err(|e| Error::AuthFailure(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::AuthFailure(format!(
            "\"{auth_url}\" answered {status}"
        )));
    }

    let body: AuthResponse = response
        .json()
        .await
        .map_err(|e| Error::AuthFailure(format!("unreadable token response: {e}")))?;

    Ok(AccessToken::new(body.access_token))
}
