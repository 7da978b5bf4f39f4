//! Authorize using the client credentials flow.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::debug;

use crate::{
    config::Credentials,
    utils::{check_status, ServerError},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("server: {0}")]
    Server(#[from] ServerError),
    #[error("decoding token: {0}")]
    Decode(#[from] serde_json::Error),
}

pub struct ClientCredentials {
    pub client: reqwest::Client,
    pub credentials: Credentials,
    pub token_url: String,
}

impl ClientCredentials {
    /// Perform the client credentials flow.
    ///
    /// The key and secret travel as `Authorization: Basic`, the grant type as
    /// a query parameter; the request has no body.
    pub async fn perform(&self) -> Result<TokenResponse, Error> {
        let req = self
            .client
            .post(&self.token_url)
            .query(&[("grant_type", "client_credentials")])
            .basic_auth(
                self.credentials.api_key(),
                Some(self.credentials.api_secret()),
            )
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .build()?;

        debug!(message = "Requesting token", url = %req.url());

        let res = self.client.execute(req).await?;
        check_status(&res)?;
        let body = res.bytes().await?;
        let token_response = serde_json::from_slice(&body)?;
        Ok(token_response)
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub token_type: String,
    /// The amount of time that an access token is valid (in seconds).
    pub expires_in: u64,
    pub access_token: String,
}

const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Cap for lifetimes too large to represent as an `Instant`.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(u32::MAX as u64);

#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: Instant,
}

impl From<TokenResponse> for Token {
    fn from(auth: TokenResponse) -> Self {
        let TokenResponse {
            access_token,
            token_type,
            expires_in,
            ..
        } = auth;
        let token_type = if token_type.is_empty() {
            DEFAULT_TOKEN_TYPE.to_owned()
        } else {
            token_type
        };
        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(expires_in))
            .unwrap_or_else(|| now + MAX_TOKEN_LIFETIME);
        Self {
            access_token,
            token_type,
            expires_at,
        }
    }
}

#[async_trait::async_trait]
impl super::TokenProvider for ClientCredentials {
    type Token = Token;
    type Error = Error;

    async fn get_auth_token(&self) -> Result<Self::Token, Self::Error> {
        let auth_response = self.perform().await?;
        let token = auth_response.into();
        Ok(token)
    }
}

impl super::Token for Token {
    fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    fn token_type(&self) -> &str {
        self.token_type.as_str()
    }
}

impl super::ExpiringToken for Token {
    fn expires_at(&self) -> Instant {
        self.expires_at
    }
}
