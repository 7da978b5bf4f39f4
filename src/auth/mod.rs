//! Registry authorization.
//!
//! [`client_credentials::ClientCredentials`] exchanges the API key and secret
//! at the token endpoint; [`token_manager::TokenManager`] caches the result
//! until it expires.

pub mod client_credentials;
pub mod token_manager;

#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    type Token: Token;
    type Error: Send + Sync;

    async fn get_auth_token(&self) -> Result<Self::Token, Self::Error>;
}

pub trait Token: Send {
    fn access_token(&self) -> &str;

    fn token_type(&self) -> &str {
        "Bearer"
    }
}

pub trait ExpiringToken: Token {
    fn expires_at(&self) -> std::time::Instant;
}
