use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{debug, info};

use super::TokenProvider;

/// Caches the token issued by `Provider` and refreshes it once expired.
///
/// The cache lock is held for the whole refresh, so callers racing on an
/// expired token wait for a single fetch instead of issuing one each.
pub struct TokenManager<Provider>
where
    Provider: TokenProvider,
{
    provider: Provider,
    cached_token: Mutex<Option<Record>>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error<RenewalError> {
    #[error("token provider: {0}")]
    Provider(#[source] RenewalError),
}

#[derive(Debug, Clone)]
pub struct Record {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: Instant,
}

impl Record {
    pub fn from_expiring_token<T: super::ExpiringToken>(token: T) -> Self {
        Self {
            access_token: token.access_token().to_owned(),
            token_type: token.token_type().to_owned(),
            expires_at: token.expires_at(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Instant::now()
    }
}

impl super::Token for Record {
    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn token_type(&self) -> &str {
        &self.token_type
    }
}

impl<Provider> TokenManager<Provider>
where
    Provider: TokenProvider,
    <Provider as TokenProvider>::Token: super::ExpiringToken,
{
    pub fn new(provider: Provider) -> Self {
        let cached_token = Mutex::const_new(None);
        Self {
            provider,
            cached_token,
        }
    }

    async fn fetch_new_token(&self) -> Result<Record, Error<Provider::Error>> {
        let token = self
            .provider
            .get_auth_token()
            .await
            .map_err(Error::Provider)?;
        let record = Record::from_expiring_token(token);
        Ok(record)
    }

    pub async fn get_token(&self) -> Result<Record, Error<Provider::Error>> {
        let mut cached_token = self.cached_token.lock().await;

        if let Some(ref cached) = *cached_token {
            if !cached.is_expired() {
                debug!(message = "Using preexisting token", token_expires_at = ?cached.expires_at);
                return Ok(cached.clone());
            }
            debug!(message = "Existing token expired, refreshing", token_expires_at = ?cached.expires_at);
        }

        info!(
            message = "No active token found, about to get a new one",
            token_is_stale = cached_token.is_some(),
        );

        // A failed refresh leaves no token behind.
        cached_token.take();
        let new_record = self.fetch_new_token().await?;
        cached_token.replace(new_record.clone());

        debug!(message = "Got new token", token_expires_at = ?new_record.expires_at);

        Ok(new_record)
    }

    /// Drop the cached token; the next [`TokenManager::get_token`] fetches a new one.
    pub async fn invalidate(&self) {
        let previous = self.cached_token.lock().await.take();
        if previous.is_some() {
            info!(message = "Cached token invalidated");
        }
    }

    /// The token currently held, expired or not.
    pub async fn cached(&self) -> Option<Record> {
        self.cached_token.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl<Provider> super::TokenProvider for TokenManager<Provider>
where
    Provider: TokenProvider,
    <Provider as TokenProvider>::Token: super::ExpiringToken,
{
    type Token = Record;
    type Error = Error<Provider::Error>;

    async fn get_auth_token(&self) -> Result<Self::Token, Self::Error> {
        let token = self.get_token().await?;
        Ok(token)
    }
}
