//! Client for the business.govt.nz registry API.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use businessnz::{BusinessNzApi, Config, nzbn::SearchQuery};
//!
//! let api = BusinessNzApi::new(Config::from_env()?)?;
//! let entity = api.nzbn().lookup("9429045862298").await?;
//! let results = api.nzbn().search(&SearchQuery::new("ElectronPowered")).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod nzbn;
mod utils;

pub use self::{
    client::{Client, QueryError},
    config::{Config, Credentials, Endpoints},
    utils::ServerError,
};

use self::auth::{client_credentials::ClientCredentials, token_manager::TokenManager};

/// The token provider used by [`BusinessNzApi::new`].
pub type DefaultTokenProvider = TokenManager<ClientCredentials>;

pub type ConfigError = config::Error;
pub type AuthError = auth::token_manager::Error<auth::client_credentials::Error>;
pub type Error = client::Error<AuthError>;

/// Top level API object.
pub struct BusinessNzApi<AuthTokenProvider = DefaultTokenProvider> {
    client: Client<AuthTokenProvider>,
}

impl BusinessNzApi<DefaultTokenProvider> {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connection_verbose(config.debug)
            .build()?;
        Ok(Self::with_client(config, client))
    }

    /// Use a preconfigured transport, e.g. one with timeouts set.
    pub fn with_client(config: Config, client: reqwest::Client) -> Self {
        let Config {
            credentials,
            endpoints,
            debug,
        } = config;

        let auth_token_provider = TokenManager::new(ClientCredentials {
            client: client.clone(),
            credentials,
            token_url: endpoints.token_url,
        });

        Self::from_parts(Client {
            client,
            base_url: endpoints.base_url,
            auth_token_provider,
            debug,
        })
    }

    /// Drop the cached token so the next request fetches a fresh one.
    pub async fn invalidate_token(&self) {
        self.client.auth_token_provider.invalidate().await;
    }
}

impl<AuthTokenProvider> BusinessNzApi<AuthTokenProvider>
where
    AuthTokenProvider: auth::TokenProvider,
{
    pub fn from_parts(client: Client<AuthTokenProvider>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client<AuthTokenProvider> {
        &self.client
    }

    /// NZBN lookups and searches.
    pub fn nzbn(&self) -> nzbn::Nzbn<'_, AuthTokenProvider> {
        nzbn::Nzbn::new(&self.client)
    }
}
