//! Client configuration.
//!
//! A [`Config`] is built once at startup, either programmatically or from the
//! `BUSINESSNZ_*` environment variables, and moved into the API constructor.

use std::fmt;

pub const PRODUCTION_BASE_URL: &str = "https://api.business.govt.nz/";
pub const SANDBOX_BASE_URL: &str = "https://sandbox.api.business.govt.nz/";
/// Shared by the sandbox and production environments.
pub const TOKEN_URL: &str = "https://api.business.govt.nz/services/token";

pub const ENV_API_KEY: &str = "BUSINESSNZ_API_KEY";
pub const ENV_API_SECRET: &str = "BUSINESSNZ_API_SECRET";
pub const ENV_API_SANDBOX: &str = "BUSINESSNZ_API_SANDBOX";
pub const ENV_API_DEBUG: &str = "BUSINESSNZ_API_DEBUG";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no API key provided (set BUSINESSNZ_API_KEY)")]
    MissingApiKey,
    #[error("no API secret provided (set BUSINESSNZ_API_SECRET)")]
    MissingApiSecret,
}

/// API key and secret exchanged for bearer tokens.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self, Error> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();
        if api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }
        if api_secret.is_empty() {
            return Err(Error::MissingApiSecret);
        }
        Ok(Self {
            api_key,
            api_secret,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Resource base URL, always ending in `/`.
    pub base_url: String,
    pub token_url: String,
}

impl Endpoints {
    pub fn production() -> Self {
        Self::custom(PRODUCTION_BASE_URL, TOKEN_URL)
    }

    pub fn sandbox() -> Self {
        Self::custom(SANDBOX_BASE_URL, TOKEN_URL)
    }

    pub fn select(use_sandbox: bool) -> Self {
        if use_sandbox {
            Self::sandbox()
        } else {
            Self::production()
        }
    }

    pub fn custom(base_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            token_url: token_url.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    /// Log request and response details, including raw bodies.
    pub debug: bool,
}

impl Config {
    /// Production configuration with debug logging off.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoints: Endpoints::production(),
            debug: false,
        }
    }

    pub fn sandbox(mut self, use_sandbox: bool) -> Self {
        self.endpoints = Endpoints::select(use_sandbox);
        self
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading values through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY).ok_or(Error::MissingApiKey)?;
        let api_secret = lookup(ENV_API_SECRET).ok_or(Error::MissingApiSecret)?;
        let credentials = Credentials::new(api_key, api_secret)?;

        let is_set = |key: &str| lookup(key).map_or(false, |value| !value.is_empty());

        Ok(Self::new(credentials)
            .sandbox(is_set(ENV_API_SANDBOX))
            .debug(is_set(ENV_API_DEBUG)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn from_vars_defaults_to_production() {
        let config =
            Config::from_vars(vars(&[(ENV_API_KEY, "key"), (ENV_API_SECRET, "secret")])).unwrap();
        assert_eq!(config.credentials.api_key(), "key");
        assert_eq!(config.credentials.api_secret(), "secret");
        assert_eq!(config.endpoints, Endpoints::production());
        assert!(!config.debug);
    }

    #[test]
    fn from_vars_sandbox_and_debug() {
        let config = Config::from_vars(vars(&[
            (ENV_API_KEY, "key"),
            (ENV_API_SECRET, "secret"),
            (ENV_API_SANDBOX, "1"),
            (ENV_API_DEBUG, "yes"),
        ]))
        .unwrap();
        assert_eq!(config.endpoints.base_url, SANDBOX_BASE_URL);
        assert_eq!(config.endpoints.token_url, TOKEN_URL);
        assert!(config.debug);
    }

    #[test]
    fn empty_toggle_is_off() {
        let config = Config::from_vars(vars(&[
            (ENV_API_KEY, "key"),
            (ENV_API_SECRET, "secret"),
            (ENV_API_SANDBOX, ""),
        ]))
        .unwrap();
        assert_eq!(config.endpoints, Endpoints::production());
    }

    #[test]
    fn missing_credentials() {
        let err = Config::from_vars(vars(&[(ENV_API_SECRET, "secret")])).unwrap_err();
        assert_eq!(err, Error::MissingApiKey);

        let err = Config::from_vars(vars(&[(ENV_API_KEY, "key")])).unwrap_err();
        assert_eq!(err, Error::MissingApiSecret);

        let err = Credentials::new("key", "").unwrap_err();
        assert_eq!(err, Error::MissingApiSecret);
    }

    #[test]
    fn secret_is_redacted() {
        let credentials = Credentials::new("key", "hunter2").unwrap();
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("key"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn custom_base_url_gets_trailing_slash() {
        let endpoints = Endpoints::custom("http://127.0.0.1:1234", "http://127.0.0.1:1234/token");
        assert_eq!(endpoints.base_url, "http://127.0.0.1:1234/");
    }
}
