//! Authenticated request issuance against the registry API.

use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    Method,
};
use tracing::debug;

use crate::{
    auth::{self, Token},
    utils::{check_status, ServerError},
};

#[derive(Debug, thiserror::Error)]
pub enum Error<AuthError> {
    #[error("auth: {0}")]
    Auth(#[source] AuthError),
    #[error("request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("access token is not a valid header value")]
    InvalidToken(#[source] reqwest::header::InvalidHeaderValue),
    #[error("encoding query: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error("query: {0}")]
    Query(#[from] QueryError),
}

/// A response arrived but could not be turned into a result.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("server: {0}")]
    Status(#[from] ServerError),
    #[error("decoding response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl<AuthError> Error<AuthError> {
    /// Status code of a rejected resource response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Query(QueryError::Status(ServerError { status_code, .. })) => {
                Some(*status_code)
            }
            _ => None,
        }
    }
}

pub struct Client<AuthTokenProvider> {
    pub client: reqwest::Client,
    pub base_url: String,
    pub auth_token_provider: AuthTokenProvider,
    /// Log resource response bodies.
    pub debug: bool,
}

impl<AuthTokenProvider> Client<AuthTokenProvider>
where
    AuthTokenProvider: auth::TokenProvider,
{
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_auth_header(&self) -> Result<HeaderValue, Error<AuthTokenProvider::Error>> {
        let token = self
            .auth_token_provider
            .get_auth_token()
            .await
            .map_err(Error::Auth)?;
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.access_token()))
            .map_err(Error::InvalidToken)?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Attach a current bearer token to `request` and dispatch it.
    ///
    /// The response status is not inspected; a `401` is returned like any
    /// other response.
    pub async fn send(
        &self,
        mut request: reqwest::Request,
    ) -> Result<reqwest::Response, Error<AuthTokenProvider::Error>> {
        let auth_header = self.get_auth_header().await?;
        request.headers_mut().insert(AUTHORIZATION, auth_header);

        debug!(message = "Sending request", method = %request.method(), url = %request.url());

        let res = self.client.execute(request).await.map_err(Error::Request)?;

        debug!(message = "Got response", status = res.status().as_u16());

        Ok(res)
    }

    /// GET `base_url + path` and decode a `200 OK` JSON body into `T`.
    pub async fn query<T>(&self, path: &str) -> Result<T, Error<AuthTokenProvider::Error>>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let url = self.build_url(path);
        let request = self
            .client
            .request(Method::GET, &url)
            .build()
            .map_err(Error::Request)?;

        let res = self.send(request).await?;
        check_status(&res).map_err(QueryError::from)?;

        let body = res.bytes().await.map_err(Error::Request)?;
        if self.debug {
            debug!(message = "Response body", body = %String::from_utf8_lossy(&body));
        }

        let value = serde_json::from_slice(&body).map_err(QueryError::from)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("no token")]
    struct NoToken;

    /// Always hands out the same token, or fails when `token` is `None`.
    struct StaticToken {
        token: Option<&'static str>,
    }

    #[async_trait::async_trait]
    impl auth::TokenProvider for StaticToken {
        type Token = String;
        type Error = NoToken;

        async fn get_auth_token(&self) -> Result<String, NoToken> {
            self.token.map(str::to_owned).ok_or(NoToken)
        }
    }

    impl auth::Token for String {
        fn access_token(&self) -> &str {
            self
        }
    }

    fn client(server: &MockServer, token: Option<&'static str>) -> Client<StaticToken> {
        Client {
            client: reqwest::Client::new(),
            base_url: format!("{}/", server.uri()),
            auth_token_provider: StaticToken { token },
            debug: true,
        }
    }

    #[derive(Debug, serde::Deserialize)]
    struct Thing {
        name: String,
    }

    #[tokio::test]
    async fn send_sets_bearer_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/things"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, Some("abc"));
        let request = client
            .client
            .get(client.build_url("things"))
            .build()
            .unwrap();
        let res = client.send(request).await.unwrap();
        assert_eq!(res.status().as_u16(), 401);
    }

    #[tokio::test]
    async fn send_replaces_existing_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, Some("abc"));
        let request = client
            .client
            .get(client.build_url("things"))
            .bearer_auth("stale")
            .build()
            .unwrap();
        client.send(request).await.unwrap();
    }

    #[tokio::test]
    async fn token_failure_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client(&server, None);
        let err = client.query::<Thing>("things").await.unwrap_err();
        assert!(matches!(err, Error::Auth(NoToken)));
    }

    #[tokio::test]
    async fn query_decodes_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/things/1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "one" })),
            )
            .mount(&server)
            .await;

        let thing: Thing = client(&server, Some("abc")).query("things/1").await.unwrap();
        assert_eq!(thing.name, "one");
    }

    #[tokio::test]
    async fn query_requires_exact_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(203).set_body_json(serde_json::json!({ "name": "one" })),
            )
            .mount(&server)
            .await;

        let err = client(&server, Some("abc"))
            .query::<Thing>("things/1")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(203));
    }

    #[tokio::test]
    async fn query_status_and_decode_errors_differ() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/garbled"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client(&server, Some("abc"));

        let err = client.query::<Thing>("missing").await.unwrap_err();
        match err {
            Error::Query(QueryError::Status(ServerError {
                status_code,
                status_text,
            })) => {
                assert_eq!(status_code, 404);
                assert_eq!(status_text, "Not Found");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = client.query::<Thing>("garbled").await.unwrap_err();
        assert!(matches!(err, Error::Query(QueryError::Decode(_))));
        assert_eq!(err.status_code(), None);
    }
}
