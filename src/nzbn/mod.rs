//! NZBN register: lookup by NZBN and search by name.

use tracing::debug;

use crate::{auth, client::Client, client::Error};

pub mod model;

pub use self::model::{
    BusinessEntity, EntityStatus, EntityType, SearchQuery, SearchResult, TradingName,
};

const ENTITIES_PATH: &str = "services/v4/nzbn/entities";

pub struct Nzbn<'a, AuthTokenProvider> {
    client: &'a Client<AuthTokenProvider>,
}

impl<'a, AuthTokenProvider> Nzbn<'a, AuthTokenProvider>
where
    AuthTokenProvider: auth::TokenProvider,
{
    pub fn new(client: &'a Client<AuthTokenProvider>) -> Self {
        Self { client }
    }

    /// The NZBN is encoded as a single path segment.
    fn build_entity_path(nzbn: &str) -> String {
        format!("{ENTITIES_PATH}/{}", urlencoding::encode(nzbn))
    }

    fn build_search_path(query: &SearchQuery) -> Result<String, serde_urlencoded::ser::Error> {
        Ok(format!("{ENTITIES_PATH}?{}", query.to_query_string()?))
    }

    /// Fetch a single entity by its NZBN.
    pub async fn lookup(
        &self,
        nzbn: &str,
    ) -> Result<BusinessEntity, Error<AuthTokenProvider::Error>> {
        debug!(message = "Looking up entity", nzbn);
        self.client.query(&Self::build_entity_path(nzbn)).await
    }

    /// Fetch one page of entities matching `query`.
    pub async fn search(
        &self,
        query: &SearchQuery,
    ) -> Result<SearchResult, Error<AuthTokenProvider::Error>> {
        debug!(message = "Searching entities", search_term = %query.search_term);
        let path = Self::build_search_path(query)?;
        self.client.query(&path).await
    }
}
