use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::{MoviePage, SearchResults};

/// A remote movie catalog. Implementations do their own transport work; the
/// feed only cares whether a call succeeded.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;
    fn web_url(&self, movie_id: u64) -> String;

    async fn fetch_page(&self, page: u32) -> Result<MoviePage, FetchError>;
    async fn search(&self, query: &str) -> Result<SearchResults, FetchError>;
}
