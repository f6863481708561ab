use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::catalog::Catalog;
use crate::error::{FetchError, MarqueeError, Result};
use crate::types::{MoviePage, SearchResults};

/// TMDB rejects `page` values above this for list endpoints
pub const MAX_PAGE: u32 = 500;

pub struct Tmdb {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for Tmdb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tmdb")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Tmdb {
    pub fn new(base_url: String, token: String, timeout: Duration) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(MarqueeError::Auth("TMDB token is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn top_rated_url(&self, page: u32) -> String {
        format!("{}/movie/top_rated?page={}", self.base_url, page)
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search/movie?query={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> std::result::Result<T, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidRequest(format!("{url}: {e}")))?;

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %text, "TMDB request rejected");
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> std::result::Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))
}

#[async_trait]
impl Catalog for Tmdb {
    fn name(&self) -> &str {
        "TMDB"
    }

    fn web_url(&self, movie_id: u64) -> String {
        format!("https://www.themoviedb.org/movie/{}", movie_id)
    }

    async fn fetch_page(&self, page: u32) -> std::result::Result<MoviePage, FetchError> {
        let url = self.top_rated_url(page);
        let mut result: MoviePage = self.get_json(&url).await?;
        result.total_pages = result.total_pages.map(|t| t.min(MAX_PAGE));
        Ok(result)
    }

    async fn search(&self, query: &str) -> std::result::Result<SearchResults, FetchError> {
        let url = self.search_url(query);
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> Tmdb {
        Tmdb::new(
            base_url.to_string(),
            "token".to_string(),
            Duration::from_secs(20),
        )
        .unwrap()
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = Tmdb::new(
            "https://api.themoviedb.org/3".to_string(),
            "  ".to_string(),
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, MarqueeError::Auth(_)));
    }

    #[test]
    fn urls_strip_trailing_slash_and_encode_query() {
        let tmdb = client("https://api.themoviedb.org/3/");
        assert_eq!(
            tmdb.top_rated_url(7),
            "https://api.themoviedb.org/3/movie/top_rated?page=7"
        );
        assert_eq!(
            tmdb.search_url("the godfather & sons"),
            "https://api.themoviedb.org/3/search/movie?query=the%20godfather%20%26%20sons"
        );
    }

    #[test]
    fn web_url_points_at_movie_page() {
        let tmdb = client("https://api.themoviedb.org/3");
        assert_eq!(tmdb.web_url(238), "https://www.themoviedb.org/movie/238");
    }

    #[test]
    fn decode_failure_is_reported_as_decode() {
        let err = decode::<MoviePage>(b"{\"results\": 12}").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn unparsable_base_url_is_an_invalid_request() {
        let tmdb = client("not a url");
        let err = tmdb.fetch_page(1).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidRequest(_)));
    }
}
