//! Article data sources.
//!
//! The controller only talks to [`ArticleSource`], so tests can substitute
//! an in-memory source with scripted latency and failures.

use crate::config::ClientConfig;
use crate::error::{TransportError, TransportResult};
use inkwell_core::{ArticleFilter, ArticleWithDetails, Category, PageParams};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// Remote read access to the article listing and the category list.
pub trait ArticleSource: Send + Sync + 'static {
    /// Runs `GET /articles` with the given filter.
    fn fetch_articles<'a>(&'a self, filter: &'a ArticleFilter)
        -> SourceFuture<'a, Vec<ArticleWithDetails>>;

    /// Runs `GET /categories` with default pagination.
    fn fetch_categories(&self) -> SourceFuture<'_, Vec<Category>>;
}

/// [`ArticleSource`] backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpArticleSource {
    client: Client,
    base_url: String,
}

impl HttpArticleSource {
    /// Builds the underlying `reqwest` client with the configured timeout.
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| TransportError::Request(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl ArticleSource for HttpArticleSource {
    fn fetch_articles<'a>(
        &'a self,
        filter: &'a ArticleFilter,
    ) -> SourceFuture<'a, Vec<ArticleWithDetails>> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.url("/articles"))
                .query(&filter.to_params())
                .send()
                .await?;
            decode_json(response).await
        })
    }

    fn fetch_categories(&self) -> SourceFuture<'_, Vec<Category>> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.url("/categories"))
                .query(&PageParams::default())
                .send()
                .await?;
            decode_json(response).await
        })
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> TransportResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<T>().await?)
}
