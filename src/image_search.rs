//! Dish photo lookup.
//!
//! [`UnsplashClient`] queries Unsplash's photo search and keeps the first
//! result's display-resolution URL. [`find_image`] wraps any [`ImageSearch`]
//! and turns failures into `None`.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};

use crate::errors::ServiceError;

pub const UNSPLASH_API_BASE: &str = "https://api.unsplash.com";

#[async_trait]
pub trait ImageSearch: Send + Sync + fmt::Debug {
    /// URL of the best matching image, `Ok(None)` when nothing matched
    async fn search(&self, query: &str) -> Result<Option<String>, ServiceError>;
}

#[derive(Debug)]
pub struct UnsplashClient {
    access_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
}

impl UnsplashClient {
    pub fn new(access_key: String, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            access_key,
            base_url: UNSPLASH_API_BASE.to_string(),
            client,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ImageSearch for UnsplashClient {
    async fn search(&self, query: &str) -> Result<Option<String>, ServiceError> {
        let response = self
            .client
            .get(format!("{}/search/photos", self.base_url))
            .query(&[("query", query), ("per_page", "1"), ("orientation", "landscape")])
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.results.into_iter().next().and_then(|p| p.urls.regular))
    }
}

/// Canned image search for tests
#[derive(Debug, Default)]
pub struct FakeImageSearch {
    images: HashMap<String, String>,
    failure: Option<ServiceError>,
    delay: Option<Duration>,
}

impl FakeImageSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, query: &str, url: &str) -> Self {
        self.images.insert(query.to_string(), url.to_string());
        self
    }

    pub fn failing(mut self, error: ServiceError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ImageSearch for FakeImageSearch {
    async fn search(&self, query: &str) -> Result<Option<String>, ServiceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.images.get(query).cloned()),
        }
    }
}

/// Look up an image, logging and swallowing failures
pub async fn find_image(search: &dyn ImageSearch, query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    match search.search(query).await {
        Ok(url) => {
            debug!(query, found = url.is_some(), "Image search completed");
            url
        }
        Err(e) => {
            error!(query, error = %e, "Image search failed");
            None
        }
    }
}
