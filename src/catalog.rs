use crate::models::Catalog;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

const DEFAULT_CACHE_SECS: u64 = 60;

/// What the screens see of the catalog: the last fetched content and
/// whether a fetch is still in flight.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub catalog: Option<Arc<Catalog>>,
    pub loading: bool,
}

impl CatalogSnapshot {
    pub fn ready(catalog: Catalog) -> Self {
        Self {
            catalog: Some(Arc::new(catalog)),
            loading: false,
        }
    }

    pub fn loading() -> Self {
        Self {
            catalog: None,
            loading: true,
        }
    }
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn snapshot(&self) -> Result<CatalogSnapshot>;
}

/// HTTP client for the catalog provider, caching the last response for a
/// fixed time.
///
/// At most one fetch runs at a time. Requests arriving while it is in
/// flight get the previous catalog, or a loading snapshot before the first
/// fetch has landed. A failed refresh keeps serving the previous catalog.
#[derive(Debug)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    ttl: Duration,
    cached: RwLock<Option<(Instant, Arc<Catalog>)>>,
    refresh: Mutex<()>,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, ttl: Duration) -> Result<Self> {
        let user_agent = format!("streamvault/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build catalog HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ttl,
            cached: RwLock::new(None),
            refresh: Mutex::new(()),
        })
    }

    pub fn from_env() -> Result<Self> {
        let base_url = env::var("CATALOG_API_URL").context("CATALOG_API_URL not set")?;
        let ttl = match env::var("CATALOG_CACHE_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("CATALOG_CACHE_SECS is not a number: {raw}"))?,
            Err(_) => DEFAULT_CACHE_SECS,
        };
        Self::new(base_url, Duration::from_secs(ttl))
    }

    pub async fn fetch_catalog(&self) -> Result<Catalog> {
        let url = format!("{}/content", self.base_url);
        self.get_json(&url).await
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .context("request failed")?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {} {}", url, status, text));
        }
        let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }

    async fn cached_catalog(&self) -> Option<Arc<Catalog>> {
        let guard = self.cached.read().await;
        guard
            .as_ref()
            .filter(|(fetched_at, _)| fetched_at.elapsed() < self.ttl)
            .map(|(_, catalog)| catalog.clone())
    }

    async fn stale_catalog(&self) -> Option<Arc<Catalog>> {
        self.cached
            .read()
            .await
            .as_ref()
            .map(|(_, catalog)| catalog.clone())
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn snapshot(&self) -> Result<CatalogSnapshot> {
        if let Some(catalog) = self.cached_catalog().await {
            debug!("Serving catalog from cache");
            return Ok(CatalogSnapshot {
                catalog: Some(catalog),
                loading: false,
            });
        }

        let Ok(_refresh) = self.refresh.try_lock() else {
            debug!("Catalog fetch already in flight");
            return Ok(match self.stale_catalog().await {
                Some(catalog) => CatalogSnapshot {
                    catalog: Some(catalog),
                    loading: false,
                },
                None => CatalogSnapshot::loading(),
            });
        };

        // The previous holder may have refreshed the cache already.
        if let Some(catalog) = self.cached_catalog().await {
            return Ok(CatalogSnapshot {
                catalog: Some(catalog),
                loading: false,
            });
        }

        let catalog = match self.fetch_catalog().await {
            Ok(catalog) => Arc::new(catalog),
            Err(e) => match self.stale_catalog().await {
                Some(stale) => {
                    warn!("Catalog refresh failed, serving previous catalog: {:?}", e);
                    return Ok(CatalogSnapshot {
                        catalog: Some(stale),
                        loading: false,
                    });
                }
                None => return Err(e),
            },
        };
        info!(
            "Fetched catalog: {} movies, {} web series entries, {} shows",
            catalog.movies.len(),
            catalog.web_series.len(),
            catalog.shows.len()
        );
        *self.cached.write().await = Some((Instant::now(), catalog.clone()));
        Ok(CatalogSnapshot {
            catalog: Some(catalog),
            loading: false,
        })
    }
}
