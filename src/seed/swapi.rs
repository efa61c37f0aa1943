use std::time::Duration;

use anyhow::Context;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::config::SwapiConfig;

// Guards against a catalog whose `next` links never terminate.
const MAX_PAGES: usize = 500;

#[derive(Debug, Deserialize)]
struct Page<T> {
    results: Vec<T>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwapiPlanet {
    pub name: String,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub population: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwapiPerson {
    pub name: String,
    pub homeworld: Option<String>,
    #[serde(default)]
    pub species: Vec<String>,
}

#[derive(Clone)]
pub struct SwapiClient {
    http: reqwest::Client,
    base_url: String,
}

impl SwapiClient {
    pub fn new(cfg: &SwapiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(cfg.accept_invalid_certs)
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}/", self.base_url, resource)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        debug!(%url, "swapi get");
        self.http
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?
            .error_for_status()
            .with_context(|| format!("GET {}", url))?
            .json::<T>()
            .await
            .with_context(|| format!("decode {}", url))
    }

    /// Collect every result of a paginated listing by following `next`.
    pub async fn fetch_all<T: DeserializeOwned>(&self, resource: &str) -> anyhow::Result<Vec<T>> {
        let mut items = Vec::new();
        let mut url = Some(self.resource_url(resource));
        let mut pages = 0;
        while let Some(current) = url {
            pages += 1;
            anyhow::ensure!(pages <= MAX_PAGES, "{} has more than {} pages", resource, MAX_PAGES);
            let page: Page<T> = self.get_json(&current).await?;
            items.extend(page.results);
            url = page.next;
        }
        Ok(items)
    }

    pub async fn planets(&self) -> anyhow::Result<Vec<SwapiPlanet>> {
        self.fetch_all("planets").await
    }

    pub async fn people(&self) -> anyhow::Result<Vec<SwapiPerson>> {
        self.fetch_all("people").await
    }

    /// `name` of the resource at an absolute catalog URL.
    pub async fn fetch_name(&self, url: &str) -> anyhow::Result<Option<String>> {
        let named: Named = self.get_json(url).await?;
        Ok(named.name)
    }
}
