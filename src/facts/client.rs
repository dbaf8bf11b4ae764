//! REST Countries v3.1 client

use super::FactProvider;
use crate::config::FactsConfig;
use crate::country::{CountryCode, CountryFacts, CountryName, ImageRefs, SearchHit};
use crate::error::{GaiaError, GaiaResult};
use crate::upstream;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const LISTING_FIELDS: &str = "name,flags,cca3";

/// The provider answers an array, or a bare object when `fields` is used
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Reduced record returned by name search and bulk listing
#[derive(Deserialize)]
struct Listing {
    name: CountryName,
    #[serde(default)]
    flags: ImageRefs,
    cca3: CountryCode,
}

impl From<Listing> for SearchHit {
    fn from(listing: Listing) -> Self {
        SearchHit {
            display_name: listing.name.common,
            official_name: listing.name.official,
            flags: listing.flags,
            code: listing.cca3,
        }
    }
}

enum Fetched<T> {
    Found(T),
    Missing,
}

/// Client for the facts provider
pub struct RestCountriesClient {
    client: Client,
    base_url: String,
}

impl RestCountriesClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: upstream::trim_base(base_url),
        }
    }

    pub fn from_config(config: &FactsConfig, user_agent: &str) -> GaiaResult<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = upstream::http_client(user_agent, Some(timeout))
            .map_err(|e| GaiaError::Config(e.to_string()))?;
        Ok(Self::new(client, &config.base_url))
    }

    /// GET and decode; HTTP 404 is reported as `Missing`, everything else
    /// unexpected as `UpstreamUnavailable`
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> GaiaResult<Fetched<T>> {
        debug!("GET {}", url);
        let resp = self.client.get(url).send().await.map_err(|e| {
            warn!("Facts provider request failed: {}", e);
            GaiaError::UpstreamUnavailable(format!("facts provider unreachable: {}", e))
        })?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(Fetched::Missing);
        }
        if !resp.status().is_success() {
            warn!("Facts provider returned {} for {}", resp.status(), url);
            return Err(GaiaError::UpstreamUnavailable(format!(
                "facts provider returned {}",
                resp.status()
            )));
        }

        let value = resp.json::<T>().await.map_err(|e| {
            GaiaError::UpstreamUnavailable(format!("unexpected facts provider response: {}", e))
        })?;
        Ok(Fetched::Found(value))
    }
}

#[async_trait]
impl FactProvider for RestCountriesClient {
    async fn fetch_facts(&self, code: &CountryCode) -> GaiaResult<CountryFacts> {
        let url = format!("{}/alpha/{}", self.base_url, code);
        match self.get_json::<OneOrMany<CountryFacts>>(&url).await? {
            Fetched::Found(found) => found
                .into_vec()
                .into_iter()
                .next()
                .ok_or_else(|| GaiaError::NotFound(code.to_string())),
            Fetched::Missing => Err(GaiaError::NotFound(code.to_string())),
        }
    }

    async fn search_by_name(&self, term: &str) -> GaiaResult<Vec<SearchHit>> {
        let url = format!(
            "{}/name/{}?fields={}",
            self.base_url,
            upstream::path_segment(term),
            LISTING_FIELDS
        );
        match self.get_json::<OneOrMany<Listing>>(&url).await? {
            Fetched::Found(found) => Ok(found.into_vec().into_iter().map(SearchHit::from).collect()),
            Fetched::Missing => Err(GaiaError::NotFound(term.to_string())),
        }
    }

    async fn list_all(&self) -> GaiaResult<Vec<SearchHit>> {
        let url = format!("{}/all?fields={}", self.base_url, LISTING_FIELDS);
        let mut hits: Vec<SearchHit> = match self.get_json::<Vec<Listing>>(&url).await? {
            Fetched::Found(found) => found.into_iter().map(SearchHit::from).collect(),
            Fetched::Missing => {
                return Err(GaiaError::UpstreamUnavailable(
                    "facts provider listing endpoint missing".to_string(),
                ))
            }
        };
        hits.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(hits)
    }
}
