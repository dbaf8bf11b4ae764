//! In-memory upstreams shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use gaia::country::{CountryCode, CountryFacts, CountryName, ImageRefs, SearchHit};
use gaia::error::{GaiaError, GaiaResult};
use gaia::facts::FactProvider;
use gaia::knowledge::{
    KnowledgeClient, KnowledgeError, KnowledgeResult, KnowledgeTimeouts, MediaAsset, MediaKind,
    MediaSource, QuerySolution, Rendition, SelectResults, SparqlEndpoint,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn code(raw: &str) -> CountryCode {
    CountryCode::parse(raw).unwrap()
}

pub fn facts(cca3: &str, common: &str, official: &str) -> CountryFacts {
    CountryFacts {
        name: CountryName {
            common: common.to_string(),
            official: official.to_string(),
        },
        cca2: None,
        cca3: code(cca3),
        flags: ImageRefs {
            png: Some(format!("https://flagcdn.com/w320/{}.png", cca3.to_lowercase())),
            svg: None,
            alt: None,
        },
        capital: vec![],
        population: 1_000_000,
        area: None,
        region: "Europe".to_string(),
        subregion: None,
        continents: vec!["Europe".to_string()],
        borders: vec![],
        languages: Default::default(),
        currencies: Default::default(),
        timezones: vec!["UTC+01:00".to_string()],
        independent: Some(true),
        un_member: Some(true),
        landlocked: Some(false),
        coat_of_arms: ImageRefs::default(),
    }
}

pub fn germany() -> CountryFacts {
    let mut germany = facts("DEU", "Germany", "Federal Republic of Germany");
    germany.capital = vec!["Berlin".to_string()];
    germany.population = 83_240_525;
    germany.borders = vec![code("AUT"), code("FRA"), code("POL")];
    germany
}

pub fn hit(facts: &CountryFacts) -> SearchHit {
    SearchHit {
        display_name: facts.name.common.clone(),
        official_name: facts.name.official.clone(),
        flags: facts.flags.clone(),
        code: facts.cca3.clone(),
    }
}

/// Facts provider backed by a fixed table
///
/// `search_by_name` mimics the provider's substring matching.
pub struct FakeFacts {
    countries: Vec<CountryFacts>,
    delay: Duration,
    failure: Option<GaiaError>,
    pub fetch_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
}

impl FakeFacts {
    pub fn new(countries: Vec<CountryFacts>) -> Self {
        Self {
            countries,
            delay: Duration::ZERO,
            failure: None,
            fetch_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, error: GaiaError) -> Self {
        self.failure = Some(error);
        self
    }

    async fn pause(&self) -> GaiaResult<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FactProvider for FakeFacts {
    async fn fetch_facts(&self, code: &CountryCode) -> GaiaResult<CountryFacts> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await?;
        self.countries
            .iter()
            .find(|c| &c.cca3 == code)
            .cloned()
            .ok_or_else(|| GaiaError::NotFound(code.to_string()))
    }

    async fn search_by_name(&self, term: &str) -> GaiaResult<Vec<SearchHit>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await?;
        let needle = term.to_lowercase();
        let hits: Vec<SearchHit> = self
            .countries
            .iter()
            .filter(|c| c.name.common.to_lowercase().contains(&needle))
            .map(hit)
            .collect();
        if hits.is_empty() {
            Err(GaiaError::NotFound(term.to_string()))
        } else {
            Ok(hits)
        }
    }

    async fn list_all(&self) -> GaiaResult<Vec<SearchHit>> {
        self.pause().await?;
        let mut hits: Vec<SearchHit> = self.countries.iter().map(hit).collect();
        hits.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(hits)
    }
}

/// Scripted answer of one SPARQL query
#[derive(Clone)]
pub struct Scripted {
    pub delay: Duration,
    pub result: KnowledgeResult<SelectResults>,
}

impl Scripted {
    pub fn row(row: QuerySolution) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(SelectResults::from_solutions(vec![row])),
        }
    }

    pub fn no_rows() -> Self {
        Self { delay: Duration::ZERO, result: Ok(SelectResults::empty()) }
    }

    pub fn error(error: KnowledgeError) -> Self {
        Self { delay: Duration::ZERO, result: Err(error) }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// SPARQL endpoint answering the fast and slow queries from a script
///
/// The slow query is recognized by its `GROUP_CONCAT` aggregation.
pub struct FakeSparql {
    fast: Scripted,
    slow: Scripted,
    pub queries: Mutex<Vec<String>>,
}

impl FakeSparql {
    pub fn new(fast: Scripted, slow: Scripted) -> Self {
        Self { fast, slow, queries: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl SparqlEndpoint for FakeSparql {
    async fn select(&self, query: &str) -> KnowledgeResult<SelectResults> {
        self.queries.lock().unwrap().push(query.to_string());
        let script = if query.contains("GROUP_CONCAT") { &self.slow } else { &self.fast };
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        script.result.clone()
    }
}

/// Media source keyed by article title
pub struct FakeMedia {
    listings: HashMap<String, Vec<MediaAsset>>,
    delay: Duration,
    failure: Option<KnowledgeError>,
    pub titles: Mutex<Vec<String>>,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self {
            listings: HashMap::new(),
            delay: Duration::ZERO,
            failure: None,
            titles: Mutex::new(Vec::new()),
        }
    }

    pub fn with_listing(mut self, title: &str, assets: Vec<MediaAsset>) -> Self {
        self.listings.insert(title.to_string(), assets);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, error: KnowledgeError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn calls(&self) -> usize {
        self.titles.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaSource for FakeMedia {
    async fn list_media(&self, title: &str) -> KnowledgeResult<Vec<MediaAsset>> {
        self.titles.lock().unwrap().push(title.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(self.listings.get(title).cloned().unwrap_or_default())
    }
}

pub fn asset(title: &str, kind: MediaKind) -> MediaAsset {
    MediaAsset {
        title: title.to_string(),
        file_description_url: None,
        preferred: Rendition {
            mediatype: kind,
            url: format!("https://upload.wikimedia.org/{}", title),
            width: Some(640),
            height: Some(480),
            size: None,
        },
        original: None,
    }
}

pub fn germany_fast_row() -> QuerySolution {
    QuerySolution::new()
        .with("hdi", "0.942")
        .with("gdpPerCapita", "51203.55")
        .with("lifeExpectancy", "81.1")
        .with("governmentType", "federal parliamentary republic")
        .with("enwikiTitle", "Germany")
}

pub fn germany_slow_row() -> QuerySolution {
    QuerySolution::new()
        .with("religions", "Catholicism, Protestantism")
        .with("ethnicGroups", "Germans, Turks")
}

pub fn knowledge(sparql: FakeSparql, media: Arc<FakeMedia>) -> KnowledgeClient {
    KnowledgeClient::new(Arc::new(sparql), media, KnowledgeTimeouts::default())
}
