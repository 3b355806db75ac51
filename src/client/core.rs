// File: src/client/core.rs
use crate::client::middleware::{CatalogHeadersLayer, CatalogHeadersService};
use crate::config::Config;
use crate::filter::{is_excluded, is_excluded_category};
use crate::model::{CategoriesResponse, Category, MealsResponse, Recipe};

use anyhow::{Context, Result};
use futures::future::try_join_all;
use futures::stream::{self, StreamExt};
use http::{Method, Request, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use tower::ServiceExt;
use tower_layer::Layer;

pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Random sample size when the caller has no preference.
pub const DEFAULT_RANDOM_COUNT: usize = 12;

type HttpsClient = CatalogHeadersService<Client<hyper_rustls::HttpsConnector<HttpConnector>, String>>;

/// Number of `random.php` calls issued for `count` wanted recipes: `ceil(count * 1.5)`.
/// The surplus absorbs samples dropped by the content filter.
pub fn overfetch_count(count: usize) -> usize {
    count.saturating_add(count.div_ceil(2))
}

/// Read-only client for the TheMealDB catalog.
///
/// Every public operation is infallible from the caller's point of view:
/// transport errors, bad statuses and malformed bodies are logged and turned
/// into an empty list (or `None` for single lookups).
#[derive(Clone, Debug)]
pub struct CatalogClient {
    http: HttpsClient,
    base_url: String,
    max_concurrent_lookups: usize,
}

impl CatalogClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let uri: Uri = base_url
            .parse()
            .with_context(|| format!("Invalid catalog URL '{}'", base_url))?;
        let is_https = uri.scheme_str() == Some("https");

        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        root_store.add_parsable_certificates(result.certs);
        if is_https && root_store.is_empty() {
            return Err(anyhow::anyhow!("No valid system certificates found."));
        }
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let http_client = Client::builder(TokioExecutor::new()).build(https_connector);
        let http = CatalogHeadersLayer::new(user_agent).layer(http_client);

        Ok(Self {
            http,
            base_url,
            max_concurrent_lookups: 16,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.base_url, &config.user_agent)?
            .with_max_concurrent_lookups(config.max_concurrent_lookups))
    }

    /// Caps parallel detail lookups in [`CatalogClient::get_meals_by_category`].
    pub fn with_max_concurrent_lookups(mut self, limit: usize) -> Self {
        self.max_concurrent_lookups = limit.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- TRANSPORT ---

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path_and_query);
        let req = Request::builder()
            .method(Method::GET)
            .uri(&url)
            .body(String::new())?;

        let resp = self
            .http
            .clone()
            .oneshot(req)
            .await
            .with_context(|| format!("GET {} failed", url))?;
        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?
            .to_bytes();

        if !status.is_success() {
            anyhow::bail!("GET {} returned {}", url, status);
        }
        serde_json::from_slice(&body).with_context(|| format!("Malformed response from {}", url))
    }

    async fn lookup(&self, id: &str) -> Result<Option<Recipe>> {
        let resp: MealsResponse = self
            .get_json(&format!("lookup.php?i={}", urlencoding::encode(id)))
            .await?;
        Ok(resp.meals.and_then(|m| m.into_iter().next()))
    }

    // --- CATALOG OPERATIONS ---

    /// Free-text name search, content filter applied.
    pub async fn search_recipes(&self, query: &str) -> Vec<Recipe> {
        let path = format!("search.php?s={}", urlencoding::encode(query));
        match self.get_json::<MealsResponse>(&path).await {
            Ok(resp) => keep_allowed(resp.meals.unwrap_or_default()),
            Err(e) => {
                log::error!("Error searching recipes: {:#}", e);
                vec![]
            }
        }
    }

    /// Single recipe by id. Not filtered.
    pub async fn get_recipe_by_id(&self, id: &str) -> Option<Recipe> {
        match self.lookup(id).await {
            Ok(recipe) => recipe,
            Err(e) => {
                log::error!("Error fetching recipe {}: {:#}", id, e);
                None
            }
        }
    }

    /// Up to `count` random recipes that pass the content filter.
    ///
    /// Issues [`overfetch_count`] concurrent samples and waits for all of them;
    /// a single failed sample empties the whole result. Never pads or retries.
    pub async fn get_random_recipes(&self, count: usize) -> Vec<Recipe> {
        let fetch_count = overfetch_count(count);
        let requests = (0..fetch_count).map(|_| self.get_json::<MealsResponse>("random.php"));

        match try_join_all(requests).await {
            Ok(responses) => {
                let samples = responses
                    .into_iter()
                    .filter_map(|r| r.meals.and_then(|m| m.into_iter().next()))
                    .collect();
                let mut recipes = keep_allowed(samples);
                recipes.truncate(count);
                recipes
            }
            Err(e) => {
                log::error!("Error fetching random recipes: {:#}", e);
                vec![]
            }
        }
    }

    /// Category list without the excluded category.
    pub async fn get_categories(&self) -> Vec<Category> {
        match self.get_json::<CategoriesResponse>("categories.php").await {
            Ok(resp) => resp
                .categories
                .unwrap_or_default()
                .into_iter()
                .filter(|c| !is_excluded_category(&c.name))
                .collect(),
            Err(e) => {
                log::error!("Error fetching categories: {:#}", e);
                vec![]
            }
        }
    }

    /// Full recipes of a category, content filter applied.
    ///
    /// The listing endpoint only returns summaries, so every entry is looked
    /// up individually. Costs one request for the listing plus one per member.
    pub async fn get_meals_by_category(&self, category: &str) -> Vec<Recipe> {
        if is_excluded_category(category) {
            return vec![];
        }

        let path = format!("filter.php?c={}", urlencoding::encode(category));
        let summaries = match self.get_json::<MealsResponse>(&path).await {
            Ok(resp) => resp.meals.unwrap_or_default(),
            Err(e) => {
                log::error!("Error fetching meals by category: {:#}", e);
                return vec![];
            }
        };
        log::debug!(
            "Category '{}' lists {} recipe(s), fetching details",
            category,
            summaries.len()
        );

        // `buffered` keeps listing order.
        let details: Vec<Option<Recipe>> = stream::iter(summaries)
            .map(|summary| async move { self.get_recipe_by_id(&summary.id).await })
            .buffered(self.max_concurrent_lookups)
            .collect()
            .await;

        keep_allowed(details.into_iter().flatten().collect())
    }
}

fn keep_allowed(recipes: Vec<Recipe>) -> Vec<Recipe> {
    recipes.into_iter().filter(|r| !is_excluded(r)).collect()
}
