//! Pipeline orchestration: cache → validate → fetch → tiers → enrich → store.

use std::time::Duration;

use log::debug;

use crate::cache::{RecipeCache, CACHE_CAPACITY, CACHE_TTL};
use crate::error::ExtractError;
use crate::extractors::{
    Extractor, HeuristicExtractor, ParsingContext, SiteScraper, SiteScraperTier,
    StructuredDataExtractor,
};
use crate::fetch::{PageFetcher, FETCH_TIMEOUT};
use crate::ingredients::{enrich_recipe, RuleSegmenter, Segmenter};
use crate::model::Recipe;
use crate::validate::validate_url_allowing;

/// The extraction pipeline and its shared state.
///
/// Each [`extract_recipe`](RecipePipeline::extract_recipe) call is
/// independent; the cache is the only thing invocations share, so a pipeline
/// can be used concurrently from as many tasks as you like. Dropping the
/// returned future aborts the in-flight fetch and skips all downstream work.
pub struct RecipePipeline {
    fetcher: PageFetcher,
    cache: RecipeCache,
    site_scraper: Option<Box<dyn SiteScraper>>,
    segmenter: Box<dyn Segmenter>,
    allow_private_networks: bool,
}

impl RecipePipeline {
    pub fn new() -> Self {
        PipelineBuilder::new().build()
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Extract a recipe from a web page.
    ///
    /// A cached result short-circuits everything: no validation, no fetch, no
    /// re-enrichment. Otherwise the URL is validated (no fetch ever happens
    /// for a URL that fails validation), fetched exactly once, and handed to
    /// the tiers in priority order; the first tier to produce a non-empty
    /// recipe wins. The winner is enriched, cached, and returned. If every
    /// tier declines, the result is [`ExtractError::NoRecipeFound`].
    pub async fn extract_recipe(&self, url: &str) -> Result<Recipe, ExtractError> {
        if let Some(cached) = self.cache.get(url) {
            return Ok(cached);
        }

        let validated = validate_url_allowing(url, self.allow_private_networks).await?;
        let page = self.fetcher.fetch(&validated).await?;

        let mut recipe = self
            .run_tiers(url, &page.body)
            .ok_or(ExtractError::NoRecipeFound)?;

        enrich_recipe(&mut recipe, self.segmenter.as_ref());
        self.cache.insert(url, recipe.clone());
        Ok(recipe)
    }

    /// Run the extraction tiers in priority order; first non-empty result
    /// wins. Purely synchronous, so the DOM never lives across an await point.
    fn run_tiers(&self, url: &str, html: &str) -> Option<Recipe> {
        let context = ParsingContext::new(url, html);

        let structured = StructuredDataExtractor;
        let heuristic = HeuristicExtractor;
        let scraper_tier = self
            .site_scraper
            .as_deref()
            .map(|scraper| SiteScraperTier(scraper));

        let mut tiers: Vec<(&str, &dyn Extractor)> = vec![("structured data", &structured)];
        if let Some(tier) = &scraper_tier {
            tiers.push(("site scraper", tier));
        }
        tiers.push(("heuristic", &heuristic));

        tiers.into_iter().find_map(|(label, tier)| {
            let recipe = tier.extract(&context);
            if recipe.is_some() {
                debug!("tier matched: {label}");
            }
            recipe
        })
    }
}

impl Default for RecipePipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent configuration for [`RecipePipeline`].
///
/// Everything has a sensible default; the builder exists to inject the tier-2
/// site scraper, swap the ingredient segmenter, and loosen fixed limits in
/// test harnesses.
pub struct PipelineBuilder {
    fetch_timeout: Duration,
    cache_capacity: usize,
    cache_ttl: Duration,
    site_scraper: Option<Box<dyn SiteScraper>>,
    segmenter: Box<dyn Segmenter>,
    allow_private_networks: bool,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        PipelineBuilder {
            fetch_timeout: FETCH_TIMEOUT,
            cache_capacity: CACHE_CAPACITY,
            cache_ttl: CACHE_TTL,
            site_scraper: None,
            segmenter: Box::new(RuleSegmenter),
            allow_private_networks: false,
        }
    }

    /// Install a tier-2 site-specific scraper, consulted between the
    /// structured-data and heuristic tiers.
    pub fn site_scraper(mut self, scraper: impl SiteScraper + 'static) -> Self {
        self.site_scraper = Some(Box::new(scraper));
        self
    }

    /// Replace the built-in rule-based ingredient segmenter.
    pub fn segmenter(mut self, segmenter: impl Segmenter + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Skip the private-address deny list. Scheme and hostname validation
    /// still apply. Meant for test harnesses that serve fixtures from
    /// loopback; leave this off anywhere untrusted URLs can reach.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.allow_private_networks = allow;
        self
    }

    pub fn build(self) -> RecipePipeline {
        RecipePipeline {
            fetcher: PageFetcher::with_timeout(self.fetch_timeout),
            cache: RecipeCache::with_settings(self.cache_capacity, self.cache_ttl),
            site_scraper: self.site_scraper,
            segmenter: self.segmenter,
            allow_private_networks: self.allow_private_networks,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
