use scraper::Html;

use crate::model::Recipe;

mod heuristic;
mod structured;

pub use self::heuristic::HeuristicExtractor;
pub use self::structured::StructuredDataExtractor;

/// Everything a tier needs to look at a page: the source URL, the raw markup,
/// and the parsed DOM.
pub struct ParsingContext {
    pub url: String,
    pub html: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        let html = html.into();
        let document = Html::parse_document(&html);
        ParsingContext {
            url: url.into(),
            html,
            document,
        }
    }
}

/// One extraction strategy in the fallback chain.
///
/// Returning `None` means "this page has nothing for me" and sends the
/// pipeline on to the next tier; it is never an error. Implementations must
/// swallow their own parse failures.
pub trait Extractor {
    fn extract(&self, context: &ParsingContext) -> Option<Recipe>;
}

/// An externally provided site-specific scraper, slotted in as tier 2.
///
/// Implementations get the raw HTML alongside the URL, apply their own
/// tolerance for missing fields, and decline with `None` rather than panic
/// when a page doesn't yield ingredients or steps.
pub trait SiteScraper: Send + Sync {
    fn try_scrape(&self, url: &str, html: &str) -> Option<Recipe>;
}

/// Adapter letting an injected [`SiteScraper`] participate in the tier chain
/// behind the common [`Extractor`] contract.
pub struct SiteScraperTier<'a>(pub &'a dyn SiteScraper);

impl Extractor for SiteScraperTier<'_> {
    fn extract(&self, context: &ParsingContext) -> Option<Recipe> {
        self.0
            .try_scrape(&context.url, &context.html)
            .filter(Recipe::has_content)
    }
}
