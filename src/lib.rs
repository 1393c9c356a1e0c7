//! Extract a clean, structured recipe from an arbitrary web page.
//!
//! Pages encode recipes in wildly inconsistent ways, so extraction runs as a
//! chain of independently fallible tiers tried in priority order: Schema.org
//! structured data (JSON-LD, then microdata), an optional injected
//! site-specific scraper, and finally a heuristic scan for labeled
//! ingredient/direction lists. The first tier to produce a non-empty recipe
//! wins; its ingredient lines are then enriched into structured
//! quantity/unit/name records. Outbound fetches are gated by an
//! SSRF-hardened URL validator, and completed results are memoized in a
//! bounded, TTL-limited cache.
//!
//! ```no_run
//! use recipe_distill::RecipePipeline;
//!
//! # async fn run() -> Result<(), recipe_distill::ExtractError> {
//! let pipeline = RecipePipeline::new();
//! let recipe = pipeline.extract_recipe("https://example.com/best-pancakes").await?;
//! println!("{} ({} ingredients)", recipe.title, recipe.ingredients.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod ingredients;
pub mod model;
pub mod pipeline;
pub mod validate;

pub use crate::error::{ErrorKind, ExtractError};
pub use crate::model::{ParsedIngredient, Recipe};
pub use crate::pipeline::{PipelineBuilder, RecipePipeline};
pub use crate::validate::validate_url;

/// One-shot extraction with a default pipeline.
///
/// Convenient for scripts; anything serving repeated requests should hold a
/// [`RecipePipeline`] instead so the result cache survives between calls.
pub async fn extract_recipe(url: &str) -> Result<Recipe, ExtractError> {
    RecipePipeline::new().extract_recipe(url).await
}
