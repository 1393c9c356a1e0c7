//! Ingredient-string enrichment.
//!
//! Turns each raw ingredient line into a [`ParsedIngredient`] by delegating
//! segmentation to a [`Segmenter`] and then selecting among its (possibly
//! ambiguous) output. Enrichment is strictly 1:1 with the input lines and
//! never fails as a whole: a line the segmenter chokes on degrades to a
//! record carrying only the raw text.

use log::debug;
use thiserror::Error;

use crate::model::{ParsedIngredient, Recipe};

mod segment;

pub use self::segment::RuleSegmenter;

/// One possible reading of the numeric part of a line.
///
/// Segmenters emit several of these when a line is ambiguous: "Heaping 1/3
/// cup" produces a quantity-less candidate for the modifier word and a real
/// one for the fraction.
#[derive(Debug, Clone, Default)]
pub struct AmountCandidate {
    pub quantity: Option<f64>,
    /// Upper bound, meaningful only when `range` is set.
    pub quantity_max: Option<f64>,
    pub range: bool,
    pub unit: Option<String>,
}

/// Raw segmentation of one ingredient line.
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    pub amounts: Vec<AmountCandidate>,
    /// Name phrase parts; compound items like "salt and pepper" arrive as
    /// several parts and are rejoined with " and ".
    pub name_parts: Vec<String>,
    pub preparation: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Error)]
#[error("ingredient segmentation failed: {0}")]
pub struct SegmentError(pub String);

/// The natural-language segmentation collaborator.
///
/// The crate ships [`RuleSegmenter`] as the default implementation; external
/// segmenters plug in through the pipeline builder.
pub trait Segmenter: Send + Sync {
    fn segment(&self, raw: &str) -> Result<Segmentation, SegmentError>;
}

/// Populate `parsed_ingredients` with one record per raw line, in order.
pub fn enrich_recipe(recipe: &mut Recipe, segmenter: &dyn Segmenter) {
    recipe.parsed_ingredients = Some(
        recipe
            .ingredients
            .iter()
            .map(|raw| parse_line(raw, segmenter))
            .collect(),
    );
}

fn parse_line(raw: &str, segmenter: &dyn Segmenter) -> ParsedIngredient {
    let segmentation = match segmenter.segment(raw) {
        Ok(segmentation) => segmentation,
        Err(err) => {
            debug!("failed to segment ingredient {raw:?}: {err}");
            return ParsedIngredient::raw_only(raw);
        }
    };

    // Skip modifier-only candidates so the actual number drives scaling.
    let amount = segmentation
        .amounts
        .iter()
        .find(|candidate| candidate.quantity.is_some());

    ParsedIngredient {
        raw: raw.to_string(),
        amount: amount.and_then(|candidate| candidate.quantity),
        amount_max: amount.and_then(|candidate| {
            if candidate.range {
                candidate.quantity_max
            } else {
                None
            }
        }),
        unit: amount
            .and_then(|candidate| candidate.unit.as_deref())
            .and_then(normalize_unit),
        name: segmentation.name_parts.join(" and "),
        preparation: segmentation.preparation,
        comment: segmentation.comment,
    }
}

/// Canonicalize known unit variants case-insensitively; anything unknown
/// passes through unchanged, and an empty unit becomes absent.
fn normalize_unit(unit: &str) -> Option<String> {
    let unit = unit.trim();
    if unit.is_empty() {
        return None;
    }
    let lower = unit.to_lowercase();
    match lower.as_str() {
        "tbsp" | "tbsps" => Some("tbsp".to_string()),
        "tsp" | "tsps" => Some("tsp".to_string()),
        _ => Some(unit.to_string()),
    }
}
