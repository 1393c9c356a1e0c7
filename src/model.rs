use serde::Serialize;

/// Title used when a page has a recipe but no usable name.
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// A recipe extracted from a web page.
///
/// `ingredients` and `steps` hold the raw text lines in source order.
/// `parsed_ingredients` stays `None` until enrichment has run; the pipeline
/// always enriches before returning, so callers of
/// [`extract_recipe`](crate::extract_recipe) can rely on it being populated.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub title: String,
    pub source_url: String,
    pub servings: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub image_url: Option<String>,
    pub ingredients: Vec<String>,
    pub parsed_ingredients: Option<Vec<ParsedIngredient>>,
    pub steps: Vec<String>,
}

impl Recipe {
    pub fn new(title: impl Into<String>, source_url: impl Into<String>) -> Self {
        Recipe {
            title: title.into(),
            source_url: source_url.into(),
            servings: None,
            prep_time: None,
            cook_time: None,
            image_url: None,
            ingredients: Vec::new(),
            parsed_ingredients: None,
            steps: Vec::new(),
        }
    }

    /// A recipe is only worth returning if it has at least one ingredient or
    /// step. Extractors use this to decline instead of producing an empty
    /// result.
    pub fn has_content(&self) -> bool {
        !self.ingredients.is_empty() || !self.steps.is_empty()
    }
}

/// One ingredient line broken into structured parts.
///
/// `raw` always preserves the source text verbatim. `amount_max` is only set
/// for ranges like "2-3 cloves", and only together with `amount`. `name` is
/// never null; it degrades to an empty string when segmentation cannot find a
/// noun phrase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedIngredient {
    pub raw: String,
    pub amount: Option<f64>,
    pub amount_max: Option<f64>,
    pub unit: Option<String>,
    pub name: String,
    pub preparation: Option<String>,
    pub comment: Option<String>,
}

impl ParsedIngredient {
    /// Fallback record carrying only the raw line, used when segmentation
    /// fails.
    pub fn raw_only(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        ParsedIngredient {
            name: raw.clone(),
            raw,
            amount: None,
            amount_max: None,
            unit: None,
            preparation: None,
            comment: None,
        }
    }

    /// Scale the amounts linearly, e.g. to double a recipe. Unparsed lines
    /// come back unchanged.
    pub fn scaled(&self, multiplier: f64) -> Self {
        ParsedIngredient {
            amount: self.amount.map(|a| a * multiplier),
            amount_max: self.amount_max.map(|a| a * multiplier),
            ..self.clone()
        }
    }
}
