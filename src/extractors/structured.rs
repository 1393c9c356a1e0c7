//! Tier 1: Schema.org structured data, JSON-LD first, then microdata.

use html_escape::decode_html_entities;
use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::extractors::{Extractor, ParsingContext};
use crate::model::{Recipe, UNTITLED_RECIPE};

pub struct StructuredDataExtractor;

impl Extractor for StructuredDataExtractor {
    fn extract(&self, context: &ParsingContext) -> Option<Recipe> {
        if let Some(recipe) = extract_json_ld(context) {
            debug!("found recipe via JSON-LD");
            return Some(recipe);
        }
        if let Some(recipe) = extract_microdata(context) {
            debug!("found recipe via microdata");
            return Some(recipe);
        }
        debug!("no structured recipe data found");
        None
    }
}

fn extract_json_ld(context: &ParsingContext) -> Option<Recipe> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();

    for script in context.document.select(&selector) {
        let value: Value = match serde_json::from_str(&script.inner_html()) {
            Ok(value) => value,
            Err(err) => {
                debug!("skipping unparseable JSON-LD block: {err}");
                continue;
            }
        };
        if let Some(recipe) = find_recipe_node(&value).and_then(|node| recipe_from_node(node, &context.url)) {
            return Some(recipe);
        }
    }

    None
}

/// Locate a node whose `@type` contains "Recipe". The top level may be a
/// single object or an array of objects, and each object may wrap the real
/// nodes in a `@graph` array; the graph is searched one level deep.
fn find_recipe_node(value: &Value) -> Option<&Value> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    };

    for item in items {
        if type_contains_recipe(item) {
            return Some(item);
        }
        if let Some(Value::Array(graph)) = item.get("@graph") {
            if let Some(node) = graph.iter().find(|node| type_contains_recipe(node)) {
                return Some(node);
            }
        }
    }

    None
}

/// `@type` may be a single string or an array of strings; match is
/// containment, not equality, so "schema:Recipe" style types still hit.
fn type_contains_recipe(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(ty)) => ty.contains("Recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .any(|ty| ty.as_str().is_some_and(|ty| ty.contains("Recipe"))),
        _ => false,
    }
}

fn recipe_from_node(node: &Value, url: &str) -> Option<Recipe> {
    let ingredients = match node.get("recipeIngredient") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect(),
        Some(Value::String(line)) if !line.trim().is_empty() => vec![line.trim().to_string()],
        _ => Vec::new(),
    };
    let steps = normalize_instructions(node.get("recipeInstructions"));

    if ingredients.is_empty() && steps.is_empty() {
        debug!("structured data had no ingredients or steps");
        return None;
    }

    let mut recipe = Recipe::new(title_from(node.get("name")), url);
    recipe.servings = servings_from(node.get("recipeYield"));
    recipe.prep_time = duration_from(node.get("prepTime"));
    recipe.cook_time = duration_from(node.get("cookTime"));
    recipe.image_url = image_from(node.get("image"));
    recipe.ingredients = ingredients;
    recipe.steps = steps;
    Some(recipe)
}

fn title_from(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(|name| decode_html_entities(name).trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNTITLED_RECIPE.to_string())
}

/// `image` can be a string, an array (first element wins), or an ImageObject
/// with a `url` field.
fn image_from(value: Option<&Value>) -> Option<String> {
    let mut value = value?;
    if let Value::Array(items) = value {
        value = items.first()?;
    }
    match value {
        Value::String(image) => non_empty(image),
        Value::Object(map) => map.get("url").and_then(Value::as_str).and_then(non_empty),
        _ => None,
    }
}

/// `recipeYield` can be a string, a bare number, or an array (first element
/// wins); whatever it is comes out stringified.
fn servings_from(value: Option<&Value>) -> Option<String> {
    let mut value = value?;
    if let Value::Array(items) = value {
        value = items.first()?;
    }
    match value {
        Value::String(servings) => non_empty(servings),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn duration_from(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(normalize_duration)
}

/// Flatten `recipeInstructions` into ordered step strings.
///
/// A single string splits on newlines. A list mixes plain strings, HowToStep
/// objects (their `text` field), and HowToSection objects whose
/// `itemListElement` items contribute their text one level deep.
fn normalize_instructions(value: Option<&Value>) -> Vec<String> {
    let mut steps = Vec::new();

    match value {
        Some(Value::String(text)) => {
            steps.extend(text.lines().map(str::trim).filter(|s| !s.is_empty()).map(String::from));
        }
        Some(Value::Array(items)) => {
            for item in items {
                match item {
                    Value::String(step) => push_step(&mut steps, step),
                    Value::Object(_) => {
                        if item.get("@type").and_then(Value::as_str) == Some("HowToSection") {
                            if let Some(Value::Array(section)) = item.get("itemListElement") {
                                for sub in section {
                                    match sub {
                                        Value::String(step) => push_step(&mut steps, step),
                                        _ => push_value_text(&mut steps, sub),
                                    }
                                }
                            }
                        } else {
                            push_value_text(&mut steps, item);
                        }
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }

    steps
}

fn push_step(steps: &mut Vec<String>, step: &str) {
    let step = step.trim();
    if !step.is_empty() {
        steps.push(step.to_string());
    }
}

fn push_value_text(steps: &mut Vec<String>, value: &Value) {
    if let Some(text) = value.get("text").and_then(Value::as_str) {
        push_step(steps, text);
    }
}

/// Convert an ISO 8601 `PT#H#M` duration to a compact human string ("1h 30m").
/// Anything that doesn't fit that shape passes through untouched; microdata
/// sites often put "10 mins" straight into the attribute.
fn normalize_duration(value: &str) -> String {
    let upper = value.to_uppercase();
    let Some(rest) = upper.strip_prefix("PT").or_else(|| upper.strip_prefix('P')) else {
        return value.to_string();
    };

    let mut rest = rest;
    let mut parts = Vec::new();

    if let Some(idx) = rest.find('H') {
        match rest[..idx].parse::<u32>() {
            Ok(hours) => {
                parts.push(format!("{hours}h"));
                rest = &rest[idx + 1..];
            }
            Err(_) => return value.to_string(),
        }
    }
    if let Some(idx) = rest.find('M') {
        match rest[..idx].parse::<u32>() {
            Ok(minutes) => parts.push(format!("{minutes}m")),
            Err(_) => return value.to_string(),
        }
    }

    if parts.is_empty() {
        value.to_string()
    } else {
        parts.join(" ")
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

// -- microdata --

fn extract_microdata(context: &ParsingContext) -> Option<Recipe> {
    let container = find_recipe_container(&context.document)?;

    let mut ingredients = itemprop_texts(container, "recipeIngredient");
    if ingredients.is_empty() {
        ingredients = itemprop_texts(container, "ingredients");
    }
    let mut steps = itemprop_texts(container, "recipeInstructions");
    if steps.is_empty() {
        steps = itemprop_texts(container, "instructions");
    }

    if ingredients.is_empty() && steps.is_empty() {
        return None;
    }

    let title = itemprop_text(container, "name")
        .map(|name| decode_html_entities(&name).trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNTITLED_RECIPE.to_string());

    let mut recipe = Recipe::new(title, &context.url);
    recipe.servings = itemprop_text(container, "recipeYield");
    recipe.prep_time = itemprop_duration(container, "prepTime");
    recipe.cook_time = itemprop_duration(container, "cookTime");
    recipe.image_url = itemprop_image(container);
    recipe.ingredients = ingredients;
    recipe.steps = steps;
    Some(recipe)
}

/// Scoping everything to an itemscope container whose itemtype names Recipe
/// avoids picking up unrelated itemprops elsewhere on the page.
fn find_recipe_container(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("[itemscope]").unwrap();
    document.select(&selector).find(|element| {
        element
            .value()
            .attr("itemtype")
            .is_some_and(|itemtype| itemtype.contains("Recipe"))
    })
}

fn itemprop_text(root: ElementRef, prop: &str) -> Option<String> {
    let selector = Selector::parse(&format!("[itemprop='{prop}']")).unwrap();
    root.select(&selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn itemprop_texts(root: ElementRef, prop: &str) -> Vec<String> {
    let selector = Selector::parse(&format!("[itemprop='{prop}']")).unwrap();
    root.select(&selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Times usually carry the machine-readable ISO value in a `datetime` or
/// `content` attribute; the element text is the fallback.
fn itemprop_duration(root: ElementRef, prop: &str) -> Option<String> {
    let selector = Selector::parse(&format!("[itemprop='{prop}']")).unwrap();
    let element = root.select(&selector).next()?;
    let raw = element
        .value()
        .attr("datetime")
        .or_else(|| element.value().attr("content"))
        .map(str::to_string)
        .unwrap_or_else(|| element_text(element));
    non_empty(&raw).map(|value| normalize_duration(&value))
}

fn itemprop_image(root: ElementRef) -> Option<String> {
    let selector = Selector::parse("[itemprop='image']").unwrap();
    let element = root.select(&selector).next()?;
    element
        .value()
        .attr("src")
        .or_else(|| element.value().attr("content"))
        .map(str::to_string)
        .or_else(|| non_empty(&element_text(element)))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ").trim().to_string()
}
