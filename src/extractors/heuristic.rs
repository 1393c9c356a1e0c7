//! Tier 3: label-and-list scanning for pages with no machine-readable markup.
//!
//! Finds an "Ingredients"-style or "Directions"-style label in a heading or
//! bold run, then harvests the nearest following `<ul>`/`<ol>`. Inherently
//! fuzzy; it only runs when the structured tiers have declined.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::extractors::{Extractor, ParsingContext};
use crate::model::{Recipe, UNTITLED_RECIPE};

lazy_static! {
    static ref INGREDIENT_LABEL: Regex = Regex::new(r"(?i)ingredients\s*:?").unwrap();
    static ref INSTRUCTION_LABEL: Regex =
        Regex::new(r"(?i)(?:instructions|directions|steps|method)\s*:?").unwrap();
    // Site-name suffixes look like "Best Pancakes — My Food Blog". The
    // separator must be surrounded by whitespace so hyphenated dish names
    // ("One-Pot Pasta") survive intact.
    static ref TITLE_SEPARATOR: Regex = Regex::new(r"\s+[—–|-]\s+").unwrap();
}

pub struct HeuristicExtractor;

impl Extractor for HeuristicExtractor {
    fn extract(&self, context: &ParsingContext) -> Option<Recipe> {
        let document = &context.document;

        let ingredients = find_list_after_label(document, &INGREDIENT_LABEL);
        let steps = find_list_after_label(document, &INSTRUCTION_LABEL);
        debug!(
            "heuristic found {} ingredients, {} steps",
            ingredients.len(),
            steps.len()
        );

        if ingredients.is_empty() && steps.is_empty() {
            return None;
        }

        let mut recipe = Recipe::new(extract_title(document), &context.url);
        recipe.ingredients = ingredients;
        recipe.steps = steps;
        Some(recipe)
    }
}

/// Scan heading and bold elements in document order for a label matching
/// `pattern`, then collect the direct `<li>` texts of the nearest following
/// list. A label whose following list has no items doesn't end the search;
/// the next matching label gets a turn.
fn find_list_after_label(document: &Html, pattern: &Regex) -> Vec<String> {
    let labels = Selector::parse("h1, h2, h3, h4, h5, h6, strong, b").unwrap();

    for label in document.select(&labels) {
        if !pattern.is_match(&element_text(label)) {
            continue;
        }

        // A label wrapped as <p><strong>Ingredients:</strong></p> has its list
        // after the paragraph, not after the inline element.
        let start_id = match label.parent().and_then(ElementRef::wrap) {
            Some(parent) if parent.value().name() == "p" => parent.id(),
            _ => label.id(),
        };

        let mut past_label = false;
        for node in document.root_element().descendants() {
            if node.id() == start_id {
                past_label = true;
                continue;
            }
            if !past_label {
                continue;
            }
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            if !matches!(element.value().name(), "ul" | "ol") {
                continue;
            }

            let items: Vec<String> = element
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name() == "li")
                .map(element_text)
                .filter(|item| !item.is_empty())
                .collect();
            if !items.is_empty() {
                return items;
            }
            break;
        }
    }

    Vec::new()
}

/// Title resolution, independent of list extraction: og:title, then the
/// `<title>` text with any trailing site-name suffix stripped, then the first
/// `<h1>`, then the placeholder.
fn extract_title(document: &Html) -> String {
    let og_title = Selector::parse(r#"meta[property="og:title"]"#).unwrap();
    if let Some(meta) = document.select(&og_title).next() {
        if let Some(content) = meta.value().attr("content") {
            let content = content.trim();
            if !content.is_empty() {
                return content.to_string();
            }
        }
    }

    let title = Selector::parse("title").unwrap();
    if let Some(element) = document.select(&title).next() {
        let text = strip_site_suffix(&element_text(element));
        if !text.is_empty() {
            return text;
        }
    }

    let h1 = Selector::parse("h1").unwrap();
    if let Some(element) = document.select(&h1).next() {
        let text = element_text(element);
        if !text.is_empty() {
            return text;
        }
    }

    UNTITLED_RECIPE.to_string()
}

/// Keep the part before the last whitespace-surrounded dash/pipe separator.
fn strip_site_suffix(title: &str) -> String {
    match TITLE_SEPARATOR.find_iter(title).last() {
        Some(separator) => title[..separator.start()].trim().to_string(),
        None => title.trim().to_string(),
    }
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ").trim().to_string()
}
