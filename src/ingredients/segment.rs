//! Default rule-based ingredient segmenter.
//!
//! Stands in for an external NLP segmentation service: good enough for the
//! common shapes of English ingredient lines (quantities, fractions, ranges,
//! units, trailing preparation notes), and honest about its limits: anything
//! it can't place lands in the name. It always returns `Ok`; the trait's
//! error path exists for external segmenters.

use lazy_static::lazy_static;
use regex::Regex;

use super::{AmountCandidate, SegmentError, Segmentation, Segmenter};

lazy_static! {
    static ref PARENTHETICAL: Regex = Regex::new(r"\(([^)]*)\)").unwrap();
    static ref TO_TASTE: Regex = Regex::new(r"(?i)[,\s]*\bto taste\s*$").unwrap();
    static ref RANGE: Regex =
        Regex::new(r"^(\d+(?:\.\d+)?|\d+/\d+)[-–—](\d+(?:\.\d+)?|\d+/\d+)$").unwrap();
}

/// Words that qualify a quantity without being one ("Heaping 1/3 cup").
const MODIFIER_WORDS: &[&str] = &[
    "heaping", "heaped", "scant", "generous", "rounded", "level", "about", "approximately",
    "approx", "roughly",
];

/// Comma-suffix words that mark a preparation note rather than a comment.
const PREP_WORDS: &[&str] = &[
    "diced", "minced", "chopped", "sliced", "melted", "softened", "divided", "beaten", "peeled",
    "grated", "shredded", "crushed", "drained", "rinsed", "cubed", "julienned", "trimmed",
    "halved", "quartered", "thawed", "toasted", "sifted", "packed", "sieved", "zested", "juiced",
];

/// Spelled-out units, matched singular or plural and emitted singular.
const WORD_UNITS: &[&str] = &[
    "cup", "tablespoon", "teaspoon", "ounce", "pound", "gram", "kilogram", "milliliter",
    "millilitre", "liter", "litre", "pinch", "dash", "clove", "can", "jar", "package", "packet",
    "slice", "stick", "bunch", "head", "sprig", "stalk", "piece", "quart", "pint", "gallon",
];

/// Abbreviated units, emitted as written so the enrichment lookup decides the
/// canonical form.
const ABBREV_UNITS: &[&str] = &[
    "tbsp", "tbsps", "tbs", "tsp", "tsps", "oz", "lb", "lbs", "g", "kg", "mg", "ml", "l", "qt",
    "pt",
];

pub struct RuleSegmenter;

impl Segmenter for RuleSegmenter {
    fn segment(&self, raw: &str) -> Result<Segmentation, SegmentError> {
        Ok(segment_line(raw))
    }
}

fn segment_line(raw: &str) -> Segmentation {
    let mut comments: Vec<String> = Vec::new();
    let mut preparation: Option<String> = None;

    // Parentheticals are asides: "(14 oz)", "(optional)".
    let mut text = PARENTHETICAL
        .replace_all(raw, |caps: &regex::Captures| {
            let inner = caps[1].trim();
            if !inner.is_empty() {
                comments.push(inner.to_string());
            }
            " ".to_string()
        })
        .into_owned();

    if TO_TASTE.is_match(&text) {
        text = TO_TASTE.replace(&text, "").into_owned();
        comments.push("to taste".to_string());
    }

    // Everything after the first comma is a trailing note: preparation if it
    // reads like one, otherwise a comment.
    let head = match text.find(',') {
        Some(idx) => {
            let tail = text[idx + 1..].trim();
            if !tail.is_empty() {
                if is_preparation(tail) {
                    preparation = Some(tail.to_string());
                } else {
                    comments.push(tail.to_string());
                }
            }
            text[..idx].to_string()
        }
        None => text,
    };

    let tokens: Vec<&str> = head.split_whitespace().collect();
    let mut amounts: Vec<AmountCandidate> = Vec::new();
    let mut name_tokens: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];

        if MODIFIER_WORDS.contains(&token.to_lowercase().as_str()) {
            amounts.push(AmountCandidate::default());
            i += 1;
            continue;
        }

        if let Some((quantity, quantity_max, range, consumed)) = parse_quantity(&tokens[i..]) {
            i += consumed;
            let mut unit = None;
            if let Some(found) = tokens.get(i).and_then(|t| unit_of(t)) {
                unit = Some(found);
                i += 1;
                // "2 cups of flour": the "of" belongs to neither unit nor name
                if tokens.get(i).is_some_and(|t| t.eq_ignore_ascii_case("of")) {
                    i += 1;
                }
            }
            amounts.push(AmountCandidate {
                quantity: Some(quantity),
                quantity_max,
                range,
                unit,
            });
            continue;
        }

        name_tokens.push(token);
        i += 1;
    }

    let name = name_tokens.join(" ");
    let name_parts: Vec<String> = name
        .split(" and ")
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect();

    Segmentation {
        amounts,
        name_parts,
        preparation,
        comment: if comments.is_empty() {
            None
        } else {
            Some(comments.join(", "))
        },
    }
}

fn is_preparation(tail: &str) -> bool {
    let mut words = tail.split_whitespace().map(|w| w.to_lowercase());
    let first_ends_in_ed = tail
        .split_whitespace()
        .next()
        .is_some_and(|w| w.to_lowercase().ends_with("ed"));
    first_ends_in_ed || words.any(|w| PREP_WORDS.contains(&w.as_str()))
}

/// Parse a quantity starting at `tokens[0]`. Returns the value, the range
/// upper bound, the range flag, and how many tokens were consumed.
fn parse_quantity(tokens: &[&str]) -> Option<(f64, Option<f64>, bool, usize)> {
    let first = *tokens.first()?;

    // "2-3" in one token
    if let Some(caps) = RANGE.captures(first) {
        let low = parse_numeric(&caps[1])?;
        let high = parse_numeric(&caps[2])?;
        return Some((low, Some(high), true, 1));
    }

    let low = parse_numeric(first)?;

    // "2 to 3"
    if tokens.len() >= 3 && tokens[1].eq_ignore_ascii_case("to") {
        if let Some(high) = parse_numeric(tokens[2]) {
            return Some((low, Some(high), true, 3));
        }
    }

    // mixed number: "1 1/2"
    if low.fract() == 0.0 {
        if let Some(frac) = tokens.get(1).and_then(|t| parse_fraction(t)) {
            return Some((low + frac, None, false, 2));
        }
    }

    Some((low, None, false, 1))
}

fn parse_numeric(token: &str) -> Option<f64> {
    if let Some(value) = parse_fraction(token) {
        return Some(value);
    }
    // "1½": integer with a glued vulgar fraction
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    if !digits.is_empty() {
        if let Some(frac) = vulgar_fraction(&token[digits.len()..]) {
            return Some(digits.parse::<f64>().ok()? + frac);
        }
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

fn parse_fraction(token: &str) -> Option<f64> {
    if let Some(value) = vulgar_fraction(token) {
        return Some(value);
    }
    let (numerator, denominator) = token.split_once('/')?;
    let numerator: f64 = numerator.parse().ok()?;
    let denominator: f64 = denominator.parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

fn vulgar_fraction(token: &str) -> Option<f64> {
    Some(match token {
        "½" => 0.5,
        "⅓" => 1.0 / 3.0,
        "⅔" => 2.0 / 3.0,
        "¼" => 0.25,
        "¾" => 0.75,
        "⅕" => 0.2,
        "⅖" => 0.4,
        "⅗" => 0.6,
        "⅘" => 0.8,
        "⅙" => 1.0 / 6.0,
        "⅚" => 5.0 / 6.0,
        "⅛" => 0.125,
        "⅜" => 0.375,
        "⅝" => 0.625,
        "⅞" => 0.875,
        _ => return None,
    })
}

fn unit_of(token: &str) -> Option<String> {
    let trimmed = token.trim_end_matches(['.', ',']);
    let lower = trimmed.to_lowercase();

    for unit in WORD_UNITS {
        if lower == *unit {
            return Some((*unit).to_string());
        }
        if let Some(stem) = lower.strip_suffix("es") {
            if stem == *unit {
                return Some((*unit).to_string());
            }
        }
        if let Some(stem) = lower.strip_suffix('s') {
            if stem == *unit {
                return Some((*unit).to_string());
            }
        }
    }

    if ABBREV_UNITS.contains(&lower.as_str()) {
        return Some(trimmed.to_string());
    }

    None
}
