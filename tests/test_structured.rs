//! Tier 1 structured-data extraction: JSON-LD and microdata.

use recipe_distill::extractors::{Extractor, ParsingContext, StructuredDataExtractor};
use recipe_distill::Recipe;

const URL: &str = "https://example.com/recipe";

fn extract(html: &str) -> Option<Recipe> {
    let context = ParsingContext::new(URL, html);
    StructuredDataExtractor.extract(&context)
}

fn jsonld_document(json_ld: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<script type="application/ld+json">
{json_ld}
</script>
</head>
<body></body>
</html>"#
    )
}

#[test]
fn extracts_basic_recipe() {
    let html = jsonld_document(
        r#"{
            "@context": "https://schema.org",
            "@type": "Recipe",
            "name": "Test Cookies",
            "recipeIngredient": ["1 cup flour", "1/2 cup sugar", "2 eggs"],
            "recipeInstructions": [
                {"@type": "HowToStep", "text": "Mix flour and sugar."},
                {"@type": "HowToStep", "text": "Add eggs and stir."},
                {"@type": "HowToStep", "text": "Bake at 350F for 12 minutes."}
            ],
            "prepTime": "PT10M",
            "cookTime": "PT12M",
            "recipeYield": "24 cookies",
            "image": "https://example.com/cookies.jpg"
        }"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(recipe.title, "Test Cookies");
    assert_eq!(recipe.source_url, URL);
    assert_eq!(
        recipe.ingredients,
        vec!["1 cup flour", "1/2 cup sugar", "2 eggs"]
    );
    assert_eq!(recipe.steps.len(), 3);
    assert_eq!(recipe.steps[0], "Mix flour and sugar.");
    assert_eq!(recipe.steps[2], "Bake at 350F for 12 minutes.");
    assert_eq!(recipe.prep_time.as_deref(), Some("10m"));
    assert_eq!(recipe.cook_time.as_deref(), Some("12m"));
    assert_eq!(recipe.servings.as_deref(), Some("24 cookies"));
    assert_eq!(
        recipe.image_url.as_deref(),
        Some("https://example.com/cookies.jpg")
    );
}

#[test]
fn finds_recipe_inside_graph() {
    let html = jsonld_document(
        r#"{
            "@context": "https://schema.org",
            "@graph": [
                {"@type": "WebPage", "name": "Blog Post"},
                {
                    "@type": "Recipe",
                    "name": "Graph Soup",
                    "recipeIngredient": ["water", "salt"],
                    "recipeInstructions": "Boil water.\nAdd salt."
                }
            ]
        }"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(recipe.title, "Graph Soup");
    assert_eq!(recipe.ingredients, vec!["water", "salt"]);
}

#[test]
fn finds_recipe_in_top_level_array() {
    let html = jsonld_document(
        r#"[
            {"@type": "WebSite", "name": "Recipe Website"},
            {
                "@type": "Recipe",
                "name": "Array Pasta",
                "recipeIngredient": ["spaghetti"],
                "recipeInstructions": [{"@type": "HowToStep", "text": "Cook pasta."}]
            }
        ]"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(recipe.title, "Array Pasta");
}

#[test]
fn splits_string_instructions_on_newlines() {
    let html = jsonld_document(
        r#"{
            "@type": "Recipe",
            "name": "Simple Toast",
            "recipeIngredient": ["bread", "butter"],
            "recipeInstructions": "Toast the bread.\nSpread butter on top."
        }"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(
        recipe.steps,
        vec!["Toast the bread.", "Spread butter on top."]
    );
}

#[test]
fn flattens_howto_sections_in_place() {
    let html = jsonld_document(
        r#"{
            "@type": "Recipe",
            "name": "Sectioned Recipe",
            "recipeIngredient": ["flour", "water"],
            "recipeInstructions": [
                {
                    "@type": "HowToSection",
                    "name": "Prep",
                    "itemListElement": [
                        {"@type": "HowToStep", "text": "Measure flour."},
                        {"@type": "HowToStep", "text": "Boil water."}
                    ]
                },
                {"@type": "HowToStep", "text": "Combine."}
            ]
        }"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(recipe.steps, vec!["Measure flour.", "Boil water.", "Combine."]);
}

#[test]
fn plain_string_list_instructions() {
    let html = jsonld_document(
        r#"{
            "@type": "Recipe",
            "name": "List Recipe",
            "recipeIngredient": ["a"],
            "recipeInstructions": ["Do this.", "  Do that.  ", ""]
        }"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(recipe.steps, vec!["Do this.", "Do that."]);
}

#[test]
fn image_as_list_takes_first() {
    let html = jsonld_document(
        r#"{
            "@type": "Recipe",
            "name": "Image List Recipe",
            "recipeIngredient": ["a", "b"],
            "recipeInstructions": [{"@type": "HowToStep", "text": "Do it."}],
            "image": ["https://example.com/first.jpg", "https://example.com/second.jpg"]
        }"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(
        recipe.image_url.as_deref(),
        Some("https://example.com/first.jpg")
    );
}

#[test]
fn image_as_object_takes_url_field() {
    let html = jsonld_document(
        r#"{
            "@type": "Recipe",
            "name": "Image Object Recipe",
            "recipeIngredient": ["a"],
            "recipeInstructions": [{"@type": "HowToStep", "text": "Do it."}],
            "image": {"@type": "ImageObject", "url": "https://example.com/photo.jpg"}
        }"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(
        recipe.image_url.as_deref(),
        Some("https://example.com/photo.jpg")
    );
}

#[test]
fn type_as_list_still_matches() {
    let html = jsonld_document(
        r#"{
            "@type": ["Recipe", "HowTo"],
            "name": "Multi-Type Recipe",
            "recipeIngredient": ["a"],
            "recipeInstructions": [{"@type": "HowToStep", "text": "Do it."}]
        }"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(recipe.title, "Multi-Type Recipe");
}

#[test]
fn yield_as_list_takes_first() {
    let html = jsonld_document(
        r#"{
            "@type": "Recipe",
            "name": "Yield List Recipe",
            "recipeIngredient": ["a"],
            "recipeInstructions": [{"@type": "HowToStep", "text": "Do it."}],
            "recipeYield": ["4 servings", "4"]
        }"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(recipe.servings.as_deref(), Some("4 servings"));
}

#[test]
fn numeric_yield_is_stringified() {
    let html = jsonld_document(
        r#"{
            "@type": "Recipe",
            "name": "Numeric Yield",
            "recipeIngredient": ["a"],
            "recipeInstructions": [{"@type": "HowToStep", "text": "Do it."}],
            "recipeYield": 6
        }"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(recipe.servings.as_deref(), Some("6"));
}

#[test]
fn missing_name_gets_placeholder_title() {
    let html = jsonld_document(
        r#"{
            "@type": "Recipe",
            "recipeIngredient": ["a"],
            "recipeInstructions": [{"@type": "HowToStep", "text": "Do it."}]
        }"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(recipe.title, "Untitled Recipe");
}

#[test]
fn title_entities_are_decoded() {
    let html = jsonld_document(
        r#"{
            "@type": "Recipe",
            "name": "Mac &amp; Cheese ",
            "recipeIngredient": ["macaroni", "cheese"],
            "recipeInstructions": [{"@type": "HowToStep", "text": "Combine."}]
        }"#,
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(recipe.title, "Mac & Cheese");
}

#[test]
fn empty_ingredients_and_steps_is_no_result() {
    let html = jsonld_document(
        r#"{
            "@type": "Recipe",
            "name": "Empty Recipe",
            "recipeIngredient": [],
            "recipeInstructions": []
        }"#,
    );

    assert!(extract(&html).is_none());
}

#[test]
fn page_without_structured_data_is_no_result() {
    let html = r#"<html><head><title>Just a Blog</title></head>
        <body><p>No recipe here.</p></body></html>"#;
    assert!(extract(html).is_none());
}

#[test]
fn malformed_json_ld_is_skipped_not_fatal() {
    let html = format!(
        r#"<html><head>
        <script type="application/ld+json">{{not valid json</script>
        <script type="application/ld+json">
        {{
            "@type": "Recipe",
            "name": "Second Block Wins",
            "recipeIngredient": ["a"],
            "recipeInstructions": [{{"@type": "HowToStep", "text": "Do it."}}]
        }}
        </script>
        </head><body></body></html>"#
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(recipe.title, "Second Block Wins");
}

// -- Microdata fallback --

const MICRODATA_HTML: &str = r#"
<html>
<body>
<div itemscope itemtype="http://schema.org/Recipe">
    <h1 itemprop="name">Banana Bread</h1>
    <img itemprop="image" src="https://example.com/banana.jpg" />
    <span itemprop="recipeYield">12 servings</span>
    <time itemprop="prepTime" datetime="PT10M">10 mins</time>
    <time itemprop="cookTime" datetime="PT1H">1 hour</time>
    <ul>
        <li itemprop="recipeIngredient">3 ripe bananas</li>
        <li itemprop="recipeIngredient">2 cups flour</li>
    </ul>
    <ol>
        <li itemprop="recipeInstructions">Mash the bananas.</li>
        <li itemprop="recipeInstructions">Mix and bake.</li>
    </ol>
</div>
</body>
</html>
"#;

#[test]
fn extracts_microdata_recipe() {
    let recipe = extract(MICRODATA_HTML).unwrap();
    assert_eq!(recipe.title, "Banana Bread");
    assert_eq!(recipe.ingredients, vec!["3 ripe bananas", "2 cups flour"]);
    assert_eq!(recipe.steps, vec!["Mash the bananas.", "Mix and bake."]);
    assert_eq!(recipe.servings.as_deref(), Some("12 servings"));
    assert_eq!(recipe.prep_time.as_deref(), Some("10m"));
    assert_eq!(recipe.cook_time.as_deref(), Some("1h"));
    assert_eq!(
        recipe.image_url.as_deref(),
        Some("https://example.com/banana.jpg")
    );
}

#[test]
fn microdata_legacy_ingredients_prop() {
    let html = r#"
    <html><body>
    <div itemscope itemtype="https://schema.org/Recipe">
        <span itemprop="name">Old Markup</span>
        <span itemprop="ingredients">salt</span>
        <span itemprop="ingredients">pepper</span>
        <p itemprop="instructions">Season to taste.</p>
    </div>
    </body></html>
    "#;

    let recipe = extract(html).unwrap();
    assert_eq!(recipe.ingredients, vec!["salt", "pepper"]);
    assert_eq!(recipe.steps, vec!["Season to taste."]);
}

#[test]
fn json_ld_is_preferred_over_microdata() {
    let html = format!(
        r#"<html><head>
        <script type="application/ld+json">
        {{
            "@type": "Recipe",
            "name": "From JSON-LD",
            "recipeIngredient": ["a"],
            "recipeInstructions": [{{"@type": "HowToStep", "text": "Do it."}}]
        }}
        </script>
        </head>
        <body>
        <div itemscope itemtype="http://schema.org/Recipe">
            <span itemprop="name">From Microdata</span>
            <span itemprop="recipeIngredient">b</span>
        </div>
        </body></html>"#
    );

    let recipe = extract(&html).unwrap();
    assert_eq!(recipe.title, "From JSON-LD");
}
