use crate::core::{
    round_tenth, LarderError, Recipe, ScoredRecipe, SearchQuery, SearchReport, MAX_RESULTS,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use owo_colors::OwoColorize;

pub struct SearchEngine;

impl SearchEngine {
    // Full pantry-match pipeline: normalize -> filter -> score -> rank -> adjust.
    // Pure over the catalog snapshot; callers load the catalog fresh per call.
    pub fn search(catalog: Vec<Recipe>, query: &SearchQuery) -> Result<SearchReport, LarderError> {
        let pantry = normalize(&query.ingredients)?;

        let filtered = filter_catalog(catalog, query);
        let total_filtered = filtered.len();

        let scored: Vec<ScoredRecipe> = filtered
            .into_iter()
            .filter_map(|recipe| score(recipe, &pantry))
            .collect();
        let total_scored = scored.len();

        let mut results = rank(scored);
        let warnings = adjust_servings(&mut results, query.servings);

        Ok(SearchReport {
            results,
            total_filtered,
            total_scored,
            warnings,
        })
    }

    // Browse the catalog by name, best match first. Display-only: the pantry
    // scoring above never goes through this path.
    pub fn browse(query: Option<&str>, catalog: &[Recipe]) {
        println!("{}", "RECIPE CATALOG".bold().underline());

        let listing: Vec<&Recipe> = match query {
            None => catalog.iter().collect(),
            Some(text) => {
                let matcher = SkimMatcherV2::default();
                let mut hits = Vec::new();

                for recipe in catalog {
                    if let Some(relevance) = matcher.fuzzy_match(&recipe.name, text) {
                        hits.push((relevance, recipe));
                    }
                }

                hits.sort_by(|a, b| b.0.cmp(&a.0));
                hits.into_iter().map(|(_, r)| r).collect()
            }
        };

        if listing.is_empty() {
            println!("No recipes found matching '{}'", query.unwrap_or(""));
        } else {
            for recipe in listing {
                let tag = if recipe.dietary.is_empty() {
                    "any diet".to_string()
                } else {
                    recipe.dietary.clone()
                };
                println!(
                    "{} - {}, {}, {} min",
                    recipe.name.green().bold(),
                    tag,
                    recipe.difficulty,
                    recipe.cook_time
                );
            }
        }
        println!();
    }
}

// Lowercase and trim the pantry entries, dropping anything that ends up empty.
// A pantry with nothing usable in it rejects the search before the catalog is
// ever touched.
pub fn normalize(raw: &[String]) -> Result<Vec<String>, LarderError> {
    let pantry: Vec<String> = raw
        .iter()
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect();

    if pantry.is_empty() {
        return Err(LarderError::InvalidInput(
            "Please enter at least one ingredient.".to_string(),
        ));
    }

    Ok(pantry)
}

// easy < medium < hard; anything unrecognized counts as medium.
fn difficulty_rank(label: &str) -> u8 {
    match label {
        "easy" => 1,
        "medium" => 2,
        "hard" => 3,
        _ => 2,
    }
}

// Drop recipes violating the dietary / difficulty / time constraints before
// any scoring happens. An empty survivor list is a valid outcome.
pub fn filter_catalog(catalog: Vec<Recipe>, query: &SearchQuery) -> Vec<Recipe> {
    catalog
        .into_iter()
        .filter(|recipe| {
            // Dietary tags match exactly or not at all (no substring logic here).
            if !query.dietary.is_empty() && recipe.dietary != query.dietary {
                return false;
            }

            if !query.difficulty.is_empty() {
                // Unknown filter values rank hardest, so they exclude nothing.
                let ceiling = match query.difficulty.as_str() {
                    "easy" => 1,
                    "medium" => 2,
                    "hard" => 3,
                    _ => 3,
                };
                if difficulty_rank(&recipe.difficulty) > ceiling {
                    return false;
                }
            }

            recipe.cook_time <= query.max_time
        })
        .collect()
}

// Overlap scoring. A recipe ingredient counts as matched when any pantry item
// contains it or is contained by it, so "chicken" covers "chicken breast" and
// "tomatoes" covers "tomato". The inner search stops at the first hit. A
// pantry item is never consumed by a match: one item may satisfy several
// recipe ingredients, and matched_count counts recipe ingredients.
pub fn score(recipe: Recipe, pantry: &[String]) -> Option<ScoredRecipe> {
    let needed: Vec<String> = recipe
        .ingredients
        .iter()
        .map(|item| item.to_lowercase())
        .collect();
    let total = needed.len();
    if total == 0 {
        return None;
    }

    let mut matched = 0;
    let mut missing = Vec::new();

    for item in &needed {
        let found = pantry
            .iter()
            .any(|have| item.contains(have.as_str()) || have.contains(item.as_str()));
        if found {
            matched += 1;
        } else {
            missing.push(item.clone());
        }
    }

    if matched == 0 {
        return None;
    }

    Some(ScoredRecipe {
        match_score: round_tenth(matched as f64 / total as f64 * 100.0),
        matched_count: matched,
        total_ingredients: total,
        missing_ingredients: missing,
        serving_ratio: None,
        recipe,
    })
}

// Highest score first; the stable sort keeps catalog scan order among equal
// scores, so ties reproduce deterministically. Top 5 survive.
pub fn rank(mut scored: Vec<ScoredRecipe>) -> Vec<ScoredRecipe> {
    scored.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    scored.truncate(MAX_RESULTS);
    scored
}

// Rescale nutrition to the requested table size. Each result is adjusted from
// its stored base servings, never from an already-adjusted value. A recipe
// with a non-positive base is left untouched and flagged, not fatal.
pub fn adjust_servings(results: &mut [ScoredRecipe], requested: i64) -> Vec<String> {
    let mut warnings = Vec::new();
    if requested <= 0 {
        return warnings;
    }

    for entry in results.iter_mut() {
        if entry.recipe.servings <= 0 {
            warnings.push(format!(
                "'{}' has invalid base servings ({}); nutrition left unadjusted",
                entry.recipe.name, entry.recipe.servings
            ));
            continue;
        }

        let ratio = requested as f64 / entry.recipe.servings as f64;
        for value in entry.recipe.nutrition.values_mut() {
            *value = round_tenth(*value * ratio);
        }
        entry.recipe.servings = requested;
        entry.serving_ratio = Some(ratio);
    }

    warnings
}
