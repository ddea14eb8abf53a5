use crate::core::{Recipe, RecipeId};
use std::collections::BTreeMap;

#[allow(clippy::too_many_arguments)]
fn entry(
    name: &str,
    ingredients: &[&str],
    dietary: &str,
    difficulty: &str,
    cook_time: i64,
    servings: i64,
    nutrition: &[(&str, f64)],
    substitutions: &[(&str, &[&str])],
) -> Recipe {
    Recipe {
        id: RecipeId(0), // assigned by the database on insert
        name: name.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        dietary: dietary.to_string(),
        difficulty: difficulty.to_string(),
        cook_time,
        servings,
        nutrition: nutrition
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect::<BTreeMap<_, _>>(),
        substitutions: substitutions
            .iter()
            .map(|(k, alts)| (k.to_string(), alts.iter().map(|a| a.to_string()).collect()))
            .collect::<BTreeMap<_, _>>(),
        rating: 0.0,
        rating_count: 0,
    }
}

// Starter catalog for a fresh install, so the first search has something to
// chew on. Nutrition values correspond to the listed serving count.
pub fn starter_catalog() -> Vec<Recipe> {
    vec![
        entry(
            "Chicken Fried Rice",
            &["chicken breast", "rice", "eggs", "soy sauce", "green onions"],
            "",
            "easy",
            25,
            2,
            &[
                ("calories", 520.0),
                ("protein_g", 34.0),
                ("carbs_g", 58.0),
                ("fat_g", 14.0),
            ],
            &[
                ("chicken breast", &["tofu", "shrimp"]),
                ("soy sauce", &["tamari", "coconut aminos"]),
            ],
        ),
        entry(
            "Vegetable Stir Fry",
            &["broccoli", "carrots", "bell peppers", "soy sauce", "garlic", "ginger"],
            "vegan",
            "easy",
            15,
            2,
            &[
                ("calories", 210.0),
                ("protein_g", 7.0),
                ("carbs_g", 32.0),
                ("fat_g", 6.0),
            ],
            &[("soy sauce", &["tamari"]), ("ginger", &["ground ginger"])],
        ),
        entry(
            "Margherita Pizza",
            &["pizza dough", "tomatoes", "mozzarella", "basil", "olive oil"],
            "vegetarian",
            "medium",
            30,
            4,
            &[
                ("calories", 680.0),
                ("protein_g", 28.0),
                ("carbs_g", 84.0),
                ("fat_g", 24.0),
            ],
            &[("mozzarella", &["provolone", "vegan mozzarella"])],
        ),
        entry(
            "Beef Stew",
            &["beef chuck", "potatoes", "carrots", "onions", "beef broth", "red wine"],
            "",
            "hard",
            150,
            6,
            &[
                ("calories", 540.0),
                ("protein_g", 38.0),
                ("carbs_g", 36.0),
                ("fat_g", 22.0),
            ],
            &[
                ("red wine", &["extra beef broth", "grape juice"]),
                ("beef chuck", &["lamb shoulder"]),
            ],
        ),
        entry(
            "Lentil Curry",
            &["red lentils", "coconut milk", "onions", "garlic", "curry powder", "tomatoes"],
            "vegan",
            "easy",
            35,
            4,
            &[
                ("calories", 380.0),
                ("protein_g", 16.0),
                ("carbs_g", 48.0),
                ("fat_g", 14.0),
            ],
            &[("coconut milk", &["cashew cream"]), ("red lentils", &["yellow lentils"])],
        ),
        entry(
            "Spaghetti Carbonara",
            &["spaghetti", "eggs", "bacon", "parmesan", "black pepper"],
            "",
            "medium",
            25,
            2,
            &[
                ("calories", 760.0),
                ("protein_g", 32.0),
                ("carbs_g", 82.0),
                ("fat_g", 32.0),
            ],
            &[("bacon", &["pancetta", "smoked tofu"]), ("parmesan", &["pecorino"])],
        ),
        entry(
            "Greek Salad",
            &["cucumbers", "tomatoes", "feta", "olives", "red onions", "olive oil"],
            "vegetarian",
            "easy",
            10,
            2,
            &[
                ("calories", 320.0),
                ("protein_g", 9.0),
                ("carbs_g", 14.0),
                ("fat_g", 26.0),
            ],
            &[("feta", &["goat cheese", "vegan feta"])],
        ),
        entry(
            "Mushroom Risotto",
            &["arborio rice", "mushrooms", "onions", "white wine", "parmesan", "vegetable broth"],
            "vegetarian",
            "hard",
            45,
            4,
            &[
                ("calories", 480.0),
                ("protein_g", 14.0),
                ("carbs_g", 68.0),
                ("fat_g", 16.0),
            ],
            &[
                ("white wine", &["extra vegetable broth"]),
                ("arborio rice", &["carnaroli rice"]),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_recipes_are_well_formed() {
        let catalog = starter_catalog();
        assert!(!catalog.is_empty());

        for recipe in &catalog {
            assert!(!recipe.name.is_empty());
            assert!(!recipe.ingredients.is_empty());
            assert!(recipe.servings > 0);
            assert!(recipe.cook_time > 0);
            assert!(matches!(
                recipe.difficulty.as_str(),
                "easy" | "medium" | "hard"
            ));
        }
    }

    #[test]
    fn substitutions_reference_real_ingredients() {
        for recipe in starter_catalog() {
            for ingredient in recipe.substitutions.keys() {
                assert!(
                    recipe.ingredients.iter().any(|i| i == ingredient),
                    "'{}' lists a substitution for '{}' it does not use",
                    recipe.name,
                    ingredient
                );
            }
        }
    }
}
