use std::fmt::Write;

use crate::model::Recipe;
use crate::state::{BrowserState, Phase};

const MAX_STARS: usize = 5;

/// Rating as a row of stars followed by the value with one decimal,
/// e.g. `⭐⭐⭐⭐⭐ (4.6)`.
pub fn rating(value: f64) -> String {
    let stars = if value.is_finite() {
        (value.round().max(0.0) as usize).min(MAX_STARS)
    } else {
        0
    };
    format!("{} ({:.1})", "⭐".repeat(stars), value)
}

/// Summary card for a recipe in the grid
pub fn card(recipe: &Recipe) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", recipe.id, recipe.name);
    if !recipe.meal_type.is_empty() {
        let _ = writeln!(out, "    Type: {}", recipe.meal_type.join(", "));
    }
    let _ = writeln!(
        out,
        "    Prep: {} min | Cook: {} min | Total: {} min",
        recipe.prep_time_minutes,
        recipe.cook_time_minutes,
        recipe.total_time_minutes()
    );
    let _ = writeln!(
        out,
        "    Servings: {} | Kcal/serving: {} | Difficulty: {}",
        recipe.servings, recipe.calories_per_serving, recipe.difficulty
    );
    let _ = write!(out, "    Rating: {}", rating(recipe.rating));
    out
}

/// Full detail view for the selected recipe
pub fn detail(recipe: &Recipe) -> String {
    let mut out = card(recipe);
    out.push('\n');
    if !recipe.cuisine.is_empty() {
        let _ = writeln!(out, "    Cuisine: {}", recipe.cuisine);
    }
    if !recipe.tags.is_empty() {
        let _ = writeln!(out, "    Tags: {}", recipe.tags.join(", "));
    }
    if !recipe.image.is_empty() {
        let _ = writeln!(out, "    Image: {}", recipe.image);
    }

    let _ = writeln!(out, "\nIngredients:");
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "  - {}", ingredient);
    }

    let _ = writeln!(out, "\nInstructions:");
    for (i, step) in recipe.instructions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step);
    }
    out
}

/// Render the whole browser: status line, cards and the selected recipe.
pub fn screen(state: &BrowserState) -> String {
    let mut out = String::new();
    let query = state.query();
    let features = state.settings().features;

    let mut status = Vec::new();
    if features.search && !query.search().trim().is_empty() {
        status.push(format!("search \"{}\"", query.search().trim()));
    }
    if features.sort {
        status.push(format!("sort {} {}", query.sort_field(), query.sort_order()));
    }
    if features.pagination {
        status.push(format!("page {}", query.page() + 1));
    }
    if !status.is_empty() {
        let _ = writeln!(out, "== {} ==", status.join(" | "));
    }

    match state.phase() {
        Phase::Idle => {}
        Phase::Loading => {
            let _ = writeln!(out, "Loading recipes...");
        }
        Phase::Failed => {
            let _ = writeln!(out, "{}", state.error().unwrap_or_default());
        }
        Phase::Loaded if state.recipes().is_empty() => {
            let _ = writeln!(out, "No recipes found.");
        }
        Phase::Loaded => {}
    }

    if !state.is_loading() {
        for recipe in state.recipes() {
            let _ = writeln!(out, "{}\n", card(recipe));
        }
        let result = state.result();
        if let Some(total) = result.total {
            let _ = write!(out, "Showing up to {} of {} recipes", result.shown_to(), total);
            if features.pagination && result.has_more() == Some(true) {
                let _ = write!(out, " (more on the next page)");
            }
            let _ = writeln!(out);
        }
    }

    if let Some(selected) = state.selection() {
        let _ = writeln!(out, "\n{}", detail(selected));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecipePage;
    use crate::state::BrowserSettings;

    fn pizza() -> Recipe {
        Recipe {
            meal_type: vec!["Dinner".to_string(), "Lunch".to_string()],
            prep_time_minutes: 20,
            cook_time_minutes: 15,
            servings: 4,
            calories_per_serving: 300,
            difficulty: "Easy".to_string(),
            rating: 4.6,
            cuisine: "Italian".to_string(),
            ingredients: vec!["Dough".to_string(), "Tomato".to_string()],
            instructions: vec!["Preheat".to_string(), "Bake".to_string()],
            ..Recipe::new(1, "Margherita")
        }
    }

    #[test]
    fn test_rating_stars() {
        assert_eq!(rating(4.6), "⭐⭐⭐⭐⭐ (4.6)");
        assert_eq!(rating(4.4), "⭐⭐⭐⭐ (4.4)");
        assert_eq!(rating(0.0), " (0.0)");
        assert_eq!(rating(7.0), "⭐⭐⭐⭐⭐ (7.0)");
        assert_eq!(rating(-1.0), " (-1.0)");
    }

    #[test]
    fn test_card_contents() {
        let card = card(&pizza());
        assert!(card.starts_with("[1] Margherita"));
        assert!(card.contains("Type: Dinner, Lunch"));
        assert!(card.contains("Prep: 20 min | Cook: 15 min | Total: 35 min"));
        assert!(card.contains("Kcal/serving: 300"));
        assert!(card.contains("Difficulty: Easy"));
        assert!(card.contains("(4.6)"));
    }

    #[test]
    fn test_detail_numbers_instructions() {
        let detail = detail(&pizza());
        assert!(detail.contains("Cuisine: Italian"));
        assert!(detail.contains("  - Dough"));
        assert!(detail.contains("  1. Preheat"));
        assert!(detail.contains("  2. Bake"));
    }

    #[test]
    fn test_screen_states() {
        let mut state = BrowserState::new(BrowserSettings::default());
        let ticket = state.begin_fetch();
        assert!(screen(&state).contains("Loading recipes..."));

        state.complete(ticket.seq, Ok(RecipePage::new(vec![])));
        assert!(screen(&state).contains("No recipes found."));

        let ticket = state.begin_fetch();
        state.complete(ticket.seq, Ok(RecipePage::new(vec![pizza()])));
        state.select(pizza().id);
        let out = screen(&state);
        assert!(out.contains("== sort name asc | page 1 =="));
        assert!(out.contains("[1] Margherita"));
        assert!(out.contains("Instructions:"));
    }

    #[test]
    fn test_screen_page_summary() {
        let mut state = BrowserState::new(BrowserSettings::default());
        let ticket = state.begin_fetch();
        let mut first = RecipePage::new(vec![pizza()]);
        first.total = Some(3);
        first.skip = Some(0);
        state.complete(ticket.seq, Ok(first));
        assert!(screen(&state).contains("Showing up to 1 of 3 recipes (more on the next page)"));

        let ticket = state.begin_fetch();
        let mut last = RecipePage::new(vec![pizza()]);
        last.total = Some(3);
        last.skip = Some(2);
        state.complete(ticket.seq, Ok(last));
        let out = screen(&state);
        assert!(out.contains("Showing up to 3 of 3 recipes\n"));
        assert!(!out.contains("more on the next page"));
    }
}
