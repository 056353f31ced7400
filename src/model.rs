use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a recipe as assigned by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub u64);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecipeId {
    fn from(id: u64) -> Self {
        RecipeId(id)
    }
}

/// A single recipe record as returned by the API.
///
/// Only `id` and `name` are required on the wire; every other field falls
/// back to an empty or zero value when the API leaves it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub meal_type: Vec<String>,
    #[serde(default)]
    pub prep_time_minutes: u32,
    #[serde(default)]
    pub cook_time_minutes: u32,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub calories_per_serving: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl Recipe {
    /// Minimal recipe with only the required fields set
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Recipe {
            id: RecipeId(id),
            name: name.into(),
            image: String::new(),
            cuisine: String::new(),
            tags: Vec::new(),
            meal_type: Vec::new(),
            prep_time_minutes: 0,
            cook_time_minutes: 0,
            servings: 0,
            calories_per_serving: 0,
            rating: 0.0,
            review_count: 0,
            difficulty: String::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }

    pub fn total_time_minutes(&self) -> u32 {
        self.prep_time_minutes.saturating_add(self.cook_time_minutes)
    }
}

/// One decoded response body.
///
/// `total`, `skip` and `limit` are only present on paginated and search
/// responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipePage {
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub skip: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl RecipePage {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        RecipePage {
            recipes,
            ..Default::default()
        }
    }
}
