use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::QueryParseError;

/// Recipe attributes the API can sort by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    #[default]
    Name,
    CaloriesPerServing,
    Rating,
    Difficulty,
    PrepTimeMinutes,
    CookTimeMinutes,
    Servings,
    ReviewCount,
    Cuisine,
}

impl SortField {
    pub const ALL: [SortField; 10] = [
        SortField::Id,
        SortField::Name,
        SortField::CaloriesPerServing,
        SortField::Rating,
        SortField::Difficulty,
        SortField::PrepTimeMinutes,
        SortField::CookTimeMinutes,
        SortField::Servings,
        SortField::ReviewCount,
        SortField::Cuisine,
    ];

    /// Attribute name as the API expects it in `sortBy`
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::CaloriesPerServing => "caloriesPerServing",
            SortField::Rating => "rating",
            SortField::Difficulty => "difficulty",
            SortField::PrepTimeMinutes => "prepTimeMinutes",
            SortField::CookTimeMinutes => "cookTimeMinutes",
            SortField::Servings => "servings",
            SortField::ReviewCount => "reviewCount",
            SortField::Cuisine => "cuisine",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = QueryParseError;

    /// Accepts the API name (`caloriesPerServing`) as well as snake_case and
    /// kebab-case spellings (`calories_per_serving`, `calories-per-serving`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        SortField::ALL
            .into_iter()
            .find(|field| field.as_str().to_lowercase() == normalized)
            .ok_or_else(|| QueryParseError::UnknownSortField(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for SortField {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(QueryParseError::UnknownSortOrder(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Which browsing controls are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Features {
    #[serde(default = "enabled")]
    pub search: bool,
    #[serde(default = "enabled")]
    pub sort: bool,
    #[serde(default = "enabled")]
    pub pagination: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Features {
    fn default() -> Self {
        Self::all()
    }
}

impl Features {
    pub fn all() -> Self {
        Features {
            search: true,
            sort: true,
            pagination: true,
        }
    }

    /// Plain list: one fetch of `/recipes`, no controls
    pub fn none() -> Self {
        Features {
            search: false,
            sort: false,
            pagination: false,
        }
    }
}

/// User controlled search, sort and pagination parameters.
///
/// Every mutator returns `true` when it changed something. Any change other
/// than a page change puts the page index back to 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryState {
    search: String,
    sort_field: SortField,
    sort_order: SortOrder,
    page: u32,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = field;
        self.sort_order = order;
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Surrounding whitespace is not significant.
    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text.trim() == self.search.trim() {
            return false;
        }
        self.search = text;
        self.page = 0;
        true
    }

    pub fn set_sort(&mut self, field: SortField, order: SortOrder) -> bool {
        if field == self.sort_field && order == self.sort_order {
            return false;
        }
        self.sort_field = field;
        self.sort_order = order;
        self.page = 0;
        true
    }

    pub fn set_sort_field(&mut self, field: SortField) -> bool {
        self.set_sort(field, self.sort_order)
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> bool {
        self.set_sort(self.sort_field, order)
    }

    /// No upper bound is known here; past the end the server returns an
    /// empty list.
    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_sub(1))
    }

    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page == self.page {
            return false;
        }
        self.page = page;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_parse_aliases() {
        assert_eq!(
            "caloriesPerServing".parse::<SortField>().unwrap(),
            SortField::CaloriesPerServing
        );
        assert_eq!(
            "calories_per_serving".parse::<SortField>().unwrap(),
            SortField::CaloriesPerServing
        );
        assert_eq!(
            "prep-time-minutes".parse::<SortField>().unwrap(),
            SortField::PrepTimeMinutes
        );
        assert_eq!(" Rating ".parse::<SortField>().unwrap(), SortField::Rating);
        assert_eq!(
            "color".parse::<SortField>(),
            Err(QueryParseError::UnknownSortField("color".to_string()))
        );
    }

    #[test]
    fn test_sort_field_round_trips_api_names() {
        for field in SortField::ALL {
            assert_eq!(field.as_str().parse::<SortField>().unwrap(), field);
        }
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!("descending".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("up".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::Asc.reversed(), SortOrder::Desc);
    }

    #[test]
    fn test_sort_order_deserialize_matches_parse() {
        let order: SortOrder = serde_json::from_str(r#""DESC""#).unwrap();
        assert_eq!(order, SortOrder::Desc);
        let order: SortOrder = serde_json::from_str(r#""ascending""#).unwrap();
        assert_eq!(order, SortOrder::Asc);
        assert!(serde_json::from_str::<SortOrder>(r#""up""#).is_err());
    }

    #[test]
    fn test_search_resets_page() {
        let mut query = QueryState::new();
        query.go_to_page(3);
        assert!(query.set_search("pasta"));
        assert_eq!(query.page(), 0);
        assert_eq!(query.search(), "pasta");
    }

    #[test]
    fn test_same_search_is_not_a_change() {
        let mut query = QueryState::new();
        query.set_search("pasta");
        query.go_to_page(2);
        assert!(!query.set_search("pasta"));
        assert!(!query.set_search("  pasta "));
        assert_eq!(query.page(), 2);
        assert_eq!(query.search(), "pasta");
    }

    #[test]
    fn test_sort_change_resets_page() {
        let mut query = QueryState::new();
        query.go_to_page(4);
        assert!(query.set_sort_field(SortField::Rating));
        assert_eq!(query.page(), 0);

        query.go_to_page(2);
        assert!(query.set_sort_order(SortOrder::Desc));
        assert_eq!(query.page(), 0);
        assert_eq!(query.sort_field(), SortField::Rating);
        assert_eq!(query.sort_order(), SortOrder::Desc);
    }

    #[test]
    fn test_previous_page_clamps_at_zero() {
        let mut query = QueryState::new();
        assert!(!query.previous_page());
        assert_eq!(query.page(), 0);

        assert!(query.next_page());
        assert!(query.next_page());
        assert_eq!(query.page(), 2);
        assert!(query.previous_page());
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_page_change_keeps_search_and_sort() {
        let mut query = QueryState::new().with_sort(SortField::Rating, SortOrder::Desc);
        query.set_search("soup");
        query.next_page();
        assert_eq!(query.search(), "soup");
        assert_eq!(query.sort_field(), SortField::Rating);
        assert_eq!(query.sort_order(), SortOrder::Desc);
    }

    #[test]
    fn test_features_deserialize_defaults() {
        let features: Features = serde_json::from_str(r#"{"sort": false}"#).unwrap();
        assert!(features.search);
        assert!(!features.sort);
        assert!(features.pagination);
    }
}
