//! Listing filters and sort order.
//!
//! [PlantQuery] is the raw query string; [CatalogFilter] is its parsed form.
//! The same filter renders to a MongoDB filter/sort pair for the database and
//! evaluates directly against [Plant] values for in-process listings.
//!
//! Malformed parameters are ignored: a price bound that is not a finite
//! number, a `stockAvailable` other than `true`/`false`, or an unknown
//! `sortBy`/`sortOrder` behaves as if it had not been sent.

use crate::models::Plant;
use bson::{doc, Document};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "all";

/// Listing parameters exactly as they appear in the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_available: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    Price,
    CareLevel,
}

impl SortField {
    /// Document field the sort applies to.
    pub fn field(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::CareLevel => "careLevel",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(SortField::Name),
            "price" => Some(SortField::Price),
            "careLevel" => Some(SortField::CareLevel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
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

    fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Parsed listing parameters. Every `None` is an inactive restriction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    /// Trimmed, non-empty search term.
    pub search: Option<String>,
    /// Exact category tag; never [ALL_CATEGORIES].
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub stock_available: Option<bool>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl PlantQuery {
    pub fn parse(&self) -> CatalogFilter {
        CatalogFilter {
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            category: self
                .category
                .as_deref()
                .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
                .map(str::to_string),
            min_price: ignore_malformed("minPrice", self.min_price.as_deref(), parse_price),
            max_price: ignore_malformed("maxPrice", self.max_price.as_deref(), parse_price),
            stock_available: ignore_malformed(
                "stockAvailable",
                self.stock_available.as_deref(),
                parse_bool,
            ),
            sort_by: ignore_malformed("sortBy", self.sort_by.as_deref(), SortField::parse)
                .unwrap_or_default(),
            sort_order: ignore_malformed("sortOrder", self.sort_order.as_deref(), SortOrder::parse)
                .unwrap_or_default(),
        }
    }
}

/// Builds a query from decoded `key=value` pairs. The first value of a
/// repeated key wins and unknown keys are dropped.
impl<K, V> FromIterator<(K, V)> for PlantQuery
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let mut query = PlantQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "search" => &mut query.search,
                "category" => &mut query.category,
                "minPrice" => &mut query.min_price,
                "maxPrice" => &mut query.max_price,
                "stockAvailable" => &mut query.stock_available,
                "sortBy" => &mut query.sort_by,
                "sortOrder" => &mut query.sort_order,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }
}

impl From<&CatalogFilter> for PlantQuery {
    fn from(filter: &CatalogFilter) -> Self {
        PlantQuery {
            search: filter.search.clone(),
            category: filter.category.clone(),
            min_price: filter.min_price.map(|p| p.to_string()),
            max_price: filter.max_price.map(|p| p.to_string()),
            stock_available: filter.stock_available.map(|s| s.to_string()),
            sort_by: Some(filter.sort_by.field().to_string()),
            sort_order: Some(filter.sort_order.as_str().to_string()),
        }
    }
}

fn ignore_malformed<T>(
    param: &str,
    raw: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    let parsed = parse(raw);
    if parsed.is_none() {
        tracing::debug!(param, value = raw, "ignoring malformed query parameter");
    }
    parsed
}

fn parse_price(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|p| p.is_finite())
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl CatalogFilter {
    /// MongoDB filter document. Active restrictions sit side by side at the
    /// top level, which MongoDB treats as a conjunction.
    pub fn to_document(&self) -> Document {
        let mut filter = doc! {};

        if let Some(term) = &self.search {
            let pattern = doc! { "$regex": regex::escape(term), "$options": "i" };
            filter.insert(
                "$or",
                vec![
                    doc! { "name": pattern.clone() },
                    doc! { "categories": pattern.clone() },
                    doc! { "description": pattern },
                ],
            );
        }

        if let Some(category) = &self.category {
            filter.insert("categories", doc! { "$in": [category.as_str()] });
        }

        if self.min_price.is_some() || self.max_price.is_some() {
            let mut price = doc! {};
            if let Some(min) = self.min_price {
                price.insert("$gte", min);
            }
            if let Some(max) = self.max_price {
                price.insert("$lte", max);
            }
            filter.insert("price", price);
        }

        if let Some(stock) = self.stock_available {
            filter.insert("stockAvailable", stock);
        }

        filter
    }

    /// MongoDB sort document. Case-insensitive ordering comes from the
    /// collation the store attaches to the query.
    pub fn sort_document(&self) -> Document {
        let direction = match self.sort_order {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        };
        let mut sort = Document::new();
        sort.insert(self.sort_by.field(), direction);
        sort
    }

    pub fn matches(&self, plant: &Plant) -> bool {
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let hit = plant.name.to_lowercase().contains(&term)
                || plant
                    .categories
                    .iter()
                    .any(|c| c.as_str().to_lowercase().contains(&term))
                || plant
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if !plant.categories.iter().any(|c| c.as_str() == category) {
                return false;
            }
        }

        if self.min_price.is_some_and(|min| plant.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| plant.price > max) {
            return false;
        }

        self.stock_available
            .map_or(true, |stock| plant.stock_available == stock)
    }

    pub fn compare(&self, a: &Plant, b: &Plant) -> Ordering {
        let ordering = match self.sort_by {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::CareLevel => a
                .care_level
                .as_str()
                .to_lowercase()
                .cmp(&b.care_level.as_str().to_lowercase()),
        };
        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Selects and orders borrowed plants. Ties keep their incoming order.
    pub fn apply<'a, I>(&self, plants: I) -> Vec<&'a Plant>
    where
        I: IntoIterator<Item = &'a Plant>,
    {
        let mut selected: Vec<&Plant> = plants.into_iter().filter(|p| self.matches(p)).collect();
        selected.sort_by(|a, b| self.compare(a, b));
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CareLevel, Category, LightNeeds, NewPlant, WaterNeeds};
    use chrono::Utc;

    fn plant(name: &str, price: f64, categories: &[Category], stock: bool) -> Plant {
        NewPlant {
            name: name.to_string(),
            price,
            categories: categories.to_vec(),
            stock_available: stock,
            description: None,
            image_url: String::new(),
            care_level: CareLevel::Medium,
            water_needs: WaterNeeds::Medium,
            light_needs: LightNeeds::IndirectLight,
        }
        .into_plant(name.to_lowercase(), Utc::now())
    }

    fn query(pairs: &[(&str, &str)]) -> CatalogFilter {
        let params: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect();
        serde_json::from_value::<PlantQuery>(params.into())
            .unwrap()
            .parse()
    }

    fn names(plants: &[Plant], pairs: &[(&str, &str)]) -> Vec<String> {
        query(pairs)
            .apply(plants)
            .into_iter()
            .map(|p| p.name.clone())
            .collect()
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let query: PlantQuery = [
            ("minPrice", "100"),
            ("minPrice", "cheap"),
            ("search", "fern"),
            ("search", "cactus"),
            ("page", "2"),
        ]
        .into_iter()
        .collect();

        assert_eq!(query.min_price.as_deref(), Some("100"));
        assert_eq!(query.search.as_deref(), Some("fern"));
        assert_eq!(query.parse().min_price, Some(100.0));
    }

    #[test]
    fn defaults_to_name_ascending_with_no_restrictions() {
        let filter = query(&[]);
        assert_eq!(filter, CatalogFilter::default());
        assert_eq!(filter.to_document(), doc! {});
        assert_eq!(filter.sort_document(), doc! { "name": 1 });
    }

    #[test]
    fn ignores_malformed_parameters() {
        let filter = query(&[
            ("minPrice", "cheap"),
            ("maxPrice", "NaN"),
            ("stockAvailable", "maybe"),
            ("sortBy", "color"),
            ("sortOrder", "sideways"),
            ("search", "   "),
            ("category", "all"),
        ]);
        assert_eq!(filter, CatalogFilter::default());
    }

    #[test]
    fn builds_conjunctive_document() {
        let filter = query(&[
            ("search", "a.b"),
            ("category", "Succulent"),
            ("minPrice", "300"),
            ("maxPrice", "600"),
            ("stockAvailable", "false"),
            ("sortBy", "price"),
            ("sortOrder", "desc"),
        ]);

        let regex = doc! { "$regex": "a\\.b", "$options": "i" };
        assert_eq!(
            filter.to_document(),
            doc! {
                "$or": [
                    { "name": regex.clone() },
                    { "categories": regex.clone() },
                    { "description": regex },
                ],
                "categories": { "$in": ["Succulent"] },
                "price": { "$gte": 300.0, "$lte": 600.0 },
                "stockAvailable": false,
            }
        );
        assert_eq!(filter.sort_document(), doc! { "price": -1 });
    }

    #[test]
    fn single_price_bound_is_open_on_the_other_side() {
        let filter = query(&[("maxPrice", "250")]);
        assert_eq!(filter.to_document(), doc! { "price": { "$lte": 250.0 } });
        assert!(filter.matches(&plant("Cheap", 250.0, &[Category::Indoor], true)));
        assert!(!filter.matches(&plant("Pricey", 250.01, &[Category::Indoor], true)));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut by_description = plant("Devil's Ivy", 300.0, &[Category::Hanging], true);
        by_description.description = Some("A relative of the POTHOS".to_string());
        let by_name = plant("Pothos (Epipremnum aureum 'Golden')", 349.0, &[Category::Indoor], true);
        let by_category = plant("Fern", 100.0, &[Category::AirPurifying], true);
        let other = plant("Aloe Vera", 199.0, &[Category::Succulent], true);

        let filter = query(&[("search", "pothos")]);
        assert!(filter.matches(&by_description));
        assert!(filter.matches(&by_name));
        assert!(!filter.matches(&other));

        assert!(query(&[("search", "purif")]).matches(&by_category));
    }

    #[test]
    fn composes_category_price_and_stock() {
        let plants = vec![
            plant("A", 350.0, &[Category::Succulent], false),
            plant("B", 350.0, &[Category::Succulent], true),
            plant("C", 700.0, &[Category::Succulent], false),
            plant("D", 350.0, &[Category::Indoor], false),
            plant("E", 600.0, &[Category::Indoor, Category::Succulent], false),
        ];

        assert_eq!(
            names(&plants, &[("category", "Succulent")]),
            ["A", "B", "C", "E"]
        );
        assert_eq!(
            names(
                &plants,
                &[("category", "Succulent"), ("minPrice", "300"), ("maxPrice", "600")]
            ),
            ["A", "B", "E"]
        );
        assert_eq!(
            names(&plants, &[
                ("category", "Succulent"),
                ("minPrice", "300"),
                ("maxPrice", "600"),
                ("stockAvailable", "false"),
            ]),
            ["A", "E"]
        );
    }

    #[test]
    fn sorts_names_case_insensitively_and_prices_descending() {
        let plants = vec![
            plant("banana plant", 500.0, &[Category::Tropical], true),
            plant("Aloe", 199.0, &[Category::Succulent], true),
            plant("Calathea", 699.0, &[Category::Foliage], true),
        ];

        assert_eq!(names(&plants, &[]), ["Aloe", "banana plant", "Calathea"]);

        let by_price = query(&[("sortBy", "price"), ("sortOrder", "desc")]).apply(&plants);
        assert!(by_price.windows(2).all(|w| w[0].price >= w[1].price));
    }

    #[test]
    fn sorts_care_level_by_its_text() {
        let mut easy = plant("x", 1.0, &[Category::Herb], true);
        easy.care_level = CareLevel::Easy;
        let mut hard = plant("y", 1.0, &[Category::Herb], true);
        hard.care_level = CareLevel::Hard;
        let medium = plant("z", 1.0, &[Category::Herb], true);

        let plants = vec![medium, hard, easy];
        let levels: Vec<_> = query(&[("sortBy", "careLevel")])
            .apply(&plants)
            .into_iter()
            .map(|p| p.care_level)
            .collect();
        assert_eq!(levels, [CareLevel::Easy, CareLevel::Hard, CareLevel::Medium]);
    }

    #[test]
    fn round_trips_through_query_parameters() {
        let filter = CatalogFilter {
            search: Some("fern".to_string()),
            category: Some("Foliage".to_string()),
            min_price: Some(10.5),
            max_price: None,
            stock_available: Some(true),
            sort_by: SortField::CareLevel,
            sort_order: SortOrder::Desc,
        };
        assert_eq!(PlantQuery::from(&filter).parse(), filter);
    }
}
