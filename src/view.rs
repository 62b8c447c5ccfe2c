//! Client-side catalog state.
//!
//! [CatalogView] keeps the last record set fetched from the API and
//! re-filters it locally whenever the search term, category or sort changes,
//! so the listing reacts without another round trip. A fresh fetch simply
//! overwrites the local copy.

use crate::models::Plant;
use crate::query::{CatalogFilter, SortField, SortOrder, ALL_CATEGORIES};
use std::fmt::Write;

#[derive(Debug, Clone)]
pub struct CatalogView {
    plants: Vec<Plant>,
    pub search: String,
    /// A category tag, or `all`.
    pub category: String,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for CatalogView {
    fn default() -> Self {
        CatalogView {
            plants: Vec::new(),
            search: String::new(),
            category: ALL_CATEGORIES.to_string(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl CatalogView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the local copy with a fresh server response.
    pub fn replace(&mut self, plants: Vec<Plant>) {
        self.plants = plants;
    }

    pub fn total(&self) -> usize {
        self.plants.len()
    }

    /// Stores the server's copy of `plant`, replacing any local one with the same id.
    pub fn upsert(&mut self, plant: Plant) {
        match self.plants.iter_mut().find(|p| p.id == plant.id) {
            Some(existing) => *existing = plant,
            None => self.plants.push(plant),
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.plants.len();
        self.plants.retain(|p| p.id != id);
        self.plants.len() < before
    }

    pub fn get(&self, id: &str) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == id)
    }

    /// Resets the search term and category; sorting is kept.
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.category = ALL_CATEGORIES.to_string();
    }

    pub fn toggle_sort_order(&mut self) {
        self.sort_order = self.sort_order.reversed();
    }

    pub fn filter(&self) -> CatalogFilter {
        let search = self.search.trim();
        CatalogFilter {
            search: (!search.is_empty()).then(|| search.to_string()),
            category: (self.category != ALL_CATEGORIES && !self.category.is_empty())
                .then(|| self.category.clone()),
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            ..Default::default()
        }
    }

    pub fn visible(&self) -> Vec<&Plant> {
        self.filter().apply(&self.plants)
    }

    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} plants",
            self.visible().len(),
            self.plants.len()
        )
    }

    /// Plain-text listing of the visible plants.
    pub fn render(&self, ids_only: bool) -> String {
        let visible = self.visible();
        let mut out = String::new();

        if self.plants.is_empty() {
            out.push_str("No plants available.\n");
            return out;
        }
        if visible.is_empty() {
            out.push_str("No plants found matching your criteria.\n");
            return out;
        }

        for plant in visible {
            if ids_only {
                let _ = writeln!(out, "{}, '{}'", plant.id, plant.name);
            } else {
                out.push_str(&render_card(plant));
                out.push('\n');
            }
        }
        let _ = writeln!(out, "{}", self.summary());
        out
    }
}

pub fn render_card(plant: &Plant) -> String {
    let mut card = String::new();
    let categories: Vec<&str> = plant.categories.iter().map(|c| c.as_str()).collect();

    let _ = writeln!(card, "Name: '{}'", plant.name);
    let _ = writeln!(card, "Price: {}", plant.formatted_price());
    let _ = writeln!(
        card,
        "Stock: {}",
        if plant.stock_available {
            "In Stock"
        } else {
            "Out of Stock"
        }
    );
    let _ = writeln!(card, "Categories: {}", categories.join(", "));
    let _ = writeln!(
        card,
        "Care: {} | Water: {} | Light: {}",
        plant.care_level, plant.water_needs, plant.light_needs
    );
    if let Some(description) = &plant.description {
        let _ = writeln!(card, "Description: {description}");
    }
    let _ = writeln!(card, "Image: {}", plant.image_url);
    let _ = writeln!(card, "ID: '{}'", plant.id);
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CareLevel, Category, LightNeeds, NewPlant, WaterNeeds};
    use chrono::Utc;

    fn plant(id: &str, name: &str, price: f64, categories: &[Category]) -> Plant {
        NewPlant {
            name: name.to_string(),
            price,
            categories: categories.to_vec(),
            stock_available: true,
            description: None,
            image_url: String::new(),
            care_level: CareLevel::Easy,
            water_needs: WaterNeeds::Low,
            light_needs: LightNeeds::FullSun,
        }
        .into_plant(id.to_string(), Utc::now())
    }

    fn view() -> CatalogView {
        let mut view = CatalogView::new();
        view.replace(vec![
            plant("1", "Snake Plant", 399.0, &[Category::Indoor, Category::AirPurifying]),
            plant("2", "aloe vera", 199.0, &[Category::Succulent]),
            plant("3", "Jade Plant", 299.0, &[Category::Succulent, Category::Indoor]),
        ]);
        view
    }

    fn names(view: &CatalogView) -> Vec<&str> {
        view.visible().into_iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn refilters_locally() {
        let mut view = view();
        assert_eq!(names(&view), ["aloe vera", "Jade Plant", "Snake Plant"]);

        view.search = "PLANT".to_string();
        view.category = "Succulent".to_string();
        assert_eq!(names(&view), ["Jade Plant"]);
        assert_eq!(view.summary(), "Showing 1 of 3 plants");

        view.clear_filters();
        view.sort_by = SortField::Price;
        view.toggle_sort_order();
        assert_eq!(names(&view), ["Snake Plant", "Jade Plant", "aloe vera"]);
    }

    #[test]
    fn upsert_overwrites_the_local_copy() {
        let mut view = view();
        let mut updated = view.get("2").unwrap().clone();
        updated.stock_available = false;

        view.upsert(updated);
        assert!(!view.get("2").unwrap().stock_available);
        assert_eq!(view.total(), 3);

        view.upsert(plant("4", "Fern", 10.0, &[Category::Foliage]));
        assert_eq!(view.total(), 4);
        assert!(view.remove("4"));
        assert!(!view.remove("4"));
    }

    #[test]
    fn renders_empty_states() {
        let mut view = CatalogView::new();
        assert_eq!(view.render(false), "No plants available.\n");

        view.replace(vec![plant("1", "Fern", 10.0, &[Category::Foliage])]);
        view.search = "cactus".to_string();
        assert_eq!(view.render(false), "No plants found matching your criteria.\n");
    }

    #[test]
    fn renders_cards_and_ids() {
        let view = view();
        let ids = view.render(true);
        assert!(ids.starts_with("2, 'aloe vera'\n"));
        assert!(ids.ends_with("Showing 3 of 3 plants\n"));

        let cards = view.render(false);
        assert!(cards.contains("Price: ₹399.00"));
        assert!(cards.contains("Categories: Indoor, Air Purifying"));
        assert!(cards.contains("Care: Easy | Water: Low | Light: Full Sun"));
    }
}
