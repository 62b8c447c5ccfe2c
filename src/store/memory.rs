use super::{PlantStore, StoreError};
use crate::models::{NewPlant, Plant, PlantPatch};
use crate::query::CatalogFilter;
use bson::oid::ObjectId;
use chrono::Utc;
use tokio::sync::RwLock;

/// [PlantStore] kept in process memory, in insertion order.
///
/// Used by the test suites and by `serve --in-memory`. Ids are ObjectId hex
/// strings so they look like the ones MongoDB hands out.
#[derive(Debug, Default)]
pub struct InMemoryPlantStore {
    plants: RwLock<Vec<Plant>>,
}

impl InMemoryPlantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.plants.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.plants.read().await.is_empty()
    }
}

impl PlantStore for InMemoryPlantStore {
    async fn find(&self, filter: &CatalogFilter) -> Result<Vec<Plant>, StoreError> {
        let plants = self.plants.read().await;
        Ok(filter.apply(plants.iter()).into_iter().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Plant>, StoreError> {
        let plants = self.plants.read().await;
        Ok(plants.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, plant: NewPlant) -> Result<Plant, StoreError> {
        let plant = plant.into_plant(ObjectId::new().to_hex(), Utc::now());
        self.plants.write().await.push(plant.clone());
        Ok(plant)
    }

    async fn update(&self, id: &str, patch: PlantPatch) -> Result<Option<Plant>, StoreError> {
        let mut plants = self.plants.write().await;
        let Some(plant) = plants.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        patch.apply(plant, Utc::now());
        Ok(Some(plant.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut plants = self.plants.write().await;
        let before = plants.len();
        plants.retain(|p| p.id != id);
        Ok(plants.len() < before)
    }

    async fn replace_all(&self, plants: Vec<NewPlant>) -> Result<usize, StoreError> {
        let now = Utc::now();
        let replacement: Vec<Plant> = plants
            .into_iter()
            .map(|plant| plant.into_plant(ObjectId::new().to_hex(), now))
            .collect();
        let inserted = replacement.len();
        *self.plants.write().await = replacement;
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CareLevel, Category, LightNeeds, WaterNeeds};
    use crate::query::PlantQuery;

    fn new_plant(name: &str, price: f64) -> NewPlant {
        NewPlant {
            name: name.to_string(),
            price,
            categories: vec![Category::Indoor],
            stock_available: true,
            description: None,
            image_url: String::new(),
            care_level: CareLevel::Easy,
            water_needs: WaterNeeds::Low,
            light_needs: LightNeeds::LowLight,
        }
    }

    #[tokio::test]
    async fn assigns_distinct_ids() {
        let store = InMemoryPlantStore::new();
        let a = store.insert(new_plant("A", 1.0)).await.unwrap();
        let b = store.insert(new_plant("B", 2.0)).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.get(&a.id).await.unwrap(), Some(a));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn update_and_delete_miss_unknown_ids() {
        let store = InMemoryPlantStore::new();
        let patch = PlantPatch {
            price: Some(5.0),
            ..Default::default()
        };
        assert_eq!(store.update("nope", patch).await.unwrap(), None);
        assert!(!store.delete("nope").await.unwrap());
    }

    #[tokio::test]
    async fn replace_all_discards_previous_records() {
        let store = InMemoryPlantStore::new();
        let old = store.insert(new_plant("Old", 1.0)).await.unwrap();

        let inserted = store
            .replace_all(vec![new_plant("Fern", 3.0), new_plant("Cactus", 2.0)])
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(store.get(&old.id).await.unwrap(), None);

        let sorted = store
            .find(&PlantQuery::default().parse())
            .await
            .unwrap();
        let names: Vec<_> = sorted.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Cactus", "Fern"]);
    }
}
