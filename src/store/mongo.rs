use super::{PlantStore, StoreError};
use crate::models::{CareLevel, Category, LightNeeds, NewPlant, Plant, PlantPatch, WaterNeeds};
use crate::query::CatalogFilter;
use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use futures_util::stream::TryStreamExt;
use mongodb::options::{ClientOptions, Collation, CollationStrength, ReturnDocument};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const COLLECTION: &str = "plants";

/// Stored layout of a plant. Timestamps are BSON dates so they sort natively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlantDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    price: f64,
    categories: Vec<Category>,
    stock_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    image_url: String,
    care_level: CareLevel,
    water_needs: WaterNeeds,
    light_needs: LightNeeds,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    updated_at: DateTime<Utc>,
}

impl PlantDocument {
    fn new(plant: NewPlant, now: DateTime<Utc>) -> Self {
        PlantDocument {
            id: None,
            name: plant.name,
            price: plant.price,
            categories: plant.categories,
            stock_available: plant.stock_available,
            description: plant.description,
            image_url: plant.image_url,
            care_level: plant.care_level,
            water_needs: plant.water_needs,
            light_needs: plant.light_needs,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<PlantDocument> for Plant {
    fn from(document: PlantDocument) -> Self {
        Plant {
            id: document.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: document.name,
            price: document.price,
            categories: document.categories,
            stock_available: document.stock_available,
            description: document.description,
            image_url: document.image_url,
            care_level: document.care_level,
            water_needs: document.water_needs,
            light_needs: document.light_needs,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

/// [PlantStore] backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoPlantStore {
    collection: Collection<PlantDocument>,
}

impl MongoPlantStore {
    pub fn new(db: &Database) -> Self {
        MongoPlantStore {
            collection: db.collection(COLLECTION),
        }
    }

    /// Connects and pings the server. The database named in the URI wins
    /// over `default_db`.
    pub async fn connect(uri: &str, default_db: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(Duration::from_secs(10));

        let client = Client::with_options(options)?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(default_db));

        db.run_command(doc! { "ping": 1 }).await?;
        tracing::info!(database = db.name(), "connected to mongodb");

        Ok(MongoPlantStore::new(&db))
    }
}

/// Current time at the millisecond precision BSON dates keep.
fn now() -> DateTime<Utc> {
    bson::DateTime::now().to_chrono()
}

fn case_insensitive() -> Collation {
    Collation::builder()
        .locale("en")
        .strength(CollationStrength::Secondary)
        .build()
}

fn object_id(id: &str) -> Option<ObjectId> {
    match ObjectId::parse_str(id) {
        Ok(oid) => Some(oid),
        Err(e) => {
            tracing::debug!(id, error = %e, "not a valid plant id");
            None
        }
    }
}

/// `$set` for every supplied field plus `updatedAt`; a cleared description
/// becomes `$unset`.
fn update_document(patch: PlantPatch, now: DateTime<Utc>) -> Result<Document, StoreError> {
    let mut set = doc! { "updatedAt": bson::DateTime::from_chrono(now) };
    let mut unset = doc! {};

    if let Some(name) = patch.name {
        set.insert("name", name);
    }
    if let Some(price) = patch.price {
        set.insert("price", price);
    }
    if let Some(categories) = patch.categories {
        set.insert("categories", bson::to_bson(&categories)?);
    }
    if let Some(stock_available) = patch.stock_available {
        set.insert("stockAvailable", stock_available);
    }
    match patch.description {
        Some(Some(description)) => {
            set.insert("description", description);
        }
        Some(None) => {
            unset.insert("description", "");
        }
        None => {}
    }
    if let Some(image_url) = patch.image_url {
        set.insert("imageUrl", image_url);
    }
    if let Some(care_level) = patch.care_level {
        set.insert("careLevel", care_level.as_str());
    }
    if let Some(water_needs) = patch.water_needs {
        set.insert("waterNeeds", water_needs.as_str());
    }
    if let Some(light_needs) = patch.light_needs {
        set.insert("lightNeeds", light_needs.as_str());
    }

    let mut update = doc! { "$set": set };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    Ok(update)
}

impl PlantStore for MongoPlantStore {
    #[tracing::instrument(skip(self), err)]
    async fn find(&self, filter: &CatalogFilter) -> Result<Vec<Plant>, StoreError> {
        let cursor = self
            .collection
            .find(filter.to_document())
            .sort(filter.sort_document())
            .collation(case_insensitive())
            .await?;
        let documents: Vec<PlantDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Plant::from).collect())
    }

    #[tracing::instrument(skip(self), err)]
    async fn get(&self, id: &str) -> Result<Option<Plant>, StoreError> {
        let Some(oid) = object_id(id) else {
            return Ok(None);
        };
        let document = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(document.map(Plant::from))
    }

    #[tracing::instrument(skip_all, fields(name = %plant.name), err)]
    async fn insert(&self, plant: NewPlant) -> Result<Plant, StoreError> {
        let document = PlantDocument::new(plant, now());
        let result = self.collection.insert_one(&document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::MissingId)?;

        Ok(Plant::from(PlantDocument {
            id: Some(id),
            ..document
        }))
    }

    #[tracing::instrument(skip(self, patch), err)]
    async fn update(&self, id: &str, patch: PlantPatch) -> Result<Option<Plant>, StoreError> {
        let Some(oid) = object_id(id) else {
            return Ok(None);
        };
        let update = update_document(patch, now())?;
        let document = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(document.map(Plant::from))
    }

    #[tracing::instrument(skip(self), err)]
    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let Some(oid) = object_id(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }

    #[tracing::instrument(skip_all, fields(count = plants.len()), err)]
    async fn replace_all(&self, plants: Vec<NewPlant>) -> Result<usize, StoreError> {
        let cleared = self.collection.delete_many(doc! {}).await?;
        tracing::info!(deleted = cleared.deleted_count, "cleared existing plants");

        if plants.is_empty() {
            return Ok(0);
        }

        let created_at = now();
        let documents = plants
            .into_iter()
            .map(|plant| PlantDocument::new(plant, created_at));
        let result = self.collection.insert_many(documents).await?;
        Ok(result.inserted_ids.len())
    }
}
