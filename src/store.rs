//! The catalog store port and its implementations.

use crate::models::{NewPlant, Plant, PlantPatch};
use crate::query::CatalogFilter;
use std::future::Future;

pub mod memory;
pub mod mongo;

pub use memory::InMemoryPlantStore;
pub use mongo::MongoPlantStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    #[error("could not encode plant document: {0}")]
    Encode(#[from] bson::ser::Error),
    #[error("store did not return an id for the inserted plant")]
    MissingId,
}

/// Persistent collection of plant records.
///
/// Identifiers are opaque strings; an identifier the store could never have
/// issued is reported the same way as one that no longer exists.
pub trait PlantStore: Send + Sync + 'static {
    /// Every plant matching `filter`, in the filter's order.
    fn find(
        &self,
        filter: &CatalogFilter,
    ) -> impl Future<Output = Result<Vec<Plant>, StoreError>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = Result<Option<Plant>, StoreError>> + Send;

    fn insert(&self, plant: NewPlant) -> impl Future<Output = Result<Plant, StoreError>> + Send;

    /// Applies `patch` atomically and returns the updated plant, or `None` if
    /// there is no plant with this id.
    fn update(
        &self,
        id: &str,
        patch: PlantPatch,
    ) -> impl Future<Output = Result<Option<Plant>, StoreError>> + Send;

    /// Returns whether a plant was removed.
    fn delete(&self, id: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Removes every plant and inserts `plants`, returning how many were inserted.
    fn replace_all(
        &self,
        plants: Vec<NewPlant>,
    ) -> impl Future<Output = Result<usize, StoreError>> + Send;
}
