//! The fixed sample catalog loaded by `plant-catalog seed`.

use crate::models::NewPlant;
use crate::schema::{validate_create, PlantInput, ValidationErrors};

const SAMPLE_PLANTS: &str = include_str!("../seed/plants.json");

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("sample catalog is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("sample plant #{index} is invalid: {source:?}")]
    Invalid {
        index: usize,
        #[source]
        source: ValidationErrors,
    },
}

/// Parses and validates every sample plant, in file order.
pub fn sample_plants() -> Result<Vec<NewPlant>, SeedError> {
    let inputs: Vec<PlantInput> = serde_json::from_str(SAMPLE_PLANTS)?;
    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            validate_create(input).map_err(|source| SeedError::Invalid { index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn every_sample_is_valid() {
        let plants = sample_plants().unwrap();
        assert_eq!(plants.len(), 52);
        assert!(plants.iter().all(|p| !p.categories.is_empty()));
        assert!(plants
            .iter()
            .any(|p| p.name.starts_with("Pothos") && p.categories.contains(&Category::Hanging)));
    }
}
