//! Validation of create and update payloads.
//!
//! Payloads arrive as [PlantInput], where every field is kept as raw JSON so
//! that a wrong type produces a field-level message instead of a body
//! rejection. Validation collects every violation before returning, and
//! nothing is written unless all fields pass.

use crate::models::{
    CareLevel, Category, LightNeeds, NewPlant, PlantPatch, WaterNeeds, PLACEHOLDER_IMAGE_URL,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

const NAME_REQUIRED: &str = "Plant name is required and must be between 1-100 characters";
const NAME_LENGTH: &str = "Plant name must be between 1-100 characters";
const PRICE_INVALID: &str = "Price must be a positive number";
const CATEGORIES_REQUIRED: &str = "At least one category is required";
const CATEGORY_INVALID: &str = "Invalid category";
const STOCK_INVALID: &str = "Stock availability must be a boolean";
const DESCRIPTION_TOO_LONG: &str = "Description cannot exceed 500 characters";
const IMAGE_URL_INVALID: &str = "Image URL must be a string";
const CARE_LEVEL_INVALID: &str = "Invalid care level";
const WATER_NEEDS_INVALID: &str = "Invalid water needs";
const LIGHT_NEEDS_INVALID: &str = "Invalid light needs";

/// Request body for both create and update. Unknown fields are ignored.
///
/// A field that is absent stays `None`; a field sent as JSON `null` becomes
/// `Some(Value::Null)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantInput {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub categories: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub stock_available: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub care_level: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub water_needs: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub light_needs: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// One violated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed")]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: impl Into<String>, message: &str) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}

/// Validates a full create payload and applies defaults.
pub fn validate_create(input: &PlantInput) -> Result<NewPlant, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = check(
        &mut errors,
        "name",
        NAME_REQUIRED,
        input.name.as_ref().and_then(name),
    );
    let price = check(
        &mut errors,
        "price",
        PRICE_INVALID,
        input.price.as_ref().and_then(price),
    );
    let categories = match &input.categories {
        Some(value) => categories(value, &mut errors),
        None => {
            errors.push("categories", CATEGORIES_REQUIRED);
            None
        }
    };
    let stock_available = optional(
        &mut errors,
        "stockAvailable",
        STOCK_INVALID,
        &input.stock_available,
        Value::as_bool,
    );
    let description = match &input.description {
        None | Some(Value::Null) => Some(None),
        Some(value) => check(
            &mut errors,
            "description",
            DESCRIPTION_TOO_LONG,
            description(value),
        ),
    };
    let image_url = optional(
        &mut errors,
        "imageUrl",
        IMAGE_URL_INVALID,
        &input.image_url,
        image_url,
    );
    let care_level = optional(
        &mut errors,
        "careLevel",
        CARE_LEVEL_INVALID,
        &input.care_level,
        variant::<CareLevel>,
    );
    let water_needs = optional(
        &mut errors,
        "waterNeeds",
        WATER_NEEDS_INVALID,
        &input.water_needs,
        variant::<WaterNeeds>,
    );
    let light_needs = optional(
        &mut errors,
        "lightNeeds",
        LIGHT_NEEDS_INVALID,
        &input.light_needs,
        variant::<LightNeeds>,
    );

    match (
        name,
        price,
        categories,
        stock_available,
        description,
        image_url,
        care_level,
        water_needs,
        light_needs,
    ) {
        (
            Some(name),
            Some(price),
            Some(categories),
            Some(stock_available),
            Some(description),
            Some(image_url),
            Some(care_level),
            Some(water_needs),
            Some(light_needs),
        ) if errors.is_empty() => Ok(NewPlant {
            name,
            price,
            categories,
            stock_available: stock_available.unwrap_or(true),
            description,
            image_url: image_url
                .flatten()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
            care_level: care_level.unwrap_or_default(),
            water_needs: water_needs.unwrap_or_default(),
            light_needs: light_needs.unwrap_or_default(),
        }),
        _ => Err(errors),
    }
}

/// Validates a partial update. Only the fields present in `input` are checked.
pub fn validate_update(input: &PlantInput) -> Result<PlantPatch, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut patch = PlantPatch::default();

    if let Some(value) = &input.name {
        patch.name = check(&mut errors, "name", NAME_LENGTH, name(value));
    }
    if let Some(value) = &input.price {
        patch.price = check(&mut errors, "price", PRICE_INVALID, price(value));
    }
    if let Some(value) = &input.categories {
        patch.categories = categories(value, &mut errors);
    }
    if let Some(value) = &input.stock_available {
        patch.stock_available = check(&mut errors, "stockAvailable", STOCK_INVALID, value.as_bool());
    }
    if let Some(value) = &input.description {
        patch.description = match value {
            Value::Null => Some(None),
            value => check(&mut errors, "description", DESCRIPTION_TOO_LONG, description(value)),
        };
    }
    if let Some(value) = &input.image_url {
        patch.image_url = check(&mut errors, "imageUrl", IMAGE_URL_INVALID, image_url(value))
            .map(|url| url.unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()));
    }
    if let Some(value) = &input.care_level {
        patch.care_level = check(&mut errors, "careLevel", CARE_LEVEL_INVALID, variant(value));
    }
    if let Some(value) = &input.water_needs {
        patch.water_needs = check(&mut errors, "waterNeeds", WATER_NEEDS_INVALID, variant(value));
    }
    if let Some(value) = &input.light_needs {
        patch.light_needs = check(&mut errors, "lightNeeds", LIGHT_NEEDS_INVALID, variant(value));
    }

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

fn check<T>(
    errors: &mut ValidationErrors,
    field: &str,
    message: &str,
    value: Option<T>,
) -> Option<T> {
    if value.is_none() {
        errors.push(field, message);
    }
    value
}

/// Absent and `null` both mean "use the default", reported as `Some(None)`.
fn optional<T>(
    errors: &mut ValidationErrors,
    field: &str,
    message: &str,
    value: &Option<Value>,
    parse: impl Fn(&Value) -> Option<T>,
) -> Option<Option<T>> {
    match value {
        None | Some(Value::Null) => Some(None),
        Some(value) => check(errors, field, message, parse(value)).map(Some),
    }
}

fn name(value: &Value) -> Option<String> {
    let name = value.as_str()?.trim();
    let len = name.chars().count();
    (1..=NAME_MAX_CHARS).contains(&len).then(|| name.to_string())
}

fn price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    // `-0.0 >= 0.0` holds; adding zero turns it into `0.0`.
    (price.is_finite() && price >= 0.0).then_some(price + 0.0)
}

fn categories(value: &Value, errors: &mut ValidationErrors) -> Option<Vec<Category>> {
    let entries = match value.as_array() {
        Some(entries) if !entries.is_empty() => entries,
        _ => {
            errors.push("categories", CATEGORIES_REQUIRED);
            return None;
        }
    };

    let mut parsed = Vec::with_capacity(entries.len());
    let mut valid = true;
    for (i, entry) in entries.iter().enumerate() {
        match variant::<Category>(entry) {
            Some(category) => parsed.push(category),
            None => {
                errors.push(format!("categories[{i}]"), CATEGORY_INVALID);
                valid = false;
            }
        }
    }
    valid.then_some(parsed)
}

/// Trimmed description; an empty one is stored as absent.
fn description(value: &Value) -> Option<Option<String>> {
    let text = value.as_str()?.trim();
    if text.chars().count() > DESCRIPTION_MAX_CHARS {
        return None;
    }
    Some((!text.is_empty()).then(|| text.to_string()))
}

/// Trimmed image URL; an empty one falls back to the placeholder.
fn image_url(value: &Value) -> Option<Option<String>> {
    let url = value.as_str()?.trim();
    Some((!url.is_empty()).then(|| url.to_string()))
}

fn variant<T: FromStr>(value: &Value) -> Option<T> {
    value.as_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> PlantInput {
        serde_json::from_value(value).unwrap()
    }

    fn minimal() -> Value {
        json!({
            "name": "  Snake Plant  ",
            "price": 399,
            "categories": ["Indoor", "Air Purifying"],
        })
    }

    #[test]
    fn applies_defaults_for_omitted_fields() {
        let plant = validate_create(&input(minimal())).unwrap();
        assert_eq!(plant.name, "Snake Plant");
        assert_eq!(plant.price, 399.0);
        assert_eq!(plant.categories, vec![Category::Indoor, Category::AirPurifying]);
        assert!(plant.stock_available);
        assert_eq!(plant.description, None);
        assert_eq!(plant.image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(plant.care_level, CareLevel::Medium);
        assert_eq!(plant.water_needs, WaterNeeds::Medium);
        assert_eq!(plant.light_needs, LightNeeds::IndirectLight);
    }

    #[test]
    fn keeps_supplied_optional_fields() {
        let plant = validate_create(&input(json!({
            "name": "Jade Plant",
            "price": "299.50",
            "categories": ["Succulent", "Succulent"],
            "stockAvailable": false,
            "description": "  Thick leaves ",
            "imageUrl": "https://example.com/jade.png",
            "careLevel": "Easy",
            "waterNeeds": "Low",
            "lightNeeds": "Full Sun",
            "sku": "ignored",
        })))
        .unwrap();

        assert_eq!(plant.price, 299.5);
        assert_eq!(plant.categories, vec![Category::Succulent, Category::Succulent]);
        assert!(!plant.stock_available);
        assert_eq!(plant.description.as_deref(), Some("Thick leaves"));
        assert_eq!(plant.image_url, "https://example.com/jade.png");
        assert_eq!(plant.care_level, CareLevel::Easy);
        assert_eq!(plant.water_needs, WaterNeeds::Low);
        assert_eq!(plant.light_needs, LightNeeds::FullSun);
    }

    #[test]
    fn rejects_each_bad_field() {
        let cases = [
            (json!({"name": "   "}), "name"),
            (json!({"name": "x".repeat(101)}), "name"),
            (json!({"price": -1}), "price"),
            (json!({"price": "cheap"}), "price"),
            (json!({"categories": []}), "categories"),
            (json!({"categories": "Indoor"}), "categories"),
            (json!({"categories": ["Indoor", "Jungle"]}), "categories[1]"),
            (json!({"description": "d".repeat(501)}), "description"),
            (json!({"stockAvailable": "yes"}), "stockAvailable"),
            (json!({"careLevel": "Extreme"}), "careLevel"),
            (json!({"waterNeeds": "None"}), "waterNeeds"),
            (json!({"lightNeeds": "Dark"}), "lightNeeds"),
            (json!({"imageUrl": 42}), "imageUrl"),
        ];

        for (overrides, field) in cases {
            let mut body = minimal();
            for (k, v) in overrides.as_object().unwrap() {
                body[k] = v.clone();
            }
            let err = validate_create(&input(body)).unwrap_err();
            assert_eq!(err.fields().collect::<Vec<_>>(), vec![field], "field {field}");
        }
    }

    #[test]
    fn reports_every_violation_at_once() {
        let err = validate_create(&input(json!({"categories": ["Jungle", "Indoor", "Swamp"]})))
            .unwrap_err();
        let fields: Vec<_> = err.fields().collect();
        assert_eq!(fields, vec!["name", "price", "categories[0]", "categories[2]"]);
        assert_eq!(err.errors[0].message, NAME_REQUIRED);
    }

    #[test]
    fn accepts_boundary_lengths() {
        let mut body = minimal();
        body["name"] = json!("n".repeat(100));
        body["description"] = json!("d".repeat(500));
        body["price"] = json!(0);
        let plant = validate_create(&input(body)).unwrap();
        assert_eq!(plant.name.len(), 100);
        assert_eq!(plant.price, 0.0);
    }

    #[test]
    fn update_carries_only_present_fields() {
        let patch = validate_update(&input(json!({"price": 450, "stockAvailable": false}))).unwrap();
        assert_eq!(
            patch,
            PlantPatch {
                price: Some(450.0),
                stock_available: Some(false),
                ..Default::default()
            }
        );

        assert!(validate_update(&input(json!({}))).unwrap().is_empty());
    }

    #[test]
    fn update_null_clears_description_but_not_name() {
        let patch = validate_update(&input(json!({"description": null}))).unwrap();
        assert_eq!(patch.description, Some(None));

        let err = validate_update(&input(json!({"name": null, "categories": []}))).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["name", "categories"]);
        assert_eq!(err.errors[0].message, NAME_LENGTH);
    }

    #[test]
    fn negative_zero_price_is_stored_as_zero() {
        for raw in [json!("-0"), json!(-0.0)] {
            let mut body = minimal();
            body["price"] = raw;
            let plant = validate_create(&input(body)).unwrap();
            assert!(plant.price.is_sign_positive());
            let plant = plant.into_plant("1".to_string(), chrono::Utc::now());
            assert_eq!(plant.formatted_price(), "₹0.00");
        }
    }

    #[test]
    fn input_distinguishes_null_from_absent() {
        let parsed = input(json!({"description": null}));
        assert_eq!(parsed.description, Some(Value::Null));
        assert_eq!(parsed.name, None);
    }
}
