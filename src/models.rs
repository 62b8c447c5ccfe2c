use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Image shown for plants created without an image URL.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300x300?text=Plant";

/// Returned when a string does not name a variant of one of the closed catalog enums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed, string-backed enum whose wire form is the display text.
macro_rules! catalog_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

catalog_enum! {
    /// The fixed set of category tags. The order here is the order the
    /// categories endpoint returns them in.
    Category ("category") {
        Indoor => "Indoor",
        Outdoor => "Outdoor",
        Succulent => "Succulent",
        AirPurifying => "Air Purifying",
        HomeDecor => "Home Decor",
        LowMaintenance => "Low Maintenance",
        Flowering => "Flowering",
        Foliage => "Foliage",
        Herb => "Herb",
        Tropical => "Tropical",
        Desert => "Desert",
        Aquatic => "Aquatic",
        Bonsai => "Bonsai",
        Climbing => "Climbing",
        Hanging => "Hanging",
    }
}

catalog_enum! {
    CareLevel ("care level") {
        Easy => "Easy",
        Medium => "Medium",
        Hard => "Hard",
    }
}

catalog_enum! {
    WaterNeeds ("water needs") {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

catalog_enum! {
    LightNeeds ("light needs") {
        LowLight => "Low Light",
        IndirectLight => "Indirect Light",
        BrightLight => "Bright Light",
        FullSun => "Full Sun",
    }
}

impl Default for CareLevel {
    fn default() -> Self {
        CareLevel::Medium
    }
}

impl Default for WaterNeeds {
    fn default() -> Self {
        WaterNeeds::Medium
    }
}

impl Default for LightNeeds {
    fn default() -> Self {
        LightNeeds::IndirectLight
    }
}

/// A catalog entry as handed out by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    pub categories: Vec<Category>,
    pub stock_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_url: String,
    pub care_level: CareLevel,
    pub water_needs: WaterNeeds,
    pub light_needs: LightNeeds,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Plant {
    /// Price as shown in the storefront, e.g. `₹299.00`.
    pub fn formatted_price(&self) -> String {
        format!("₹{:.2}", self.price)
    }
}

/// A validated plant that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlant {
    pub name: String,
    pub price: f64,
    pub categories: Vec<Category>,
    pub stock_available: bool,
    pub description: Option<String>,
    pub image_url: String,
    pub care_level: CareLevel,
    pub water_needs: WaterNeeds,
    pub light_needs: LightNeeds,
}

impl NewPlant {
    pub fn into_plant(self, id: String, now: DateTime<Utc>) -> Plant {
        Plant {
            id,
            name: self.name,
            price: self.price,
            categories: self.categories,
            stock_available: self.stock_available,
            description: self.description,
            image_url: self.image_url,
            care_level: self.care_level,
            water_needs: self.water_needs,
            light_needs: self.light_needs,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A validated partial update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub categories: Option<Vec<Category>>,
    pub stock_available: Option<bool>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub image_url: Option<String>,
    pub care_level: Option<CareLevel>,
    pub water_needs: Option<WaterNeeds>,
    pub light_needs: Option<LightNeeds>,
}

impl PlantPatch {
    pub fn is_empty(&self) -> bool {
        *self == PlantPatch::default()
    }

    /// Merges the supplied fields into `plant` and stamps `updated_at`.
    pub fn apply(self, plant: &mut Plant, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            plant.name = name;
        }
        if let Some(price) = self.price {
            plant.price = price;
        }
        if let Some(categories) = self.categories {
            plant.categories = categories;
        }
        if let Some(stock_available) = self.stock_available {
            plant.stock_available = stock_available;
        }
        if let Some(description) = self.description {
            plant.description = description;
        }
        if let Some(image_url) = self.image_url {
            plant.image_url = image_url;
        }
        if let Some(care_level) = self.care_level {
            plant.care_level = care_level;
        }
        if let Some(water_needs) = self.water_needs {
            plant.water_needs = water_needs;
        }
        if let Some(light_needs) = self.light_needs {
            plant.light_needs = light_needs;
        }
        plant.updated_at = now;
    }
}
