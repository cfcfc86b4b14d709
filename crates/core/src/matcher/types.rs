//! Types produced by the formula matcher.

use serde::{Deserialize, Serialize};

/// Life stage a food is formulated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgeClass {
    Kitten,
    #[default]
    Adult,
    Senior,
}

impl AgeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeClass::Kitten => "kitten",
            AgeClass::Adult => "adult",
            AgeClass::Senior => "senior",
        }
    }
}

/// Physical form of the food.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    #[default]
    Dry,
    Wet,
    FreezeDried,
    Raw,
}

impl FoodCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::Dry => "dry",
            FoodCategory::Wet => "wet",
            FoodCategory::FreezeDried => "freeze_dried",
            FoodCategory::Raw => "raw",
        }
    }
}

/// Special-purpose formulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    WeightControl,
    Joint,
    Skin,
    Sensitive,
    Hairball,
    Urinary,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::WeightControl => "weight_control",
            TypeTag::Joint => "joint",
            TypeTag::Skin => "skin",
            TypeTag::Sensitive => "sensitive",
            TypeTag::Hairball => "hairball",
            TypeTag::Urinary => "urinary",
        }
    }
}

/// Attributes extracted from one product title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedAttributes {
    /// Title with markup and extra whitespace removed.
    pub name: String,
    pub brand: Option<String>,
    pub age: AgeClass,
    pub category: FoodCategory,
    pub type_tag: Option<TypeTag>,
    /// Package size as written, e.g. `5.4kg`.
    pub size: Option<String>,
}
