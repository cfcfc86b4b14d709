//! Types for the brand dictionary document.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Category id the shopping API assigns to pet food listings.
pub const DEFAULT_CATEGORY_ID: &str = "50006679";

/// Brand dictionary as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandDictionary {
    /// Brand names grouped by query strategy.
    #[serde(default)]
    pub brands: BrandGroups,
    /// Category id used as a fallback by the category filter.
    #[serde(default = "default_category_id")]
    pub category_id: String,
    /// Brands whose names are ordinary words and need a disambiguating query.
    #[serde(default)]
    pub single_word_brands: Vec<String>,
    /// Last time discovered brands were merged in. Older files store a
    /// numeric file timestamp here, so any JSON value is accepted.
    #[serde(default)]
    pub last_updated: Option<serde_json::Value>,
    /// Document version.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_category_id() -> String {
    DEFAULT_CATEGORY_ID.to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for BrandDictionary {
    fn default() -> Self {
        Self {
            brands: BrandGroups::default(),
            category_id: default_category_id(),
            single_word_brands: Vec::new(),
            last_updated: None,
            version: default_version(),
        }
    }
}

/// Brand names by group, in the on-disk layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandGroups {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub standalone: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overseas_premium: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domestic: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asia: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prescription: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub general_name_correction: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub manufacturer_brand_pairs: Vec<ManufacturerPair>,
}

/// Brands sold under a manufacturer whose name must prefix the query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerPair {
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub brands: Vec<String>,
}

/// Group a brand belongs to, carrying only what that group needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BrandGroup {
    Standalone,
    OverseasPremium,
    Domestic,
    Asia,
    Prescription,
    GeneralNameCorrection,
    ManufacturerPaired { manufacturer: Option<String> },
}

impl BrandGroup {
    /// Key of the group in the dictionary document.
    pub fn key(&self) -> &'static str {
        match self {
            BrandGroup::Standalone => "standalone",
            BrandGroup::OverseasPremium => "overseas_premium",
            BrandGroup::Domestic => "domestic",
            BrandGroup::Asia => "asia",
            BrandGroup::Prescription => "prescription",
            BrandGroup::GeneralNameCorrection => "general_name_correction",
            BrandGroup::ManufacturerPaired { .. } => "manufacturer_brand_pairs",
        }
    }

    /// Groups searched with the brand name alone.
    pub fn is_standalone(&self) -> bool {
        matches!(
            self,
            BrandGroup::Standalone
                | BrandGroup::OverseasPremium
                | BrandGroup::Domestic
                | BrandGroup::Asia
                | BrandGroup::Prescription
        )
    }

    /// Track A sub-pass the group is searched in.
    pub fn search_pass(&self) -> u8 {
        if self.is_standalone() {
            0
        } else if matches!(self, BrandGroup::ManufacturerPaired { .. }) {
            1
        } else {
            2
        }
    }
}

/// A brand name with the group it was listed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandEntry {
    pub name: String,
    pub group: BrandGroup,
}

impl BrandDictionary {
    /// Every listing in document order, duplicates included.
    fn listings(&self) -> Vec<BrandEntry> {
        let groups = &self.brands;
        let simple = [
            (BrandGroup::Standalone, &groups.standalone),
            (BrandGroup::OverseasPremium, &groups.overseas_premium),
            (BrandGroup::Domestic, &groups.domestic),
            (BrandGroup::Asia, &groups.asia),
            (BrandGroup::Prescription, &groups.prescription),
            (BrandGroup::GeneralNameCorrection, &groups.general_name_correction),
        ];

        let mut listings = Vec::new();
        for (group, names) in simple {
            listings.extend(names.iter().map(|name| BrandEntry {
                name: name.clone(),
                group: group.clone(),
            }));
        }

        for pair in &groups.manufacturer_brand_pairs {
            let manufacturer = pair
                .manufacturer
                .as_ref()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty());
            listings.extend(pair.brands.iter().map(|name| BrandEntry {
                name: name.clone(),
                group: BrandGroup::ManufacturerPaired {
                    manufacturer: manufacturer.clone(),
                },
            }));
        }

        listings
    }

    fn first_per_name(listings: Vec<BrandEntry>) -> Vec<BrandEntry> {
        let mut seen = HashSet::new();
        listings
            .into_iter()
            .filter(|e| seen.insert(e.name.clone()))
            .collect()
    }

    /// All brands in dictionary iteration order, each name once.
    ///
    /// A name listed in several groups keeps the first group it appears in.
    pub fn entries(&self) -> Vec<BrandEntry> {
        Self::first_per_name(self.listings())
    }

    /// Brands in search order, each name once.
    ///
    /// Standalone groups come first, then manufacturer pairs, then
    /// general-name brands. A name listed in several groups keeps the
    /// earliest pass that reaches it.
    pub fn search_entries(&self) -> Vec<BrandEntry> {
        let mut listings = self.listings();
        listings.sort_by_key(|e| e.group.search_pass());
        Self::first_per_name(listings)
    }

    /// Brand names in dictionary iteration order.
    pub fn brand_names(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.name).collect()
    }

    /// Set of every known brand name.
    pub fn known_brands(&self) -> HashSet<String> {
        self.brand_names().into_iter().collect()
    }

    /// Group a brand is listed under, if any.
    pub fn group_of(&self, brand: &str) -> Option<BrandGroup> {
        self.entries()
            .into_iter()
            .find(|e| e.name == brand)
            .map(|e| e.group)
    }

    pub fn is_single_word(&self, brand: &str) -> bool {
        self.single_word_brands.iter().any(|b| b == brand)
    }

    /// Number of distinct brands.
    pub fn total_brands(&self) -> usize {
        self.entries().len()
    }

    /// Append newly discovered brands to the `domestic` group.
    ///
    /// Names already present in any group are ignored. Returns the number of
    /// brands added; `last_updated` is stamped only when something was added.
    pub fn merge_discovered(&mut self, discovered: &[String]) -> usize {
        let mut known = self.known_brands();
        let mut added = 0;

        for brand in discovered {
            let brand = brand.trim();
            if brand.is_empty() || known.contains(brand) {
                continue;
            }
            known.insert(brand.to_string());
            self.brands.domestic.push(brand.to_string());
            added += 1;
        }

        if added > 0 {
            self.last_updated = Some(serde_json::Value::String(Utc::now().to_rfc3339()));
        }
        added
    }
}

/// Errors that can occur while persisting the dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Dictionary I/O error: {0}")]
    Io(String),

    #[error("Dictionary serialization error: {0}")]
    Serialize(String),
}
