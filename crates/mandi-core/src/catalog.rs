//! Immutable crop reference table with name lookup.

use crate::{validate_crop, CropRecord, DemandLevel, ValidationError};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

/// Errors from catalog lookup and configuration loading.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("crop '{query}' not found. Available: {}", .available.join(", "))]
    UnknownCrop {
        query: String,
        available: Vec<String>,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("io error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for CatalogError {
    fn from(e: serde_yaml::Error) -> Self {
        CatalogError::Parse(e.to_string())
    }
}

/// Ordered, validated set of crops. Built once and shared read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CropCatalog {
    crops: Vec<CropRecord>,
}

impl CropCatalog {
    /// Build a catalog, rejecting blank names, non-positive prices and
    /// case-insensitive duplicates.
    pub fn new(crops: Vec<CropRecord>) -> Result<Self, ValidationError> {
        let mut seen = BTreeSet::new();
        for c in &crops {
            validate_crop(c)?;
            if !seen.insert(c.name.trim().to_lowercase()) {
                return Err(ValidationError::DuplicateCrop(c.name.clone()));
            }
        }
        Ok(Self { crops })
    }

    /// The fifteen APMC reference crops.
    pub fn builtin() -> Self {
        Self {
            crops: builtin_crops(),
        }
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CropRecord> {
        self.crops.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.crops.iter().map(|c| c.name.clone()).collect()
    }

    /// Exact, case-insensitive match on the trimmed name.
    pub fn get(&self, name: &str) -> Option<&CropRecord> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.crops.iter().find(|c| c.name.trim().to_lowercase() == needle)
    }

    /// Resolve free-text input to a crop.
    ///
    /// Exact matches win. Otherwise the first crop (in catalog order) whose
    /// name contains the query, or is contained in it, is returned, so
    /// "tomatoes" and "chili" both resolve.
    pub fn find(&self, query: &str) -> Result<&CropRecord, CatalogError> {
        if let Some(c) = self.get(query) {
            return Ok(c);
        }
        let needle = query.trim().to_lowercase();
        let hit = if needle.is_empty() {
            None
        } else {
            self.crops.iter().find(|c| {
                let name = c.name.to_lowercase();
                name.contains(&needle) || needle.contains(&name)
            })
        };
        match hit {
            Some(c) => {
                debug!(query, crop = %c.name, "partial crop match");
                Ok(c)
            }
            None => Err(CatalogError::UnknownCrop {
                query: query.to_string(),
                available: self.names(),
            }),
        }
    }

    pub fn into_records(self) -> Vec<CropRecord> {
        self.crops
    }
}

pub(crate) fn builtin_crops() -> Vec<CropRecord> {
    use DemandLevel::*;
    [
        ("Tomato", 20, High),
        ("Onion", 35, Medium),
        ("Potato", 18, Low),
        ("Wheat", 22, High),
        ("Rice", 28, High),
        ("Carrot", 25, Medium),
        ("Cabbage", 15, Low),
        ("Cauliflower", 30, High),
        ("Brinjal", 22, Medium),
        ("Okra", 40, High),
        ("Green Chili", 60, High),
        ("Coriander", 80, Medium),
        ("Spinach", 20, Low),
        ("Garlic", 120, High),
        ("Ginger", 100, Medium),
    ]
    .into_iter()
    .map(|(name, price, demand)| CropRecord::new(name, price).with_demand(demand))
    .collect()
}
