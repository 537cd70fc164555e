//! Static hairstyle catalog
//!
//! The catalog is embedded at compile time and parsed once at startup; a
//! malformed record is fatal then, never at runtime. Records are ordered
//! and immutable for the life of the process.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{HairDensity, HairLength, HairType};

/// Embedded catalog source
const CATALOG_JSON: &str = include_str!("../assets/hairstyles.json");

/// Catalog load/validation errors (startup-fatal)
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate hairstyle id: {0}")]
    DuplicateId(String),

    #[error("hairstyle '{id}' has an empty eligibility set: {field}")]
    EmptyEligibility { id: String, field: &'static str },
}

/// Which hair profiles a style is suitable for
///
/// `face_shapes` is carried on every record but is not consulted by the
/// eligibility rule; see DESIGN.md.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRule {
    pub hair_types: Vec<HairType>,
    pub hair_lengths: Vec<HairLength>,
    pub face_shapes: Vec<String>,
    pub hair_densities: Vec<HairDensity>,
}

impl EligibilityRule {
    pub fn matches_type(&self, hair_type: HairType) -> bool {
        self.hair_types.contains(&hair_type)
    }

    pub fn matches_length(&self, hair_length: HairLength) -> bool {
        self.hair_lengths.contains(&hair_length)
    }

    pub fn matches_density(&self, hair_density: HairDensity) -> bool {
        self.hair_densities.contains(&hair_density)
    }
}

/// One catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HairstyleRecord {
    /// Unique key across the catalog
    pub id: String,
    pub name: String,
    pub image_ref: String,
    pub description: String,
    pub tags: Vec<String>,
    pub eligibility: EligibilityRule,
}

/// Ordered, immutable hairstyle catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<HairstyleRecord>,
}

impl Catalog {
    /// Parse and validate the embedded catalog
    pub fn load() -> Result<Self, CatalogError> {
        Self::from_json(CATALOG_JSON)
    }

    /// Parse and validate catalog records from JSON
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<HairstyleRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Validate an already-parsed record list
    pub fn from_records(records: Vec<HairstyleRecord>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for record in &records {
            if !seen.insert(record.id.clone()) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
            let rule = &record.eligibility;
            for (field, empty) in [
                ("hairTypes", rule.hair_types.is_empty()),
                ("hairLengths", rule.hair_lengths.is_empty()),
                ("faceShapes", rule.face_shapes.is_empty()),
                ("hairDensities", rule.hair_densities.is_empty()),
            ] {
                if empty {
                    return Err(CatalogError::EmptyEligibility {
                        id: record.id.clone(),
                        field,
                    });
                }
            }
        }
        Ok(Self { records })
    }

    /// All records in catalog order
    pub fn records(&self) -> &[HairstyleRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&HairstyleRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
