//! Eligibility engine
//!
//! Pure, deterministic partition of the catalog against one observed hair
//! profile. A record is eligible iff its hair-type set contains the observed
//! type AND its length set contains the observed length OR its density set
//! contains the observed density. The split is stable (catalog order) and
//! exhaustive — every record lands in exactly one half.

use crate::catalog::{Catalog, HairstyleRecord};
use crate::models::{HairDensity, HairLength, HairType};

/// The eligible/ineligible split of the catalog for one hair profile
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    pub eligible: Vec<&'a HairstyleRecord>,
    pub ineligible: Vec<&'a HairstyleRecord>,
}

/// Partition the catalog for the given observed attributes.
///
/// Face shape is present on every record but intentionally not consulted
/// here; see DESIGN.md.
pub fn partition(
    catalog: &Catalog,
    hair_type: HairType,
    hair_length: HairLength,
    hair_density: HairDensity,
) -> Partition<'_> {
    let mut eligible = Vec::new();
    let mut ineligible = Vec::new();

    for record in catalog.records() {
        let rule = &record.eligibility;
        let type_match = rule.matches_type(hair_type);
        let length_match = rule.matches_length(hair_length);
        let density_match = rule.matches_density(hair_density);

        if type_match && (length_match || density_match) {
            eligible.push(record);
        } else {
            ineligible.push(record);
        }
    }

    Partition {
        eligible,
        ineligible,
    }
}
