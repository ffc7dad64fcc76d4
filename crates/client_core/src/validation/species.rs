use shared::{constants::limits, domain::SpeciesEntry};

use super::{validate_duplicates, validate_range, validate_total_percent, ValidationResult};
use crate::model::ModelParameters;

pub const ERR_SPECIES_PERCENT: &str = "speciesPercent";
pub const ERR_DUPLICATE_SPECIES: &str = "duplicateSpecies";
pub const ERR_TOTAL_PERCENT: &str = "totalPercent";
pub const ERR_DERIVED_BY_REQUIRED: &str = "derivedByRequired";

pub fn validate_species_percent(percent: Option<&str>) -> ValidationResult {
    validate_range(percent, limits::SPECIES_PERCENT, ERR_SPECIES_PERCENT)
}

pub fn validate_duplicate_species(entries: &[SpeciesEntry]) -> ValidationResult {
    validate_duplicates(entries, ERR_DUPLICATE_SPECIES)
}

pub fn validate_total_species_percent(
    display_total: &str,
    percents: &[Option<&str>],
) -> ValidationResult {
    validate_total_percent(
        display_total,
        percents,
        limits::TOTAL_SPECIES_PERCENT,
        ERR_TOTAL_PERCENT,
    )
}

/// All checks gating confirmation of the species panel.
pub fn validate_species_panel(params: &ModelParameters) -> ValidationResult {
    let mut results: Vec<ValidationResult> = params
        .species_list
        .iter()
        .map(|entry| validate_species_percent(entry.percent.as_deref()))
        .collect();
    results.push(validate_duplicate_species(&params.species_list));
    results.push(validate_total_species_percent(
        &params.total_species_percent(),
        &params.species_percents(),
    ));
    results.push(if params.derived_by.is_some() {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(ERR_DERIVED_BY_REQUIRED)
    });
    ValidationResult::first_invalid(results)
}
