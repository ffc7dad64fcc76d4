use shared::{constants::limits, domain::SiteSpeciesValues};

use super::{validate_range, validate_required, RequiredField, ValidationResult};
use crate::model::ModelParameters;

pub const ERR_SPZ_AGE: &str = "spzAge";
pub const ERR_SPZ_HEIGHT: &str = "spzHeight";
pub const ERR_BHA50_SITE_INDEX: &str = "bha50SiteIndex";
pub const ERR_SITE_REQUIRED_COMPUTED: &str = "siteRequiredComputed";
pub const ERR_SITE_REQUIRED_SUPPLIED: &str = "siteRequiredSupplied";
pub const ERR_SITE_SPECIES_VALUES_REQUIRED: &str = "siteSpeciesValuesRequired";
pub const ERR_BEC_ZONE_REQUIRED: &str = "becZoneRequired";

/// Computed sites need age, height and index; supplied sites need the index.
/// A zero counts as not known. An unset selection imposes nothing.
pub fn validate_site_required(
    site_species_values: Option<SiteSpeciesValues>,
    spz_age: Option<&str>,
    spz_height: Option<&str>,
    bha50_site_index: Option<&str>,
) -> ValidationResult {
    match site_species_values {
        Some(SiteSpeciesValues::Computed) => validate_required(
            &[
                RequiredField::magnitude("spzAge", spz_age),
                RequiredField::magnitude("spzHeight", spz_height),
                RequiredField::magnitude("bha50SiteIndex", bha50_site_index),
            ],
            ERR_SITE_REQUIRED_COMPUTED,
        ),
        Some(SiteSpeciesValues::Supplied) => validate_required(
            &[RequiredField::magnitude("bha50SiteIndex", bha50_site_index)],
            ERR_SITE_REQUIRED_SUPPLIED,
        ),
        None => ValidationResult::valid(),
    }
}

pub fn validate_site_ranges(
    spz_age: Option<&str>,
    spz_height: Option<&str>,
    bha50_site_index: Option<&str>,
) -> ValidationResult {
    ValidationResult::first_invalid([
        validate_range(spz_age, limits::SPZ_AGE, ERR_SPZ_AGE),
        validate_range(spz_height, limits::SPZ_HEIGHT, ERR_SPZ_HEIGHT),
        validate_range(bha50_site_index, limits::BHA50_SITE_INDEX, ERR_BHA50_SITE_INDEX),
    ])
}

pub fn validate_pre_confirm(
    site_species_values: Option<SiteSpeciesValues>,
    bec_zone: Option<&str>,
) -> ValidationResult {
    if site_species_values.is_none() {
        return ValidationResult::invalid(ERR_SITE_SPECIES_VALUES_REQUIRED);
    }
    if bec_zone.map_or(true, |zone| zone.trim().is_empty()) {
        return ValidationResult::invalid(ERR_BEC_ZONE_REQUIRED);
    }
    ValidationResult::valid()
}

pub fn validate_site_panel(params: &ModelParameters) -> ValidationResult {
    let age = params.spz_age.as_deref();
    let height = params.spz_height.as_deref();
    let index = params.bha50_site_index.as_deref();
    ValidationResult::first_invalid([
        validate_pre_confirm(params.site_species_values, params.bec_zone.as_deref()),
        validate_site_required(params.site_species_values, age, height, index),
        validate_site_ranges(age, height, index),
    ])
}
