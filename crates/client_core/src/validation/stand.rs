use shared::{constants::limits, domain::MinimumDbhLimit};

use super::{parse_number, validate_range, ValidationDetails, ValidationResult};
use crate::model::ModelParameters;

pub const ERR_PERCENT_STOCKABLE_AREA: &str = "percentStockableArea";
pub const ERR_BASAL_AREA: &str = "basalArea";
pub const ERR_TREES_PER_HECTARE: &str = "treesPerHectare";
pub const ERR_CROWN_CLOSURE: &str = "crownClosure";
pub const ERR_QUAD_DIAMETER: &str = "quadDiameter";

pub fn validate_stand_ranges(
    percent_stockable_area: Option<&str>,
    basal_area: Option<&str>,
    trees_per_hectare: Option<&str>,
    crown_closure: Option<&str>,
) -> ValidationResult {
    ValidationResult::first_invalid([
        validate_range(
            percent_stockable_area,
            limits::PERCENT_STOCKABLE_AREA,
            ERR_PERCENT_STOCKABLE_AREA,
        ),
        validate_range(basal_area, limits::BASAL_AREA, ERR_BASAL_AREA),
        validate_range(trees_per_hectare, limits::TREES_PER_HECTARE, ERR_TREES_PER_HECTARE),
        validate_range(crown_closure, limits::CROWN_CLOSURE, ERR_CROWN_CLOSURE),
    ])
}

/// Quadratic mean diameter implied by basal area and stem density, in cm.
pub fn quadratic_mean_diameter(basal_area: f64, trees_per_hectare: f64) -> Option<f64> {
    if basal_area <= 0.0 || trees_per_hectare <= 0.0 {
        return None;
    }
    Some((basal_area / trees_per_hectare / limits::QMD_BASAL_AREA_FACTOR).sqrt())
}

/// Skipped unless all three inputs are present.
pub fn validate_quad_diameter(
    basal_area: Option<&str>,
    trees_per_hectare: Option<&str>,
    min_dbh_limit: Option<MinimumDbhLimit>,
) -> ValidationResult {
    let (Some(basal_area), Some(tph), Some(limit)) = (
        basal_area.and_then(parse_number),
        trees_per_hectare.and_then(parse_number),
        min_dbh_limit,
    ) else {
        return ValidationResult::valid();
    };
    match quadratic_mean_diameter(basal_area, tph) {
        Some(diameter) if diameter < limit.centimetres() => ValidationResult::invalid(ERR_QUAD_DIAMETER)
            .with_details(ValidationDetails::QuadraticMeanDiameter {
                computed: diameter,
                minimum: limit.centimetres(),
            }),
        _ => ValidationResult::valid(),
    }
}

pub fn validate_stand_panel(params: &ModelParameters) -> ValidationResult {
    ValidationResult::first_invalid([
        validate_stand_ranges(
            params.percent_stockable_area.as_deref(),
            params.basal_area.as_deref(),
            params.trees_per_hectare.as_deref(),
            params.crown_closure.as_deref(),
        ),
        validate_quad_diameter(
            params.basal_area.as_deref(),
            params.trees_per_hectare.as_deref(),
            params.min_dbh_limit,
        ),
    ])
}
