use shared::{constants::limits, domain::AgeYearRange};

use super::{
    validate_comparison, validate_required, validate_whole, validate_whole_range, RequiredField,
    ValidationResult,
};
use crate::model::ReportWindow;

pub const ERR_STARTING_AGE: &str = "startingAge";
pub const ERR_FINISHING_AGE: &str = "finishingAge";
pub const ERR_AGE_INCREMENT: &str = "ageIncrement";
pub const ERR_START_YEAR: &str = "startYear";
pub const ERR_END_YEAR: &str = "endYear";
pub const ERR_YEAR_INCREMENT: &str = "yearIncrement";
pub const ERR_SPECIFIC_YEAR: &str = "specificYear";
pub const ERR_FINISH_AGE_BEFORE_START: &str = "finishAgeBeforeStart";
pub const ERR_END_YEAR_BEFORE_START: &str = "endYearBeforeStart";
pub const ERR_REQUIRED_AGE_FIELDS: &str = "requiredAgeFields";
pub const ERR_REQUIRED_YEAR_FIELDS: &str = "requiredYearFields";
pub const ERR_AGE_YEAR_RANGE_REQUIRED: &str = "ageYearRangeRequired";
pub const ERR_REPORT_TITLE_REQUIRED: &str = "reportTitleRequired";
pub const ERR_PROJECTION_TYPE_REQUIRED: &str = "projectionTypeRequired";

pub fn validate_age_range(
    starting_age: Option<&str>,
    finishing_age: Option<&str>,
    age_increment: Option<&str>,
) -> ValidationResult {
    ValidationResult::first_invalid([
        validate_whole_range(starting_age, limits::STARTING_AGE, ERR_STARTING_AGE),
        validate_whole_range(finishing_age, limits::FINISHING_AGE, ERR_FINISHING_AGE),
        validate_whole_range(age_increment, limits::AGE_INCREMENT, ERR_AGE_INCREMENT),
    ])
}

pub fn validate_year_range(
    start_year: Option<&str>,
    end_year: Option<&str>,
    year_increment: Option<&str>,
) -> ValidationResult {
    ValidationResult::first_invalid([
        validate_whole_range(start_year, limits::START_YEAR, ERR_START_YEAR),
        validate_whole_range(end_year, limits::END_YEAR, ERR_END_YEAR),
        validate_whole_range(year_increment, limits::YEAR_INCREMENT, ERR_YEAR_INCREMENT),
    ])
}

pub fn validate_report_title(title: Option<&str>) -> ValidationResult {
    match title {
        Some(title) if !title.trim().is_empty() => ValidationResult::valid(),
        _ => ValidationResult::invalid(ERR_REPORT_TITLE_REQUIRED),
    }
}

pub fn validate_projection_type(projection_type: Option<&str>) -> ValidationResult {
    match projection_type {
        Some(value) if !value.trim().is_empty() => ValidationResult::valid(),
        _ => ValidationResult::invalid(ERR_PROJECTION_TYPE_REQUIRED),
    }
}

/// Checks the active window: every field filled, each a whole number inside
/// its bounds, end not before start.
pub fn validate_window(window: &ReportWindow) -> ValidationResult {
    let specific_year = validate_whole(window.specific_year.as_deref(), ERR_SPECIFIC_YEAR);
    if !specific_year.is_valid {
        return specific_year;
    }
    match window.selected {
        Some(AgeYearRange::Age) => {
            let start = window.starting_age.as_deref();
            let end = window.finishing_age.as_deref();
            let step = window.age_increment.as_deref();
            ValidationResult::first_invalid([
                validate_required(
                    &[
                        RequiredField::text(ERR_STARTING_AGE, start),
                        RequiredField::text(ERR_FINISHING_AGE, end),
                        RequiredField::text(ERR_AGE_INCREMENT, step),
                    ],
                    ERR_REQUIRED_AGE_FIELDS,
                ),
                validate_age_range(start, end, step),
                validate_comparison(start, end, ERR_FINISH_AGE_BEFORE_START),
            ])
        }
        Some(AgeYearRange::Year) => {
            let start = window.start_year.as_deref();
            let end = window.end_year.as_deref();
            let step = window.year_increment.as_deref();
            ValidationResult::first_invalid([
                validate_required(
                    &[
                        RequiredField::text(ERR_START_YEAR, start),
                        RequiredField::text(ERR_END_YEAR, end),
                        RequiredField::text(ERR_YEAR_INCREMENT, step),
                    ],
                    ERR_REQUIRED_YEAR_FIELDS,
                ),
                validate_year_range(start, end, step),
                validate_comparison(start, end, ERR_END_YEAR_BEFORE_START),
            ])
        }
        None => ValidationResult::invalid(ERR_AGE_YEAR_RANGE_REQUIRED),
    }
}

pub fn validate_report_panel(
    window: &ReportWindow,
    report_title: Option<&str>,
    projection_type: Option<&str>,
) -> ValidationResult {
    ValidationResult::first_invalid([
        validate_window(window),
        validate_report_title(report_title),
        validate_projection_type(projection_type),
    ])
}
