//! Single-rule validators. Every function here is total: it reports an
//! invalid input through [`ValidationResult`] and never returns an error.

use std::collections::HashSet;

use shared::{
    constants::{csv_headers::DELIMITER, Bounds},
    domain::SpeciesEntry,
};

pub mod file_upload;
pub mod report;
pub mod site;
pub mod species;
pub mod stand;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationDetails {
    Range { min: f64, max: f64 },
    MissingFields(Vec<&'static str>),
    Duplicate(String),
    Header(HeaderReport),
    DuplicateColumns(Vec<String>),
    QuadraticMeanDiameter { computed: f64, minimum: f64 },
    WholeNumber,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_type: Option<&'static str>,
    pub details: Option<ValidationDetails>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_type: None,
            details: None,
        }
    }

    pub fn invalid(error_type: &'static str) -> Self {
        Self {
            is_valid: false,
            error_type: Some(error_type),
            details: None,
        }
    }

    pub fn with_details(mut self, details: ValidationDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Returns the first invalid result, or a valid one when every check passed.
    pub fn first_invalid(results: impl IntoIterator<Item = ValidationResult>) -> Self {
        results
            .into_iter()
            .find(|result| !result.is_valid)
            .unwrap_or_else(Self::valid)
    }
}

/// Positional and set comparison of a header row against an expected schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderReport {
    pub missing: Vec<String>,
    pub extra: Vec<String>,
    pub mismatches: Vec<String>,
}

impl HeaderReport {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty() && self.mismatches.is_empty()
    }
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

pub(crate) fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Blank, or a number equal to zero.
pub(crate) fn is_empty_or_zero(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) if v.trim().is_empty() => true,
        Some(v) => parse_number(v) == Some(0.0),
    }
}

/// Absent values are valid. Present values must parse and fall inside `bounds`.
pub fn validate_range(
    value: Option<&str>,
    bounds: Bounds,
    error_type: &'static str,
) -> ValidationResult {
    if is_blank(value) {
        return ValidationResult::valid();
    }
    match value.and_then(parse_number) {
        Some(number) if bounds.contains(number) => ValidationResult::valid(),
        _ => ValidationResult::invalid(error_type).with_details(ValidationDetails::Range {
            min: bounds.min,
            max: bounds.max,
        }),
    }
}

/// Like [`validate_range`], and the value must also have no fractional part.
pub fn validate_whole_range(
    value: Option<&str>,
    bounds: Bounds,
    error_type: &'static str,
) -> ValidationResult {
    let result = validate_range(value, bounds, error_type);
    if !result.is_valid {
        return result;
    }
    validate_whole(value, error_type)
}

/// Absent values are valid. Present values must be integers.
pub fn validate_whole(value: Option<&str>, error_type: &'static str) -> ValidationResult {
    if is_blank(value) {
        return ValidationResult::valid();
    }
    match value.and_then(parse_number) {
        Some(number) if number.fract() == 0.0 => ValidationResult::valid(),
        _ => ValidationResult::invalid(error_type).with_details(ValidationDetails::WholeNumber),
    }
}

/// `end >= start`, tolerating an absent operand on either side.
pub fn validate_comparison(
    start: Option<&str>,
    end: Option<&str>,
    error_type: &'static str,
) -> ValidationResult {
    if is_blank(start) || is_blank(end) {
        return ValidationResult::valid();
    }
    match (start.and_then(parse_number), end.and_then(parse_number)) {
        (Some(start), Some(end)) if end >= start => ValidationResult::valid(),
        _ => ValidationResult::invalid(error_type),
    }
}

/// A field checked by [`validate_required`].
#[derive(Debug, Clone, Copy)]
pub struct RequiredField<'a> {
    pub name: &'static str,
    pub value: Option<&'a str>,
    pub zero_is_unset: bool,
}

impl<'a> RequiredField<'a> {
    pub fn text(name: &'static str, value: Option<&'a str>) -> Self {
        Self {
            name,
            value,
            zero_is_unset: false,
        }
    }

    /// A measurement where zero means "not known".
    pub fn magnitude(name: &'static str, value: Option<&'a str>) -> Self {
        Self {
            name,
            value,
            zero_is_unset: true,
        }
    }

    fn is_unset(&self) -> bool {
        if self.zero_is_unset {
            is_empty_or_zero(self.value)
        } else {
            is_blank(self.value)
        }
    }
}

pub fn validate_required(fields: &[RequiredField<'_>], error_type: &'static str) -> ValidationResult {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|field| field.is_unset())
        .map(|field| field.name)
        .collect();
    if missing.is_empty() {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(error_type).with_details(ValidationDetails::MissingFields(missing))
    }
}

/// First code seen more than once. Empty codes never count.
pub fn find_duplicate_code<'a, I>(codes: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut seen = HashSet::new();
    codes
        .into_iter()
        .flatten()
        .filter(|code| !code.trim().is_empty())
        .find(|code| !seen.insert(*code))
}

pub fn validate_duplicates(entries: &[SpeciesEntry], error_type: &'static str) -> ValidationResult {
    match find_duplicate_code(entries.iter().map(|entry| entry.code.as_deref())) {
        Some(code) => ValidationResult::invalid(error_type)
            .with_details(ValidationDetails::Duplicate(code.to_string())),
        None => ValidationResult::valid(),
    }
}

/// The displayed total must read exactly `limit`, and the raw sum must equal it too.
pub fn validate_total_percent(
    display_total: &str,
    percents: &[Option<&str>],
    limit: &str,
    error_type: &'static str,
) -> ValidationResult {
    let Some(limit_value) = parse_number(limit) else {
        return ValidationResult::invalid(error_type);
    };
    let sum: f64 = percents
        .iter()
        .filter_map(|percent| percent.and_then(parse_number))
        .sum();
    if display_total == limit && (sum - limit_value).abs() < 1e-6 {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(error_type)
    }
}

/// Splits the first line of `text` into trimmed column names.
pub fn header_columns(text: &str) -> Vec<String> {
    let first = text.lines().next().unwrap_or_default();
    let first = first.strip_prefix('\u{feff}').unwrap_or(first);
    if first.trim().is_empty() {
        return Vec::new();
    }
    first
        .split(DELIMITER)
        .map(|column| column.trim().to_string())
        .collect()
}

pub fn compare_header(text: &str, expected: &[&str]) -> HeaderReport {
    let actual = header_columns(text);
    let actual_set: HashSet<&str> = actual.iter().map(String::as_str).collect();
    let expected_set: HashSet<&str> = expected.iter().copied().collect();

    let missing = expected
        .iter()
        .filter(|column| !actual_set.contains(**column))
        .map(|column| column.to_string())
        .collect();
    let extra = actual
        .iter()
        .filter(|column| !expected_set.contains(column.as_str()))
        .cloned()
        .collect();
    let mismatches = if actual.len() == expected.len() {
        actual
            .iter()
            .zip(expected)
            .enumerate()
            .filter(|(_, (found, wanted))| found.as_str() != **wanted)
            .map(|(index, (found, wanted))| {
                format!("column {}: expected {wanted} found {found}", index + 1)
            })
            .collect()
    } else {
        Vec::new()
    };

    HeaderReport {
        missing,
        extra,
        mismatches,
    }
}

pub fn validate_header_schema(
    text: &str,
    expected: &[&str],
    error_type: &'static str,
) -> ValidationResult {
    let report = compare_header(text, expected);
    if report.is_valid() {
        ValidationResult::valid().with_details(ValidationDetails::Header(report))
    } else {
        ValidationResult::invalid(error_type).with_details(ValidationDetails::Header(report))
    }
}

#[cfg(test)]
#[path = "../tests/validation_tests.rs"]
mod tests;
