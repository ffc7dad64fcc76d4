use std::collections::HashSet;

use shared::{constants::csv_headers, domain::UploadedFile};

use super::{header_columns, validate_header_schema, ValidationDetails, ValidationResult};

pub const ERR_POLYGON_FILE_MISSING: &str = "polygonFileMissing";
pub const ERR_LAYER_FILE_MISSING: &str = "layerFileMissing";
pub const ERR_POLYGON_FILE_NOT_CSV: &str = "polygonFileNotCSVFormat";
pub const ERR_LAYER_FILE_NOT_CSV: &str = "layerFileNotCSVFormat";
pub const ERR_POLYGON_HEADER_MISMATCH: &str = "polygonHeaderMismatch";
pub const ERR_LAYER_HEADER_MISMATCH: &str = "layerHeaderMismatch";
pub const ERR_POLYGON_DUPLICATE_COLUMNS: &str = "polygonDuplicateColumns";
pub const ERR_LAYER_DUPLICATE_COLUMNS: &str = "layerDuplicateColumns";

pub fn is_csv(file: &UploadedFile) -> bool {
    let by_name = file.name.to_ascii_lowercase().ends_with(".csv");
    let by_mime = file
        .mime_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/csv"));
    by_name || by_mime
}

/// Presence first, then format, polygon before layer.
pub fn validate_files(
    polygon: Option<&UploadedFile>,
    layer: Option<&UploadedFile>,
) -> ValidationResult {
    let Some(polygon) = polygon else {
        return ValidationResult::invalid(ERR_POLYGON_FILE_MISSING);
    };
    let Some(layer) = layer else {
        return ValidationResult::invalid(ERR_LAYER_FILE_MISSING);
    };
    if !is_csv(polygon) {
        return ValidationResult::invalid(ERR_POLYGON_FILE_NOT_CSV);
    }
    if !is_csv(layer) {
        return ValidationResult::invalid(ERR_LAYER_FILE_NOT_CSV);
    }
    ValidationResult::valid()
}

pub fn duplicate_columns(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for column in header_columns(text) {
        if !seen.insert(column.clone()) && !duplicates.contains(&column) {
            duplicates.push(column);
        }
    }
    duplicates
}

fn validate_header(
    file: &UploadedFile,
    expected: &[&str],
    duplicate_error: &'static str,
    mismatch_error: &'static str,
) -> ValidationResult {
    let text = String::from_utf8_lossy(&file.file);
    let duplicates = duplicate_columns(&text);
    if !duplicates.is_empty() {
        return ValidationResult::invalid(duplicate_error)
            .with_details(ValidationDetails::DuplicateColumns(duplicates));
    }
    validate_header_schema(&text, expected, mismatch_error)
}

pub fn validate_polygon_header(file: &UploadedFile) -> ValidationResult {
    validate_header(
        file,
        &csv_headers::POLYGON,
        ERR_POLYGON_DUPLICATE_COLUMNS,
        ERR_POLYGON_HEADER_MISMATCH,
    )
}

pub fn validate_layer_header(file: &UploadedFile) -> ValidationResult {
    validate_header(
        file,
        &csv_headers::LAYER,
        ERR_LAYER_DUPLICATE_COLUMNS,
        ERR_LAYER_HEADER_MISMATCH,
    )
}

/// Everything the attachments panel checks before it can be confirmed.
pub fn validate_attachments(
    polygon: Option<&UploadedFile>,
    layer: Option<&UploadedFile>,
) -> ValidationResult {
    let files = validate_files(polygon, layer);
    if !files.is_valid {
        return files;
    }
    let (Some(polygon), Some(layer)) = (polygon, layer) else {
        return files;
    };
    ValidationResult::first_invalid([validate_polygon_header(polygon), validate_layer_header(layer)])
}
