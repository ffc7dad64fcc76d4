use shared::domain::WorkflowVariant;
use tracing::{error, info};

use crate::{
    error::{ArchiveError, BuildError, PanelError, ProjectionError, TransportError},
    validation::{
        file_upload as fu, report as rpt, site, species, stand, ValidationDetails,
        ValidationResult,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-facing message produced at the orchestration boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn new(severity: Severity, title: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

pub mod service {
    pub const DEFAULT_TITLE: &str = "Service Error";
    pub const DEFAULT: &str = "Service Communication Error. Please try again later.";
    pub const REQUEST_CANCELED_TITLE: &str = "Request Canceled";
    pub const REQUEST_CANCELED: &str = "the request was canceled";
    pub const PROCESSING_ERROR_TITLE: &str = "Processing Error";
    pub const PROCESSING_ERROR: &str =
        "an unexpected error while processing the request. Please try again later.";

    /// (status, title, message)
    pub const BY_STATUS: &[(u16, &str, &str)] = &[
        (
            400,
            "Bad Request",
            "The request could not be processed. Please check the inputs and try again. (Error: Bad Request)",
        ),
        (
            401,
            "Unauthorized",
            "Your session is not authorized. Please log in again. (Error: Unauthorized)",
        ),
        (
            403,
            "Forbidden",
            "You do not have permission to perform this action. (Error: Forbidden)",
        ),
        (
            404,
            "Not Found",
            "The requested resource could not be found. (Error: Not Found)",
        ),
        (
            406,
            "Not Acceptable",
            "The service cannot produce a response in the requested format. (Error: Not Acceptable)",
        ),
        (
            408,
            "Request Timeout",
            "Request timed out. Please try again. (Error: Timeout)",
        ),
        (
            415,
            "Unsupported Media Type",
            "The uploaded content type is not supported. (Error: Unsupported Media Type)",
        ),
        (
            500,
            "Internal Server Error",
            "Service Internal Server Error. Please try again later.",
        ),
        (
            502,
            "Bad Gateway",
            "The server was unable to complete your request. Please try again later. (Error: Bad Gateway)",
        ),
        (
            503,
            "Service Unavailable",
            "The service is currently unavailable. Please try later. (Error: Unavailable)",
        ),
        (
            504,
            "Gateway Timeout",
            "The server did not respond in time. Please try again later. (Error: Gateway Timeout)",
        ),
    ];
}

pub mod success {
    pub const RUN_RESULT: &str =
        "Model run completed successfully. Please check the results in the report tab.";
    pub const FILE_UPLOAD_RUN_RESULT_WITH_ERRORS: &str =
        "File successfully downloaded with errors - check error log";
    pub const MODEL_PARAM_RUN_RESULT_WITH_ERRORS: &str =
        "Model run completed with errors - check error log";
}

pub const MISSING_RESPONSE_FILE: &str =
    "The response is missing one or more required files. Please contact support or try again later.";
pub const INVALID_RESPONSE_FILE: &str =
    "The response contains invalid or corrupted files. Please contact support or try again later.";
pub const FAIL_RUN_MODEL: &str = "Failed to run the projection model.";

/// Title and message for an HTTP status, falling back to the default with the code.
pub fn status_message(status: u16) -> (&'static str, String) {
    service::BY_STATUS
        .iter()
        .find(|(code, _, _)| *code == status)
        .map(|(_, title, message)| (*title, message.to_string()))
        .unwrap_or_else(|| {
            (
                service::DEFAULT_TITLE,
                format!("{} (Error Code: {status})", service::DEFAULT),
            )
        })
}

fn with_context(context: Option<&str>, message: &str) -> String {
    match context {
        Some(context) => format!("{context} due to {message}"),
        None => message.to_string(),
    }
}

pub fn for_transport(err: &TransportError, context: Option<&str>) -> Notification {
    match err {
        TransportError::Canceled => {
            let message = with_context(context, service::REQUEST_CANCELED);
            info!(%message, "request canceled");
            Notification::new(Severity::Info, service::REQUEST_CANCELED_TITLE, message)
        }
        TransportError::Rejected(body) => {
            let (title, fallback) = status_message(400);
            let detail = body.summary();
            let message = if detail.is_empty() { fallback } else { detail };
            error!(status = 400, %message, "service rejected projection");
            Notification::new(Severity::Error, title, with_context(context, &message))
        }
        TransportError::Status { status, body } => {
            let (title, message) = status_message(*status);
            error!(status, body = %body, "service error response");
            Notification::new(Severity::Error, title, with_context(context, &message))
        }
        TransportError::NoResponse(reason) => {
            let message = with_context(context, &format!("{} (Error: No Response)", service::DEFAULT));
            error!(%reason, "no response from service");
            Notification::new(Severity::Error, service::DEFAULT_TITLE, message)
        }
        TransportError::Configuration(reason) => {
            let message = with_context(
                context,
                &format!("{} (Error: Configuration Issue)", service::DEFAULT),
            );
            error!(%reason, "transport configuration error");
            Notification::new(Severity::Error, service::DEFAULT_TITLE, message)
        }
        TransportError::Processing(reason) => {
            error!(%reason, "failed to process service response");
            Notification::new(
                Severity::Error,
                service::PROCESSING_ERROR_TITLE,
                with_context(context, service::PROCESSING_ERROR),
            )
        }
    }
}

pub fn for_archive(err: &ArchiveError) -> Notification {
    error!(error = %err, "result archive rejected");
    match err {
        ArchiveError::MissingEntries(_) => {
            Notification::new(Severity::Error, "Missing File", MISSING_RESPONSE_FILE)
        }
        ArchiveError::InvalidArchive(_) | ArchiveError::UnreadableEntry { .. } => {
            Notification::new(Severity::Error, "Invalid File!", INVALID_RESPONSE_FILE)
        }
    }
}

/// Dialog title and message for a failed validation.
pub fn validation_message(result: &ValidationResult) -> Option<(&'static str, String)> {
    let error_type = result.error_type?;
    let range = |label: &str| match &result.details {
        Some(ValidationDetails::Range { min, max }) => format!("'{label}' must range from {min} and {max}"),
        Some(ValidationDetails::WholeNumber) => format!("'{label}' must be a whole number"),
        _ => format!("'{label}' is out of range"),
    };
    let entry = match error_type {
        species::ERR_SPECIES_PERCENT => ("Invalid Input!", "Please enter a value between 0 and 100".to_string()),
        species::ERR_DUPLICATE_SPECIES => {
            let code = match &result.details {
                Some(ValidationDetails::Duplicate(code)) => code.as_str(),
                _ => "",
            };
            ("Data Duplicated!", format!("Species '{code}' already specified"))
        }
        species::ERR_TOTAL_PERCENT => (
            "Data Incomplete!",
            "Species percentage must add up to a total of 100.0% in order to run a valid model".to_string(),
        ),
        species::ERR_DERIVED_BY_REQUIRED => (
            "Missing Information",
            "Input field - 'Species % derived by' - is missing essential information which must be filled in order to confirm and continue".to_string(),
        ),
        site::ERR_SPZ_AGE => ("Invalid Input!", range("Years")),
        site::ERR_SPZ_HEIGHT => ("Invalid Input!", range("Height in Meters")),
        site::ERR_BHA50_SITE_INDEX => ("Invalid Input!", range("BHA 50 Site Index")),
        site::ERR_SITE_REQUIRED_COMPUTED => (
            "Missing Information",
            "The site species must have Years/Height in Meters and BHA 50 Site Index values supplied".to_string(),
        ),
        site::ERR_SITE_REQUIRED_SUPPLIED => (
            "Missing Information",
            "The site species must have an BHA 50 Site Index value supplied".to_string(),
        ),
        site::ERR_SITE_SPECIES_VALUES_REQUIRED => (
            "Missing Information",
            "Please select a Site Index option ('Supplied' or 'Computed')".to_string(),
        ),
        site::ERR_BEC_ZONE_REQUIRED => ("Missing Information", "Please select a BEC Zone".to_string()),
        stand::ERR_PERCENT_STOCKABLE_AREA => ("Invalid Input!", range("Percent Stockable Area")),
        stand::ERR_BASAL_AREA => ("Invalid Input!", range("Basal Area")),
        stand::ERR_TREES_PER_HECTARE => ("Invalid Input!", range("Trees per Hectare")),
        stand::ERR_CROWN_CLOSURE => ("Invalid Input!", range("Crown Closure")),
        stand::ERR_QUAD_DIAMETER => {
            let detail = match &result.details {
                Some(ValidationDetails::QuadraticMeanDiameter { computed, minimum }) => format!(
                    "Quadratic Mean Diameter of {computed:.1} cm is below the {minimum:.1} cm minimum DBH limit"
                ),
                _ => "Quadratic Mean Diameter is below the minimum DBH limit".to_string(),
            };
            ("Invalid Input!", detail)
        }
        rpt::ERR_STARTING_AGE => ("Invalid Input!", range("Starting Age")),
        rpt::ERR_FINISHING_AGE => ("Invalid Input!", range("Finishing Age")),
        rpt::ERR_AGE_INCREMENT | rpt::ERR_YEAR_INCREMENT => ("Invalid Input!", range("Increment")),
        rpt::ERR_START_YEAR => ("Invalid Input!", range("Start Year")),
        rpt::ERR_END_YEAR => ("Invalid Input!", range("End Year")),
        rpt::ERR_SPECIFIC_YEAR => ("Invalid Input!", range("Specific Year")),
        rpt::ERR_FINISH_AGE_BEFORE_START => (
            "Invalid Input!",
            "'Finish Age' must be at least as great as the 'Start Age'".to_string(),
        ),
        rpt::ERR_END_YEAR_BEFORE_START => (
            "Invalid Input!",
            "'End Year' must be at least as great as the 'Start Year'".to_string(),
        ),
        rpt::ERR_REQUIRED_AGE_FIELDS => (
            "Missing Information",
            "All required fields (Starting Age, Finishing Age, Increment) must be filled.".to_string(),
        ),
        rpt::ERR_REQUIRED_YEAR_FIELDS => (
            "Missing Information",
            "All required fields (Start Year, End Year, Increment) must be filled.".to_string(),
        ),
        rpt::ERR_AGE_YEAR_RANGE_REQUIRED => (
            "Missing Information",
            "Please select an Age or Year range.".to_string(),
        ),
        rpt::ERR_REPORT_TITLE_REQUIRED => ("Missing Information", "Please enter a Report Title.".to_string()),
        rpt::ERR_PROJECTION_TYPE_REQUIRED => (
            "Missing Information",
            "Please select a Projection Type.".to_string(),
        ),
        fu::ERR_POLYGON_FILE_MISSING => (
            "Missing File",
            "Polygon file is missing. Please upload the required file.".to_string(),
        ),
        fu::ERR_LAYER_FILE_MISSING => (
            "Missing File",
            "Layer file is missing. Please upload the required file.".to_string(),
        ),
        fu::ERR_POLYGON_FILE_NOT_CSV => (
            "Invalid File!",
            "The uploaded Polygon file is not in CSV format. Please upload a valid CSV file.".to_string(),
        ),
        fu::ERR_LAYER_FILE_NOT_CSV => (
            "Invalid File!",
            "The uploaded Layer file is not in CSV format. Please upload a valid CSV file.".to_string(),
        ),
        fu::ERR_POLYGON_HEADER_MISMATCH => ("Polygon File Header Mismatch!", header_message("Polygon", result)),
        fu::ERR_LAYER_HEADER_MISMATCH => ("Layer File Header Mismatch!", header_message("Layer", result)),
        fu::ERR_POLYGON_DUPLICATE_COLUMNS => (
            "Polygon File Duplicate Columns!",
            "The Polygon file contains duplicate column names. Each column must have a unique name. Please fix the file and try again.".to_string(),
        ),
        fu::ERR_LAYER_DUPLICATE_COLUMNS => (
            "Layer File Duplicate Columns!",
            "The Layer file contains duplicate column names. Each column must have a unique name. Please fix the file and try again.".to_string(),
        ),
        other => ("Invalid Input!", format!("Invalid input ({other})")),
    };
    Some(entry)
}

fn header_message(kind: &str, result: &ValidationResult) -> String {
    let Some(ValidationDetails::Header(report)) = &result.details else {
        return format!("The {kind} file header does not match the expected columns.");
    };
    let mut parts = Vec::new();
    if !report.missing.is_empty() {
        parts.push(format!("missing: {}", report.missing.join(", ")));
    }
    if !report.extra.is_empty() {
        parts.push(format!("unexpected: {}", report.extra.join(", ")));
    }
    if !report.mismatches.is_empty() {
        parts.push(report.mismatches.join("; "));
    }
    format!("The {kind} file header does not match the expected columns ({})", parts.join(" | "))
}

pub fn for_validation(result: &ValidationResult) -> Option<Notification> {
    let (title, message) = validation_message(result)?;
    Some(Notification::new(Severity::Warning, title, message))
}

/// Success message for a completed run.
pub fn for_completion(variant: WorkflowVariant, with_errors: bool) -> Notification {
    match (variant, with_errors) {
        (_, false) => Notification::new(Severity::Success, "Success", success::RUN_RESULT),
        (WorkflowVariant::FileUpload, true) => Notification::new(
            Severity::Warning,
            "Completed With Errors",
            success::FILE_UPLOAD_RUN_RESULT_WITH_ERRORS,
        ),
        (WorkflowVariant::ModelParameters, true) => Notification::new(
            Severity::Warning,
            "Completed With Errors",
            success::MODEL_PARAM_RUN_RESULT_WITH_ERRORS,
        ),
    }
}

/// Converts any pipeline failure into the notification shown to the user.
pub fn for_projection_error(err: &ProjectionError) -> Notification {
    match err {
        ProjectionError::Transport(err) => for_transport(err, Some(FAIL_RUN_MODEL)),
        ProjectionError::Archive(err) => for_archive(err),
        ProjectionError::Build(BuildError::Invalid(result)) => for_validation(result)
            .unwrap_or_else(|| Notification::new(Severity::Warning, "Invalid Input!", FAIL_RUN_MODEL)),
        ProjectionError::Build(err) => {
            error!(error = %err, "failed to build projection request");
            Notification::new(Severity::Error, "Invalid Input!", format!("{FAIL_RUN_MODEL} {err}"))
        }
        ProjectionError::Panel(PanelError::PredecessorUnconfirmed { predecessor, .. }) => Notification::new(
            Severity::Warning,
            "Data Incomplete!",
            format!("Please confirm '{predecessor}' first."),
        ),
        ProjectionError::Panel(err) => Notification::new(Severity::Warning, "Invalid Input!", err.to_string()),
        ProjectionError::NotReady => Notification::new(
            Severity::Warning,
            "Data Incomplete!",
            "All panels must be confirmed before running the model.",
        ),
    }
}

#[cfg(test)]
#[path = "tests/notifications_tests.rs"]
mod tests;
