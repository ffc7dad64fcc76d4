use shared::{
    domain::AgeYearRange,
    protocol::{
        CombineAgeYearRange, MetadataToOutput, OutputFormat, ProjectionParameters,
        UtilizationParameter,
    },
};

use super::options::{
    debug_options, file_upload_execution_options, manual_execution_options, ExecutionOptions,
};
use crate::{
    error::BuildError,
    model::{FileUploadParameters, ModelParameters, ReportWindow, DEFAULT_REPORT_TITLE},
    validation::{is_blank, parse_number},
};

fn parse_whole(field: &'static str, value: Option<&str>) -> Result<Option<i64>, BuildError> {
    if is_blank(value) {
        return Ok(None);
    }
    let raw = value.unwrap_or_default();
    match parse_number(raw) {
        Some(number) if number.fract() == 0.0 => Ok(Some(number as i64)),
        _ => Err(BuildError::NotNumeric {
            field,
            value: raw.to_string(),
        }),
    }
}

/// Age and year triples. The inactive triple is all `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowFields {
    pub age: [Option<i64>; 3],
    pub year: [Option<i64>; 3],
    pub force_year: Option<i64>,
}

pub fn window_fields(window: &ReportWindow) -> Result<WindowFields, BuildError> {
    let mut fields = WindowFields {
        force_year: parse_whole("specificYear", window.specific_year.as_deref())?,
        ..WindowFields::default()
    };
    match window.selected {
        Some(AgeYearRange::Age) => {
            fields.age = [
                parse_whole("startingAge", window.starting_age.as_deref())?,
                parse_whole("finishingAge", window.finishing_age.as_deref())?,
                parse_whole("ageIncrement", window.age_increment.as_deref())?,
            ];
        }
        Some(AgeYearRange::Year) => {
            fields.year = [
                parse_whole("startYear", window.start_year.as_deref())?,
                parse_whole("endYear", window.end_year.as_deref())?,
                parse_whole("yearIncrement", window.year_increment.as_deref())?,
            ];
        }
        None => {}
    }
    Ok(fields)
}

fn assemble(
    output_format: OutputFormat,
    options: ExecutionOptions,
    window: WindowFields,
    report_title: Option<&str>,
    utils: Vec<UtilizationParameter>,
) -> ProjectionParameters {
    let debug = debug_options();
    let title = report_title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(DEFAULT_REPORT_TITLE);
    ProjectionParameters {
        output_format,
        selected_execution_options: options.selected.into_iter().collect(),
        excluded_execution_options: options.excluded.into_iter().collect(),
        selected_debug_options: debug.selected.into_iter().collect(),
        excluded_debug_options: debug.excluded.into_iter().collect(),
        age_start: window.age[0],
        age_end: window.age[1],
        age_increment: window.age[2],
        year_start: window.year[0],
        year_end: window.year[1],
        year_increment: window.year[2],
        force_year: window.force_year,
        report_title: Some(title.to_string()),
        combine_age_year_range: None,
        metadata_to_output: MetadataToOutput::None,
        utils,
    }
}

/// Manual runs ask for the human-readable text report.
pub fn manual_parameters(params: &ModelParameters) -> Result<ProjectionParameters, BuildError> {
    let utils = params
        .species_groups()
        .into_iter()
        .map(|group| UtilizationParameter {
            species_name: group.group,
            utilization_class: params
                .min_dbh_limit
                .unwrap_or(group.minimum_dbh_limit)
                .as_str()
                .to_string(),
        })
        .collect();
    Ok(assemble(
        OutputFormat::TextReport,
        manual_execution_options(params),
        window_fields(&params.window)?,
        params.report_title.as_deref(),
        utils,
    ))
}

/// Uploaded inputs produce a CSV yield table with one utilization per species group.
pub fn file_upload_parameters(
    params: &FileUploadParameters,
) -> Result<ProjectionParameters, BuildError> {
    let utils = params
        .group_utilizations
        .iter()
        .map(|entry| UtilizationParameter {
            species_name: entry.group.clone(),
            utilization_class: entry.minimum_dbh_limit.as_str().to_string(),
        })
        .collect();
    Ok(ProjectionParameters {
        combine_age_year_range: Some(CombineAgeYearRange::Intersect),
        metadata_to_output: MetadataToOutput::Version,
        ..assemble(
            OutputFormat::CsvYieldTable,
            file_upload_execution_options(params),
            window_fields(&params.window)?,
            params.report_title.as_deref(),
            utils,
        )
    })
}
