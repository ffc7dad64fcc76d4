//! Turns validated in-memory state into the multipart submission.
//!
//! Callers run the panel validators first; nothing here re-checks ranges.

use shared::{
    constants::file_name,
    domain::{UploadedFile, WorkflowVariant},
    protocol::{OutputFormat, ProjectionParameters},
};

use crate::{
    error::BuildError,
    model::{FileUploadParameters, ModelParameters},
};

pub mod csv;
pub mod options;
pub mod params;

pub use csv::{build_input_files, restore_from_csv, GeneratedInputs, IdSource, RandomIdSource};
pub use options::{
    debug_options, file_upload_execution_options, manual_execution_options, DebugOptions,
    ExecutionOptions,
};
pub use params::{file_upload_parameters, manual_parameters};

/// Output format requested by each workflow.
pub fn output_format_for(variant: WorkflowVariant) -> OutputFormat {
    match variant {
        WorkflowVariant::ModelParameters => OutputFormat::TextReport,
        WorkflowVariant::FileUpload => OutputFormat::CsvYieldTable,
    }
}

/// Everything the transport sends: the parameter blob and both input tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRequest {
    pub parameters: ProjectionParameters,
    pub polygon: UploadedFile,
    pub layer: UploadedFile,
}

impl ProjectionRequest {
    pub fn parameters_json(&self) -> Result<Vec<u8>, BuildError> {
        serde_json::to_vec(&self.parameters).map_err(|e| BuildError::Encode(e.to_string()))
    }

    pub fn output_format(&self) -> OutputFormat {
        self.parameters.output_format
    }
}

pub fn build_manual_request(
    params: &ModelParameters,
    ids: &mut dyn IdSource,
) -> Result<ProjectionRequest, BuildError> {
    let parameters = manual_parameters(params)?;
    let inputs = build_input_files(params, ids);
    Ok(ProjectionRequest {
        parameters,
        polygon: UploadedFile::csv(inputs.polygon_csv.into_bytes(), file_name::POLYGON_INPUT),
        layer: UploadedFile::csv(inputs.layer_csv.into_bytes(), file_name::LAYER_INPUT),
    })
}

pub fn build_file_upload_request(
    params: &FileUploadParameters,
) -> Result<ProjectionRequest, BuildError> {
    let polygon = params
        .polygon_file
        .clone()
        .ok_or(BuildError::MissingFile("polygon"))?;
    let layer = params
        .layer_file
        .clone()
        .ok_or(BuildError::MissingFile("layer"))?;
    Ok(ProjectionRequest {
        parameters: file_upload_parameters(params)?,
        polygon,
        layer,
    })
}

#[cfg(test)]
#[path = "../tests/request_tests.rs"]
mod tests;
