use shared::{domain::PanelName, error::ServiceErrorBody};
use thiserror::Error;

use crate::validation::ValidationResult;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("panel '{0}' is not part of this workflow")]
    UnknownPanel(PanelName),
    #[error("panel '{panel}' cannot be confirmed before '{predecessor}'")]
    PredecessorUnconfirmed {
        panel: PanelName,
        predecessor: PanelName,
    },
    #[error("panel '{0}' is not open for editing")]
    NotEditable(PanelName),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("input rejected by validation ({})", .0.error_type.unwrap_or("invalid"))]
    Invalid(ValidationResult),
    #[error("{0} file is required")]
    MissingFile(&'static str),
    #[error("field '{field}' is not a number: '{value}'")]
    NotNumeric { field: &'static str, value: String },
    #[error("failed to encode projection parameters: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    #[error("result is not a valid archive: {0}")]
    InvalidArchive(String),
    #[error("result archive is missing required entries: {}", .0.join(", "))]
    MissingEntries(Vec<String>),
    #[error("archive entry '{name}' is not readable text: {reason}")]
    UnreadableEntry { name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request canceled")]
    Canceled,
    #[error("service rejected the request: {}", .0.summary())]
    Rejected(ServiceErrorBody),
    #[error("service responded with status {status}")]
    Status { status: u16, body: String },
    #[error("no response from service: {0}")]
    NoResponse(String),
    #[error("transport configuration error: {0}")]
    Configuration(String),
    #[error("failed to process service response: {0}")]
    Processing(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Rejected(_) => Some(400),
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("all panels must be confirmed before running the model")]
    NotReady,
}
