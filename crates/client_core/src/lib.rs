//! Client pipeline for yield projections: panel validation, request
//! building, submission and result decoding.

pub mod archive;
pub mod config;
pub mod error;
pub mod model;
pub mod notifications;
pub mod orchestrator;
pub mod panels;
pub mod request;
pub mod session_context;
pub mod transport;
pub mod validation;

pub use archive::{ReportState, ResultArchive};
pub use config::{load_settings, normalize_service_url, ClientSettings};
pub use error::{ArchiveError, BuildError, PanelError, ProjectionError, TransportError};
pub use model::{
    FileUploadParameters, GroupUtilization, ModelParameters, ReportToggles, ReportWindow,
};
pub use notifications::{Notification, Severity};
pub use orchestrator::{ProjectionInput, ProjectionOrchestrator, RunOutcome};
pub use panels::{PanelState, PanelStateMachine};
pub use request::ProjectionRequest;
pub use session_context::{MemorySessionStorage, SessionContext, SessionContextStore, SessionStorage};
pub use transport::{
    archive_file_name, ArchiveResponse, HttpProjectionTransport, ProjectionTransport, StaticTokenProvider,
    TokenProvider,
};
pub use validation::ValidationResult;
