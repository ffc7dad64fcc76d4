//! Composition root: panel confirmations feed the request builder, the
//! transport carries the request and the archive decoder fills the report.

use std::{future::Future, sync::Arc};

use shared::domain::{ModelSelection, PanelName, ViewMode, WorkflowVariant};
use tracing::{info, warn};

use crate::{
    archive::{ReportState, ResultArchive},
    error::{BuildError, ProjectionError, TransportError},
    model::{FileUploadParameters, ModelParameters},
    notifications::{self, Notification},
    panels::{PanelState, PanelStateMachine},
    request::{
        build_file_upload_request, build_manual_request, output_format_for, IdSource,
        ProjectionRequest, RandomIdSource,
    },
    session_context::{SessionContext, SessionContextStore, SessionStorage},
    transport::ProjectionTransport,
    validation::{file_upload, report, site, species, stand, ValidationResult},
};

/// Input state of the active workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionInput {
    Manual(ModelParameters),
    FileUpload(FileUploadParameters),
}

impl ProjectionInput {
    pub fn with_defaults(variant: WorkflowVariant) -> Self {
        match variant {
            WorkflowVariant::ModelParameters => Self::Manual(ModelParameters::with_defaults()),
            WorkflowVariant::FileUpload => Self::FileUpload(FileUploadParameters::with_defaults()),
        }
    }

    pub fn variant(&self) -> WorkflowVariant {
        match self {
            Self::Manual(_) => WorkflowVariant::ModelParameters,
            Self::FileUpload(_) => WorkflowVariant::FileUpload,
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Manual(params) => params.clear(),
            Self::FileUpload(params) => params.clear(),
        }
    }

    /// Runs the validators behind one panel's confirm button.
    pub fn validate_panel(&self, panel: PanelName) -> ValidationResult {
        match (self, panel) {
            (Self::Manual(params), PanelName::SpeciesInfo) => species::validate_species_panel(params),
            (Self::Manual(params), PanelName::SiteInfo) => site::validate_site_panel(params),
            (Self::Manual(params), PanelName::StandInfo) => stand::validate_stand_panel(params),
            (Self::Manual(params), PanelName::ReportInfo) => report::validate_report_panel(
                &params.window,
                params.report_title.as_deref(),
                params.projection_type.map(|t| t.as_str()),
            ),
            (Self::FileUpload(params), PanelName::ReportInfo) => report::validate_report_panel(
                &params.window,
                params.report_title.as_deref(),
                params.projection_type.map(|t| t.as_str()),
            ),
            (Self::FileUpload(params), PanelName::Attachments) => file_upload::validate_attachments(
                params.polygon_file.as_ref(),
                params.layer_file.as_ref(),
            ),
            // Panels outside the workflow are rejected by the state machine.
            _ => ValidationResult::valid(),
        }
    }

    fn validate_all(&self) -> ValidationResult {
        ValidationResult::first_invalid(
            self.variant()
                .panel_order()
                .iter()
                .map(|panel| self.validate_panel(*panel)),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// The service answered but wrote to its error log.
    CompletedWithErrors,
}

pub struct ProjectionOrchestrator<S: SessionStorage> {
    panels: PanelStateMachine,
    input: ProjectionInput,
    report: ReportState,
    session: SessionContextStore<S>,
    transport: Arc<dyn ProjectionTransport>,
    ids: Box<dyn IdSource + Send>,
}

impl<S: SessionStorage> ProjectionOrchestrator<S> {
    /// Starts a new projection and records it in the session store.
    pub fn new(
        selection: ModelSelection,
        transport: Arc<dyn ProjectionTransport>,
        storage: S,
    ) -> Self {
        let session = SessionContextStore::new(storage);
        session.save_new(selection);
        Self::from_session(selection, transport, session)
    }

    /// Rebuilds a new-projection workflow saved before a reload. Existing
    /// projections and missing or rejected contexts give `None`.
    pub fn resume(transport: Arc<dyn ProjectionTransport>, storage: S) -> Option<Self> {
        let session = SessionContextStore::new(storage);
        let SessionContext::NewProjection { model_selection } = session.load()? else {
            return None;
        };
        Some(Self::from_session(model_selection, transport, session))
    }

    fn from_session(
        selection: ModelSelection,
        transport: Arc<dyn ProjectionTransport>,
        session: SessionContextStore<S>,
    ) -> Self {
        let variant = WorkflowVariant::from(selection);
        Self {
            panels: PanelStateMachine::new(variant),
            input: ProjectionInput::with_defaults(variant),
            report: ReportState::default(),
            session,
            transport,
            ids: Box::new(RandomIdSource),
        }
    }

    pub fn with_id_source(mut self, ids: Box<dyn IdSource + Send>) -> Self {
        self.ids = ids;
        self
    }

    pub fn variant(&self) -> WorkflowVariant {
        self.panels.variant()
    }

    pub fn panels(&self) -> &[PanelState] {
        self.panels.panels()
    }

    pub fn panel(&self, name: PanelName) -> Option<PanelState> {
        self.panels.panel(name)
    }

    pub fn is_ready_to_submit(&self) -> bool {
        self.panels.is_ready_to_submit()
    }

    pub fn input(&self) -> &ProjectionInput {
        &self.input
    }

    pub fn manual_parameters_mut(&mut self) -> Option<&mut ModelParameters> {
        match &mut self.input {
            ProjectionInput::Manual(params) => Some(params),
            ProjectionInput::FileUpload(_) => None,
        }
    }

    pub fn file_upload_parameters_mut(&mut self) -> Option<&mut FileUploadParameters> {
        match &mut self.input {
            ProjectionInput::FileUpload(params) => Some(params),
            ProjectionInput::Manual(_) => None,
        }
    }

    pub fn report(&self) -> Option<&ResultArchive> {
        self.report.current()
    }

    pub fn session(&self) -> &SessionContextStore<S> {
        &self.session
    }

    /// Validates the panel's inputs, then confirms it.
    pub fn confirm_panel(&mut self, name: PanelName) -> Result<(), ProjectionError> {
        let result = self.input.validate_panel(name);
        if !result.is_valid {
            warn!(panel = %name, error_type = result.error_type.unwrap_or_default(), "panel rejected");
            return Err(BuildError::Invalid(result).into());
        }
        self.panels.confirm_panel(name)?;
        Ok(())
    }

    pub fn edit_panel(&mut self, name: PanelName) -> Result<(), ProjectionError> {
        self.panels.edit_panel(name)?;
        Ok(())
    }

    /// Empties the inputs, closes every panel but the first and drops the report.
    pub fn clear(&mut self) {
        self.input.clear();
        self.panels.reset();
        self.report.clear();
        info!(variant = ?self.variant(), "projection cleared");
    }

    /// Records that the user is navigating to a saved projection.
    pub fn open_existing(&self, guid: &str, view_mode: ViewMode) {
        self.session.save_existing(guid, view_mode);
    }

    pub fn leave(&self) {
        self.session.clear();
    }

    fn build_request(&mut self) -> Result<ProjectionRequest, ProjectionError> {
        let result = self.input.validate_all();
        if !result.is_valid {
            return Err(BuildError::Invalid(result).into());
        }
        let request = match &self.input {
            ProjectionInput::Manual(params) => build_manual_request(params, self.ids.as_mut())?,
            ProjectionInput::FileUpload(params) => build_file_upload_request(params)?,
        };
        Ok(request)
    }

    /// Submits the confirmed inputs and replaces the report with the answer.
    ///
    /// The previous report stays in place when any step fails.
    pub async fn run(&mut self, trial_run: bool) -> Result<RunOutcome, ProjectionError> {
        if !self.panels.is_ready_to_submit() {
            return Err(ProjectionError::NotReady);
        }
        let request = self.build_request()?;
        let format = output_format_for(self.variant());
        info!(
            variant = ?self.variant(),
            format = ?format,
            trial_run,
            "submitting projection"
        );

        let response = self.transport.submit(&request, trial_run).await?;
        let archive = self
            .report
            .replace_with(&response.bytes, &response.file_name, format)?;

        let outcome = if archive.has_errors() {
            RunOutcome::CompletedWithErrors
        } else {
            RunOutcome::Completed
        };
        info!(
            outcome = ?outcome,
            archive = %archive.file_name,
            log_lines = archive.log_lines.len(),
            "projection completed"
        );
        Ok(outcome)
    }

    /// Like [`run`](Self::run), abandoned with [`TransportError::Canceled`]
    /// once `cancel` resolves.
    pub async fn run_until<F>(&mut self, trial_run: bool, cancel: F) -> Result<RunOutcome, ProjectionError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.run(trial_run) => result,
            _ = cancel => {
                warn!("projection run canceled");
                Err(TransportError::Canceled.into())
            }
        }
    }

    /// Runs and turns the result into the message shown to the user.
    pub async fn run_and_notify(&mut self, trial_run: bool) -> Notification {
        match self.run(trial_run).await {
            Ok(outcome) => notifications::for_completion(
                self.variant(),
                outcome == RunOutcome::CompletedWithErrors,
            ),
            Err(err) => notifications::for_projection_error(&err),
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
