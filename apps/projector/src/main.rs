use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    archive_file_name, load_settings, normalize_service_url, notifications, HttpProjectionTransport,
    MemorySessionStorage, Notification, ProjectionOrchestrator, ProjectionTransport,
    ResultArchive, RunOutcome, Severity, StaticTokenProvider,
};
use shared::{
    constants::file_name,
    domain::{ModelSelection, ProjectionType, SpeciesEntry, UploadedFile, WorkflowVariant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Submit a yield projection and save the returned report")]
struct Args {
    /// Overrides `service_url` from projector.toml and the environment.
    #[arg(long)]
    service_url: Option<String>,
    #[arg(long)]
    trial_run: bool,
    #[arg(long)]
    output_dir: Option<PathBuf>,
    #[arg(long)]
    title: Option<String>,
    /// Project CFS biomass instead of volume.
    #[arg(long)]
    biomass: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project a single stand described on the command line.
    Manual {
        /// Species composition as CODE=PERCENT, repeatable. Defaults to the sample stand.
        #[arg(long = "species", value_parser = parse_species)]
        species: Vec<SpeciesEntry>,
        #[arg(long)]
        bec_zone: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        height: Option<String>,
    },
    /// Project the polygons and layers of two CSV files.
    Upload {
        #[arg(long)]
        polygon: PathBuf,
        #[arg(long)]
        layer: PathBuf,
    },
}

fn parse_species(raw: &str) -> Result<SpeciesEntry, String> {
    let (code, percent) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=PERCENT, got '{raw}'"))?;
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return Err(format!("missing species code in '{raw}'"));
    }
    Ok(SpeciesEntry::new(code, percent.trim()))
}

fn read_upload(path: &Path) -> Result<UploadedFile> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} is not a file", path.display()))?;
    Ok(UploadedFile::csv(bytes, name))
}

fn build_orchestrator(
    args: &Args,
    transport: Arc<dyn ProjectionTransport>,
) -> Result<ProjectionOrchestrator<MemorySessionStorage>> {
    let projection_type = args.biomass.then_some(ProjectionType::CfsBiomass);
    let mut orchestrator = match &args.command {
        Command::Manual {
            species,
            bec_zone,
            age,
            height,
        } => {
            let mut orchestrator = ProjectionOrchestrator::new(
                ModelSelection::InputModelParameters,
                transport,
                MemorySessionStorage::default(),
            );
            let params = orchestrator
                .manual_parameters_mut()
                .ok_or_else(|| anyhow!("manual input unavailable"))?;
            if !species.is_empty() {
                let slots = params.species_list.len().max(species.len());
                params.species_list = species.clone();
                params.species_list.resize(slots, SpeciesEntry::empty());
            }
            if let Some(zone) = bec_zone {
                params.bec_zone = Some(zone.to_uppercase());
            }
            if let Some(age) = age {
                params.spz_age = Some(age.clone());
            }
            if let Some(height) = height {
                params.spz_height = Some(height.clone());
            }
            if let Some(title) = &args.title {
                params.report_title = Some(title.clone());
            }
            if projection_type.is_some() {
                params.projection_type = projection_type;
            }
            orchestrator
        }
        Command::Upload { polygon, layer } => {
            let mut orchestrator = ProjectionOrchestrator::new(
                ModelSelection::FileUpload,
                transport,
                MemorySessionStorage::default(),
            );
            let params = orchestrator
                .file_upload_parameters_mut()
                .ok_or_else(|| anyhow!("file upload input unavailable"))?;
            params.polygon_file = Some(read_upload(polygon)?);
            params.layer_file = Some(read_upload(layer)?);
            if let Some(title) = &args.title {
                params.report_title = Some(title.clone());
            }
            if projection_type.is_some() {
                params.projection_type = projection_type;
            }
            orchestrator
        }
    };

    for panel in orchestrator.variant().panel_order() {
        if let Err(err) = orchestrator.confirm_panel(*panel) {
            print_notification(&notifications::for_projection_error(&err));
            bail!("panel {panel} was not confirmed: {err}");
        }
    }
    Ok(orchestrator)
}

fn print_notification(note: &Notification) {
    let label = match note.severity {
        Severity::Info => "info",
        Severity::Success => "ok",
        Severity::Warning => "warning",
        Severity::Error => "error",
    };
    println!("[{label}] {}: {}", note.title, note.message);
}

fn write_lines(dir: &Path, name: &str, lines: &[String]) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, lines.join("\n")).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn write_report(dir: &Path, variant: WorkflowVariant, report: &ResultArchive) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let archive_name = archive_file_name(&report.file_name)
        .unwrap_or_else(|| file_name::DEFAULT_ARCHIVE.to_string());
    let archive_path = dir.join(archive_name);
    fs::write(&archive_path, &report.raw)
        .with_context(|| format!("writing {}", archive_path.display()))?;
    write_lines(dir, file_name::ERROR_LOG, &report.error_lines)?;
    write_lines(dir, file_name::PROGRESS_LOG, &report.log_lines)?;
    if let Some(debug) = &report.debug_lines {
        write_lines(dir, file_name::DEBUG_LOG, debug)?;
    }
    let yield_path = match variant {
        WorkflowVariant::ModelParameters => {
            write_lines(dir, file_name::YIELD_REPORT_TXT, &report.yield_report_lines)?
        }
        WorkflowVariant::FileUpload => {
            write_lines(dir, file_name::YIELD_TABLE_CSV, &report.yield_csv_lines)?
        }
    };
    info!(
        archive = %archive_path.display(),
        yield_file = %yield_path.display(),
        "report written"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = &args.service_url {
        settings.service_url = url.clone();
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }
    let trial_run = args.trial_run || settings.trial_run;
    let service_url = normalize_service_url(&settings.service_url)?;
    info!(%service_url, trial_run, "projector starting");

    let transport: Arc<dyn ProjectionTransport> = match &settings.bearer_token {
        Some(token) => Arc::new(HttpProjectionTransport::with_token_provider(
            service_url,
            Arc::new(StaticTokenProvider::new(token.clone())),
        )),
        None => Arc::new(HttpProjectionTransport::new(service_url)),
    };
    let mut orchestrator = build_orchestrator(&args, transport)?;
    let variant = orchestrator.variant();

    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let note = match orchestrator.run_until(trial_run, cancel).await {
        Ok(outcome) => {
            if let Some(report) = orchestrator.report() {
                write_report(&settings.output_dir, variant, report)?;
            }
            notifications::for_completion(variant, outcome == RunOutcome::CompletedWithErrors)
        }
        Err(err) => {
            warn!(error = %err, "projection failed");
            let note = notifications::for_projection_error(&err);
            print_notification(&note);
            bail!("projection failed: {err}");
        }
    };
    print_notification(&note);
    Ok(())
}
