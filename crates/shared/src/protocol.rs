use serde::{Deserialize, Serialize};

use crate::constants::file_name;

/// Multipart part names understood by the projection endpoint.
pub mod part {
    pub const PROJECTION_PARAMETERS: &str = "projectionParameters";
    pub const HCSV_POLYGON: &str = "HCSV-Polygon";
    pub const HCSV_LAYERS: &str = "HCSV-Layers";
    pub const TRIAL_RUN: &str = "trialRun";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionOption {
    BackGrowEnabled,
    ForwardGrowEnabled,
    DoSaveIntermediateFiles,
    DoIncludeProjectionFiles,
    DoForceReferenceYearInclusionInYieldTables,
    DoForceCurrentYearInclusionInYieldTables,
    DoIncludeFileHeader,
    DoIncludeProjectionModeInYieldTable,
    DoIncludeAgeRowsInYieldTable,
    DoIncludeYearRowsInYieldTable,
    DoIncludePolygonRecordIdInYieldTable,
    DoSummarizeProjectionByPolygon,
    DoSummarizeProjectionByLayer,
    DoIncludeSpeciesProjection,
    #[serde(rename = "doIncludeProjectedMOFVolumes")]
    DoIncludeProjectedMofVolumes,
    #[serde(rename = "doIncludeProjectedMOFBiomass")]
    DoIncludeProjectedMofBiomass,
    #[serde(rename = "doIncludeProjectedCFSBiomass")]
    DoIncludeProjectedCfsBiomass,
    DoIncludeColumnHeadersInYieldTable,
    DoIncludeSecondarySpeciesDominantHeightInYieldTable,
    DoAllowBasalAreaAndTreesPerHectareValueSubstitution,
    DoEnableProgressLogging,
    DoEnableErrorLogging,
    DoEnableDebugLogging,
    DoEnableProjectionReport,
    DoDelayExecutionFolderDeletion,
    AllowAggressiveValueEstimation,
    ReportIncludeWholeStemVolume,
    ReportIncludeCloseUtilizationVolume,
    ReportIncludeNetDecayVolume,
    #[serde(rename = "reportIncludeNDWasteVolume")]
    ReportIncludeNdWasteVolume,
    #[serde(rename = "reportIncludeNDWasteBrkgVolume")]
    ReportIncludeNdWasteBrkgVolume,
    #[serde(rename = "reportIncludeVolumeMAI")]
    ReportIncludeVolumeMai,
    ReportIncludeSpeciesComp,
    ReportIncludeCulminationValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DebugOption {
    DoIncludeDebugTimestamps,
    DoIncludeDebugRoutineNames,
    DoIncludeDebugEntryExit,
    DoIncludeDebugIndentBlocks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    TextReport,
    YieldTable,
    #[serde(rename = "CSVYieldTable")]
    CsvYieldTable,
    #[serde(rename = "DCSV")]
    Dcsv,
    #[serde(rename = "PLOTSY")]
    Plotsy,
}

impl OutputFormat {
    /// Archive entry that carries the yield output for this format.
    pub fn yield_entry_name(self) -> &'static str {
        match self {
            OutputFormat::TextReport => file_name::YIELD_REPORT_TXT,
            OutputFormat::YieldTable => file_name::YIELD_TABLE_TXT,
            OutputFormat::CsvYieldTable | OutputFormat::Dcsv | OutputFormat::Plotsy => {
                file_name::YIELD_TABLE_CSV
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetadataToOutput {
    All,
    Main,
    Version,
    MinIdent,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineAgeYearRange {
    Union,
    Intersect,
    Difference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationParameter {
    pub species_name: String,
    pub utilization_class: String,
}

/// The JSON parameter blob sent with every projection request.
///
/// Window fields are never omitted: the inactive window is serialized as
/// explicit `null`s so the service can tell "not applicable" from "missing".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionParameters {
    pub output_format: OutputFormat,
    pub selected_execution_options: Vec<ExecutionOption>,
    pub excluded_execution_options: Vec<ExecutionOption>,
    pub selected_debug_options: Vec<DebugOption>,
    pub excluded_debug_options: Vec<DebugOption>,
    pub age_start: Option<i64>,
    pub age_end: Option<i64>,
    pub age_increment: Option<i64>,
    pub year_start: Option<i64>,
    pub year_end: Option<i64>,
    pub year_increment: Option<i64>,
    pub force_year: Option<i64>,
    pub report_title: Option<String>,
    pub combine_age_year_range: Option<CombineAgeYearRange>,
    pub metadata_to_output: MetadataToOutput,
    #[serde(default)]
    pub utils: Vec<UtilizationParameter>,
}
