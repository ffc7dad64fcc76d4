use std::collections::BTreeSet;

use shared::{
    domain::ProjectionType,
    protocol::{DebugOption, ExecutionOption},
};

use crate::model::{FileUploadParameters, ModelParameters, ReportToggles};

/// Selected and excluded execution flags. Both sets are ordered, so equal
/// inputs always serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOptions {
    pub selected: BTreeSet<ExecutionOption>,
    pub excluded: BTreeSet<ExecutionOption>,
}

impl ExecutionOptions {
    fn new(selected: &[ExecutionOption], excluded: &[ExecutionOption]) -> Self {
        Self {
            selected: selected.iter().copied().collect(),
            excluded: excluded.iter().copied().collect(),
        }
    }

    /// Each mapped option lands in `selected` when its flag is set, else in `excluded`.
    fn apply(mut self, mappings: &[(bool, ExecutionOption)]) -> Self {
        for &(flag, option) in mappings {
            if flag {
                self.excluded.remove(&option);
                self.selected.insert(option);
            } else if !self.selected.contains(&option) {
                self.excluded.insert(option);
            }
        }
        self
    }

    pub fn is_selected(&self, option: ExecutionOption) -> bool {
        self.selected.contains(&option)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugOptions {
    pub selected: BTreeSet<DebugOption>,
    pub excluded: BTreeSet<DebugOption>,
}

const MANUAL_BASE: &[ExecutionOption] = &[
    ExecutionOption::DoIncludeFileHeader,
    ExecutionOption::DoIncludeAgeRowsInYieldTable,
    ExecutionOption::DoIncludeColumnHeadersInYieldTable,
    ExecutionOption::DoSummarizeProjectionByLayer,
    ExecutionOption::DoEnableProgressLogging,
    ExecutionOption::DoEnableErrorLogging,
    ExecutionOption::DoEnableDebugLogging,
    ExecutionOption::DoEnableProjectionReport,
    ExecutionOption::AllowAggressiveValueEstimation,
    ExecutionOption::ReportIncludeWholeStemVolume,
    ExecutionOption::ReportIncludeCloseUtilizationVolume,
    ExecutionOption::ReportIncludeNetDecayVolume,
    ExecutionOption::ReportIncludeNdWasteVolume,
    ExecutionOption::ReportIncludeNdWasteBrkgVolume,
];

const MANUAL_EXCLUDED: &[ExecutionOption] = &[
    ExecutionOption::DoSaveIntermediateFiles,
    ExecutionOption::DoForceReferenceYearInclusionInYieldTables,
    ExecutionOption::DoForceCurrentYearInclusionInYieldTables,
    ExecutionOption::DoIncludeProjectionModeInYieldTable,
    ExecutionOption::DoIncludeYearRowsInYieldTable,
    ExecutionOption::DoIncludePolygonRecordIdInYieldTable,
    ExecutionOption::DoSummarizeProjectionByPolygon,
    ExecutionOption::DoIncludeProjectedMofBiomass,
    ExecutionOption::DoAllowBasalAreaAndTreesPerHectareValueSubstitution,
    ExecutionOption::DoIncludeProjectionFiles,
    ExecutionOption::DoDelayExecutionFolderDeletion,
];

const FILE_UPLOAD_BASE: &[ExecutionOption] = &[
    ExecutionOption::DoIncludeFileHeader,
    ExecutionOption::DoIncludeAgeRowsInYieldTable,
    ExecutionOption::DoIncludeYearRowsInYieldTable,
    ExecutionOption::DoIncludeColumnHeadersInYieldTable,
    ExecutionOption::DoAllowBasalAreaAndTreesPerHectareValueSubstitution,
    ExecutionOption::DoEnableProgressLogging,
    ExecutionOption::DoEnableErrorLogging,
    ExecutionOption::DoEnableDebugLogging,
];

const FILE_UPLOAD_EXCLUDED: &[ExecutionOption] = &[
    ExecutionOption::DoSaveIntermediateFiles,
    ExecutionOption::DoIncludeProjectionFiles,
    ExecutionOption::DoDelayExecutionFolderDeletion,
];

fn projection_type_mappings(projection_type: Option<ProjectionType>) -> [(bool, ExecutionOption); 2] {
    [
        (
            projection_type == Some(ProjectionType::Volume),
            ExecutionOption::DoIncludeProjectedMofVolumes,
        ),
        (
            projection_type == Some(ProjectionType::CfsBiomass),
            ExecutionOption::DoIncludeProjectedCfsBiomass,
        ),
    ]
}

fn shared_mappings(toggles: &ReportToggles) -> [(bool, ExecutionOption); 6] {
    [
        (toggles.forward_grow, ExecutionOption::ForwardGrowEnabled),
        (toggles.backward_grow, ExecutionOption::BackGrowEnabled),
        (toggles.computed_mai, ExecutionOption::ReportIncludeVolumeMai),
        (
            toggles.culmination_values,
            ExecutionOption::ReportIncludeCulminationValues,
        ),
        (toggles.by_species, ExecutionOption::DoIncludeSpeciesProjection),
        (
            toggles.secondary_height,
            ExecutionOption::DoIncludeSecondarySpeciesDominantHeightInYieldTable,
        ),
    ]
}

pub fn manual_execution_options(params: &ModelParameters) -> ExecutionOptions {
    ExecutionOptions::new(MANUAL_BASE, MANUAL_EXCLUDED)
        .apply(&projection_type_mappings(params.projection_type))
        .apply(&shared_mappings(&params.toggles))
}

pub fn file_upload_execution_options(params: &FileUploadParameters) -> ExecutionOptions {
    let toggles = &params.toggles;
    ExecutionOptions::new(FILE_UPLOAD_BASE, FILE_UPLOAD_EXCLUDED)
        .apply(&projection_type_mappings(params.projection_type))
        .apply(&shared_mappings(toggles))
        .apply(&[
            (toggles.by_layer, ExecutionOption::DoSummarizeProjectionByLayer),
            (!toggles.by_layer, ExecutionOption::DoSummarizeProjectionByPolygon),
            (
                toggles.projection_mode,
                ExecutionOption::DoIncludeProjectionModeInYieldTable,
            ),
            (
                toggles.polygon_id,
                ExecutionOption::DoIncludePolygonRecordIdInYieldTable,
            ),
            (
                toggles.current_year,
                ExecutionOption::DoForceCurrentYearInclusionInYieldTables,
            ),
            (
                toggles.reference_year,
                ExecutionOption::DoForceReferenceYearInclusionInYieldTables,
            ),
        ])
}

/// Full diagnostic output; the service decides what ends up in the debug log.
pub fn debug_options() -> DebugOptions {
    DebugOptions {
        selected: [
            DebugOption::DoIncludeDebugTimestamps,
            DebugOption::DoIncludeDebugEntryExit,
            DebugOption::DoIncludeDebugIndentBlocks,
            DebugOption::DoIncludeDebugRoutineNames,
        ]
        .into_iter()
        .collect(),
        excluded: BTreeSet::new(),
    }
}
