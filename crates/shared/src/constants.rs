use crate::domain::MinimumDbhLimit;

/// Inclusive numeric bounds for a single input field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub mod limits {
    use super::Bounds;

    pub const SPECIES_PERCENT: Bounds = Bounds::new(0.0, 100.0);
    pub const SPECIES_PERCENT_DECIMALS: usize = 1;
    pub const TOTAL_SPECIES_PERCENT: &str = "100.0";
    pub const SPECIES_SLOTS: usize = 6;

    pub const SPZ_AGE: Bounds = Bounds::new(0.0, 500.0);
    pub const SPZ_HEIGHT: Bounds = Bounds::new(0.0, 99.9);
    pub const BHA50_SITE_INDEX: Bounds = Bounds::new(0.0, 60.0);

    pub const PERCENT_STOCKABLE_AREA: Bounds = Bounds::new(0.0, 100.0);
    pub const CROWN_CLOSURE: Bounds = Bounds::new(0.0, 100.0);
    pub const TREES_PER_HECTARE: Bounds = Bounds::new(0.1, 9999.9);
    pub const BASAL_AREA: Bounds = Bounds::new(0.1, 250.0);

    pub const STARTING_AGE: Bounds = Bounds::new(0.0, 500.0);
    pub const FINISHING_AGE: Bounds = Bounds::new(1.0, 450.0);
    pub const AGE_INCREMENT: Bounds = Bounds::new(1.0, 350.0);
    pub const START_YEAR: Bounds = Bounds::new(1400.0, 2500.0);
    pub const END_YEAR: Bounds = Bounds::new(1400.0, 2500.0);
    pub const YEAR_INCREMENT: Bounds = Bounds::new(1.0, 350.0);

    /// Basal area of a one-centimetre stem, in square metres, scaled for the
    /// quadratic mean diameter check.
    pub const QMD_BASAL_AREA_FACTOR: f64 = 0.0000785398;
}

/// Names of the entries inside a result archive, and of the generated inputs.
pub mod file_name {
    pub const ERROR_LOG: &str = "ErrorLog.txt";
    pub const PROGRESS_LOG: &str = "ProgressLog.txt";
    pub const DEBUG_LOG: &str = "DebugLog.txt";
    pub const YIELD_TABLE_CSV: &str = "YieldTable.csv";
    pub const YIELD_TABLE_TXT: &str = "YieldTable.txt";
    pub const YIELD_REPORT_TXT: &str = "YieldReport.txt";
    pub const DEFAULT_ARCHIVE: &str = "vdyp-output.zip";
    pub const POLYGON_INPUT: &str = "VDYP7_INPUT_POLY.csv";
    pub const LAYER_INPUT: &str = "VDYP7_INPUT_LAYER.csv";
}

pub mod csv_headers {
    pub const DELIMITER: char = ',';

    pub const POLYGON: [&str; 43] = [
        "FEATURE_ID",
        "MAP_ID",
        "POLYGON_NUMBER",
        "ORG_UNIT",
        "TSA_NAME",
        "TFL_NAME",
        "INVENTORY_STANDARD_CODE",
        "TSA_NUMBER",
        "SHRUB_HEIGHT",
        "SHRUB_CROWN_CLOSURE",
        "SHRUB_COVER_PATTERN",
        "HERB_COVER_TYPE_CODE",
        "HERB_COVER_PCT",
        "HERB_COVER_PATTERN_CODE",
        "BRYOID_COVER_PCT",
        "BEC_ZONE_CODE",
        "CFS_ECOZONE",
        "PRE_DISTURBANCE_STOCKABILITY",
        "YIELD_FACTOR",
        "NON_PRODUCTIVE_DESCRIPTOR_CD",
        "BCLCS_LEVEL1_CODE",
        "BCLCS_LEVEL2_CODE",
        "BCLCS_LEVEL3_CODE",
        "BCLCS_LEVEL4_CODE",
        "BCLCS_LEVEL5_CODE",
        "PHOTO_ESTIMATION_BASE_YEAR",
        "REFERENCE_YEAR",
        "PCT_DEAD",
        "NON_VEG_COVER_TYPE_1",
        "NON_VEG_COVER_PCT_1",
        "NON_VEG_COVER_PATTERN_1",
        "NON_VEG_COVER_TYPE_2",
        "NON_VEG_COVER_PCT_2",
        "NON_VEG_COVER_PATTERN_2",
        "NON_VEG_COVER_TYPE_3",
        "NON_VEG_COVER_PCT_3",
        "NON_VEG_COVER_PATTERN_3",
        "LAND_COVER_CLASS_CD_1",
        "LAND_COVER_PCT_1",
        "LAND_COVER_CLASS_CD_2",
        "LAND_COVER_PCT_2",
        "LAND_COVER_CLASS_CD_3",
        "LAND_COVER_PCT_3",
    ];

    pub const LAYER: [&str; 38] = [
        "FEATURE_ID",
        "TREE_COVER_LAYER_ESTIMATED_ID",
        "MAP_ID",
        "POLYGON_NUMBER",
        "LAYER_LEVEL_CODE",
        "VDYP7_LAYER_CD",
        "LAYER_STOCKABILITY",
        "FOREST_COVER_RANK_CODE",
        "NON_FOREST_DESCRIPTOR_CODE",
        "EST_SITE_INDEX_SPECIES_CD",
        "ESTIMATED_SITE_INDEX",
        "CROWN_CLOSURE",
        "BASAL_AREA_75",
        "STEMS_PER_HA_75",
        "SPECIES_CD_1",
        "SPECIES_PCT_1",
        "SPECIES_CD_2",
        "SPECIES_PCT_2",
        "SPECIES_CD_3",
        "SPECIES_PCT_3",
        "SPECIES_CD_4",
        "SPECIES_PCT_4",
        "SPECIES_CD_5",
        "SPECIES_PCT_5",
        "SPECIES_CD_6",
        "SPECIES_PCT_6",
        "EST_AGE_SPP1",
        "EST_HEIGHT_SPP1",
        "EST_AGE_SPP2",
        "EST_HEIGHT_SPP2",
        "ADJ_IND",
        "LOREY_HEIGHT_75",
        "BASAL_AREA_125",
        "WS_VOL_PER_HA_75",
        "WS_VOL_PER_HA_125",
        "CU_VOL_PER_HA_125",
        "D_VOL_PER_HA_125",
        "DW_VOL_PER_HA_125",
    ];
}

/// Fixed codes written into generated polygon and layer records.
pub mod biz {
    pub const UNKNOWN_CODE: &str = "UNK";
    pub const YIELD_FACTOR: &str = "1.000";
    pub const LAYER_LEVEL_CODE: &str = "1";
    pub const VDYP7_LAYER_CODE: &str = "P";
    pub const FOREST_COVER_RANK_CODE: &str = "1";
    pub const MAP_ID: &str = "093C090";

    pub const INVENTORY_CODE_FIP: &str = "F";
    pub const INVENTORY_CODE_VRI: &str = "V";

    pub const BCLCS_LEVEL1_THRESHOLD: f64 = 5.0;
    pub const BCLCS_LEVEL1_VEG: &str = "V";
    pub const BCLCS_LEVEL1_NON_VEG: &str = "N";
    pub const BCLCS_LEVEL2_THRESHOLD: f64 = 10.0;
    pub const BCLCS_LEVEL2_TREED: &str = "T";
    pub const BCLCS_LEVEL2_NON_TREED: &str = "N";
    pub const BCLCS_LEVEL3_BEC_ZONE_AT: &str = "AT";
    pub const BCLCS_LEVEL3_ALPINE: &str = "A";
    pub const BCLCS_LEVEL3_DEFAULT: &str = "U";
    pub const BCLCS_LEVEL4_SHARE: f64 = 75.0;
    pub const BCLCS_LEVEL4_TC: &str = "TC";
    pub const BCLCS_LEVEL4_TB: &str = "TB";
    pub const BCLCS_LEVEL4_TM: &str = "TM";
    pub const BCLCS_LEVEL5_DENSE: f64 = 61.0;
    pub const BCLCS_LEVEL5_OPEN: f64 = 26.0;
    pub const BCLCS_LEVEL5_DE: &str = "DE";
    pub const BCLCS_LEVEL5_OP: &str = "OP";
    pub const BCLCS_LEVEL5_SP: &str = "SP";

    pub const DEFAULT_CROWN_CLOSURE: &str = "50";
    pub const DEFAULT_BASAL_AREA: &str = "";
    pub const DEFAULT_TREES_PER_HECTARE: &str = "";

    pub const SPECIES_GROUPS: [&str; 16] = [
        "AC", "AT", "B", "C", "D", "E", "F", "H", "L", "MB", "PA", "PL", "PW", "PY", "S", "Y",
    ];
    pub const CONIFEROUS_GROUPS: [&str; 11] =
        ["B", "C", "F", "H", "L", "PA", "PL", "PW", "PY", "S", "Y"];
    pub const BROADLEAF_GROUPS: [&str; 5] = ["AC", "AT", "D", "E", "MB"];
}

/// Maps a species code onto its species group. Codes that are already a
/// group, or are not recognised, map onto themselves.
pub fn species_group(code: &str) -> &str {
    match code {
        "ACB" | "ACT" => "AC",
        "BA" | "BG" | "BL" => "B",
        "CW" => "C",
        "DR" => "D",
        "EA" | "EP" => "E",
        "FD" | "FDC" | "FDI" => "F",
        "HM" | "HW" => "H",
        "LA" | "LT" | "LW" => "L",
        "PLI" | "PLC" => "PL",
        "SB" | "SE" | "SS" | "SW" | "SX" => "S",
        "YC" => "Y",
        other => other,
    }
}

pub fn is_coniferous(code: &str) -> bool {
    biz::CONIFEROUS_GROUPS.contains(&species_group(code))
}

pub fn is_broadleaf(code: &str) -> bool {
    biz::BROADLEAF_GROUPS.contains(&species_group(code))
}

/// Utilization class applied to a species group when the user has not chosen one.
pub fn default_utilization(_group: &str) -> MinimumDbhLimit {
    MinimumDbhLimit::Cm12_5
}
