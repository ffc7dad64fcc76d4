use chrono::{Datelike, Utc};
use rand::Rng;
use shared::{
    constants::{biz, csv_headers, is_broadleaf, is_coniferous, limits},
    domain::{DerivedBy, SiteSpeciesValues, SpeciesEntry, SpeciesGroup},
};

use crate::{
    model::ModelParameters,
    validation::{is_empty_or_zero, parse_number},
};

/// Source of the synthetic identifiers that tie a polygon record to its layer.
pub trait IdSource {
    fn feature_id(&mut self) -> String;
    fn polygon_number(&mut self) -> String;
    fn tree_cover_layer_id(&mut self) -> String;
}

/// Clock-and-random identifiers.
#[derive(Debug, Default)]
pub struct RandomIdSource;

fn random_digits(min_digits: u32, max_digits: u32) -> String {
    let min = 10u64.pow(min_digits.saturating_sub(1));
    let max = 10u64.pow(max_digits) - 1;
    rand::rng().random_range(min..=max).to_string()
}

impl IdSource for RandomIdSource {
    fn feature_id(&mut self) -> String {
        let timestamp = Utc::now().timestamp_millis().rem_euclid(100_000_000);
        let prefix: u32 = rand::rng().random_range(1..=99);
        format!("{prefix}{timestamp}")
    }

    fn polygon_number(&mut self) -> String {
        random_digits(8, 8)
    }

    fn tree_cover_layer_id(&mut self) -> String {
        random_digits(4, 10)
    }
}

/// Polygon and layer files generated from manually entered parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedInputs {
    pub polygon_csv: String,
    pub layer_csv: String,
}

pub fn bclcs_level1(percent_stockable_area: Option<f64>) -> &'static str {
    if percent_stockable_area.unwrap_or(biz::BCLCS_LEVEL1_THRESHOLD) < biz::BCLCS_LEVEL1_THRESHOLD {
        biz::BCLCS_LEVEL1_NON_VEG
    } else {
        biz::BCLCS_LEVEL1_VEG
    }
}

pub fn bclcs_level2(percent_stockable_area: Option<f64>) -> &'static str {
    if percent_stockable_area.unwrap_or(biz::BCLCS_LEVEL2_THRESHOLD) < biz::BCLCS_LEVEL2_THRESHOLD {
        biz::BCLCS_LEVEL2_NON_TREED
    } else {
        biz::BCLCS_LEVEL2_TREED
    }
}

pub fn bclcs_level3(bec_zone: Option<&str>) -> &'static str {
    if bec_zone == Some(biz::BCLCS_LEVEL3_BEC_ZONE_AT) {
        biz::BCLCS_LEVEL3_ALPINE
    } else {
        biz::BCLCS_LEVEL3_DEFAULT
    }
}

pub fn bclcs_level4(groups: &[SpeciesGroup]) -> &'static str {
    let (mut coniferous, mut broadleaf) = (0.0, 0.0);
    for group in groups {
        let percent = parse_number(&group.percent).unwrap_or_default();
        if is_coniferous(&group.group) {
            coniferous += percent;
        } else if is_broadleaf(&group.group) {
            broadleaf += percent;
        }
    }
    if coniferous >= biz::BCLCS_LEVEL4_SHARE {
        biz::BCLCS_LEVEL4_TC
    } else if broadleaf >= biz::BCLCS_LEVEL4_SHARE {
        biz::BCLCS_LEVEL4_TB
    } else {
        biz::BCLCS_LEVEL4_TM
    }
}

pub fn bclcs_level5(percent_stockable_area: f64) -> &'static str {
    if percent_stockable_area >= biz::BCLCS_LEVEL5_DENSE {
        biz::BCLCS_LEVEL5_DE
    } else if percent_stockable_area >= biz::BCLCS_LEVEL5_OPEN {
        biz::BCLCS_LEVEL5_OP
    } else {
        biz::BCLCS_LEVEL5_SP
    }
}

pub fn inventory_standard_code(derived_by: Option<DerivedBy>) -> &'static str {
    match derived_by {
        Some(DerivedBy::Volume) => biz::INVENTORY_CODE_FIP,
        Some(DerivedBy::BasalArea) => biz::INVENTORY_CODE_VRI,
        None => "",
    }
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn to_csv(header: &[&str], row: &[String]) -> String {
    format!("{}\n{}", header.join(","), row.join(","))
}

struct RecordIds {
    feature_id: String,
    polygon_number: String,
    tree_cover_layer_id: String,
}

fn polygon_row(params: &ModelParameters, ids: &RecordIds) -> Vec<String> {
    let stockable = params.percent_stockable_area.as_deref().and_then(parse_number);
    let groups = params.species_groups();
    let reference_year = params.reference_year.unwrap_or_else(|| Utc::now().year());

    let mut row = vec![
        ids.feature_id.clone(),
        biz::MAP_ID.to_string(),
        ids.polygon_number.clone(),
        biz::UNKNOWN_CODE.to_string(),
        biz::UNKNOWN_CODE.to_string(),
        biz::UNKNOWN_CODE.to_string(),
        inventory_standard_code(params.derived_by).to_string(),
        biz::UNKNOWN_CODE.to_string(),
    ];
    // shrub, herb and bryoid cover
    row.extend(std::iter::repeat(String::new()).take(7));
    row.extend([
        text(&params.bec_zone),
        text(&params.eco_zone),
        text(&params.percent_stockable_area),
        biz::YIELD_FACTOR.to_string(),
        String::new(),
        bclcs_level1(stockable).to_string(),
        bclcs_level2(stockable).to_string(),
        bclcs_level3(params.bec_zone.as_deref()).to_string(),
        bclcs_level4(&groups).to_string(),
        bclcs_level5(stockable.unwrap_or_default()).to_string(),
        String::new(),
        reference_year.to_string(),
    ]);
    row.resize(csv_headers::POLYGON.len(), String::new());
    row
}

fn species_cells(entry: &SpeciesEntry) -> [String; 2] {
    let code = entry.code.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let percent = match code {
        Some(_) if !is_empty_or_zero(entry.percent.as_deref()) => text(&entry.percent),
        _ => String::new(),
    };
    [code.unwrap_or_default().to_string(), percent]
}

fn layer_row(params: &ModelParameters, ids: &RecordIds) -> Vec<String> {
    let computed = params.site_species_values == Some(SiteSpeciesValues::Computed);
    let crown_closure = if params.derived_by == Some(DerivedBy::Volume)
        && computed
        && is_empty_or_zero(params.crown_closure.as_deref())
    {
        biz::DEFAULT_CROWN_CLOSURE.to_string()
    } else {
        text(&params.crown_closure)
    };
    let by_basal_area = params.derived_by == Some(DerivedBy::BasalArea) && computed;
    let (basal_area, trees_per_hectare) = if by_basal_area {
        (text(&params.basal_area), text(&params.trees_per_hectare))
    } else {
        (
            biz::DEFAULT_BASAL_AREA.to_string(),
            biz::DEFAULT_TREES_PER_HECTARE.to_string(),
        )
    };

    let mut row = vec![
        ids.feature_id.clone(),
        ids.tree_cover_layer_id.clone(),
        biz::MAP_ID.to_string(),
        ids.polygon_number.clone(),
        biz::LAYER_LEVEL_CODE.to_string(),
        biz::VDYP7_LAYER_CODE.to_string(),
        text(&params.percent_stockable_area),
        biz::FOREST_COVER_RANK_CODE.to_string(),
        String::new(),
        params.highest_percent_species().unwrap_or_default(),
        text(&params.bha50_site_index),
        crown_closure,
        basal_area,
        trees_per_hectare,
    ];
    for slot in 0..limits::SPECIES_SLOTS {
        let entry = params.species_list.get(slot).cloned().unwrap_or_default();
        row.extend(species_cells(&entry));
    }
    row.extend([text(&params.spz_age), text(&params.spz_height)]);
    row.resize(csv_headers::LAYER.len(), String::new());
    row
}

/// Builds the single-record polygon and layer files for a manual run.
pub fn build_input_files(params: &ModelParameters, ids: &mut dyn IdSource) -> GeneratedInputs {
    let ids = RecordIds {
        feature_id: ids.feature_id(),
        polygon_number: ids.polygon_number(),
        tree_cover_layer_id: ids.tree_cover_layer_id(),
    };
    GeneratedInputs {
        polygon_csv: to_csv(&csv_headers::POLYGON, &polygon_row(params, &ids)),
        layer_csv: to_csv(&csv_headers::LAYER, &layer_row(params, &ids)),
    }
}

/// Header-indexed view of the first data record of a CSV text.
struct CsvRecord {
    headers: Vec<String>,
    values: Vec<String>,
}

impl CsvRecord {
    fn parse(text: &str) -> Self {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let split = |line: &str| -> Vec<String> {
            line.split(',').map(|v| v.trim().to_string()).collect()
        };
        let headers = lines.next().map(split).unwrap_or_default();
        let values = lines.next().map(split).unwrap_or_default();
        Self { headers, values }
    }

    /// Empty cells read as absent; "0" is kept.
    fn get(&self, header: &str) -> Option<String> {
        let index = self.headers.iter().position(|h| h == header)?;
        self.values.get(index).filter(|v| !v.is_empty()).cloned()
    }
}

/// Reads a generated polygon/layer pair back into model parameters.
///
/// Only the fields carried by the files are restored; the rest keep their
/// empty defaults. Site values are assumed computed.
pub fn restore_from_csv(polygon_csv: &str, layer_csv: &str) -> ModelParameters {
    let polygon = CsvRecord::parse(polygon_csv);
    let layer = CsvRecord::parse(layer_csv);

    let derived_by = match polygon.get("INVENTORY_STANDARD_CODE").as_deref() {
        Some(biz::INVENTORY_CODE_FIP) => Some(DerivedBy::Volume),
        Some(biz::INVENTORY_CODE_VRI) => Some(DerivedBy::BasalArea),
        _ => None,
    };
    let species_list = (1..=limits::SPECIES_SLOTS)
        .map(|slot| SpeciesEntry {
            code: layer.get(&format!("SPECIES_CD_{slot}")),
            percent: layer.get(&format!("SPECIES_PCT_{slot}")),
        })
        .collect();

    ModelParameters {
        derived_by,
        species_list,
        bec_zone: polygon.get("BEC_ZONE_CODE"),
        eco_zone: polygon.get("CFS_ECOZONE"),
        percent_stockable_area: polygon.get("PRE_DISTURBANCE_STOCKABILITY"),
        reference_year: polygon
            .get("REFERENCE_YEAR")
            .and_then(|year| year.parse().ok()),
        site_species_values: Some(SiteSpeciesValues::Computed),
        spz_age: layer.get("EST_AGE_SPP1"),
        spz_height: layer.get("EST_HEIGHT_SPP1"),
        bha50_site_index: layer.get("ESTIMATED_SITE_INDEX"),
        crown_closure: layer.get("CROWN_CLOSURE"),
        basal_area: layer.get("BASAL_AREA_75"),
        trees_per_hectare: layer.get("STEMS_PER_HA_75"),
        ..ModelParameters::default()
    }
}

#[cfg(test)]
#[path = "../tests/csv_tests.rs"]
mod tests;
