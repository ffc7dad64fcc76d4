use super::*;

struct FixedIds;

impl IdSource for FixedIds {
    fn feature_id(&mut self) -> String {
        "1234567".to_string()
    }

    fn polygon_number(&mut self) -> String {
        "87654321".to_string()
    }

    fn tree_cover_layer_id(&mut self) -> String {
        "4242".to_string()
    }
}

fn cells(csv: &str) -> (Vec<String>, Vec<String>) {
    let mut lines = csv.lines();
    let split = |line: &str| line.split(',').map(str::to_string).collect::<Vec<_>>();
    let header = lines.next().map(split).unwrap_or_default();
    let row = lines.next().map(split).unwrap_or_default();
    (header, row)
}

fn cell<'a>(header: &[String], row: &'a [String], name: &str) -> &'a str {
    let index = header
        .iter()
        .position(|h| h == name)
        .unwrap_or_else(|| panic!("no column {name}"));
    &row[index]
}

#[test]
fn generated_files_follow_header_schemas() {
    let inputs = build_input_files(&ModelParameters::with_defaults(), &mut FixedIds);

    let (header, row) = cells(&inputs.polygon_csv);
    assert_eq!(header, csv_headers::POLYGON.map(str::to_string).to_vec());
    assert_eq!(row.len(), csv_headers::POLYGON.len());

    let (header, row) = cells(&inputs.layer_csv);
    assert_eq!(header, csv_headers::LAYER.map(str::to_string).to_vec());
    assert_eq!(row.len(), csv_headers::LAYER.len());
}

#[test]
fn records_share_generated_identifiers() {
    let inputs = build_input_files(&ModelParameters::with_defaults(), &mut FixedIds);
    let (poly_header, poly_row) = cells(&inputs.polygon_csv);
    let (layer_header, layer_row) = cells(&inputs.layer_csv);

    assert_eq!(cell(&poly_header, &poly_row, "FEATURE_ID"), "1234567");
    assert_eq!(cell(&layer_header, &layer_row, "FEATURE_ID"), "1234567");
    assert_eq!(cell(&poly_header, &poly_row, "POLYGON_NUMBER"), "87654321");
    assert_eq!(cell(&layer_header, &layer_row, "POLYGON_NUMBER"), "87654321");
    assert_eq!(
        cell(&layer_header, &layer_row, "TREE_COVER_LAYER_ESTIMATED_ID"),
        "4242"
    );
    assert_eq!(cell(&poly_header, &poly_row, "MAP_ID"), biz::MAP_ID);
}

#[test]
fn polygon_record_carries_site_and_classification() {
    let params = ModelParameters::with_defaults();
    let inputs = build_input_files(&params, &mut FixedIds);
    let (header, row) = cells(&inputs.polygon_csv);

    assert_eq!(cell(&header, &row, "INVENTORY_STANDARD_CODE"), "F");
    assert_eq!(cell(&header, &row, "BEC_ZONE_CODE"), "IDF");
    assert_eq!(cell(&header, &row, "PRE_DISTURBANCE_STOCKABILITY"), "55");
    assert_eq!(cell(&header, &row, "YIELD_FACTOR"), "1.000");
    assert_eq!(cell(&header, &row, "BCLCS_LEVEL1_CODE"), "V");
    assert_eq!(cell(&header, &row, "BCLCS_LEVEL2_CODE"), "T");
    assert_eq!(cell(&header, &row, "BCLCS_LEVEL3_CODE"), "U");
    // PL 30 + H 30 + S 10 coniferous, AC 30 broadleaf.
    assert_eq!(cell(&header, &row, "BCLCS_LEVEL4_CODE"), "TM");
    assert_eq!(cell(&header, &row, "BCLCS_LEVEL5_CODE"), "OP");
    assert_eq!(
        cell(&header, &row, "REFERENCE_YEAR"),
        params.reference_year.map(|y| y.to_string()).unwrap_or_default()
    );
}

#[test]
fn unset_fields_are_empty_not_null() {
    let mut params = ModelParameters::with_defaults();
    params.eco_zone = None;
    let inputs = build_input_files(&params, &mut FixedIds);
    assert!(!inputs.polygon_csv.contains("null"));
    assert!(!inputs.layer_csv.contains("null"));
    let (header, row) = cells(&inputs.polygon_csv);
    assert_eq!(cell(&header, &row, "CFS_ECOZONE"), "");
}

#[test]
fn layer_record_applies_density_rules() {
    let params = ModelParameters::with_defaults();
    let inputs = build_input_files(&params, &mut FixedIds);
    let (header, row) = cells(&inputs.layer_csv);
    assert_eq!(cell(&header, &row, "CROWN_CLOSURE"), biz::DEFAULT_CROWN_CLOSURE);
    assert_eq!(cell(&header, &row, "BASAL_AREA_75"), "");
    assert_eq!(cell(&header, &row, "STEMS_PER_HA_75"), "");
    assert_eq!(cell(&header, &row, "EST_SITE_INDEX_SPECIES_CD"), "PL");
    assert_eq!(cell(&header, &row, "SPECIES_CD_2"), "AC");
    assert_eq!(cell(&header, &row, "SPECIES_PCT_4"), "10.0");
    assert_eq!(cell(&header, &row, "SPECIES_CD_5"), "");
    assert_eq!(cell(&header, &row, "EST_AGE_SPP1"), "60");

    let mut by_basal_area = ModelParameters::with_defaults();
    by_basal_area.derived_by = Some(DerivedBy::BasalArea);
    by_basal_area.basal_area = Some("20".to_string());
    by_basal_area.trees_per_hectare = Some("800".to_string());
    let inputs = build_input_files(&by_basal_area, &mut FixedIds);
    let (header, row) = cells(&inputs.layer_csv);
    assert_eq!(cell(&header, &row, "CROWN_CLOSURE"), "0");
    assert_eq!(cell(&header, &row, "BASAL_AREA_75"), "20");
    assert_eq!(cell(&header, &row, "STEMS_PER_HA_75"), "800");
}

#[test]
fn inventory_code_follows_derivation() {
    assert_eq!(inventory_standard_code(Some(DerivedBy::Volume)), "F");
    assert_eq!(inventory_standard_code(Some(DerivedBy::BasalArea)), "V");
    assert_eq!(inventory_standard_code(None), "");
}

#[test]
fn bclcs_levels_follow_thresholds() {
    assert_eq!(bclcs_level1(Some(4.9)), "N");
    assert_eq!(bclcs_level1(Some(5.0)), "V");
    assert_eq!(bclcs_level1(None), "V");
    assert_eq!(bclcs_level2(Some(9.0)), "N");
    assert_eq!(bclcs_level2(Some(10.0)), "T");
    assert_eq!(bclcs_level3(Some("AT")), "A");
    assert_eq!(bclcs_level3(Some("IDF")), "U");
    assert_eq!(bclcs_level5(61.0), "DE");
    assert_eq!(bclcs_level5(26.0), "OP");
    assert_eq!(bclcs_level5(0.0), "SP");

    let mut params = ModelParameters::default();
    params.species_list[0] = SpeciesEntry::new("FD", "80");
    params.species_list[1] = SpeciesEntry::new("AT", "20");
    assert_eq!(bclcs_level4(&params.species_groups()), "TC");
    params.species_list[0] = SpeciesEntry::new("AC", "80");
    assert_eq!(bclcs_level4(&params.species_groups()), "TB");
}

#[test]
fn restore_reads_generated_files_back() {
    let entered = ModelParameters::with_defaults();
    let inputs = build_input_files(&entered, &mut FixedIds);
    let restored = restore_from_csv(&inputs.polygon_csv, &inputs.layer_csv);

    assert_eq!(restored.derived_by, entered.derived_by);
    assert_eq!(restored.species_list, entered.species_list);
    assert_eq!(restored.bec_zone, entered.bec_zone);
    assert_eq!(restored.percent_stockable_area, entered.percent_stockable_area);
    assert_eq!(restored.spz_age, entered.spz_age);
    assert_eq!(restored.spz_height, entered.spz_height);
    assert_eq!(restored.bha50_site_index, entered.bha50_site_index);
    assert_eq!(restored.reference_year, entered.reference_year);
    assert_eq!(restored.crown_closure.as_deref(), Some("50"));
    assert_eq!(restored.basal_area, None);
}

#[test]
fn restore_tolerates_empty_input() {
    let restored = restore_from_csv("", "");
    assert_eq!(restored.derived_by, None);
    assert_eq!(restored.species_list.len(), limits::SPECIES_SLOTS);
    assert!(restored.species_list.iter().all(|e| e.code.is_none()));
}

#[test]
fn random_ids_are_numeric() {
    let mut ids = RandomIdSource;
    for value in [ids.feature_id(), ids.polygon_number(), ids.tree_cover_layer_id()] {
        assert!(!value.is_empty());
        assert!(value.chars().all(|c| c.is_ascii_digit()), "{value}");
    }
    assert_eq!(ids.polygon_number().len(), 8);
}
