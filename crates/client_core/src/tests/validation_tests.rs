use super::*;
use crate::model::{ModelParameters, ReportWindow};
use shared::{
    constants::{csv_headers, limits},
    domain::{AgeYearRange, MinimumDbhLimit, SiteSpeciesValues, SpeciesEntry, UploadedFile},
};

fn all_bounds() -> Vec<(Bounds, &'static str)> {
    vec![
        (limits::SPECIES_PERCENT, "speciesPercent"),
        (limits::SPZ_AGE, "spzAge"),
        (limits::SPZ_HEIGHT, "spzHeight"),
        (limits::BHA50_SITE_INDEX, "bha50SiteIndex"),
        (limits::PERCENT_STOCKABLE_AREA, "percentStockableArea"),
        (limits::CROWN_CLOSURE, "crownClosure"),
        (limits::TREES_PER_HECTARE, "treesPerHectare"),
        (limits::BASAL_AREA, "basalArea"),
        (limits::STARTING_AGE, "startingAge"),
        (limits::FINISHING_AGE, "finishingAge"),
        (limits::AGE_INCREMENT, "ageIncrement"),
        (limits::START_YEAR, "startYear"),
        (limits::END_YEAR, "endYear"),
        (limits::YEAR_INCREMENT, "yearIncrement"),
    ]
}

#[test]
fn range_bounds_are_inclusive_for_every_limit() {
    for (bounds, error_type) in all_bounds() {
        let min = bounds.min.to_string();
        let max = bounds.max.to_string();
        let below = (bounds.min - 1.0).to_string();
        let above = (bounds.max + 1.0).to_string();

        assert!(validate_range(Some(&min), bounds, error_type).is_valid, "{error_type} min");
        assert!(validate_range(Some(&max), bounds, error_type).is_valid, "{error_type} max");

        let low = validate_range(Some(&below), bounds, error_type);
        assert!(!low.is_valid, "{error_type} below");
        assert_eq!(low.error_type, Some(error_type));
        assert_eq!(
            low.details,
            Some(ValidationDetails::Range {
                min: bounds.min,
                max: bounds.max
            })
        );
        assert!(!validate_range(Some(&above), bounds, error_type).is_valid, "{error_type} above");
    }
}

#[test]
fn absent_values_pass_range_checks() {
    assert!(validate_range(None, limits::SPZ_AGE, "spzAge").is_valid);
    assert!(validate_range(Some(""), limits::SPZ_AGE, "spzAge").is_valid);
    assert!(validate_range(Some("   "), limits::SPZ_AGE, "spzAge").is_valid);
}

#[test]
fn non_numeric_values_fail_range_checks() {
    let result = validate_range(Some("abc"), limits::SPZ_AGE, "spzAge");
    assert!(!result.is_valid);
    assert_eq!(result.error_type, Some("spzAge"));
}

#[test]
fn comparison_tolerates_missing_operands() {
    for x in ["0", "5", "-10", "2500"] {
        assert!(validate_comparison(None, Some(x), "cmp").is_valid);
        assert!(validate_comparison(Some(x), None, "cmp").is_valid);
    }
    assert!(validate_comparison(None, None, "cmp").is_valid);
    assert!(validate_comparison(Some(""), Some("3"), "cmp").is_valid);
}

#[test]
fn comparison_requires_end_not_before_start() {
    assert!(validate_comparison(Some("10"), Some("10"), "cmp").is_valid);
    assert!(validate_comparison(Some("10"), Some("20"), "cmp").is_valid);
    let result = validate_comparison(Some("20"), Some("10"), "cmp");
    assert!(!result.is_valid);
    assert_eq!(result.error_type, Some("cmp"));
    assert!(!validate_comparison(Some("x"), Some("10"), "cmp").is_valid);
}

#[test]
fn required_fields_treat_zero_as_unset_only_for_magnitudes() {
    let result = validate_required(
        &[
            RequiredField::magnitude("index", Some("0")),
            RequiredField::text("title", Some("0")),
            RequiredField::text("blank", Some("  ")),
        ],
        "required",
    );
    assert!(!result.is_valid);
    assert_eq!(
        result.details,
        Some(ValidationDetails::MissingFields(vec!["index", "blank"]))
    );

    let ok = validate_required(&[RequiredField::magnitude("index", Some("16.3"))], "required");
    assert!(ok.is_valid);
}

#[test]
fn duplicate_detection_reports_first_repeated_code() {
    let entries = vec![
        SpeciesEntry::new("PL", "40"),
        SpeciesEntry::new("AC", "30"),
        SpeciesEntry::new("PL", "30"),
    ];
    let result = validate_duplicates(&entries, "duplicateSpecies");
    assert!(!result.is_valid);
    assert_eq!(
        result.details,
        Some(ValidationDetails::Duplicate("PL".to_string()))
    );
}

#[test]
fn empty_codes_are_never_duplicates() {
    let entries = vec![SpeciesEntry::empty(), SpeciesEntry::empty()];
    assert!(validate_duplicates(&entries, "duplicateSpecies").is_valid);
    assert_eq!(find_duplicate_code([Some(""), Some(""), None, None]), None);
}

#[test]
fn total_percent_needs_display_and_sum_to_match() {
    let percents = [Some("60"), Some("40"), None];
    assert!(validate_total_percent("100.0", &percents, "100.0", "totalPercent").is_valid);
    assert!(!validate_total_percent("100", &percents, "100.0", "totalPercent").is_valid);

    let short = [Some("60"), Some("39.9")];
    assert!(!validate_total_percent("100.0", &short, "100.0", "totalPercent").is_valid);
}

#[test]
fn header_round_trip_is_valid() {
    let header = csv_headers::POLYGON.join(",");
    let result = validate_header_schema(&header, &csv_headers::POLYGON, "polygonHeaderMismatch");
    assert!(result.is_valid);
    assert_eq!(
        result.details,
        Some(ValidationDetails::Header(HeaderReport::default()))
    );
}

#[test]
fn header_missing_first_column_is_reported() {
    let header = csv_headers::LAYER[1..].join(",");
    let report = compare_header(&header, &csv_headers::LAYER);
    assert_eq!(report.missing, vec![csv_headers::LAYER[0].to_string()]);
    assert!(report.extra.is_empty());
    assert!(report.mismatches.is_empty());
    assert!(!report.is_valid());
}

#[test]
fn header_extra_column_is_reported() {
    let header = format!("{},EXTRA_COLUMN", csv_headers::LAYER.join(","));
    let result = validate_header_schema(&header, &csv_headers::LAYER, "layerHeaderMismatch");
    assert!(!result.is_valid);
    let Some(ValidationDetails::Header(report)) = result.details else {
        panic!("expected header details");
    };
    assert_eq!(report.extra, vec!["EXTRA_COLUMN".to_string()]);
    assert!(report.missing.is_empty());
}

#[test]
fn header_positional_mismatch_needs_equal_lengths() {
    let report = compare_header("B,A\r\n1,2", &["A", "B"]);
    assert!(report.missing.is_empty());
    assert!(report.extra.is_empty());
    assert_eq!(
        report.mismatches,
        vec![
            "column 1: expected A found B".to_string(),
            "column 2: expected B found A".to_string(),
        ]
    );
}

#[test]
fn header_ignores_byte_order_mark() {
    let report = compare_header("\u{feff}A,B\n", &["A", "B"]);
    assert!(report.is_valid());
}

#[test]
fn species_panel_accepts_sample_stand() {
    let params = ModelParameters::with_defaults();
    assert!(species::validate_species_panel(&params).is_valid);
}

#[test]
fn species_panel_flags_duplicate_and_total() {
    let mut params = ModelParameters::with_defaults();
    params.species_list[1] = SpeciesEntry::new("PL", "30.0");
    let result = species::validate_species_panel(&params);
    assert_eq!(result.error_type, Some(species::ERR_DUPLICATE_SPECIES));

    let mut params = ModelParameters::with_defaults();
    params.species_list[3] = SpeciesEntry::new("S", "5.0");
    let result = species::validate_species_panel(&params);
    assert_eq!(result.error_type, Some(species::ERR_TOTAL_PERCENT));

    let mut params = ModelParameters::with_defaults();
    params.derived_by = None;
    let result = species::validate_species_panel(&params);
    assert_eq!(result.error_type, Some(species::ERR_DERIVED_BY_REQUIRED));
}

#[test]
fn site_required_depends_on_selection() {
    let computed = site::validate_site_required(
        Some(SiteSpeciesValues::Computed),
        Some("60"),
        Some("0"),
        Some("16.3"),
    );
    assert_eq!(computed.error_type, Some(site::ERR_SITE_REQUIRED_COMPUTED));

    let supplied =
        site::validate_site_required(Some(SiteSpeciesValues::Supplied), None, None, Some("0"));
    assert_eq!(supplied.error_type, Some(site::ERR_SITE_REQUIRED_SUPPLIED));

    let supplied_ok =
        site::validate_site_required(Some(SiteSpeciesValues::Supplied), None, None, Some("12"));
    assert!(supplied_ok.is_valid);

    assert!(site::validate_site_required(None, None, None, None).is_valid);
}

#[test]
fn site_panel_requires_selection_and_bec_zone() {
    let mut params = ModelParameters::with_defaults();
    assert!(site::validate_site_panel(&params).is_valid);

    params.bec_zone = Some(" ".to_string());
    assert_eq!(
        site::validate_site_panel(&params).error_type,
        Some(site::ERR_BEC_ZONE_REQUIRED)
    );

    params.site_species_values = None;
    assert_eq!(
        site::validate_site_panel(&params).error_type,
        Some(site::ERR_SITE_SPECIES_VALUES_REQUIRED)
    );
}

#[test]
fn site_ranges_are_checked() {
    let result = site::validate_site_ranges(Some("60"), Some("100"), Some("16"));
    assert_eq!(result.error_type, Some(site::ERR_SPZ_HEIGHT));
}

#[test]
fn quadratic_mean_diameter_below_limit_is_invalid() {
    // 10 m2/ha over 2000 stems gives roughly 7.98 cm.
    let result =
        stand::validate_quad_diameter(Some("10"), Some("2000"), Some(MinimumDbhLimit::Cm12_5));
    assert_eq!(result.error_type, Some(stand::ERR_QUAD_DIAMETER));
    let Some(ValidationDetails::QuadraticMeanDiameter { computed, minimum }) = result.details
    else {
        panic!("expected diameter details");
    };
    assert!((computed - 7.98).abs() < 0.01);
    assert_eq!(minimum, 12.5);

    assert!(
        stand::validate_quad_diameter(Some("10"), Some("2000"), Some(MinimumDbhLimit::Cm7_5))
            .is_valid
    );
    assert!(stand::validate_quad_diameter(None, Some("2000"), Some(MinimumDbhLimit::Cm12_5)).is_valid);
}

#[test]
fn stand_panel_checks_ranges() {
    let mut params = ModelParameters::with_defaults();
    assert!(stand::validate_stand_panel(&params).is_valid);
    params.crown_closure = Some("101".to_string());
    assert_eq!(
        stand::validate_stand_panel(&params).error_type,
        Some(stand::ERR_CROWN_CLOSURE)
    );
}

#[test]
fn report_window_checks_active_triple() {
    let window = ReportWindow::default_age_window();
    assert!(report::validate_window(&window).is_valid);

    let mut reversed = window.clone();
    reversed.starting_age = Some("100".to_string());
    reversed.finishing_age = Some("50".to_string());
    assert_eq!(
        report::validate_window(&reversed).error_type,
        Some(report::ERR_FINISH_AGE_BEFORE_START)
    );

    let mut incomplete = window.clone();
    incomplete.age_increment = None;
    assert_eq!(
        report::validate_window(&incomplete).error_type,
        Some(report::ERR_REQUIRED_AGE_FIELDS)
    );

    let years = ReportWindow {
        selected: Some(AgeYearRange::Year),
        start_year: Some("2020".to_string()),
        end_year: Some("2600".to_string()),
        year_increment: Some("10".to_string()),
        ..ReportWindow::default()
    };
    assert_eq!(
        report::validate_window(&years).error_type,
        Some(report::ERR_END_YEAR)
    );

    assert_eq!(
        report::validate_window(&ReportWindow::default()).error_type,
        Some(report::ERR_AGE_YEAR_RANGE_REQUIRED)
    );
}

#[test]
fn fractional_window_values_are_rejected() {
    let mut window = ReportWindow::default_age_window();
    window.age_increment = Some("10.5".to_string());
    let result = report::validate_window(&window);
    assert_eq!(result.error_type, Some(report::ERR_AGE_INCREMENT));
    assert_eq!(result.details, Some(ValidationDetails::WholeNumber));

    window.age_increment = Some("10.0".to_string());
    assert!(report::validate_window(&window).is_valid);

    window.specific_year = Some("2030.5".to_string());
    assert_eq!(
        report::validate_window(&window).error_type,
        Some(report::ERR_SPECIFIC_YEAR)
    );
}

#[test]
fn whole_range_reports_bounds_before_fraction() {
    let result = validate_whole_range(Some("999.5"), limits::STARTING_AGE, "startingAge");
    assert_eq!(
        result.details,
        Some(ValidationDetails::Range {
            min: limits::STARTING_AGE.min,
            max: limits::STARTING_AGE.max
        })
    );
    assert!(validate_whole_range(None, limits::STARTING_AGE, "startingAge").is_valid);
}

#[test]
fn report_panel_requires_title_and_projection_type() {
    let window = ReportWindow::default_age_window();
    assert_eq!(
        report::validate_report_panel(&window, Some(" "), Some("Volume")).error_type,
        Some(report::ERR_REPORT_TITLE_REQUIRED)
    );
    assert_eq!(
        report::validate_report_panel(&window, Some("Title"), None).error_type,
        Some(report::ERR_PROJECTION_TYPE_REQUIRED)
    );
    assert!(report::validate_report_panel(&window, Some("Title"), Some("Volume")).is_valid);
}

fn polygon_file() -> UploadedFile {
    let text = format!("{}\n", csv_headers::POLYGON.join(","));
    UploadedFile::csv(text.into_bytes(), "poly.csv")
}

fn layer_file() -> UploadedFile {
    let text = format!("{}\n", csv_headers::LAYER.join(","));
    UploadedFile::csv(text.into_bytes(), "layer.csv")
}

#[test]
fn attachments_require_both_files_in_order() {
    let polygon = polygon_file();
    let layer = layer_file();
    assert_eq!(
        file_upload::validate_attachments(None, None).error_type,
        Some(file_upload::ERR_POLYGON_FILE_MISSING)
    );
    assert_eq!(
        file_upload::validate_attachments(Some(&polygon), None).error_type,
        Some(file_upload::ERR_LAYER_FILE_MISSING)
    );
    assert!(file_upload::validate_attachments(Some(&polygon), Some(&layer)).is_valid);
}

#[test]
fn attachments_detect_format_and_header_problems() {
    let layer = layer_file();
    let not_csv = UploadedFile::new(b"x".to_vec(), "poly.xlsx", "application/vnd.ms-excel");
    assert_eq!(
        file_upload::validate_attachments(Some(&not_csv), Some(&layer)).error_type,
        Some(file_upload::ERR_POLYGON_FILE_NOT_CSV)
    );

    let swapped = UploadedFile::csv(layer.file.clone(), "poly.csv");
    assert_eq!(
        file_upload::validate_attachments(Some(&swapped), Some(&layer)).error_type,
        Some(file_upload::ERR_POLYGON_HEADER_MISMATCH)
    );

    let doubled = UploadedFile::csv(b"A,B,A,B\n".to_vec(), "layer.csv");
    let result = file_upload::validate_attachments(Some(&polygon_file()), Some(&doubled));
    assert_eq!(result.error_type, Some(file_upload::ERR_LAYER_DUPLICATE_COLUMNS));
    assert_eq!(
        result.details,
        Some(ValidationDetails::DuplicateColumns(vec![
            "A".to_string(),
            "B".to_string()
        ]))
    );
}

#[test]
fn csv_detection_uses_extension_or_mime() {
    assert!(file_upload::is_csv(&UploadedFile::new(Vec::new(), "A.CSV", "")));
    assert!(file_upload::is_csv(&UploadedFile::new(
        Vec::new(),
        "upload",
        "text/csv; charset=utf-8"
    )));
    assert!(!file_upload::is_csv(&UploadedFile::new(Vec::new(), "upload.txt", "text/plain")));
}
