use chrono::Datelike;
use shared::{
    constants::{biz, default_utilization, limits, species_group},
    domain::{
        AgeType, AgeYearRange, DerivedBy, MinimumDbhLimit, ProjectionType, SiteSpeciesValues,
        SpeciesEntry, SpeciesGroup, UploadedFile,
    },
};

use crate::validation::parse_number;

pub const DEFAULT_REPORT_TITLE: &str = "A Sample Report Title";

/// The active projection window plus its two candidate triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportWindow {
    pub selected: Option<AgeYearRange>,
    pub starting_age: Option<String>,
    pub finishing_age: Option<String>,
    pub age_increment: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    pub year_increment: Option<String>,
    pub specific_year: Option<String>,
}

impl ReportWindow {
    pub fn default_age_window() -> Self {
        Self {
            selected: Some(AgeYearRange::Age),
            starting_age: Some("0".to_string()),
            finishing_age: Some("250".to_string()),
            age_increment: Some("25".to_string()),
            ..Self::default()
        }
    }

    /// (start, end, increment) of the currently selected window.
    pub fn active_triple(&self) -> Option<[Option<&str>; 3]> {
        match self.selected? {
            AgeYearRange::Age => Some([
                self.starting_age.as_deref(),
                self.finishing_age.as_deref(),
                self.age_increment.as_deref(),
            ]),
            AgeYearRange::Year => Some([
                self.start_year.as_deref(),
                self.end_year.as_deref(),
                self.year_increment.as_deref(),
            ]),
        }
    }
}

/// Toggles on the report panel that feed option derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportToggles {
    pub forward_grow: bool,
    pub backward_grow: bool,
    pub computed_mai: bool,
    pub culmination_values: bool,
    pub by_species: bool,
    pub by_layer: bool,
    pub projection_mode: bool,
    pub polygon_id: bool,
    pub current_year: bool,
    pub reference_year: bool,
    pub secondary_height: bool,
}

impl Default for ReportToggles {
    fn default() -> Self {
        Self {
            forward_grow: true,
            backward_grow: true,
            computed_mai: false,
            culmination_values: false,
            by_species: false,
            by_layer: false,
            projection_mode: false,
            polygon_id: false,
            current_year: false,
            reference_year: false,
            secondary_height: false,
        }
    }
}

/// In-memory state of a manually entered projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    pub derived_by: Option<DerivedBy>,
    pub species_list: Vec<SpeciesEntry>,

    pub bec_zone: Option<String>,
    pub eco_zone: Option<String>,
    pub site_species_values: Option<SiteSpeciesValues>,
    pub age_type: Option<AgeType>,
    pub spz_age: Option<String>,
    pub spz_height: Option<String>,
    pub bha50_site_index: Option<String>,

    pub percent_stockable_area: Option<String>,
    pub basal_area: Option<String>,
    pub trees_per_hectare: Option<String>,
    pub min_dbh_limit: Option<MinimumDbhLimit>,
    pub crown_closure: Option<String>,

    pub window: ReportWindow,
    pub toggles: ReportToggles,
    pub projection_type: Option<ProjectionType>,
    pub report_title: Option<String>,
    pub reference_year: Option<i32>,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            derived_by: None,
            species_list: vec![SpeciesEntry::empty(); limits::SPECIES_SLOTS],
            bec_zone: None,
            eco_zone: None,
            site_species_values: None,
            age_type: None,
            spz_age: None,
            spz_height: None,
            bha50_site_index: None,
            percent_stockable_area: None,
            basal_area: None,
            trees_per_hectare: None,
            min_dbh_limit: None,
            crown_closure: None,
            window: ReportWindow::default(),
            toggles: ReportToggles::default(),
            projection_type: None,
            report_title: None,
            reference_year: None,
        }
    }
}

impl ModelParameters {
    /// Sample stand used to pre-fill a new projection.
    pub fn with_defaults() -> Self {
        let mut species_list = vec![
            SpeciesEntry::new("PL", "30.0"),
            SpeciesEntry::new("AC", "30.0"),
            SpeciesEntry::new("H", "30.0"),
            SpeciesEntry::new("S", "10.0"),
        ];
        species_list.resize(limits::SPECIES_SLOTS, SpeciesEntry::empty());

        Self {
            derived_by: Some(DerivedBy::Volume),
            species_list,
            bec_zone: Some("IDF".to_string()),
            eco_zone: None,
            site_species_values: Some(SiteSpeciesValues::Computed),
            age_type: Some(AgeType::Total),
            spz_age: Some("60".to_string()),
            spz_height: Some("17.00".to_string()),
            bha50_site_index: Some("16.30".to_string()),
            percent_stockable_area: Some("55".to_string()),
            basal_area: None,
            trees_per_hectare: None,
            min_dbh_limit: Some(MinimumDbhLimit::Cm12_5),
            crown_closure: Some("0".to_string()),
            window: ReportWindow::default_age_window(),
            toggles: ReportToggles {
                by_layer: true,
                ..ReportToggles::default()
            },
            projection_type: Some(ProjectionType::Volume),
            report_title: Some(DEFAULT_REPORT_TITLE.to_string()),
            reference_year: Some(chrono::Local::now().year()),
        }
    }

    /// Discards everything entered so far.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Per-group shares, largest first.
    pub fn species_groups(&self) -> Vec<SpeciesGroup> {
        // Entry order is kept so that ties resolve to the first species entered.
        // (group, first code seen in the group, summed percent)
        let mut totals: Vec<(&str, &str, f64)> = Vec::new();
        for entry in &self.species_list {
            let Some(code) = entry.code.as_deref().filter(|c| !c.trim().is_empty()) else {
                continue;
            };
            let Some(percent) = entry.percent.as_deref().and_then(parse_number) else {
                continue;
            };
            if percent == 0.0 {
                continue;
            }
            let group = species_group(code);
            match totals.iter_mut().find(|(seen, _, _)| *seen == group) {
                Some((_, _, total)) => *total += percent,
                None => totals.push((group, code, percent)),
            }
        }

        let mut groups: Vec<SpeciesGroup> = totals
            .into_iter()
            .map(|(group, code, percent)| SpeciesGroup {
                minimum_dbh_limit: default_utilization(group),
                group: group.to_string(),
                percent: format!("{percent:.prec$}", prec = limits::SPECIES_PERCENT_DECIMALS),
                site_species: code.to_string(),
            })
            .collect();
        groups.sort_by(|a, b| {
            let a = parse_number(&a.percent).unwrap_or_default();
            let b = parse_number(&b.percent).unwrap_or_default();
            b.total_cmp(&a)
        });
        groups
    }

    /// Site species of the largest group.
    pub fn highest_percent_species(&self) -> Option<String> {
        self.species_groups()
            .into_iter()
            .next()
            .map(|group| group.site_species)
    }

    /// Sum of all entered percents, floored to one decimal.
    pub fn total_species_percent(&self) -> String {
        let sum: f64 = self
            .species_list
            .iter()
            .filter_map(|entry| entry.percent.as_deref().and_then(parse_number))
            .sum();
        // Round away representation noise before flooring.
        let floored = ((sum * 100.0).round() / 10.0).floor() / 10.0;
        format!("{floored:.1}")
    }

    pub fn species_percents(&self) -> Vec<Option<&str>> {
        self.species_list
            .iter()
            .map(|entry| entry.percent.as_deref())
            .collect()
    }
}

/// Minimum DBH utilization chosen for one species group of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupUtilization {
    pub group: String,
    pub minimum_dbh_limit: MinimumDbhLimit,
}

/// One entry per known species group, each at its default utilization.
pub fn default_group_utilizations() -> Vec<GroupUtilization> {
    biz::SPECIES_GROUPS
        .iter()
        .map(|group| GroupUtilization {
            group: group.to_string(),
            minimum_dbh_limit: default_utilization(group),
        })
        .collect()
}

/// State of a projection whose inputs come from uploaded polygon/layer files.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUploadParameters {
    pub window: ReportWindow,
    pub toggles: ReportToggles,
    pub projection_type: Option<ProjectionType>,
    pub report_title: Option<String>,
    pub group_utilizations: Vec<GroupUtilization>,
    pub polygon_file: Option<UploadedFile>,
    pub layer_file: Option<UploadedFile>,
}

impl Default for FileUploadParameters {
    fn default() -> Self {
        Self {
            window: ReportWindow::default(),
            toggles: ReportToggles::default(),
            projection_type: None,
            report_title: None,
            group_utilizations: default_group_utilizations(),
            polygon_file: None,
            layer_file: None,
        }
    }
}

impl FileUploadParameters {
    pub fn with_defaults() -> Self {
        Self {
            window: ReportWindow::default_age_window(),
            projection_type: Some(ProjectionType::Volume),
            report_title: Some(DEFAULT_REPORT_TITLE.to_string()),
            ..Self::default()
        }
    }

    /// Sets the utilization of `group`. Unknown groups are ignored.
    pub fn set_group_utilization(&mut self, group: &str, limit: MinimumDbhLimit) {
        if let Some(entry) = self.group_utilizations.iter_mut().find(|entry| entry.group == group) {
            entry.minimum_dbh_limit = limit;
        }
    }

    /// Discards files and report settings. Group utilizations return to their defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
