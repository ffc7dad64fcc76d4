use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownLabel;

/// Declares a closed vocabulary whose wire form and display form are the same label.
macro_rules! labeled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::from_label(value).ok_or_else(|| UnknownLabel::new(stringify!($name), value))
            }
        }
    };
}

labeled_enum!(
    /// How the species composition percentages were measured.
    DerivedBy {
        Volume => "Volume",
        BasalArea => "Basal Area",
    }
);

labeled_enum!(SiteSpeciesValues {
    Supplied => "Supplied",
    Computed => "Computed",
});

labeled_enum!(AgeType {
    Total => "Total",
    Breast => "Breast",
});

labeled_enum!(
    /// Which projection window is active. Exactly one is in effect at a time.
    AgeYearRange {
        Age => "age",
        Year => "year",
    }
);

labeled_enum!(ProjectionType {
    Volume => "Volume",
    CfsBiomass => "CFS Biomass",
});

labeled_enum!(
    /// Entry point chosen when starting a new projection.
    ModelSelection {
        FileUpload => "File Upload",
        InputModelParameters => "Input Model Parameters",
    }
);

labeled_enum!(ViewMode {
    View => "view",
    Edit => "edit",
    Create => "create",
});

labeled_enum!(
    /// Steps of the data-entry wizard across both workflow variants.
    PanelName {
        SpeciesInfo => "speciesInfo",
        SiteInfo => "siteInfo",
        StandInfo => "standInfo",
        ReportInfo => "reportInfo",
        Attachments => "attachments",
    }
);

labeled_enum!(MinimumDbhLimit {
    Cm4_0 => "4.0 cm+",
    Cm7_5 => "7.5 cm+",
    Cm12_5 => "12.5 cm+",
    Cm17_5 => "17.5 cm+",
    Cm22_5 => "22.5 cm+",
});

impl MinimumDbhLimit {
    /// Diameter threshold in centimetres.
    pub fn centimetres(self) -> f64 {
        match self {
            MinimumDbhLimit::Cm4_0 => 4.0,
            MinimumDbhLimit::Cm7_5 => 7.5,
            MinimumDbhLimit::Cm12_5 => 12.5,
            MinimumDbhLimit::Cm17_5 => 17.5,
            MinimumDbhLimit::Cm22_5 => 22.5,
        }
    }
}

/// Wizard layouts. The order of panels is fixed per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowVariant {
    ModelParameters,
    FileUpload,
}

impl WorkflowVariant {
    pub fn panel_order(self) -> &'static [PanelName] {
        match self {
            WorkflowVariant::ModelParameters => &[
                PanelName::SpeciesInfo,
                PanelName::SiteInfo,
                PanelName::StandInfo,
                PanelName::ReportInfo,
            ],
            WorkflowVariant::FileUpload => &[PanelName::ReportInfo, PanelName::Attachments],
        }
    }
}

impl From<ModelSelection> for WorkflowVariant {
    fn from(value: ModelSelection) -> Self {
        match value {
            ModelSelection::FileUpload => WorkflowVariant::FileUpload,
            ModelSelection::InputModelParameters => WorkflowVariant::ModelParameters,
        }
    }
}

/// One (species code, percent) slot of the composition table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    pub code: Option<String>,
    pub percent: Option<String>,
}

impl SpeciesEntry {
    pub fn new(code: impl Into<String>, percent: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            percent: Some(percent.into()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Aggregated share of one species group, derived from the species entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesGroup {
    pub group: String,
    pub percent: String,
    pub site_species: String,
    pub minimum_dbh_limit: MinimumDbhLimit,
}

/// An input table supplied by the user in file-upload mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file: Vec<u8>,
    pub name: String,
    pub mime_type: String,
}

impl UploadedFile {
    pub fn new(file: impl Into<Vec<u8>>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn csv(file: impl Into<Vec<u8>>, name: impl Into<String>) -> Self {
        Self::new(file, name, "text/csv")
    }
}
