//! Source schema detection.
//!
//! A row may carry signals for several catalog families at once (a KOI export
//! with a TOI cross-reference, say). Rules are evaluated in a fixed order and
//! the first match wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::fields::extract_name;
use crate::value::Row;

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaFamily {
    NasaKoi,
    NasaArchive,
    Tess,
    EsoHarps,
    GroundSurvey,
    GenericStatus,
    None,
}

impl SchemaFamily {
    /// Human label reported as the result's data source.
    pub fn data_source(&self) -> &'static str {
        match self {
            Self::NasaKoi => "NASA KOI (Kepler)",
            Self::NasaArchive => "NASA Exoplanet Archive",
            Self::Tess => "TESS",
            Self::EsoHarps => "ESO/HARPS",
            Self::GroundSurvey => "Ground Survey",
            Self::GenericStatus => "Status Column",
            Self::None => "Habitability Analysis",
        }
    }
}

impl std::fmt::Display for SchemaFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NasaKoi => write!(f, "NASA_KOI"),
            Self::NasaArchive => write!(f, "NASA_ARCHIVE"),
            Self::Tess => write!(f, "TESS"),
            Self::EsoHarps => write!(f, "ESO_HARPS"),
            Self::GroundSurvey => write!(f, "GROUND_SURVEY"),
            Self::GenericStatus => write!(f, "GENERIC_STATUS"),
            Self::None => write!(f, "NONE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Signal columns
// ---------------------------------------------------------------------------

pub const KOI_DISPOSITION_COLUMNS: &[&str] = &["koi_disposition", "koi_pdisposition"];
pub const KOI_SCORE_COLUMN: &str = "koi_score";
pub const DISCOVERY_METHOD_COLUMNS: &[&str] = &["pl_discmethod", "discoverymethod", "disc_method"];
pub const ARCHIVE_DISPOSITION_COLUMNS: &[&str] = &["disposition", "pl_status", "soltype", "status"];
pub const TESS_ID_COLUMNS: &[&str] = &["tic_id", "toi_id", "toi"];
pub const TESS_DISPOSITION_COLUMNS: &[&str] =
    &["tfopwg_disp", "tess_disposition", "toi_disposition", "disposition"];
pub const HARPS_ID_COLUMN: &str = "harps_id";
pub const HARPS_CONFIRMED_COLUMNS: &[&str] = &["confirmed", "harps_confirmed", "is_confirmed"];
pub const GROUND_SURVEY_MARKERS: &[&str] = &["hat-", "wasp-", "tres-", "gaia", "spitzer"];
pub const STATUS_COLUMNS: &[&str] = &["status", "disposition", "classification"];

static HARPS_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:HD|GJ) \d+").expect("static HARPS name pattern"));

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// Detected family plus the raw disposition fields relevant to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMatch {
    pub family: SchemaFamily,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_flag: Option<String>,
}

impl SchemaMatch {
    fn bare(family: SchemaFamily) -> Self {
        Self {
            family,
            disposition: None,
            score: None,
            method: None,
            confirmed_flag: None,
        }
    }
}

type Rule = fn(&Row, &str) -> bool;

fn koi_rule(row: &Row, _name: &str) -> bool {
    row.has_any(KOI_DISPOSITION_COLUMNS)
}

fn archive_rule(row: &Row, _name: &str) -> bool {
    row.has_any(DISCOVERY_METHOD_COLUMNS)
}

fn tess_rule(row: &Row, name: &str) -> bool {
    row.has_any(TESS_ID_COLUMNS) || name.contains("toi")
}

fn harps_rule(row: &Row, name: &str) -> bool {
    row.has(HARPS_ID_COLUMN) || HARPS_NAME.is_match(name)
}

fn ground_survey_rule(_row: &Row, name: &str) -> bool {
    GROUND_SURVEY_MARKERS.iter().any(|m| name.contains(m))
}

fn status_rule(row: &Row, _name: &str) -> bool {
    row.has_any(STATUS_COLUMNS)
}

/// Precedence order. `name` is lowercased and empty when the row has no name.
const RULES: &[(SchemaFamily, Rule)] = &[
    (SchemaFamily::NasaKoi, koi_rule),
    (SchemaFamily::NasaArchive, archive_rule),
    (SchemaFamily::Tess, tess_rule),
    (SchemaFamily::EsoHarps, harps_rule),
    (SchemaFamily::GroundSurvey, ground_survey_rule),
    (SchemaFamily::GenericStatus, status_rule),
];

/// Decide which catalog family `row` belongs to. Never fails.
pub fn detect(row: &Row) -> SchemaMatch {
    let name = extract_name(row);
    let name = if name.synthesized {
        String::new()
    } else {
        name.value.to_lowercase()
    };

    let family = RULES
        .iter()
        .find(|(_, rule)| rule(row, &name))
        .map_or(SchemaFamily::None, |(family, _)| *family);

    let mut m = SchemaMatch::bare(family);
    match family {
        SchemaFamily::NasaKoi => {
            m.disposition = row.first_text(KOI_DISPOSITION_COLUMNS);
            m.score = row.number(KOI_SCORE_COLUMN);
        }
        SchemaFamily::NasaArchive => {
            m.disposition = row.first_text(ARCHIVE_DISPOSITION_COLUMNS);
            m.method = row.first_text(DISCOVERY_METHOD_COLUMNS);
        }
        SchemaFamily::Tess => {
            m.disposition = row.first_text(TESS_DISPOSITION_COLUMNS);
        }
        SchemaFamily::EsoHarps => {
            m.confirmed_flag = row.first_text(HARPS_CONFIRMED_COLUMNS);
        }
        SchemaFamily::GenericStatus => {
            m.disposition = row.first_text(STATUS_COLUMNS);
        }
        SchemaFamily::GroundSurvey | SchemaFamily::None => {}
    }

    log::debug!("schema {} for {:?}", m.family, name);
    m
}
