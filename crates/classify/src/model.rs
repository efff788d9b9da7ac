use std::collections::BTreeMap;

use serde::Serialize;

use crate::fields::ExtractedParameters;
use crate::value::Row;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Pre-loaded rows, in source order.
#[derive(Debug, Clone, Default)]
pub struct BatchInput {
    pub rows: Vec<Row>,
}

impl From<Vec<Row>> for BatchInput {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Classification {
    #[serde(rename = "Confirmed Exoplanet")]
    ConfirmedExoplanet,
    #[serde(rename = "Candidate Exoplanet")]
    CandidateExoplanet,
    #[serde(rename = "False Positive")]
    FalsePositive,
}

impl Classification {
    /// Threshold mapping used by the habitability path.
    pub fn from_confidence(confidence: u8) -> Self {
        if confidence >= 80 {
            Self::ConfirmedExoplanet
        } else if confidence >= 50 {
            Self::CandidateExoplanet
        } else {
            Self::FalsePositive
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfirmedExoplanet => write!(f, "Confirmed Exoplanet"),
            Self::CandidateExoplanet => write!(f, "Candidate Exoplanet"),
            Self::FalsePositive => write!(f, "False Positive"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum HabitabilityRating {
    Excellent,
    Good,
    Poor,
}

impl std::fmt::Display for HabitabilityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Poor => write!(f, "Poor"),
        }
    }
}

/// Classification plus confidence, before the result record is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub classification: Classification,
    pub confidence: u8,
}

/// Clamp a raw score to `[0, 100]` and round to an integer confidence.
pub fn clamp_confidence(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0).round() as u8
}

/// One classified row. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub planet_name: String,
    pub classification: Classification,
    pub confidence: u8,
    pub data_source: String,
    pub parameters: ExtractedParameters,
    /// Keys: `size`, `mass`, `orbit`, `star`.
    pub habitability_factors: BTreeMap<String, HabitabilityRating>,
    /// Position of the row in the input batch.
    pub row_index: usize,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub confirmed: usize,
    pub candidates: usize,
    pub false_positives: usize,
    pub average_confidence: f64,
    /// Distinct data sources, sorted.
    pub data_sources: Vec<String>,
    pub classification_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMeta {
    pub engine_version: String,
    pub run_at: String,
    pub parallel: bool,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub meta: BatchMeta,
    pub summary: BatchSummary,
    pub results: Vec<ClassificationResult>,
}
