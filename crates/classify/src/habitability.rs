//! Habitability fallback scoring for rows without a catalog disposition.
//!
//! Four physical factors are bucketed independently and summed, then a data
//! completeness bonus, the name-pattern boost and a small hash-derived
//! adjustment are added on top. Well-known names override the threshold.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::fields::{CanonicalField, ExtractedParameters};
use crate::hash::string_hash;
use crate::model::{clamp_confidence, Classification, HabitabilityRating, Resolution};
use crate::names::{match_boost, FAMOUS_BOOST};

use HabitabilityRating::{Excellent, Good, Poor};

/// Completeness bonus for a row whose name and four physical fields are all real.
pub const COMPLETENESS_WEIGHT: f64 = 20.0;

/// Confidence floor for names matching a well-known convention.
pub const FAMOUS_FLOOR: u8 = 85;

// ---------------------------------------------------------------------------
// Factor tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub lo: f64,
    pub hi: f64,
    pub score: f64,
    pub rating: HabitabilityRating,
}

pub struct Factor {
    /// Key in `habitability_factors`.
    pub key: &'static str,
    pub field: CanonicalField,
    /// Inclusive ranges, innermost first.
    pub bands: &'static [Band],
}

const fn band(lo: f64, hi: f64, score: f64, rating: HabitabilityRating) -> Band {
    Band { lo, hi, score, rating }
}

pub const FACTORS: &[Factor] = &[
    Factor {
        key: "size",
        field: CanonicalField::Radius,
        bands: &[
            band(0.8, 1.5, 30.0, Excellent),
            band(0.5, 2.0, 20.0, Good),
            band(0.3, 3.0, 10.0, Good),
        ],
    },
    Factor {
        key: "mass",
        field: CanonicalField::Mass,
        bands: &[
            band(0.5, 2.0, 25.0, Excellent),
            band(0.3, 5.0, 15.0, Good),
            band(0.1, 10.0, 8.0, Good),
        ],
    },
    Factor {
        key: "orbit",
        field: CanonicalField::Period,
        bands: &[
            band(200.0, 500.0, 25.0, Excellent),
            band(100.0, 800.0, 15.0, Good),
            band(10.0, 2000.0, 8.0, Good),
        ],
    },
    Factor {
        key: "star",
        field: CanonicalField::StarTemperature,
        bands: &[
            band(5000.0, 6500.0, 20.0, Excellent),
            band(4500.0, 7000.0, 12.0, Good),
            band(3000.0, 8000.0, 5.0, Good),
        ],
    },
];

impl Factor {
    /// Score and rating for `value`; outside every band scores 0 and rates Poor.
    pub fn evaluate(&self, value: f64) -> (f64, HabitabilityRating) {
        self.bands
            .iter()
            .find(|b| value >= b.lo && value <= b.hi)
            .map_or((0.0, Poor), |b| (b.score, b.rating))
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Individual contributions, kept for inspection output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub physical: f64,
    pub completeness: f64,
    pub name_boost: u8,
    pub adjustment: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HabitabilityScore {
    pub resolution: Resolution,
    pub factors: BTreeMap<String, HabitabilityRating>,
    pub breakdown: ScoreBreakdown,
}

/// Deterministic tie-breaker in `[-5, 5)`, seeded by name, radius and mass.
pub fn micro_adjustment(planet_name: &str, radius: f64, mass: f64) -> f64 {
    let seed = format!("{planet_name}{radius}{mass}");
    f64::from(string_hash(&seed) % 1000) / 100.0 - 5.0
}

/// Physical points and per-factor ratings for a row's parameters.
pub fn rate(params: &ExtractedParameters) -> (f64, BTreeMap<String, HabitabilityRating>) {
    let mut physical = 0.0;
    let mut factors = BTreeMap::new();
    for factor in FACTORS {
        let value = params.numeric(factor.field).map_or(f64::NAN, |e| e.value);
        let (points, rating) = factor.evaluate(value);
        physical += points;
        factors.insert(factor.key.to_string(), rating);
    }
    (physical, factors)
}

pub fn score(params: &ExtractedParameters, planet_name: &str) -> HabitabilityScore {
    let (physical, factors) = rate(params);
    let completeness = params.completeness_count() as f64 / 5.0 * COMPLETENESS_WEIGHT;
    let name_boost = match_boost(planet_name);
    let adjustment = micro_adjustment(planet_name, params.radius.value, params.mass.value);

    let raw = physical + completeness + f64::from(name_boost) + adjustment;
    let mut confidence = clamp_confidence(raw);
    let mut classification = Classification::from_confidence(confidence);

    if name_boost >= FAMOUS_BOOST {
        classification = Classification::ConfirmedExoplanet;
        confidence = confidence.max(FAMOUS_FLOOR);
    }

    HabitabilityScore {
        resolution: Resolution {
            classification,
            confidence,
        },
        factors,
        breakdown: ScoreBreakdown {
            physical,
            completeness,
            name_boost,
            adjustment,
        },
    }
}
