//! Schema-native disposition rules.
//!
//! Each family owns an ordered rule table. Rules test the uppercased
//! disposition text (or discovery method, or confirmed flag) and the first
//! hit decides classification and confidence as `base + score * weight`,
//! clamped to `[0, 100]`. A table that runs out of rules yields `None` and the
//! row falls through to the habitability path.

use crate::model::{clamp_confidence, Classification, Resolution};
use crate::schema::{SchemaFamily, SchemaMatch};

use Classification::{CandidateExoplanet as Candidate, ConfirmedExoplanet as Confirmed, FalsePositive};

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum When {
    /// Disposition equals one of the codes.
    Equals(&'static [&'static str]),
    /// Disposition contains one of the fragments.
    Contains(&'static [&'static str]),
    /// Discovery method contains one of the fragments.
    MethodContains(&'static [&'static str]),
    /// Confirmed flag is truthy.
    Flag,
    Always,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub when: When,
    pub classification: Classification,
    pub base: f64,
    /// Multiplier on the family score (`koi_score`); 0 for fixed confidences.
    pub score_weight: f64,
}

const fn rule(when: When, classification: Classification, base: f64, score_weight: f64) -> Rule {
    Rule { when, classification, base, score_weight }
}

const KOI_RULES: &[Rule] = &[
    rule(When::Equals(&["CONFIRMED"]), Confirmed, 85.0, 10.0),
    rule(When::Equals(&["CANDIDATE"]), Candidate, 65.0, 15.0),
    rule(When::Contains(&["FALSE"]), FalsePositive, 15.0, 10.0),
];

const ARCHIVE_RULES: &[Rule] = &[
    rule(When::Contains(&["CONFIRMED", "PUBLISHED"]), Confirmed, 90.0, 0.0),
    rule(When::Contains(&["CANDIDATE"]), Candidate, 70.0, 0.0),
    rule(When::MethodContains(&["TRANSIT", "RADIAL"]), Confirmed, 80.0, 0.0),
    rule(When::MethodContains(&["IMAGING", "ASTROMETRY"]), Confirmed, 75.0, 0.0),
    rule(When::Always, Candidate, 65.0, 0.0),
];

const TESS_RULES: &[Rule] = &[
    rule(When::Equals(&["CONFIRMED", "PC", "CP"]), Confirmed, 85.0, 0.0),
    rule(When::Equals(&["CANDIDATE", "KP"]), Candidate, 70.0, 0.0),
    rule(When::Contains(&["FALSE"]), FalsePositive, 20.0, 0.0),
    rule(When::Equals(&["FP"]), FalsePositive, 20.0, 0.0),
    rule(When::Always, Candidate, 60.0, 0.0),
];

const HARPS_RULES: &[Rule] = &[
    rule(When::Flag, Confirmed, 88.0, 0.0),
    rule(When::Always, Candidate, 72.0, 0.0),
];

const GROUND_SURVEY_RULES: &[Rule] = &[rule(When::Always, Confirmed, 82.0, 0.0)];

const STATUS_RULES: &[Rule] = &[
    rule(When::Contains(&["CONFIRM", "PUBLISH"]), Confirmed, 85.0, 0.0),
    rule(When::Equals(&["TRUE"]), Confirmed, 85.0, 0.0),
    rule(When::Contains(&["CANDID", "POSSIBLE"]), Candidate, 65.0, 0.0),
    rule(When::Contains(&["FALSE", "REJECT"]), FalsePositive, 25.0, 0.0),
];

pub fn rules_for(family: SchemaFamily) -> &'static [Rule] {
    match family {
        SchemaFamily::NasaKoi => KOI_RULES,
        SchemaFamily::NasaArchive => ARCHIVE_RULES,
        SchemaFamily::Tess => TESS_RULES,
        SchemaFamily::EsoHarps => HARPS_RULES,
        SchemaFamily::GroundSurvey => GROUND_SURVEY_RULES,
        SchemaFamily::GenericStatus => STATUS_RULES,
        SchemaFamily::None => &[],
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

struct Signals {
    disposition: String,
    method: String,
    flag: bool,
}

impl Signals {
    fn from_match(m: &SchemaMatch) -> Self {
        Self {
            disposition: normalize(m.disposition.as_deref()),
            method: normalize(m.method.as_deref()),
            flag: m.confirmed_flag.as_deref().is_some_and(is_truthy),
        }
    }

    fn test(&self, when: When) -> bool {
        match when {
            When::Equals(codes) => codes.iter().any(|c| self.disposition == *c),
            When::Contains(parts) => parts.iter().any(|p| self.disposition.contains(p)),
            When::MethodContains(parts) => parts.iter().any(|p| self.method.contains(p)),
            When::Flag => self.flag,
            When::Always => true,
        }
    }
}

fn normalize(text: Option<&str>) -> String {
    text.map(|t| t.trim().to_uppercase()).unwrap_or_default()
}

/// Truthiness of a confirmed-flag cell: yes/true/y/t/confirmed or a non-zero number.
pub fn is_truthy(flag: &str) -> bool {
    let flag = flag.trim();
    if let Ok(n) = flag.parse::<f64>() {
        return n.is_finite() && n != 0.0;
    }
    matches!(
        flag.to_uppercase().as_str(),
        "TRUE" | "YES" | "Y" | "T" | "CONFIRMED"
    )
}

/// Map a detected schema's native disposition into a classification.
///
/// `None` when the family is `None`, or when its table has no rule for the
/// disposition text (e.g. a KOI row marked `NOT DISPOSITIONED`).
pub fn resolve(m: &SchemaMatch) -> Option<Resolution> {
    let signals = Signals::from_match(m);
    let score = m.score.unwrap_or(0.0);
    rules_for(m.family)
        .iter()
        .find(|r| signals.test(r.when))
        .map(|r| Resolution {
            classification: r.classification,
            confidence: clamp_confidence(r.base + score * r.score_weight),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(family: SchemaFamily) -> SchemaMatch {
        SchemaMatch {
            family,
            disposition: None,
            score: None,
            method: None,
            confirmed_flag: None,
        }
    }

    fn with_disposition(family: SchemaFamily, d: &str) -> SchemaMatch {
        SchemaMatch {
            disposition: Some(d.into()),
            ..matched(family)
        }
    }

    fn koi(d: &str, score: Option<f64>) -> SchemaMatch {
        SchemaMatch {
            score,
            ..with_disposition(SchemaFamily::NasaKoi, d)
        }
    }

    fn res(c: Classification, confidence: u8) -> Option<Resolution> {
        Some(Resolution { classification: c, confidence })
    }

    #[test]
    fn koi_formulas() {
        assert_eq!(resolve(&koi("CONFIRMED", Some(1.0))), res(Confirmed, 95));
        assert_eq!(resolve(&koi("CONFIRMED", None)), res(Confirmed, 85));
        assert_eq!(resolve(&koi("candidate", Some(0.5))), res(Candidate, 73));
        assert_eq!(resolve(&koi("FALSE POSITIVE", Some(0.2))), res(FalsePositive, 17));
    }

    #[test]
    fn koi_malformed_score_is_clamped() {
        assert_eq!(resolve(&koi("CONFIRMED", Some(7.0))), res(Confirmed, 100));
        assert_eq!(resolve(&koi("FALSE POSITIVE", Some(-9.0))), res(FalsePositive, 0));
    }

    #[test]
    fn koi_unknown_disposition_falls_through() {
        assert_eq!(resolve(&koi("NOT DISPOSITIONED", None)), None);
    }

    #[test]
    fn archive_rules() {
        let a = |d: Option<&str>, method: &str| SchemaMatch {
            disposition: d.map(Into::into),
            method: Some(method.into()),
            ..matched(SchemaFamily::NasaArchive)
        };
        assert_eq!(resolve(&a(Some("Published Confirmed"), "Transit")), res(Confirmed, 90));
        assert_eq!(resolve(&a(Some("CANDIDATE"), "Transit")), res(Candidate, 70));
        assert_eq!(resolve(&a(None, "Radial Velocity")), res(Confirmed, 80));
        assert_eq!(resolve(&a(None, "Direct Imaging")), res(Confirmed, 75));
        assert_eq!(resolve(&a(None, "Astrometry")), res(Confirmed, 75));
        assert_eq!(resolve(&a(None, "Microlensing")), res(Candidate, 65));
    }

    #[test]
    fn tess_codes() {
        let t = |d: &str| resolve(&with_disposition(SchemaFamily::Tess, d));
        assert_eq!(t("PC"), res(Confirmed, 85));
        assert_eq!(t("cp"), res(Confirmed, 85));
        assert_eq!(t("KP"), res(Candidate, 70));
        assert_eq!(t("FP"), res(FalsePositive, 20));
        assert_eq!(t("False Alarm"), res(FalsePositive, 20));
        assert_eq!(t("APC"), res(Candidate, 60));
        assert_eq!(resolve(&matched(SchemaFamily::Tess)), res(Candidate, 60));
    }

    #[test]
    fn harps_flag() {
        let h = |flag: Option<&str>| SchemaMatch {
            confirmed_flag: flag.map(Into::into),
            ..matched(SchemaFamily::EsoHarps)
        };
        assert_eq!(resolve(&h(Some("yes"))), res(Confirmed, 88));
        assert_eq!(resolve(&h(Some("1"))), res(Confirmed, 88));
        assert_eq!(resolve(&h(Some("0"))), res(Candidate, 72));
        assert_eq!(resolve(&h(None)), res(Candidate, 72));
    }

    #[test]
    fn ground_survey_is_confirmed() {
        assert_eq!(resolve(&matched(SchemaFamily::GroundSurvey)), res(Confirmed, 82));
    }

    #[test]
    fn generic_status_keywords() {
        let g = |d: &str| resolve(&with_disposition(SchemaFamily::GenericStatus, d));
        assert_eq!(g("Confirmed"), res(Confirmed, 85));
        assert_eq!(g("published"), res(Confirmed, 85));
        assert_eq!(g("true"), res(Confirmed, 85));
        assert_eq!(g("Candidate"), res(Candidate, 65));
        assert_eq!(g("possible planet"), res(Candidate, 65));
        assert_eq!(g("false"), res(FalsePositive, 25));
        assert_eq!(g("REJECTED"), res(FalsePositive, 25));
        assert_eq!(g("pending review"), None);
    }

    #[test]
    fn none_family_never_resolves() {
        assert_eq!(resolve(&matched(SchemaFamily::None)), None);
    }
}
