//! Canonical field extraction over heterogeneous catalog schemas.
//!
//! Each canonical field owns a fixed, ordered alias chain that merges the
//! column conventions of every supported catalog. Lookup walks the chain and
//! takes the first usable value; when nothing usable exists the field gets a
//! deterministic synthetic value derived from the planet name.

use serde::Serialize;

use crate::hash::unit_fraction;
use crate::value::Row;

/// Name used for hashing when a row carries no planet name at all.
pub const UNKNOWN_PLANET: &str = "Unknown Planet";

// ---------------------------------------------------------------------------
// Canonical fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    PlanetName,
    Radius,
    Mass,
    Period,
    StarTemperature,
    Distance,
}

const PLANET_NAME_ALIASES: &[&str] = &[
    "pl_name",
    "kepler_name",
    "kepoi_name",
    "planet_name",
    "name",
    "object_name",
    "Planet Name",
    "Name",
    "Object Name",
];

const RADIUS_ALIASES: &[&str] = &[
    "koi_prad",
    "pl_rade",
    "pl_radj",
    "radius",
    "planet_radius",
    "r_planet",
    "Radius",
    "Planet Radius",
];

const MASS_ALIASES: &[&str] = &[
    "pl_bmasse",
    "pl_masse",
    "pl_bmassj",
    "mass",
    "planet_mass",
    "m_planet",
    "Mass",
    "Planet Mass",
];

const PERIOD_ALIASES: &[&str] = &[
    "koi_period",
    "pl_orbper",
    "period",
    "orbital_period",
    "orbper",
    "Period",
    "Orbital Period",
];

const STAR_TEMPERATURE_ALIASES: &[&str] = &[
    "koi_steff",
    "st_teff",
    "star_temperature",
    "star_temp",
    "stellar_temp",
    "teff",
    "Star Temperature",
    "Stellar Temperature",
];

const DISTANCE_ALIASES: &[&str] = &[
    "sy_dist",
    "st_dist",
    "distance",
    "dist",
    "Distance",
];

impl CanonicalField {
    pub const ALL: [CanonicalField; 6] = [
        Self::PlanetName,
        Self::Radius,
        Self::Mass,
        Self::Period,
        Self::StarTemperature,
        Self::Distance,
    ];

    /// The five numeric fields, in extraction order.
    pub const NUMERIC: [CanonicalField; 5] = [
        Self::Radius,
        Self::Mass,
        Self::Period,
        Self::StarTemperature,
        Self::Distance,
    ];

    /// Stable field name. Part of the synthetic-value hash input.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlanetName => "planetName",
            Self::Radius => "radius",
            Self::Mass => "mass",
            Self::Period => "period",
            Self::StarTemperature => "starTemperature",
            Self::Distance => "distance",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::PlanetName => PLANET_NAME_ALIASES,
            Self::Radius => RADIUS_ALIASES,
            Self::Mass => MASS_ALIASES,
            Self::Period => PERIOD_ALIASES,
            Self::StarTemperature => STAR_TEMPERATURE_ALIASES,
            Self::Distance => DISTANCE_ALIASES,
        }
    }

    /// Plausible range for synthetic values. `None` for the name field.
    pub fn fallback_range(&self) -> Option<(f64, f64)> {
        match self {
            Self::PlanetName => None,
            Self::Radius => Some((0.3, 3.0)),
            Self::Mass => Some((0.1, 10.0)),
            Self::Period => Some((10.0, 2000.0)),
            Self::StarTemperature => Some((3000.0, 8000.0)),
            Self::Distance => Some((1.0, 5000.0)),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::PlanetName => "",
            Self::Radius => "Earth radii",
            Self::Mass => "Earth masses",
            Self::Period => "days",
            Self::StarTemperature => "K",
            Self::Distance => "ly",
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// An extracted value and whether it came from the synthetic fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extracted<T> {
    pub value: T,
    pub synthesized: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Name(String),
    Number(f64),
}

/// First alias of `field` that holds a usable value in `row`.
pub fn resolve_alias(row: &Row, field: CanonicalField) -> Option<&'static str> {
    let aliases = field.aliases();
    match field {
        CanonicalField::PlanetName => aliases.iter().copied().find(|a| row.text(a).is_some()),
        _ => aliases.iter().copied().find(|a| row.number(a).is_some()),
    }
}

/// Planet name from the alias chain, or [`UNKNOWN_PLANET`].
pub fn extract_name(row: &Row) -> Extracted<String> {
    match row.first_text(PLANET_NAME_ALIASES) {
        Some(value) => Extracted { value, synthesized: false },
        None => Extracted {
            value: UNKNOWN_PLANET.to_string(),
            synthesized: true,
        },
    }
}

/// Numeric field from the alias chain, or a synthetic value seeded by `planet_name`.
pub fn extract_number(row: &Row, field: CanonicalField, planet_name: &str) -> Extracted<f64> {
    match row.first_number(field.aliases()) {
        Some(value) => Extracted { value, synthesized: false },
        None => Extracted {
            value: synthesize(planet_name, field),
            synthesized: true,
        },
    }
}

/// Generic entry point: one canonical field of one row.
pub fn extract(row: &Row, field: CanonicalField) -> Extracted<FieldValue> {
    let name = extract_name(row);
    match field {
        CanonicalField::PlanetName => Extracted {
            value: FieldValue::Name(name.value),
            synthesized: name.synthesized,
        },
        _ => {
            let n = extract_number(row, field, &name.value);
            Extracted {
                value: FieldValue::Number(n.value),
                synthesized: n.synthesized,
            }
        }
    }
}

/// Deterministic placeholder for `field`, linearly mapped into its plausible range.
pub fn synthesize(planet_name: &str, field: CanonicalField) -> f64 {
    let Some((lo, hi)) = field.fallback_range() else {
        return 0.0;
    };
    let seed = format!("{planet_name}{}", field.name());
    lo + unit_fraction(&seed) * (hi - lo)
}

// ---------------------------------------------------------------------------
// All parameters for one row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedParameters {
    pub planet_name: Extracted<String>,
    pub radius: Extracted<f64>,
    pub mass: Extracted<f64>,
    pub period: Extracted<f64>,
    pub star_temperature: Extracted<f64>,
    pub distance: Extracted<f64>,
}

impl ExtractedParameters {
    pub fn from_row(row: &Row) -> Self {
        let planet_name = extract_name(row);
        let name = planet_name.value.as_str();
        Self {
            radius: extract_number(row, CanonicalField::Radius, name),
            mass: extract_number(row, CanonicalField::Mass, name),
            period: extract_number(row, CanonicalField::Period, name),
            star_temperature: extract_number(row, CanonicalField::StarTemperature, name),
            distance: extract_number(row, CanonicalField::Distance, name),
            planet_name,
        }
    }

    pub fn numeric(&self, field: CanonicalField) -> Option<&Extracted<f64>> {
        match field {
            CanonicalField::PlanetName => None,
            CanonicalField::Radius => Some(&self.radius),
            CanonicalField::Mass => Some(&self.mass),
            CanonicalField::Period => Some(&self.period),
            CanonicalField::StarTemperature => Some(&self.star_temperature),
            CanonicalField::Distance => Some(&self.distance),
        }
    }

    /// Count of scored fields read from real columns (0..=5): the name plus
    /// radius, mass, period and star temperature. Distance is never scored.
    pub fn completeness_count(&self) -> usize {
        let physical = [&self.radius, &self.mass, &self.period, &self.star_temperature]
            .into_iter()
            .filter(|e| !e.synthesized)
            .count();
        physical + usize::from(!self.planet_name.synthesized)
    }
}
