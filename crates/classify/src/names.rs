//! Well-known exoplanet naming conventions and their confidence boosts.

use once_cell::sync::Lazy;
use regex::Regex;

/// Boost at or above which a name counts as a well-known planet.
pub const FAMOUS_BOOST: u8 = 15;

pub struct NamePattern {
    pub label: &'static str,
    pub regex: Regex,
    pub boost: u8,
}

fn pattern(label: &'static str, re: &str, boost: u8) -> NamePattern {
    NamePattern {
        label,
        regex: Regex::new(&format!("(?i){re}")).expect("static name pattern"),
        boost,
    }
}

/// Checked in order; first match wins.
static PATTERNS: Lazy<Vec<NamePattern>> = Lazy::new(|| {
    vec![
        pattern("Kepler", r"Kepler-\d+[a-z]", 15),
        pattern("K2", r"K2-\d+[a-z]", 12),
        pattern("TOI", r"TOI-\d+", 8),
        pattern("HAT-P", r"HAT-P-\d+", 15),
        pattern("WASP", r"WASP-\d+", 15),
        pattern("HD", r"HD \d+", 10),
        pattern("GJ", r"GJ \d+", 8),
        pattern("TRAPPIST-1", r"TRAPPIST-1[a-z]", 18),
        pattern("Proxima", r"Proxima", 20),
    ]
});

/// First matching naming convention for `name`.
pub fn match_pattern(name: &str) -> Option<&'static NamePattern> {
    PATTERNS.iter().find(|p| p.regex.is_match(name))
}

/// Confidence boost for a planet name; 0 when no convention matches.
pub fn match_boost(name: &str) -> u8 {
    match_pattern(name).map_or(0, |p| p.boost)
}
