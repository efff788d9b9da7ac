//! Deterministic string hash used for synthetic fallbacks and tie-breaking.
//!
//! Polynomial rolling hash (`h * 31 + c`) over UTF-16 code units with 32-bit
//! wraparound, returned as an absolute value. The same bit pattern is produced
//! by `h = ((h << 5) - h) + s.charCodeAt(i); h = h & h` in a JavaScript
//! frontend, so both sides synthesize identical placeholder values.

/// Hash `s` to a non-negative integer. `i32::MIN` maps to `2^31`.
pub fn string_hash(s: &str) -> u32 {
    let mut h: i32 = 0;
    for unit in s.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit));
    }
    h.unsigned_abs()
}

/// Fraction in `[0, 1)` with four decimal digits of resolution.
pub fn unit_fraction(s: &str) -> f64 {
    f64::from(string_hash(s) % 10_000) / 10_000.0
}
