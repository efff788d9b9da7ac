use serde::Deserialize;

use crate::error::ClassifyError;

/// Observed default cap on rows per batch.
pub const DEFAULT_MAX_ROWS: usize = 1000;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifyConfig {
    /// Batches larger than this are rejected before any work is done.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    /// Fan rows out across the rayon pool.
    #[serde(default)]
    pub parallel: bool,
    /// Wall-clock limit for the whole batch.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub input: InputConfig,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            parallel: false,
            timeout_ms: None,
            input: InputConfig::default(),
        }
    }
}

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// Field delimiter. Sniffed from the header when absent.
    #[serde(default)]
    pub delimiter: Option<char>,
    /// Lines starting with any of these, before the header, are skipped.
    #[serde(default = "default_comment_prefixes")]
    pub comment_prefixes: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            comment_prefixes: default_comment_prefixes(),
        }
    }
}

fn default_comment_prefixes() -> Vec<String> {
    vec!["#".into(), "//".into()]
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ClassifyConfig {
    pub fn from_toml(input: &str) -> Result<Self, ClassifyError> {
        let config: ClassifyConfig =
            toml::from_str(input).map_err(|e| ClassifyError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClassifyError> {
        if self.max_rows == 0 {
            return Err(ClassifyError::ConfigValidation(
                "max_rows must be at least 1".into(),
            ));
        }

        if self.timeout_ms == Some(0) {
            return Err(ClassifyError::ConfigValidation(
                "timeout_ms must be greater than 0".into(),
            ));
        }

        if let Some(d) = self.input.delimiter {
            if !d.is_ascii() || matches!(d, '\n' | '\r' | '"') {
                return Err(ClassifyError::ConfigValidation(format!(
                    "delimiter must be a single ASCII character other than quote or newline, got {d:?}"
                )));
            }
        }

        if self.input.comment_prefixes.iter().any(|p| p.is_empty()) {
            return Err(ClassifyError::ConfigValidation(
                "comment_prefixes must not contain empty strings".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ClassifyConfig::from_toml("").unwrap();
        assert_eq!(config.max_rows, 1000);
        assert!(!config.parallel);
        assert!(config.timeout_ms.is_none());
        assert!(config.input.delimiter.is_none());
        assert_eq!(config.input.comment_prefixes, vec!["#", "//"]);
    }

    #[test]
    fn parse_full() {
        let config = ClassifyConfig::from_toml(
            r##"
max_rows = 250
parallel = true
timeout_ms = 5000

[input]
delimiter = "\t"
comment_prefixes = ["#"]
"##,
        )
        .unwrap();
        assert_eq!(config.max_rows, 250);
        assert!(config.parallel);
        assert_eq!(config.timeout_ms, Some(5000));
        assert_eq!(config.input.delimiter, Some('\t'));
        assert_eq!(config.input.comment_prefixes, vec!["#"]);
    }

    #[test]
    fn reject_zero_rows() {
        let err = ClassifyConfig::from_toml("max_rows = 0").unwrap_err();
        assert!(err.to_string().contains("max_rows"));
    }

    #[test]
    fn reject_zero_timeout() {
        let err = ClassifyConfig::from_toml("timeout_ms = 0").unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn reject_quote_delimiter() {
        let err = ClassifyConfig::from_toml("[input]\ndelimiter = '\"'").unwrap_err();
        assert!(err.to_string().contains("delimiter"));
    }

    #[test]
    fn reject_unknown_key() {
        let err = ClassifyConfig::from_toml("max_row = 10");
        assert!(err.is_err(), "typo in key should fail deserialization");
    }
}
