//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success                                         |
//! | 1    | General error (unspecified)                     |
//! | 2    | CLI usage error (bad args, unknown format)      |
//! | 3    | I/O error (unreadable input, unwritable output) |
//! | 4    | Input parse error (malformed CSV/TSV/JSON)      |
//! | 5    | Invalid config file                             |
//! | 6    | Batch exceeds `max_rows`                        |
//! | 7    | Batch exceeded `timeout_ms`                     |
//!
//! Classification outcomes never affect the exit code: a batch full of
//! false positives still exits 0.

use exohunt_classify::ClassifyError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input file or stdin could not be read, or output could not be written.
pub const EXIT_IO: u8 = 3;

/// Input could not be parsed as CSV, TSV, or JSON.
pub const EXIT_PARSE: u8 = 4;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 5;

/// Row count is above the configured cap. Nothing was classified.
pub const EXIT_BATCH_TOO_LARGE: u8 = 6;

/// Batch ran longer than the configured wall-clock limit.
pub const EXIT_TIMEOUT: u8 = 7;

/// Map an engine error to its exit code.
pub fn classify_exit_code(err: &ClassifyError) -> u8 {
    match err {
        ClassifyError::ConfigParse(_) | ClassifyError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ClassifyError::BatchTooLarge { .. } => EXIT_BATCH_TOO_LARGE,
        ClassifyError::Timeout { .. } => EXIT_TIMEOUT,
        ClassifyError::Csv(_) | ClassifyError::Json(_) => EXIT_PARSE,
        ClassifyError::Io(_) => EXIT_IO,
    }
}
