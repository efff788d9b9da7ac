//! Row loading for CSV/TSV and JSON inputs.
//!
//! Catalog exports from the NASA archive prepend `#` comment blocks before the
//! header, and hand-made uploads sometimes use `//`. Those leading lines are
//! stripped; the first remaining line is the header.

use std::io::Read;
use std::path::Path;

use crate::config::InputConfig;
use crate::error::{ClassifyError, Result};
use crate::value::{Row, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Delimited text; delimiter sniffed unless configured.
    Csv,
    Tsv,
    Json,
}

impl InputFormat {
    /// Infer from extension. Unknown extensions are treated as delimited text.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") | Some("tab") => Self::Tsv,
            Some("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub comment_prefixes: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions::from(&InputConfig::default())
    }
}

impl From<&InputConfig> for LoadOptions {
    fn from(input: &InputConfig) -> Self {
        Self {
            delimiter: input.delimiter.map(|c| c as u8),
            comment_prefixes: input.comment_prefixes.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Drop a BOM plus any blank or comment lines ahead of the header.
fn strip_preamble<'a>(text: &'a str, comment_prefixes: &[String]) -> &'a str {
    let mut rest = text.strip_prefix('\u{feff}').unwrap_or(text);
    loop {
        let (line, tail) = match rest.find('\n') {
            Some(i) => (&rest[..i], &rest[i + 1..]),
            None => (rest, ""),
        };
        let trimmed = line.trim();
        let is_comment = comment_prefixes.iter().any(|p| trimmed.starts_with(p.as_str()));
        if !(trimmed.is_empty() || is_comment) || rest.is_empty() {
            return rest;
        }
        rest = tail;
    }
}

const DELIMITERS: [u8; 4] = [b'\t', b';', b',', b'|'];
const SNIFF_LINES: usize = 10;

/// Fields on one line under `delimiter`, honouring quotes.
fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map_or(1, |r| r.len())
}

/// Guess the delimiter of a catalog export whose preamble is already stripped.
///
/// Each candidate must split the header into at least two columns; it then
/// scores the header width times the number of sampled lines that agree with
/// it. Earlier candidates win ties. Comma when nothing splits.
pub fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    let Some((header, rest)) = sample.split_first() else {
        return b',';
    };

    DELIMITERS
        .into_iter()
        .filter_map(|delimiter| {
            let width = field_count(header, delimiter);
            if width < 2 {
                return None;
            }
            let agreeing = 1 + rest.iter().filter(|l| field_count(l, delimiter) == width).count();
            Some((delimiter, agreeing * width))
        })
        .fold((b',', 0), |best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .0
}

/// Parse delimited text with a header line into rows.
pub fn load_delimited(text: &str, options: &LoadOptions) -> Result<Vec<Row>> {
    let body = strip_preamble(text, &options.comment_prefixes);
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let delimiter = options.delimiter.unwrap_or_else(|| sniff_delimiter(body));
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut pairs: Vec<(String, Value)> = Vec::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            // First occurrence of a duplicated header wins.
            if h.is_empty() || pairs.iter().any(|(k, _)| k == h) {
                continue;
            }
            let cell = record.get(i).unwrap_or("");
            pairs.push((h.clone(), Value::from_cell(cell)));
        }
        rows.push(pairs.into_iter().collect());
    }

    log::debug!(
        "loaded {} rows, {} columns, delimiter {:?}",
        rows.len(),
        headers.len(),
        delimiter as char
    );
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Parse a JSON array of row objects, or an object wrapping one in `planets`.
pub fn load_json(text: &str) -> Result<Vec<Row>> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut obj) => match obj.remove("planets") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(ClassifyError::Json(
                    "expected an array of rows or an object with a \"planets\" array".into(),
                ))
            }
        },
        _ => {
            return Err(ClassifyError::Json(
                "expected an array of rows or an object with a \"planets\" array".into(),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            serde_json::Value::Object(map) => Ok(Row::from(map)),
            other => Err(ClassifyError::Json(format!(
                "row {i} is not an object (got {})",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub fn load_str(text: &str, format: InputFormat, options: &LoadOptions) -> Result<Vec<Row>> {
    match format {
        InputFormat::Json => load_json(text),
        InputFormat::Tsv => {
            let options = LoadOptions {
                delimiter: Some(options.delimiter.unwrap_or(b'\t')),
                ..options.clone()
            };
            load_delimited(text, &options)
        }
        InputFormat::Csv => load_delimited(text, options),
    }
}

pub fn load_path(path: &Path, format: Option<InputFormat>, options: &LoadOptions) -> Result<Vec<Row>> {
    let text = read_file_as_utf8(path)?;
    let format = format.unwrap_or_else(|| InputFormat::from_path(path));
    log::info!("loading {} as {:?}", path.display(), format);
    load_str(&text, format, options)
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| ClassifyError::Io(format!("cannot read {}: {e}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(decode_bytes(bytes))
}

/// UTF-8 first; on failure fall back to Windows-1252 (common for Excel-exported CSVs).
pub fn decode_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}
