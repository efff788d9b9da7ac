//! `exohunt classify`, `exohunt inspect` and `exohunt aliases`.

use std::path::{Path, PathBuf};

use exohunt_classify::engine::{coverage, trace_row, FieldCoverage, RowTrace};
use exohunt_classify::fields::CanonicalField;
use exohunt_classify::{BatchInput, BatchResult, ClassifyConfig};
use serde::Serialize;

use crate::table::Table;
use crate::{read_rows, CliError, Format};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub max_rows: Option<usize>,
    pub parallel: bool,
    pub timeout_ms: Option<u64>,
    pub delimiter: Option<char>,
}

impl Overrides {
    pub(crate) fn apply(&self, config: &mut ClassifyConfig) {
        if let Some(max_rows) = self.max_rows {
            config.max_rows = max_rows;
        }
        // A flag can only turn parallelism on.
        config.parallel |= self.parallel;
        if self.timeout_ms.is_some() {
            config.timeout_ms = self.timeout_ms;
        }
        if self.delimiter.is_some() {
            config.input.delimiter = self.delimiter;
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))
}

// ============================================================================
// classify
// ============================================================================

pub(crate) fn cmd_classify(
    input: &Path,
    format: Option<Format>,
    config: &ClassifyConfig,
    json_output: bool,
    output_file: Option<PathBuf>,
    top: usize,
) -> Result<(), CliError> {
    let rows = read_rows(input, format, config)?;
    let result = exohunt_classify::run(config, &BatchInput::from(rows))?;

    if json_output || output_file.is_some() {
        let json_str = to_json(&result)?;
        if let Some(ref path) = output_file {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if json_output {
            println!("{json_str}");
        }
    }

    // Human summary to stderr
    eprint!("{}", render_summary(&result, top));
    Ok(())
}

fn render_summary(result: &BatchResult, top: usize) -> String {
    let s = &result.summary;
    let mut out = format!(
        "{} rows: {} confirmed, {} candidates, {} false positives (avg confidence {:.1})\n",
        s.total, s.confirmed, s.candidates, s.false_positives, s.average_confidence,
    );
    if !s.data_sources.is_empty() {
        out.push_str(&format!("sources: {}\n", s.data_sources.join(", ")));
    }
    if top == 0 || result.results.is_empty() {
        return out;
    }

    let mut table = Table::new(&[
        ("ROW", 6),
        ("PLANET", 28),
        ("CLASSIFICATION", 19),
        ("CONF", 4),
        ("SOURCE", 24),
    ]);
    for r in result.results.iter().take(top) {
        table.push(vec![
            r.row_index.to_string(),
            r.planet_name.clone(),
            r.classification.to_string(),
            r.confidence.to_string(),
            r.data_source.clone(),
        ]);
    }
    out.push('\n');
    out.push_str(&table.render());

    let hidden = result.results.len().saturating_sub(top);
    if hidden > 0 {
        out.push_str(&format!("... {hidden} more (use --json for all rows)\n"));
    }
    out
}

// ============================================================================
// inspect
// ============================================================================

#[derive(Serialize)]
struct InspectReport {
    rows: Vec<RowTrace>,
    coverage: Vec<FieldCoverage>,
}

pub(crate) fn cmd_inspect(
    input: &Path,
    format: Option<Format>,
    config: &ClassifyConfig,
    json_output: bool,
) -> Result<(), CliError> {
    let rows = read_rows(input, format, config)?;
    let report = InspectReport {
        rows: rows.iter().enumerate().map(|(i, row)| trace_row(row, i)).collect(),
        coverage: coverage(&rows),
    };

    if json_output {
        println!("{}", to_json(&report)?);
        return Ok(());
    }

    print!("{}", render_inspect(&report));
    Ok(())
}

fn render_inspect(report: &InspectReport) -> String {
    let mut rows = Table::new(&[
        ("ROW", 6),
        ("PLANET", 28),
        ("SCHEMA", 14),
        ("BRANCH", 12),
        ("DISPOSITION", 16),
        ("CONF", 4),
    ]);
    for t in &report.rows {
        rows.push(vec![
            t.result.row_index.to_string(),
            t.result.planet_name.clone(),
            t.schema.family.to_string(),
            t.branch.to_string(),
            t.schema.disposition.clone().unwrap_or_else(|| "-".to_string()),
            t.result.confidence.to_string(),
        ]);
    }

    let total = report.rows.len();
    let mut fields = Table::new(&[("FIELD", 16), ("RESOLVED", 10), ("SYNTHESIZED", 11), ("TOP ALIAS", 24)]);
    for c in &report.coverage {
        fields.push(vec![
            c.field.name().to_string(),
            format!("{}/{}", c.resolved, total),
            c.synthesized.to_string(),
            c.top_alias.unwrap_or("-").to_string(),
        ]);
    }

    format!("{}\n{}", rows.render(), fields.render())
}

// ============================================================================
// aliases
// ============================================================================

pub(crate) fn cmd_aliases(json_output: bool) -> Result<(), CliError> {
    if json_output {
        let map: serde_json::Map<String, serde_json::Value> = CanonicalField::ALL
            .iter()
            .map(|f| (f.name().to_string(), serde_json::json!(f.aliases())))
            .collect();
        println!("{}", to_json(&map)?);
        return Ok(());
    }

    for field in CanonicalField::ALL {
        let unit = field.unit();
        if unit.is_empty() {
            println!("{}", field.name());
        } else {
            println!("{} ({unit})", field.name());
        }
        println!("  {}", field.aliases().join(", "));
    }
    Ok(())
}
