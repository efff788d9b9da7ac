use std::collections::HashMap;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::ClassifyConfig;
use crate::disposition::resolve;
use crate::error::ClassifyError;
use crate::fields::{resolve_alias, CanonicalField, ExtractedParameters};
use crate::habitability::{self, ScoreBreakdown};
use crate::model::{BatchInput, BatchMeta, BatchResult, ClassificationResult};
use crate::schema::{detect, SchemaMatch};
use crate::summary::compute_summary;
use crate::value::Row;

/// Which branch of the pipeline produced a row's classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Disposition,
    Habitability,
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disposition => write!(f, "disposition"),
            Self::Habitability => write!(f, "habitability"),
        }
    }
}

/// Everything the pipeline decided for one row, for `inspect` output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowTrace {
    pub schema: SchemaMatch,
    pub branch: Branch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    pub result: ClassificationResult,
}

/// Run one row through detection, resolution and (if needed) the fallback scorer.
pub fn trace_row(row: &Row, row_index: usize) -> RowTrace {
    let parameters = ExtractedParameters::from_row(row);
    let schema = detect(row);
    let (_, habitability_factors) = habitability::rate(&parameters);

    let (resolution, branch, breakdown) = match resolve(&schema) {
        Some(resolution) => (resolution, Branch::Disposition, None),
        None => {
            let scored = habitability::score(&parameters, &parameters.planet_name.value);
            (scored.resolution, Branch::Habitability, Some(scored.breakdown))
        }
    };

    let result = ClassificationResult {
        planet_name: parameters.planet_name.value.clone(),
        classification: resolution.classification,
        confidence: resolution.confidence,
        data_source: schema.family.data_source().to_string(),
        parameters,
        habitability_factors,
        row_index,
    };

    RowTrace {
        schema,
        branch,
        breakdown,
        result,
    }
}

/// Classify a single row. Never fails; missing data degrades to synthetic values.
pub fn classify_row(row: &Row, row_index: usize) -> ClassificationResult {
    trace_row(row, row_index).result
}

/// Classify every row and sort by confidence, highest first.
///
/// The sort is stable, so ties keep input order. `parallel` only changes how
/// rows are scheduled; the output is identical either way.
pub fn classify_batch(rows: &[Row], parallel: bool) -> Vec<ClassificationResult> {
    let mut results: Vec<ClassificationResult> = if parallel {
        rows.par_iter()
            .enumerate()
            .map(|(i, row)| classify_row(row, i))
            .collect()
    } else {
        rows.iter()
            .enumerate()
            .map(|(i, row)| classify_row(row, i))
            .collect()
    };
    results.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    results
}

/// Run a classification batch per config. Returns sorted results + summary.
pub fn run(config: &ClassifyConfig, input: &BatchInput) -> Result<BatchResult, ClassifyError> {
    let rows = input.rows.len();
    if rows > config.max_rows {
        log::warn!("rejecting batch: {rows} rows, max {}", config.max_rows);
        return Err(ClassifyError::BatchTooLarge {
            rows,
            max: config.max_rows,
        });
    }

    log::info!("classifying {rows} rows (parallel: {})", config.parallel);
    let started = Instant::now();
    let results = classify_batch(&input.rows, config.parallel);
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    if let Some(limit_ms) = config.timeout_ms {
        if elapsed_ms > limit_ms {
            log::warn!("batch of {rows} rows took {elapsed_ms}ms, limit {limit_ms}ms");
            return Err(ClassifyError::Timeout { elapsed_ms, limit_ms });
        }
    }

    let summary = compute_summary(&results);
    log::info!(
        "classified {} rows in {}ms: {} confirmed, {} candidates, {} false positives",
        summary.total,
        elapsed_ms,
        summary.confirmed,
        summary.candidates,
        summary.false_positives
    );

    Ok(BatchResult {
        meta: BatchMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            parallel: config.parallel,
            elapsed_ms,
        },
        summary,
        results,
    })
}

// ---------------------------------------------------------------------------
// Field coverage
// ---------------------------------------------------------------------------

/// How well a batch's columns map onto one canonical field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCoverage {
    pub field: CanonicalField,
    /// Rows where an alias held a usable value.
    pub resolved: usize,
    /// Rows that fell back to a synthetic value.
    pub synthesized: usize,
    /// Most frequently used alias. Ties go to the earlier alias in the chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_alias: Option<&'static str>,
}

pub fn coverage(rows: &[Row]) -> Vec<FieldCoverage> {
    CanonicalField::ALL
        .iter()
        .map(|&field| {
            let mut hits: HashMap<&'static str, usize> = HashMap::new();
            for row in rows {
                if let Some(alias) = resolve_alias(row, field) {
                    *hits.entry(alias).or_default() += 1;
                }
            }
            let resolved: usize = hits.values().sum();
            let top_alias = field
                .aliases()
                .iter()
                .copied()
                .filter_map(|a| hits.get(a).map(|n| (a, *n)))
                .fold(None::<(&'static str, usize)>, |best, (a, n)| match best {
                    Some((_, m)) if m >= n => best,
                    _ => Some((a, n)),
                })
                .map(|(a, _)| a);
            FieldCoverage {
                field,
                resolved,
                synthesized: rows.len() - resolved,
                top_alias,
            }
        })
        .collect()
}
