use std::collections::{BTreeMap, BTreeSet};

use crate::model::{BatchSummary, Classification, ClassificationResult};

/// Compute summary statistics from classified results.
pub fn compute_summary(results: &[ClassificationResult]) -> BatchSummary {
    let mut classification_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut data_sources: BTreeSet<String> = BTreeSet::new();
    let mut confirmed = 0;
    let mut candidates = 0;
    let mut false_positives = 0;
    let mut confidence_total: u64 = 0;

    for r in results {
        *classification_counts
            .entry(r.classification.to_string())
            .or_insert(0) += 1;
        data_sources.insert(r.data_source.clone());
        confidence_total += u64::from(r.confidence);

        match r.classification {
            Classification::ConfirmedExoplanet => confirmed += 1,
            Classification::CandidateExoplanet => candidates += 1,
            Classification::FalsePositive => false_positives += 1,
        }
    }

    let average_confidence = if results.is_empty() {
        0.0
    } else {
        // One decimal place, as shown on the dashboard.
        (confidence_total as f64 / results.len() as f64 * 10.0).round() / 10.0
    };

    BatchSummary {
        total: results.len(),
        confirmed,
        candidates,
        false_positives,
        average_confidence,
        data_sources: data_sources.into_iter().collect(),
        classification_counts,
    }
}
