//! Uniqueness statistics over completed checks.

use corpus::CorpusDocument;
use serde::{Deserialize, Serialize};

use crate::types::CheckResult;

/// Inclusive uniqueness ranges, in percent.
const BUCKETS: [(u8, u8); 5] = [(0, 20), (21, 40), (41, 60), (61, 80), (81, 100)];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UniquenessBucket {
    /// Human-readable label such as `"21-40%"`.
    pub range: String,
    pub min: u8,
    pub max: u8,
    pub count: usize,
}

/// Distribution and mean of uniqueness over a set of checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UniquenessStats {
    pub total_checks: usize,
    /// Mean uniqueness in percent; 0 when there were no checks.
    pub average_uniqueness: f64,
    pub distribution: Vec<UniquenessBucket>,
}

impl Default for UniquenessStats {
    fn default() -> Self {
        Self {
            total_checks: 0,
            average_uniqueness: 0.0,
            distribution: BUCKETS
                .iter()
                .map(|&(min, max)| UniquenessBucket {
                    range: format!("{min}-{max}%"),
                    min,
                    max,
                    count: 0,
                })
                .collect(),
        }
    }
}

impl UniquenessStats {
    pub fn from_results(results: &[CheckResult]) -> Self {
        Self::from_uniqueness(results.iter().map(|r| r.uniqueness_percent))
    }

    pub fn from_uniqueness<I: IntoIterator<Item = u8>>(values: I) -> Self {
        Self::from_percentages(values.into_iter().map(f64::from))
    }

    /// Statistics over the originality recorded on stored documents.
    /// Documents that were never checked are skipped.
    pub fn from_documents(documents: &[CorpusDocument]) -> Self {
        Self::from_percentages(documents.iter().filter_map(|doc| doc.originality_percent))
    }

    /// Buckets use the value rounded to a whole percent; the average uses
    /// the exact values.
    fn from_percentages<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut stats = Self::default();
        let mut sum = 0.0;
        for value in values {
            let value = value.clamp(0.0, 100.0);
            sum += value;
            stats.total_checks += 1;
            let whole = value.round() as u8;
            if let Some(bucket) = stats
                .distribution
                .iter_mut()
                .find(|b| (b.min..=b.max).contains(&whole))
            {
                bucket.count += 1;
            }
        }
        if stats.total_checks > 0 {
            stats.average_uniqueness = sum / stats.total_checks as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        let stats = UniquenessStats::from_uniqueness([]);
        assert_eq!(stats.total_checks, 0);
        assert_eq!(stats.average_uniqueness, 0.0);
        assert_eq!(stats.distribution.len(), 5);
        assert!(stats.distribution.iter().all(|b| b.count == 0));
    }

    #[test]
    fn bucket_edges() {
        let stats = UniquenessStats::from_uniqueness([0, 20, 21, 40, 41, 60, 61, 80, 81, 100]);
        let counts: Vec<usize> = stats.distribution.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2, 2, 2, 2]);
        assert_eq!(stats.distribution[1].range, "21-40%");
    }

    #[test]
    fn stored_originality() {
        use chrono::Utc;
        use corpus::{Category, CorpusEntry, DocumentStatus};
        use perceptual::Signature;

        let doc = |id, originality| {
            let mut doc = CorpusEntry {
                title: None,
                category: Category::Coursework,
                institution: None,
                owner: None,
                status: DocumentStatus::Final,
                created_at: Utc::now(),
                signature: Signature::from_entries(vec![1]),
                shingle_count: 1,
            }
            .into_document(id);
            doc.originality_percent = originality;
            doc
        };
        let docs = [
            doc(1, Some(20.4)),
            doc(2, None),
            doc(3, Some(20.6)),
            doc(4, Some(99.5)),
        ];
        let stats = UniquenessStats::from_documents(&docs);
        assert_eq!(stats.total_checks, 3);
        assert!((stats.average_uniqueness - 140.5 / 3.0).abs() < 1e-9);
        let counts: Vec<usize> = stats.distribution.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 0, 0, 1]);
    }

    #[test]
    fn average_of_results() {
        let result = |u| CheckResult {
            similar_documents: Vec::new(),
            uniqueness_percent: u,
            total_documents_checked: 0,
            processing_time_ms: 0,
        };
        let stats = UniquenessStats::from_results(&[result(100), result(50), result(30)]);
        assert_eq!(stats.total_checks, 3);
        assert!((stats.average_uniqueness - 60.0).abs() < 1e-9);
        assert_eq!(stats.distribution[4].count, 1);
        assert_eq!(stats.distribution[2].count, 1);
        assert_eq!(stats.distribution[1].count, 1);
    }
}
