use super::model::{ScoredDataset, ScoredRecord, SurveyDataset, SurveyRecord};

/// Records may miss at most this many grades and still receive a score.
pub const DEFAULT_MAX_ALLOWED_MISSING: usize = 1;

/// Give every record an integer score: the mean of the grades it actually
/// answered, truncated toward zero.
///
/// The score is absent when more than `max_allowed_missing` grades were
/// missing in the source, or when there is nothing to average. Imputed
/// grades count as missing, so this gives the same result before and after
/// imputation.
///
/// Truncation is lossy on purpose: 4.9 scores 4.
pub fn score_subjects(dataset: SurveyDataset, max_allowed_missing: usize) -> ScoredDataset {
    let records: Vec<ScoredRecord> = dataset
        .records
        .into_iter()
        .map(|record| {
            let score = score_record(&record, max_allowed_missing);
            ScoredRecord { record, score }
        })
        .collect();

    let scored = ScoredDataset { records };
    log::debug!(
        "Scored {} records, {} without a score",
        scored.len(),
        scored.absent_scores()
    );
    scored
}

fn score_record(record: &SurveyRecord, max_allowed_missing: usize) -> Option<u32> {
    if record.missing_count() > max_allowed_missing {
        return None;
    }
    // Grades are non-negative, so truncation is floor; negatives clamp to 0.
    record.answered_mean().map(|mean| mean.max(0.0) as u32)
}
