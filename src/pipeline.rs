use crate::config::PipelineConfig;
use crate::data::aggregate::{AgeHistogram, GroupedMeans, age_histogram, grouped_means};
use crate::data::filter::remove_invalid_emails;
use crate::data::impute::fill_missing_with_row_mean;
use crate::data::model::{ScoredDataset, SurveyDataset};
use crate::data::score::score_subjects;

/// Everything the viewer shows for one loaded file.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Records read from the source.
    pub loaded_len: usize,
    /// Records left after dropping invalid emails.
    pub cleaned_len: usize,
    /// Positions (in the cleaned dataset) of records that had imputed grades.
    pub imputed_rows: Vec<usize>,
    pub scored: ScoredDataset,
    pub histogram: AgeHistogram,
    pub group_means: GroupedMeans,
}

/// Run filter → impute → score → aggregate over a freshly loaded dataset.
pub fn run(dataset: SurveyDataset, config: &PipelineConfig) -> PipelineReport {
    let loaded_len = dataset.len();

    let cleaned = remove_invalid_emails(dataset);
    let cleaned_len = cleaned.len();

    let (imputed, imputed_rows) = fill_missing_with_row_mean(cleaned);
    let scored = score_subjects(imputed, config.max_allowed_missing);

    let histogram = age_histogram(scored.subjects());
    let group_means = grouped_means(scored.subjects(), config.age_threshold);

    log::info!(
        "{cleaned_len}/{loaded_len} records kept, {} imputed, {} without score, {} groups",
        imputed_rows.len(),
        scored.absent_scores(),
        group_means.len()
    );

    PipelineReport {
        loaded_len,
        cleaned_len,
        imputed_rows,
        scored,
        histogram,
        group_means,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::GroupKey;
    use crate::data::model::Gender;
    use crate::data::model::tests::record;

    #[test]
    fn test_full_run() {
        let mut bad = record(Some(70.0), Gender::Male, [Some(9.0); 5]);
        bad.email = "a@.com".to_string();

        let dataset = SurveyDataset::from_records(vec![
            record(
                Some(25.0),
                Gender::Female,
                [Some(3.0), None, Some(4.0), Some(5.0), Some(6.0)],
            ),
            bad,
            record(
                Some(55.0),
                Gender::Male,
                [Some(2.0), Some(4.0), None, Some(6.0), None],
            ),
            record(None, Gender::Other, [Some(1.0); 5]),
        ]);

        let report = run(dataset, &PipelineConfig::default());

        assert_eq!(report.loaded_len, 4);
        assert_eq!(report.cleaned_len, 3);
        // Positions refer to the cleaned dataset.
        assert_eq!(report.imputed_rows, vec![0, 1]);

        let scores: Vec<_> = report.scored.records.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![Some(4), None, Some(1)]);

        assert_eq!(report.histogram.counts[2], 1);
        assert_eq!(report.histogram.counts[5], 1);
        assert_eq!(report.histogram.total(), 2);

        assert_eq!(report.group_means.len(), 2);
        let older_male = &report.group_means[&GroupKey {
            gender: Gender::Male,
            over_threshold: true,
        }];
        assert_eq!(
            older_male.means,
            [Some(2.0), Some(4.0), Some(4.0), Some(6.0), Some(4.0)]
        );
    }

    #[test]
    fn test_threshold_from_config() {
        let dataset =
            SurveyDataset::from_records(vec![record(Some(30.0), Gender::Female, [Some(1.0); 5])]);
        let config = PipelineConfig {
            age_threshold: 20.0,
            ..PipelineConfig::default()
        };

        let report = run(dataset, &config);
        assert!(report.group_means.keys().all(|k| k.over_threshold));
    }

    #[test]
    fn test_empty_dataset() {
        let report = run(SurveyDataset::default(), &PipelineConfig::default());
        assert_eq!(report.cleaned_len, 0);
        assert!(report.scored.is_empty());
        assert!(report.group_means.is_empty());
        assert_eq!(report.histogram.total(), 0);
    }
}
