use super::model::{Answer, SurveyDataset};

/// Fill every missing grade with the mean of that same record's other grades.
///
/// Returns the updated dataset and the positions (ascending) of every record
/// that had at least one missing grade. A record with no grades at all has
/// no mean; its grades stay [`Answer::Missing`] but its position is still
/// reported.
pub fn fill_missing_with_row_mean(dataset: SurveyDataset) -> (SurveyDataset, Vec<usize>) {
    let mut records = dataset.records;
    let mut corrected = Vec::new();

    for (idx, rec) in records.iter_mut().enumerate() {
        if !rec.answers.contains(&Answer::Missing) {
            continue;
        }
        corrected.push(idx);

        let Some(row_mean) = rec.present_mean() else {
            continue;
        };
        for answer in rec.answers.iter_mut() {
            if *answer == Answer::Missing {
                *answer = Answer::Imputed(row_mean);
            }
        }
    }

    log::debug!("Imputed grades in {} records", corrected.len());
    (SurveyDataset::from_records(records), corrected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Gender;
    use crate::data::model::tests::record;

    #[test]
    fn test_fills_with_own_row_mean() {
        let ds = SurveyDataset::from_records(vec![
            record(Some(30.0), Gender::Male, [Some(2.0), Some(4.0), None, Some(6.0), None]),
            record(Some(50.0), Gender::Female, [Some(10.0); 5]),
        ]);

        let (filled, indices) = fill_missing_with_row_mean(ds);

        let values: Vec<_> = filled.records[0].answers.iter().map(Answer::value).collect();
        assert_eq!(values, vec![Some(2.0), Some(4.0), Some(4.0), Some(6.0), Some(4.0)]);
        assert_eq!(filled.records[0].answers[2], Answer::Imputed(4.0));
        assert_eq!(filled.records[0].answers[0], Answer::Answered(2.0));
        assert_eq!(indices, vec![0]);
    }

    #[test]
    fn test_mean_is_not_column_wide() {
        let ds = SurveyDataset::from_records(vec![
            record(None, Gender::Male, [Some(1.0), None, Some(1.0), Some(1.0), Some(1.0)]),
            record(None, Gender::Male, [Some(5.0), Some(5.0), Some(5.0), Some(5.0), Some(5.0)]),
        ]);

        let (filled, _) = fill_missing_with_row_mean(ds);
        assert_eq!(filled.records[0].answers[1], Answer::Imputed(1.0));
    }

    #[test]
    fn test_all_missing_row_stays_missing() {
        let ds = SurveyDataset::from_records(vec![
            record(Some(20.0), Gender::Other, [Some(3.0); 5]),
            record(Some(20.0), Gender::Other, [None; 5]),
        ]);

        let (filled, indices) = fill_missing_with_row_mean(ds);
        assert_eq!(filled.records[1].answers, [Answer::Missing; 5]);
        assert_eq!(indices, vec![1]);
    }

    #[test]
    fn test_other_fields_untouched() {
        let original = record(Some(33.0), Gender::Female, [None, Some(2.0), None, None, None]);
        let ds = SurveyDataset::from_records(vec![original.clone()]);

        let (filled, _) = fill_missing_with_row_mean(ds);
        let rec = &filled.records[0];
        assert_eq!(rec.age, original.age);
        assert_eq!(rec.email, original.email);
        assert_eq!(rec.gender, original.gender);
        assert_eq!(rec.extra, original.extra);
    }

    #[test]
    fn test_indices_ascending_without_duplicates() {
        let ds = SurveyDataset::from_records(vec![
            record(None, Gender::Male, [None, None, Some(1.0), Some(1.0), Some(1.0)]),
            record(None, Gender::Male, [Some(1.0); 5]),
            record(None, Gender::Male, [Some(1.0), Some(1.0), Some(1.0), Some(1.0), None]),
            record(None, Gender::Male, [None; 5]),
        ]);

        let (_, indices) = fill_missing_with_row_mean(ds);
        assert_eq!(indices, vec![0, 2, 3]);
    }
}
