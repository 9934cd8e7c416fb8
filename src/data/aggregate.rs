use std::collections::BTreeMap;

use super::model::{Gender, QUESTION_COUNT, SurveyRecord, mean};

// ---------------------------------------------------------------------------
// Age histogram
// ---------------------------------------------------------------------------

/// Number of fixed-width age bins.
pub const AGE_BIN_COUNT: usize = 10;
/// Width of each age bin, in years.
pub const AGE_BIN_WIDTH: f64 = 10.0;
/// Upper edge of the last bin; it is inclusive.
pub const AGE_MAX: f64 = AGE_BIN_WIDTH * AGE_BIN_COUNT as f64;

/// Counts per bin and the bin edges.
///
/// Bins are `[0,10)`, `[10,20)`, …, `[80,90)` and a closed `[90,100]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeHistogram {
    pub counts: [usize; AGE_BIN_COUNT],
    pub edges: [f64; AGE_BIN_COUNT + 1],
}

impl AgeHistogram {
    /// Total number of ages that fell in a bin.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Midpoint of bin `i`, for plotting.
    pub fn bin_center(&self, i: usize) -> f64 {
        (self.edges[i] + self.edges[i + 1]) / 2.0
    }
}

/// Bin index for an age, `None` if it lies outside `[0, 100]`.
fn age_bin(age: f64) -> Option<usize> {
    if !(0.0..=AGE_MAX).contains(&age) {
        return None;
    }
    let bin = (age / AGE_BIN_WIDTH) as usize;
    Some(bin.min(AGE_BIN_COUNT - 1))
}

/// Count ages into the fixed ten-bin layout. Missing ages are skipped.
pub fn age_histogram<'a>(records: impl IntoIterator<Item = &'a SurveyRecord>) -> AgeHistogram {
    let mut counts = [0usize; AGE_BIN_COUNT];
    for age in records.into_iter().filter_map(|r| r.age) {
        match age_bin(age) {
            Some(bin) => counts[bin] += 1,
            None => log::debug!("Age {age} is outside the histogram range"),
        }
    }

    let edges = std::array::from_fn(|i| i as f64 * AGE_BIN_WIDTH);
    AgeHistogram { counts, edges }
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Grouping factors: gender and whether the subject is above the age threshold.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub gender: Gender,
    pub over_threshold: bool,
}

/// Per-question means for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMeans {
    /// Number of records in the group.
    pub members: usize,
    /// Mean of each question over members that have a value for it.
    pub means: [Option<f64>; QUESTION_COUNT],
}

/// One entry per observed group, ordered by key.
pub type GroupedMeans = BTreeMap<GroupKey, GroupMeans>;

/// Mean grade per question, grouped by `(gender, age > age_threshold)`.
///
/// Records without an age or without a gender are left out. Answered and imputed grades are
/// treated alike; a question nobody in the group has a value for is `None`.
pub fn grouped_means<'a>(
    records: impl IntoIterator<Item = &'a SurveyRecord>,
    age_threshold: f64,
) -> GroupedMeans {
    let mut groups: BTreeMap<GroupKey, Vec<&SurveyRecord>> = BTreeMap::new();
    for rec in records {
        let (Some(age), Some(gender)) = (rec.age, &rec.gender) else {
            continue;
        };
        let key = GroupKey {
            gender: gender.clone(),
            over_threshold: age > age_threshold,
        };
        groups.entry(key).or_default().push(rec);
    }

    groups
        .into_iter()
        .map(|(key, members)| {
            let means = std::array::from_fn(|q| {
                mean(members.iter().filter_map(|rec| rec.answers[q].value()))
            });
            let group = GroupMeans {
                members: members.len(),
                means,
            };
            (key, group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn key(gender: Gender, over_threshold: bool) -> GroupKey {
        GroupKey {
            gender,
            over_threshold,
        }
    }

    fn with_ages(ages: &[Option<f64>]) -> Vec<SurveyRecord> {
        ages.iter()
            .map(|&age| record(age, Gender::Female, [Some(1.0); 5]))
            .collect()
    }

    #[test]
    fn test_histogram_last_bin_is_closed() {
        let records = with_ages(&[Some(5.0), Some(15.0), Some(95.0), Some(100.0)]);
        let hist = age_histogram(&records);

        assert_eq!(hist.counts, [1, 1, 0, 0, 0, 0, 0, 0, 0, 2]);
        assert_eq!(hist.total(), 4);
    }

    #[test]
    fn test_histogram_edges() {
        let hist = age_histogram(std::iter::empty());
        assert_eq!(
            hist.edges,
            [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]
        );
        assert_eq!(hist.counts, [0; AGE_BIN_COUNT]);
        assert_eq!(hist.bin_center(9), 95.0);
    }

    #[test]
    fn test_histogram_bin_boundaries_are_left_closed() {
        let records = with_ages(&[Some(0.0), Some(10.0), Some(89.999), Some(90.0)]);
        let hist = age_histogram(&records);
        assert_eq!(hist.counts, [1, 1, 0, 0, 0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_histogram_skips_missing_and_out_of_range() {
        let records = with_ages(&[None, Some(-1.0), Some(100.5), Some(f64::NAN), Some(42.0)]);
        let hist = age_histogram(&records);
        assert_eq!(hist.total(), 1);
        assert_eq!(hist.counts[4], 1);
    }

    #[test]
    fn test_grouped_means_by_gender_and_age() {
        let records = vec![
            record(Some(30.0), Gender::Female, [Some(2.0); 5]),
            record(Some(35.0), Gender::Female, [Some(4.0); 5]),
            record(Some(50.0), Gender::Female, [Some(5.0); 5]),
            record(Some(20.0), Gender::Male, [Some(1.0); 5]),
            record(Some(60.0), Gender::Male, [Some(3.0), Some(3.0), None, Some(3.0), Some(3.0)]),
            record(Some(61.0), Gender::Male, [Some(5.0), Some(5.0), None, Some(5.0), Some(5.0)]),
            record(None, Gender::Other, [Some(9.0); 5]),
        ];

        let table = grouped_means(&records, 40.0);
        assert_eq!(table.len(), 4);

        let young_f = &table[&key(Gender::Female, false)];
        assert_eq!(young_f.members, 2);
        assert_eq!(young_f.means, [Some(3.0); 5]);

        let old_f = &table[&key(Gender::Female, true)];
        assert_eq!(old_f.members, 1);
        assert_eq!(old_f.means, [Some(5.0); 5]);

        let young_m = &table[&key(Gender::Male, false)];
        assert_eq!(young_m.means, [Some(1.0); 5]);

        let old_m = &table[&key(Gender::Male, true)];
        assert_eq!(old_m.members, 2);
        assert_eq!(old_m.means, [Some(4.0), Some(4.0), None, Some(4.0), Some(4.0)]);

        // The record without an age forms no group.
        assert!(table.keys().all(|k| k.gender != Gender::Other));
    }

    #[test]
    fn test_records_without_gender_are_skipped() {
        let mut unknown = record(Some(50.0), Gender::Female, [Some(9.0); 5]);
        unknown.gender = None;
        let records = vec![
            record(Some(50.0), Gender::Female, [Some(1.0); 5]),
            unknown,
            record(Some(30.0), Gender::from("Non-binary"), [Some(3.0); 5]),
        ];

        let table = grouped_means(&records, 40.0);
        assert_eq!(table.len(), 2);

        let old_f = &table[&key(Gender::Female, true)];
        assert_eq!(old_f.members, 1);
        assert_eq!(old_f.means, [Some(1.0); 5]);

        let unlisted = &table[&key(Gender::Unlisted("Non-binary".to_string()), false)];
        assert_eq!(unlisted.members, 1);
        assert_eq!(unlisted.means, [Some(3.0); 5]);
    }

    #[test]
    fn test_histogram_ignores_gender() {
        let mut unknown = record(Some(12.0), Gender::Male, [None; 5]);
        unknown.gender = None;
        let hist = age_histogram(&[unknown]);
        assert_eq!(hist.counts[1], 1);
    }

    #[test]
    fn test_threshold_is_strictly_greater() {
        let records = vec![
            record(Some(40.0), Gender::Male, [Some(1.0); 5]),
            record(Some(40.5), Gender::Male, [Some(2.0); 5]),
        ];

        let table = grouped_means(&records, 40.0);
        let keys: Vec<_> = table.keys().map(|k| k.over_threshold).collect();
        assert_eq!(keys, vec![false, true]);
    }
}
