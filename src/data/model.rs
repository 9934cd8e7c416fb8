use std::collections::BTreeMap;
use std::fmt;

/// Number of graded questions (`q1` .. `q5`) on every response.
pub const QUESTION_COUNT: usize = 5;

/// Column names of the graded questions, in order.
pub const QUESTION_COLUMNS: [&str; QUESTION_COUNT] = ["q1", "q2", "q3", "q4", "q5"];

// ---------------------------------------------------------------------------
// MetadataValue – a pass-through cell outside the fixed record shape
// ---------------------------------------------------------------------------

/// A dynamically-typed value for source columns the pipeline does not
/// interpret (ids, names, timestamps). Carried through every stage untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Gender category. Labels outside the known set are kept verbatim so they
/// still form their own group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gender {
    Female,
    Male,
    Other,
    Unlisted(String),
}

impl From<&str> for Gender {
    fn from(s: &str) -> Self {
        let label = s.trim();
        match label.to_ascii_lowercase().as_str() {
            "female" | "f" => Gender::Female,
            "male" | "m" => Gender::Male,
            "other" => Gender::Other,
            _ => Gender::Unlisted(label.to_string()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Female => write!(f, "Female"),
            Gender::Male => write!(f, "Male"),
            Gender::Other => write!(f, "Other"),
            Gender::Unlisted(label) => write!(f, "{label}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Answer – one graded question
// ---------------------------------------------------------------------------

/// The state of a single grade.
///
/// `Imputed` is distinct from `Answered` so the number of grades that were
/// missing in the source stays known after imputation has filled them in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Answer {
    Answered(f64),
    Imputed(f64),
    Missing,
}

impl Answer {
    /// Build from an optional source value. NaN counts as missing.
    pub fn from_source(value: Option<f64>) -> Self {
        match value {
            Some(v) if !v.is_nan() => Answer::Answered(v),
            _ => Answer::Missing,
        }
    }

    /// The grade currently held, whether answered or imputed.
    pub fn value(&self) -> Option<f64> {
        match self {
            Answer::Answered(v) | Answer::Imputed(v) => Some(*v),
            Answer::Missing => None,
        }
    }

    /// The grade only if the subject gave it.
    pub fn answered(&self) -> Option<f64> {
        match self {
            Answer::Answered(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether this grade was absent in the source data.
    pub fn was_missing(&self) -> bool {
        !matches!(self, Answer::Answered(_))
    }
}

// ---------------------------------------------------------------------------
// SurveyRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One subject's response.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRecord {
    /// Age in years; `None` when not given.
    pub age: Option<f64>,
    /// `None` when the source has no gender for this subject.
    pub gender: Option<Gender>,
    /// Contact address, unvalidated.
    pub email: String,
    /// Grades for `q1` .. `q5`.
    pub answers: [Answer; QUESTION_COUNT],
    /// Every other source column: column_name → value.
    pub extra: BTreeMap<String, MetadataValue>,
}

impl SurveyRecord {
    /// Number of grades that were missing in the source.
    pub fn missing_count(&self) -> usize {
        self.answers.iter().filter(|a| a.was_missing()).count()
    }

    /// Mean of the grades the subject actually gave, `None` if there are none.
    pub fn answered_mean(&self) -> Option<f64> {
        mean(self.answers.iter().filter_map(Answer::answered))
    }

    /// Mean of all grades currently present (answered or imputed).
    pub fn present_mean(&self) -> Option<f64> {
        mean(self.answers.iter().filter_map(Answer::value))
    }
}

/// Arithmetic mean, `None` for an empty sequence.
pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// SurveyDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An ordered collection of responses. Positions are indices into `records`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyDataset {
    pub records: Vec<SurveyRecord>,
}

impl SurveyDataset {
    pub fn from_records(records: Vec<SurveyRecord>) -> Self {
        SurveyDataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Scored records
// ---------------------------------------------------------------------------

/// A record with its integer score. `None` means the score is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub record: SurveyRecord,
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredDataset {
    pub records: Vec<ScoredRecord>,
}

impl ScoredDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The underlying responses, in order.
    pub fn subjects(&self) -> impl Iterator<Item = &SurveyRecord> {
        self.records.iter().map(|r| &r.record)
    }

    /// How many records ended up without a score.
    pub fn absent_scores(&self) -> usize {
        self.records.iter().filter(|r| r.score.is_none()).count()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a record from optional grades; the email is valid.
    pub(crate) fn record(
        age: Option<f64>,
        gender: Gender,
        grades: [Option<f64>; 5],
    ) -> SurveyRecord {
        SurveyRecord {
            age,
            gender: Some(gender),
            email: "subject@example.com".to_string(),
            answers: grades.map(Answer::from_source),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_gender_parse_is_case_insensitive() {
        assert_eq!(Gender::from("Female"), Gender::Female);
        assert_eq!(Gender::from(" M "), Gender::Male);
        assert_eq!(Gender::from("OTHER"), Gender::Other);
    }

    #[test]
    fn test_unlisted_gender_keeps_label() {
        let g = Gender::from(" Non-binary ");
        assert_eq!(g, Gender::Unlisted("Non-binary".to_string()));
        assert_eq!(g.to_string(), "Non-binary");
    }

    #[test]
    fn test_nan_source_value_is_missing() {
        assert_eq!(Answer::from_source(Some(f64::NAN)), Answer::Missing);
        assert_eq!(Answer::from_source(None), Answer::Missing);
        assert_eq!(Answer::from_source(Some(0.0)), Answer::Answered(0.0));
    }

    #[test]
    fn test_imputed_counts_as_missing_but_has_value() {
        let a = Answer::Imputed(3.5);
        assert!(a.was_missing());
        assert_eq!(a.value(), Some(3.5));
        assert_eq!(a.answered(), None);
    }

    #[test]
    fn test_record_means() {
        let r = record(Some(30.0), Gender::Male, [Some(2.0), Some(4.0), None, Some(6.0), None]);
        assert_eq!(r.missing_count(), 2);
        assert_eq!(r.answered_mean(), Some(4.0));

        let empty = record(None, Gender::Other, [None; 5]);
        assert_eq!(empty.answered_mean(), None);
        assert_eq!(empty.present_mean(), None);
    }
}
