use super::email::is_valid_email;
use super::model::SurveyDataset;

/// Keep only the records whose email passes [`is_valid_email`].
///
/// Surviving records keep their relative order and are renumbered from 0.
/// Invalid addresses are dropped, not corrected.
pub fn remove_invalid_emails(dataset: SurveyDataset) -> SurveyDataset {
    let before = dataset.len();
    let records: Vec<_> = dataset
        .records
        .into_iter()
        .filter(|rec| is_valid_email(&rec.email))
        .collect();

    log::debug!(
        "Dropped {} of {before} records with an invalid email",
        before - records.len()
    );
    SurveyDataset::from_records(records)
}
