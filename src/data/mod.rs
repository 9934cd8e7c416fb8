//! Data layer: core types, loading, cleaning, scoring and summaries.
//!
//! Architecture:
//! ```text
//!  .json / .csv / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → SurveyDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  drop records with an invalid email (email::is_valid_email)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  impute   │  missing grade → that record's own mean
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  score    │  truncated mean, absent above the missing threshold
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  age histogram, means by (gender, age > threshold)
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod email;
pub mod filter;
pub mod impute;
pub mod loader;
pub mod model;
pub mod score;
