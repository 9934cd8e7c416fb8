//! Survey response cleaning, imputation and scoring.
//!
//! The [`data`] modules are independent transforms, each taking a dataset by
//! value and returning the next one; [`pipeline::run`] chains them in order.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
