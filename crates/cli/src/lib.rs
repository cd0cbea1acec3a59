//! Terminal output for the ward locator
//!
//! Provides shared CLI functionality:
//! - Status messages and error reports
//! - Human-readable distances, coordinates and ward summaries
//! - A spinner for bulk loads

#![warn(missing_docs)]

pub mod output;
pub mod progress;
