//! Terminal helpers for the riskmap command line
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Risk badges and alert lines
//! - Count and duration formatting

#![warn(missing_docs)]

pub mod output;
