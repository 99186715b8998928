//! Coverage Audit Engine for social insurance records
//!
//! This crate normalizes per-period insurance coverage records into a monthly
//! timeline and audits it for gaps, parallel insurance, multiple employers,
//! contribution ceiling excess, low retention and lump-sum declarations.

#![warn(missing_docs)]

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod parsing;
pub mod report;
pub mod timeline;
