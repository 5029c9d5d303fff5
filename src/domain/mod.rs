//! Domain layer for remote domain extraction
//!
//! CDD Principle: Domain Model - Pure types describing what a scan found
//! - Contains report entities and the error taxonomy
//! - Independent of how configuration text is obtained or where reports go

pub mod report;

// Re-export main domain types for convenience
pub use report::*;
