//! Custom error types for lodge-dues
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for lodge-dues operations
#[derive(Error, Debug)]
pub enum LodgeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Input rejected before any store call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Quick-pay found no empty month in the fiscal year
    #[error("No empty months left for {member} in fiscal year {fiscal_year}")]
    NoEligibleSlots { member: String, fiscal_year: String },

    /// The allocator was asked to place money on a month that already has an entry
    #[error("Month {year:04}-{month:02} already has a dues entry; edit it instead")]
    SlotOccupied { month: u32, year: i32 },

    /// Uniqueness constraint on (member, month, year) fired during a write
    #[error("Conflict: a dues entry for {year:04}-{month:02} already exists")]
    Conflict { month: u32, year: i32 },

    /// The store could not be read or written
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LodgeError {
    /// Create a "not found" error for members
    pub fn member_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Member",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for dues entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Dues entry",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a uniqueness conflict from the store
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if the store itself failed (caller should reload and retry)
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LodgeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LodgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for LodgeError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for lodge-dues operations
pub type LodgeResult<T> = Result<T, LodgeError>;
