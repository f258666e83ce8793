//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! Posing itself never fails: unmatched definitions are skipped, bad slider
//! input is clamped and unknown control ids are no-ops. The only fallible
//! surface is configuration, i.e. building or parsing a [`ControlCatalog`].
//!
//! [`ControlCatalog`]: crate::catalog::ControlCatalog

use thiserror::Error;

/// The main error type for the pose engine.
#[derive(Error, Debug)]
pub enum RigPoseError {
    // ========================================================================
    // Catalog Validation Errors
    // ========================================================================
    /// Two definitions share the same id.
    #[error("Duplicate control id: {0}")]
    DuplicateControlId(String),

    /// A control id is empty.
    #[error("Control id must not be empty (label: {0})")]
    EmptyControlId(String),

    /// The numeric range of a control is unusable.
    #[error("Invalid value range for control {id}: {reason}")]
    InvalidRange {
        /// Id of the offending control
        id: String,
        /// What is wrong with the range
        reason: &'static str,
    },

    /// A joint-backed control has a zero-length rotation axis.
    #[error("Rotation axis of control {0} has zero length")]
    ZeroAxis(String),

    /// A joint-backed control has no keywords and could never match.
    #[error("Joint control {0} has no keywords")]
    EmptyJointKeywords(String),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, RigPoseError>`.
pub type Result<T> = std::result::Result<T, RigPoseError>;
