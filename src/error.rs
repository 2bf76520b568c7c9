//! Error types for the regulatory channel engine.
//!
//! All fallible engine operations return [`Result`], whose error type is
//! [`RegulatoryError`]. Errors carry structured context and classify themselves
//! for retry and recovery guidance.
//!
//! ## Error Categories
//!
//! - **Input Errors**: malformed regulatory updates, rule counts past the fixed limit
//! - **Lookup Errors**: unknown channels, radios, interfaces or callback handles
//! - **Capacity Errors**: full callback registry, too many operating classes
//! - **Configuration Errors**: unreadable or unparsable configuration documents
//! - **Source Errors**: the external regulatory database could not answer
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use regchan::RegulatoryError;
//!
//! let error = RegulatoryError::source_unavailable("regdb offline");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```
//!
//! ## Helper Constructors
//!
//! ```rust
//! use regchan::RegulatoryError;
//!
//! let input = RegulatoryError::invalid_input("empty channel list");
//! let rules = RegulatoryError::too_many_rules(12);
//! let missing = RegulatoryError::not_found("country XX");
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::master::MAX_REG_RULES;

/// Result type alias for regulatory operations.
pub type Result<T, E = RegulatoryError> = std::result::Result<T, E>;

/// Main error type for regulatory operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RegulatoryError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Regulatory update has {count} rules, limit is {max}")]
    TooManyRules { count: usize, max: usize },

    #[error("Channel {channel} is not in the active channel table")]
    UnknownChannel { channel: u16 },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Callback registry is full ({capacity} entries)")]
    RegistryFull { capacity: usize },

    #[error("Callback handle {handle} is not registered")]
    UnknownHandle { handle: u64 },

    #[error("No radio registered for phy {phy_id}")]
    UnknownRadio { phy_id: u8 },

    #[error("No logical interface with id {id}")]
    UnknownInterface { id: u32 },

    #[error("Operating class list has {count} entries, limit is {max}")]
    TooManyOpClasses { count: usize, max: usize },

    #[error("Configuration file error: {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Regulatory source unavailable: {reason}")]
    SourceUnavailable {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RegulatoryError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            RegulatoryError::SourceUnavailable { .. } => true,
            RegulatoryError::RegistryFull { .. } => false,
            RegulatoryError::InvalidInput { .. } => false,
            RegulatoryError::TooManyRules { .. } => false,
            RegulatoryError::UnknownChannel { .. } => false,
            RegulatoryError::NotFound { .. } => false,
            RegulatoryError::UnknownHandle { .. } => false,
            RegulatoryError::UnknownRadio { .. } => false,
            RegulatoryError::UnknownInterface { .. } => false,
            RegulatoryError::TooManyOpClasses { .. } => false,
            RegulatoryError::Config { .. } => false,
            RegulatoryError::Parse { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            RegulatoryError::InvalidInput { .. } => vec![
                "Check the regulatory update for missing fields",
                "Verify channel lists are non-empty",
            ],
            RegulatoryError::TooManyRules { .. } => vec![
                "Split the rule set or merge adjacent rules",
                "Fall back to the world regulatory domain",
                "Keep operating on the previous master channel list",
            ],
            RegulatoryError::UnknownChannel { .. } => vec![
                "Check the channel number against the active region table",
                "Query by frequency for 4.9 GHz sub-channels",
            ],
            RegulatoryError::NotFound { .. } => vec![
                "Verify the country code is known to the regulatory source",
                "Fall back to the world regulatory domain",
            ],
            RegulatoryError::RegistryFull { .. } => vec![
                "Unregister unused channel change callbacks",
                "Subscribe to the interface watch channel instead",
            ],
            RegulatoryError::UnknownHandle { .. } => vec![
                "Check the handle was returned by register_callback",
                "Avoid unregistering the same handle twice",
            ],
            RegulatoryError::UnknownRadio { .. } => vec![
                "Register the radio with add_radio before using it",
                "Check the phy id reported by the firmware",
            ],
            RegulatoryError::UnknownInterface { .. } => vec![
                "Create the interface before issuing toggles",
                "Check the interface was not already removed",
            ],
            RegulatoryError::TooManyOpClasses { .. } => vec![
                "Trim the supported operating class list",
            ],
            RegulatoryError::Config { .. } => vec![
                "Check the configuration file exists and is readable",
                "Check file permissions",
            ],
            RegulatoryError::Parse { .. } => vec![
                "Check the YAML document against the expected schema",
                "Verify field names and value ranges",
            ],
            RegulatoryError::SourceUnavailable { .. } => vec![
                "Retry the regulatory lookup",
                "Check the regulatory database is loaded",
                "Fall back to the world regulatory domain",
            ],
        }
    }

    /// Helper constructor for invalid input errors.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        RegulatoryError::InvalidInput { reason: reason.into() }
    }

    /// Helper constructor for rule count violations against [`MAX_REG_RULES`].
    pub fn too_many_rules(count: usize) -> Self {
        RegulatoryError::TooManyRules { count, max: MAX_REG_RULES }
    }

    /// Helper constructor for lookup misses.
    pub fn not_found(what: impl Into<String>) -> Self {
        RegulatoryError::NotFound { what: what.into() }
    }

    /// Helper constructor for configuration file errors with path context.
    pub fn config_error(path: PathBuf, source: std::io::Error) -> Self {
        RegulatoryError::Config { path, source }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        RegulatoryError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for regulatory source failures.
    pub fn source_unavailable(reason: impl Into<String>) -> Self {
        RegulatoryError::SourceUnavailable { reason: reason.into(), source: None }
    }

    /// Helper constructor for regulatory source failures with an underlying cause.
    pub fn source_unavailable_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        RegulatoryError::SourceUnavailable { reason: reason.into(), source: Some(source) }
    }
}

impl From<std::io::Error> for RegulatoryError {
    fn from(err: std::io::Error) -> Self {
        RegulatoryError::Config { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<serde_yaml_ng::Error> for RegulatoryError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        RegulatoryError::Parse { context: "YAML document".to_string(), details: err.to_string() }
    }
}
