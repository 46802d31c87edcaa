use thiserror::Error;

use crate::model::ModelId;

/// Unified error type for translation-enhancer-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Request validation (missing input, unknown language names)
/// - Model store operations (loading, inference)
/// - Quality scoring
/// - Configuration operations (loading, validation)
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Request Errors
    // ==========================================================================
    /// Text, source language or target language was not supplied
    #[error("Missing input.")]
    MissingInput,

    /// Language name is not part of the registry
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    // ==========================================================================
    // Translation Errors
    // ==========================================================================
    /// No model could be loaded for the requested language pair
    #[error("Translation model for {from} → {to} not available.")]
    ModelUnavailable {
        from: String,
        to: String,
        #[source]
        cause: LoadError,
    },

    /// The loaded model failed while generating the translation
    #[error("inference failed for {model}: {reason}")]
    InferenceFailure { model: ModelId, reason: String },

    // ==========================================================================
    // Scoring Errors
    // ==========================================================================
    /// The external quality scorer could not produce a score
    #[error("quality scorer unavailable: {0}")]
    ScoringUnavailable(String),

    // ==========================================================================
    // Speech Errors
    // ==========================================================================
    /// The speech synthesizer failed (only ever logged)
    #[error("speech synthesis failed: {0}")]
    Speech(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Language table is not a bijection between names and codes
    #[error("invalid language registry: {0}")]
    RegistryInvalid(String),

    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    /// Failed to build an HTTP client
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Whether the pipeline folds this error into a displayable result
    /// instead of returning it to the caller.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingInput | Self::ModelUnavailable { .. })
    }
}

/// Why a model store could not hand out a model.
///
/// Distinguishes a language pair nobody published a model for from a store
/// that could not be reached, so logs say which one happened. Users see the
/// same "not available" message either way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The store has no model under this identifier
    #[error("no model named {0} in the store")]
    NotFound(ModelId),

    /// Network or storage failure while talking to the store
    #[error("model store unreachable: {0}")]
    Unreachable(String),

    /// The store answered, but not with something usable
    #[error("model store rejected {model}: {reason}")]
    Rejected { model: ModelId, reason: String },
}

impl LoadError {
    /// True when the language pair itself is unsupported
    pub const fn is_unsupported_pair(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
