//! Error types for the GChat domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

use crate::prompt::AssemblyError;

/// The top-level error type for all GChat operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Completion service errors ---
    #[error("Service error: {0}")]
    Provider(#[from] ProviderError),

    // --- Document errors ---
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    // --- Speech errors ---
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    // --- Prompt assembly ---
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// --- Bounded context errors ---

/// Failures talking to the remote completion service.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures turning an uploaded document into text.
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    #[error("Document is not valid UTF-8: {0}")]
    Decode(String),

    #[error("Failed to extract text from PDF: {0}")]
    Extraction(String),

    #[error("Unsupported content type: {0} (expected text/plain or application/pdf)")]
    UnsupportedContentType(String),

    #[error("Failed to read {path}: {reason}")]
    Read { path: String, reason: String },
}

/// Failures producing or playing synthesized speech.
#[derive(Debug, Clone, Error)]
pub enum SpeechError {
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Speech is not enabled (speech.backend = \"none\")")]
    NotConfigured,
}
