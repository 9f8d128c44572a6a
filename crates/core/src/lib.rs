//! # GChat Core
//!
//! Domain types, traits, and error definitions for the GChat completion client.
//! This crate has **zero framework dependencies**; it defines the domain model
//! that all other crates implement against.
//!
//! - The request bundle and the prompt assembler live in [`prompt`].
//! - The remote completion service is abstracted by [`Provider`].
//! - Speech backends implement [`SpeechSynthesizer`].
//! - Per-session state (the last reply) lives in [`SessionContext`].

pub mod error;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod speech;

// Re-export key types at crate root for ergonomics
pub use error::Error;
pub use message::{Message, Role};
pub use prompt::{AssembledPrompt, AssemblyError, RequestBundle};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use session::{SessionContext, SessionId};
pub use speech::{SpeechBackendKind, SpeechOutput, SpeechSynthesizer};
