//! Speech synthesis abstraction.
//!
//! Two backends exist, selected per configuration by [`SpeechBackendKind`]:
//! one writes audio to a fixed file, the other plays it directly and blocks
//! until playback has finished.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SpeechError;

/// Which speech capability the client is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechBackendKind {
    /// No speak action
    #[default]
    None,
    /// Synthesize to a file on local storage
    File,
    /// Synthesize and play in-process
    Playback,
}

impl std::str::FromStr for SpeechBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "" => Ok(Self::None),
            "file" => Ok(Self::File),
            "playback" | "play" => Ok(Self::Playback),
            other => Err(format!("unknown speech backend '{other}' (expected none, file or playback)")),
        }
    }
}

impl std::fmt::Display for SpeechBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::File => "file",
            Self::Playback => "playback",
        };
        f.write_str(name)
    }
}

/// What a synthesis call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutput {
    /// Audio was written to this file
    File(PathBuf),
    /// Audio was played to completion
    Played,
}

/// A speech backend. Every call synthesizes from scratch.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &str;

    async fn synthesize(&self, text: &str) -> Result<SpeechOutput, SpeechError>;
}
