//! Direct playback through the platform speech engine.
//!
//! The engine is spawned as a child process, the text is written to its
//! stdin, and the call returns only after the engine exits. There is no
//! cancellation once playback has started.

use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use gchat_config::PlaybackSpeechConfig;
use gchat_core::error::SpeechError;
use gchat_core::speech::{SpeechOutput, SpeechSynthesizer};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Speaks text aloud with a local speech engine.
pub struct SystemVoice {
    program: String,
    args: Vec<String>,
}

impl SystemVoice {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Use the configured engine, or the platform default when none is set.
    pub fn from_config(config: &PlaybackSpeechConfig) -> Self {
        match &config.command {
            Some(command) => Self::new(command.clone(), config.args.clone()),
            None => {
                let (program, args) = platform_default();
                Self::new(program, args)
            }
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

/// Engines that read the text to speak from stdin.
fn platform_default() -> (String, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("say".into(), vec![])
    } else if cfg!(target_os = "windows") {
        (
            "powershell".into(),
            vec![
                "-NoProfile".into(),
                "-Command".into(),
                "Add-Type -AssemblyName System.Speech; \
                 (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak([Console]::In.ReadToEnd())"
                    .into(),
            ],
        )
    } else {
        ("espeak-ng".into(), vec!["--stdin".into()])
    }
}

#[async_trait]
impl SpeechSynthesizer for SystemVoice {
    fn name(&self) -> &str {
        "playback"
    }

    async fn synthesize(&self, text: &str) -> Result<SpeechOutput, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::Synthesis("No text to speak".into()));
        }

        debug!(program = %self.program, chars = text.len(), "Starting speech playback");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                SpeechError::Synthesis(format!("failed to start speech engine `{}`: {e}", self.program))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(text.as_bytes()).await {
                Ok(()) => {}
                // The engine exited early; its status below tells us why.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                Err(e) => {
                    return Err(SpeechError::Synthesis(format!("failed to send text to speech engine: {e}")));
                }
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SpeechError::Synthesis(format!("speech playback failed: {e}")))?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(program = %self.program, exit_code = code, "Speech engine failed");
            return Err(SpeechError::Synthesis(format!(
                "speech engine `{}` exited with code {code}: {stderr}",
                self.program
            )));
        }

        Ok(SpeechOutput::Played)
    }
}
