//! File-based speech: synthesize through an HTTP speech endpoint and store
//! the audio at a fixed location.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use gchat_config::FileSpeechConfig;
use gchat_core::error::SpeechError;
use gchat_core::speech::{SpeechOutput, SpeechSynthesizer};
use tracing::{debug, info, warn};

/// Writes synthesized speech to `output_dir/file_name`.
pub struct FileSpeech {
    url: String,
    api_key: String,
    model: String,
    voice: String,
    format: String,
    output_path: PathBuf,
    client: reqwest::Client,
}

impl FileSpeech {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        config: &FileSpeechConfig,
        timeout: Duration,
    ) -> Result<Self, SpeechError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SpeechError::Synthesis(format!("HTTP client: {e}")))?;

        let base_url = base_url.into();
        Ok(Self {
            url: format!("{}/audio/speech", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            voice: config.voice.clone(),
            format: config.format.clone(),
            output_path: config.output_path(),
            client,
        })
    }

    /// Where audio is written.
    pub fn output_path(&self) -> &PathBuf {
        &self.output_path
    }
}

#[async_trait]
impl SpeechSynthesizer for FileSpeech {
    fn name(&self) -> &str {
        "file"
    }

    async fn synthesize(&self, text: &str) -> Result<SpeechOutput, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::Synthesis("No text to speak".into()));
        }

        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": self.voice,
            "response_format": self.format,
        });

        debug!(model = %self.model, voice = %self.voice, chars = text.len(), "Requesting speech synthesis");

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Synthesis(format!("speech request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Speech endpoint returned error");
            return Err(SpeechError::Synthesis(format!("speech endpoint error ({status}): {body}")));
        }

        let audio = resp
            .bytes()
            .await
            .map_err(|e| SpeechError::Synthesis(format!("speech read error: {e}")))?;

        if audio.is_empty() {
            return Err(SpeechError::Synthesis("speech endpoint returned no audio".into()));
        }

        if let Some(dir) = self.output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                SpeechError::Synthesis(format!("cannot create {}: {e}", dir.display()))
            })?;
        }

        tokio::fs::write(&self.output_path, &audio).await.map_err(|e| {
            SpeechError::Synthesis(format!("cannot write {}: {e}", self.output_path.display()))
        })?;

        info!(path = %self.output_path.display(), bytes = audio.len(), "Speech audio written");
        Ok(SpeechOutput::File(self.output_path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    fn config_in(dir: &std::path::Path) -> FileSpeechConfig {
        FileSpeechConfig {
            output_dir: dir.join("audio"),
            ..FileSpeechConfig::default()
        }
    }

    #[tokio::test]
    async fn writes_audio_to_fixed_file_and_overwrites() {
        let app = Router::new().route(
            "/v1/audio/speech",
            post(|Json(body): Json<serde_json::Value>| async move {
                let input = body["input"].as_str().unwrap_or_default().to_string();
                format!("RIFF:{input}").into_bytes()
            }),
        );
        let base = serve(app).await;
        let dir = tempfile::tempdir().unwrap();

        let speech = FileSpeech::new(&base, "k", &config_in(dir.path()), Duration::from_secs(5)).unwrap();

        let first = speech.synthesize("first reply").await.unwrap();
        let expected = dir.path().join("audio").join("reply.wav");
        assert_eq!(first, SpeechOutput::File(expected.clone()));
        assert_eq!(std::fs::read(&expected).unwrap(), b"RIFF:first reply");

        let second = speech.synthesize("second").await.unwrap();
        assert_eq!(second, SpeechOutput::File(expected.clone()));
        assert_eq!(std::fs::read(&expected).unwrap(), b"RIFF:second");
    }

    #[tokio::test]
    async fn endpoint_error_is_synthesis_error() {
        let app = Router::new().route(
            "/v1/audio/speech",
            post(|| async { (StatusCode::BAD_REQUEST, "voice not found").into_response() }),
        );
        let base = serve(app).await;
        let dir = tempfile::tempdir().unwrap();

        let speech = FileSpeech::new(&base, "k", &config_in(dir.path()), Duration::from_secs(5)).unwrap();
        let err = speech.synthesize("hello").await.unwrap_err();
        match err {
            SpeechError::Synthesis(msg) => assert!(msg.contains("voice not found")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!speech.output_path().exists());
    }

    #[tokio::test]
    async fn empty_text_is_rejected_without_request() {
        let dir = tempfile::tempdir().unwrap();
        let speech = FileSpeech::new(
            "http://127.0.0.1:9/v1",
            "k",
            &config_in(dir.path()),
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(matches!(
            speech.synthesize("   ").await,
            Err(SpeechError::Synthesis(_))
        ));
    }
}
