//! AssemblyAI API client.
//!
//! Handles transcription requests using AssemblyAI's upload→transcribe→poll
//! pattern:
//! 1. File sources are uploaded as raw bytes to get an upload URL
//!    (URL sources skip this step and are passed through directly)
//! 2. A transcription request is submitted with the audio URL and options
//! 3. The completed transcript is polled at 3-second intervals
//!
//! Every step is a single attempt; failures surface immediately and the user
//! decides whether to resubmit.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::AssemblyAiConfig;
use crate::transcription::client::{TranscribeFuture, Transcriber};
use crate::transcription::request::{
    AudioSource, TranscriptionRequest, TranscriptionResult, Utterance,
};

/// Base URL for the AssemblyAI REST API.
const API_BASE_URL: &str = "https://api.assemblyai.com/v2";

/// Maximum number of poll attempts before timing out (5 minutes at 3-second intervals)
const MAX_POLL_ATTEMPTS: u32 = 100;

/// Polling interval in seconds (AssemblyAI recommends 3 seconds between polls)
const POLL_INTERVAL_SECS: u64 = 3;

/// Response from the upload endpoint
#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

/// Request body for the transcription endpoint
#[derive(Debug, Serialize)]
struct TranscriptRequest {
    audio_url: String,
    speaker_labels: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    punctuate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format_text: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_detection: Option<bool>,
}

/// Response from the transcription endpoint (both submit and poll)
#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
    status: String,
    error: Option<String>,
    utterances: Option<Vec<Utterance>>,
}

/// Client for AssemblyAI's speech-to-text API.
///
/// Cheap to clone; the underlying HTTP connection pool is shared.
#[derive(Debug, Clone)]
pub struct AssemblyAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    options: AssemblyAiConfig,
}

impl AssemblyAiClient {
    /// Creates a client with request/connect timeouts and connection pooling.
    ///
    /// # Errors
    /// - If the HTTP client cannot be constructed
    pub fn new(api_key: String, options: AssemblyAiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?;

        Ok(Self {
            http,
            api_key,
            base_url: API_BASE_URL.to_string(),
            options,
        })
    }

    async fn run(&self, request: TranscriptionRequest) -> anyhow::Result<TranscriptionResult> {
        let audio_url = match &request.source {
            AudioSource::Url(url) => url.clone(),
            AudioSource::File(path) => self.upload(path).await?,
        };

        let transcript_id = self.submit(&audio_url, request.speaker_labels).await?;
        self.poll(&transcript_id).await
    }

    /// Uploads a local audio file and returns the temporary upload URL.
    async fn upload(&self, path: &Path) -> anyhow::Result<String> {
        let audio_data = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read audio file {}: {e}", path.display()))?;

        if audio_data.is_empty() {
            return Err(anyhow::anyhow!(
                "Audio file {} is empty, nothing to transcribe",
                path.display()
            ));
        }

        tracing::debug!("Uploading {} bytes to AssemblyAI...", audio_data.len());
        let upload_response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .header("Authorization", &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .body(audio_data)
            .send()
            .await
            .map_err(network_error)?;

        if !upload_response.status().is_success() {
            let status = upload_response.status();
            let error_body = upload_response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(format_error(status.as_u16(), &error_body)));
        }

        let upload: UploadResponse = upload_response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse AssemblyAI upload response: {e}"))?;

        tracing::debug!("Audio uploaded successfully");
        Ok(upload.upload_url)
    }

    /// Submits the transcription request and returns the transcript id.
    async fn submit(&self, audio_url: &str, speaker_labels: bool) -> anyhow::Result<String> {
        let request = TranscriptRequest {
            audio_url: audio_url.to_string(),
            speaker_labels,
            punctuate: Some(self.options.punctuate),
            format_text: Some(self.options.format_text),
            language_detection: Some(self.options.language_detection),
        };

        tracing::debug!("Submitting transcription request...");
        let submit_response = self
            .http
            .post(format!("{}/transcript", self.base_url))
            .header("Authorization", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        if !submit_response.status().is_success() {
            let status = submit_response.status();
            let error_body = submit_response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(format_error(status.as_u16(), &error_body)));
        }

        let transcript: TranscriptResponse = submit_response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse AssemblyAI submit response: {e}"))?;

        tracing::debug!("Transcription submitted, id: {}", transcript.id);
        Ok(transcript.id)
    }

    /// Polls the transcript until it completes or errors, bounded at
    /// [`MAX_POLL_ATTEMPTS`].
    async fn poll(&self, transcript_id: &str) -> anyhow::Result<TranscriptionResult> {
        let poll_url = format!("{}/transcript/{transcript_id}", self.base_url);
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            if attempts > MAX_POLL_ATTEMPTS {
                return Err(anyhow::anyhow!(
                    "AssemblyAI transcription timed out after {} seconds. The audio may be too long or the API is experiencing delays.",
                    MAX_POLL_ATTEMPTS as u64 * POLL_INTERVAL_SECS
                ));
            }

            let poll_response = self
                .http
                .get(&poll_url)
                .header("Authorization", &self.api_key)
                .send()
                .await
                .map_err(network_error)?;

            if !poll_response.status().is_success() {
                let status = poll_response.status();
                let error_body = poll_response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(anyhow::anyhow!(format_error(status.as_u16(), &error_body)));
            }

            let result: TranscriptResponse = poll_response
                .json()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to parse AssemblyAI poll response: {e}"))?;

            tracing::debug!(
                "Poll attempt {}/{}: status={}, id={}",
                attempts,
                MAX_POLL_ATTEMPTS,
                result.status,
                result.id
            );

            match result.status.as_str() {
                "completed" => {
                    let utterances = result.utterances.unwrap_or_default();
                    tracing::debug!("Transcription completed: {} utterances", utterances.len());
                    return Ok(TranscriptionResult { utterances });
                }
                "error" => {
                    let error = result
                        .error
                        .unwrap_or_else(|| "Unknown transcription error".to_string());
                    return Err(anyhow::anyhow!("AssemblyAI transcription failed: {error}"));
                }
                _ => {
                    // Still queued or processing
                    tokio::time::sleep(Duration::from_secs(POLL_INTERVAL_SECS)).await;
                }
            }
        }
    }
}

impl Transcriber for AssemblyAiClient {
    fn transcribe(&self, request: TranscriptionRequest) -> TranscribeFuture {
        let client = self.clone();
        Box::pin(async move { client.run(request).await })
    }
}

/// Maps reqwest transport failures to human-readable messages.
fn network_error(e: reqwest::Error) -> anyhow::Error {
    if e.is_connect() {
        anyhow::anyhow!(
            "Failed to connect to AssemblyAI API server. Check your internet connection."
        )
    } else if e.is_timeout() {
        anyhow::anyhow!("Request to AssemblyAI timed out. The API server is not responding.")
    } else {
        anyhow::anyhow!("AssemblyAI network error: {e}")
    }
}

/// Formats HTTP error codes into human-readable messages.
fn format_error(status: u16, error_body: &str) -> String {
    match status {
        401 => "AssemblyAI API key is invalid or expired. Please run 'uttr auth' to update your API key.".to_string(),
        403 => "You don't have permission to use AssemblyAI's API. Check your API key and account status.".to_string(),
        429 => "Too many requests to AssemblyAI. You've hit the API rate limit. Please wait and try again.".to_string(),
        500 | 502 | 503 | 504 => "AssemblyAI API server is experiencing issues. Please try again later.".to_string(),
        _ => format!("AssemblyAI API error (status {status}): {error_body}"),
    }
}
