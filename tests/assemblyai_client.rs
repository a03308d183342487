//! Offline tests for the AssemblyAI client's input validation.
//!
//! File sources are validated before any network traffic: unreadable and
//! empty files fail the request immediately.

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use uttr::config::AssemblyAiConfig;
use uttr::transcription::{
    AssemblyAiClient, AudioSource, Transcriber, TranscriptionRequest,
};

fn client() -> AssemblyAiClient {
    AssemblyAiClient::new("test-key".to_string(), AssemblyAiConfig::default())
        .expect("client construction")
}

#[tokio::test]
async fn missing_file_fails_before_any_request() {
    let request = TranscriptionRequest {
        source: AudioSource::File(PathBuf::from("does-not-exist.mp3")),
        speaker_labels: true,
    };

    let err = client().transcribe(request).await.unwrap_err();
    assert!(err.to_string().contains("Failed to read audio file"));
}

#[tokio::test]
async fn empty_file_fails_before_any_request() {
    let mut file = NamedTempFile::new().expect("temp file");
    file.flush().expect("flush");

    let request = TranscriptionRequest {
        source: AudioSource::File(file.path().to_path_buf()),
        speaker_labels: true,
    };

    let err = client().transcribe(request).await.unwrap_err();
    assert!(err.to_string().contains("is empty"));
}
