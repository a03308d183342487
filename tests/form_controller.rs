//! Integration tests for the transcription form controller.
//!
//! Drives the controller with a scripted transcriber double: requests are
//! recorded, outcomes are played back in order, and a gate can hold a
//! request open to observe the in-flight state.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::Notify;

use uttr::form::{FormController, InputMode, EMPTY_RESULT_MESSAGE, FAILURE_MESSAGE};
use uttr::transcription::{
    AudioSource, SpeakerId, TranscribeFuture, Transcriber, TranscriptionRequest,
    TranscriptionResult, Utterance,
};

/// Scripted transcriber: records every request and plays back the queued
/// outcomes in order. With a gate set, each request stays in flight until
/// the gate is notified.
struct ScriptedTranscriber {
    calls: AtomicUsize,
    requests: Mutex<Vec<TranscriptionRequest>>,
    outcomes: Mutex<VecDeque<anyhow::Result<TranscriptionResult>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedTranscriber {
    fn new(outcomes: Vec<anyhow::Result<TranscriptionResult>>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            outcomes: Mutex::new(outcomes.into()),
            gate: None,
        })
    }

    fn gated(
        outcomes: Vec<anyhow::Result<TranscriptionResult>>,
        gate: Arc<Notify>,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            outcomes: Mutex::new(outcomes.into()),
            gate: Some(gate),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn requests(&self) -> Vec<TranscriptionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transcriber for ScriptedTranscriber {
    fn transcribe(&self, request: TranscriptionRequest) -> TranscribeFuture {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("transcribe called more often than scripted");
        let gate = self.gate.clone();
        Box::pin(async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            outcome
        })
    }
}

fn utterance(speaker: &str, text: &str) -> Utterance {
    Utterance {
        speaker: SpeakerId::Label(speaker.to_string()),
        text: text.to_string(),
    }
}

/// Polls until the condition holds; the spawned request task is scheduled by
/// the runtime, not by `submit` itself.
async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn success_renders_one_line_per_utterance() {
    let scripted = ScriptedTranscriber::new(vec![Ok(TranscriptionResult {
        utterances: vec![utterance("A", "hi"), utterance("B", "bye")],
    })]);
    let mut controller = FormController::new(scripted.clone());

    controller.set_url_text("https://example.com/audio.mp3");
    assert!(controller.submit());
    assert!(controller.state().is_busy);

    controller.wait_idle().await;

    let state = controller.state();
    assert_eq!(state.transcript_text, "Speaker A: hi\nSpeaker B: bye");
    assert_eq!(state.error_message, None);
    assert!(!state.is_busy);
}

#[tokio::test]
async fn empty_result_shows_informational_message() {
    let scripted = ScriptedTranscriber::new(vec![Ok(TranscriptionResult::default())]);
    let mut controller = FormController::new(scripted.clone());

    controller.set_url_text("https://example.com/silence.mp3");
    assert!(controller.submit());
    controller.wait_idle().await;

    let state = controller.state();
    assert_eq!(state.transcript_text, EMPTY_RESULT_MESSAGE);
    assert_eq!(state.error_message, None);
}

#[tokio::test]
async fn failure_sets_generic_banner_and_keeps_transcript_empty() {
    let scripted =
        ScriptedTranscriber::new(vec![Err(anyhow::anyhow!("401: invalid api key"))]);
    let mut controller = FormController::new(scripted.clone());

    controller.set_url_text("https://example.com/audio.mp3");
    assert!(controller.submit());
    controller.wait_idle().await;

    let state = controller.state();
    assert_eq!(state.error_message.as_deref(), Some(FAILURE_MESSAGE));
    assert_eq!(state.transcript_text, "");
    assert!(!state.is_busy);
}

#[tokio::test]
async fn submit_while_busy_is_ignored() {
    let gate = Arc::new(Notify::new());
    let scripted = ScriptedTranscriber::gated(
        vec![Ok(TranscriptionResult::default())],
        gate.clone(),
    );
    let mut controller = FormController::new(scripted.clone());

    controller.set_url_text("https://example.com/audio.mp3");
    assert!(controller.submit());
    eventually(|| scripted.calls() == 1).await;

    // Still in flight: the second click is a no-op, not a queued request.
    assert!(controller.state().is_busy);
    assert!(!controller.submit());
    assert_eq!(scripted.calls(), 1);

    gate.notify_one();
    controller.wait_idle().await;
    assert!(!controller.state().is_busy);
    assert_eq!(scripted.calls(), 1);
}

#[tokio::test]
async fn in_flight_request_keeps_the_captured_source() {
    let gate = Arc::new(Notify::new());
    let scripted = ScriptedTranscriber::gated(
        vec![Ok(TranscriptionResult {
            utterances: vec![utterance("A", "first")],
        })],
        gate.clone(),
    );
    let mut controller = FormController::new(scripted.clone());

    controller.set_url_text("https://example.com/first.mp3");
    assert!(controller.submit());
    eventually(|| scripted.calls() == 1).await;

    // Edits and mode switches while busy only shape the next submission.
    controller.set_url_text("https://example.com/second.mp3");
    controller.select_mode(InputMode::File);
    controller.set_file(PathBuf::from("other.mp3"));
    assert!(controller.state().is_busy);

    gate.notify_one();
    controller.wait_idle().await;

    let requests = scripted.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].source,
        AudioSource::Url("https://example.com/first.mp3".to_string())
    );
    assert_eq!(controller.state().transcript_text, "Speaker A: first");
}

#[tokio::test]
async fn resubmission_follows_the_same_guard_rules() {
    let scripted = ScriptedTranscriber::new(vec![
        Err(anyhow::anyhow!("network unreachable")),
        Ok(TranscriptionResult {
            utterances: vec![utterance("A", "second time lucky")],
        }),
    ]);
    let mut controller = FormController::new(scripted.clone());

    controller.set_url_text("https://example.com/audio.mp3");
    assert!(controller.submit());
    controller.wait_idle().await;
    assert_eq!(
        controller.state().error_message.as_deref(),
        Some(FAILURE_MESSAGE)
    );

    // The failed cycle left the form usable; the same guard accepts again
    // and the stale banner clears at submit.
    assert!(controller.can_submit());
    assert!(controller.submit());
    assert_eq!(controller.state().error_message, None);
    controller.wait_idle().await;

    let state = controller.state();
    assert_eq!(state.transcript_text, "Speaker A: second time lucky");
    assert_eq!(state.error_message, None);
    assert_eq!(scripted.calls(), 2);
}

#[tokio::test]
async fn file_mode_submits_the_selected_file_with_speaker_labels() {
    let scripted = ScriptedTranscriber::new(vec![Ok(TranscriptionResult::default())]);
    let mut controller = FormController::new(scripted.clone());

    controller.select_mode(InputMode::File);
    controller.set_file(PathBuf::from("meeting.mp3"));
    assert!(controller.submit());
    controller.wait_idle().await;

    let requests = scripted.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].source,
        AudioSource::File(PathBuf::from("meeting.mp3"))
    );
    assert!(requests[0].speaker_labels);
}
