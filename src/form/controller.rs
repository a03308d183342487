//! State machine for the transcription form.
//!
//! The controller owns the form's state and orchestrates at most one
//! transcription request at a time. Rendering and keyboard handling live in
//! [`super::ui`]; everything here is observable without a terminal, which is
//! where the tests drive it.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::transcription::{AudioSource, Transcriber, TranscriptionRequest, TranscriptionResult};

/// Shown in place of a transcript when the service returns no utterances.
pub const EMPTY_RESULT_MESSAGE: &str = "Transcription completed, but no utterances were found.";

/// Generic failure banner. The underlying cause goes to the log, never the screen.
pub const FAILURE_MESSAGE: &str = "Failed to transcribe. Please check the audio source and try again.";

/// Which input the form submits from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Url,
    File,
}

/// Mutable state of the form, owned exclusively by the controller.
///
/// Both inputs keep their values while the other mode is active; only the
/// active mode's value is consulted at submission time.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub mode: InputMode,
    pub url_text: String,
    pub selected_file: Option<PathBuf>,
    pub transcript_text: String,
    pub is_busy: bool,
    pub error_message: Option<String>,
}

/// Outcome of an in-flight request, delivered back over the controller's
/// channel when the spawned task finishes.
#[derive(Debug)]
pub enum Outcome {
    Completed(TranscriptionResult),
    Failed(anyhow::Error),
}

/// The form controller.
///
/// Constructed with an injected [`Transcriber`]; the `is_busy` flag is the
/// sole concurrency guard, enforcing at most one outstanding request. There
/// is no cancellation: a submitted request runs to completion, and edits made
/// in the meantime only shape the next submission.
pub struct FormController {
    state: UiState,
    transcriber: Arc<dyn Transcriber>,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
}

impl FormController {
    pub fn new(transcriber: Arc<dyn Transcriber>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            state: UiState::default(),
            transcriber,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Switches the active input mode. Permitted mid-flight; a request
    /// already issued keeps the source it was built from.
    pub fn select_mode(&mut self, mode: InputMode) {
        self.state.mode = mode;
    }

    pub fn set_url_text(&mut self, text: impl Into<String>) {
        self.state.url_text = text.into();
    }

    pub fn set_file(&mut self, path: PathBuf) {
        self.state.selected_file = Some(path);
    }

    pub fn clear_file(&mut self) {
        self.state.selected_file = None;
    }

    /// Whether a submission would be accepted right now.
    pub fn can_submit(&self) -> bool {
        !self.state.is_busy && self.current_source().is_some()
    }

    /// The source a submission would capture, if the active mode has one.
    fn current_source(&self) -> Option<AudioSource> {
        match self.state.mode {
            InputMode::Url if !self.state.url_text.is_empty() => {
                Some(AudioSource::Url(self.state.url_text.clone()))
            }
            InputMode::Url => None,
            InputMode::File => self.state.selected_file.clone().map(AudioSource::File),
        }
    }

    /// Starts one transcription request from the currently selected source.
    ///
    /// Returns `false` without side effects when the guard rejects the
    /// submission: a request is already in flight, or the active mode has no
    /// usable source. Must be called from within a tokio runtime; the
    /// request runs as a spawned task and its outcome arrives via
    /// [`pump`](Self::pump) or [`wait_idle`](Self::wait_idle).
    pub fn submit(&mut self) -> bool {
        if self.state.is_busy {
            tracing::debug!("Submit ignored: a request is already in flight");
            return false;
        }
        let Some(source) = self.current_source() else {
            tracing::debug!("Submit ignored: no audio source for the active mode");
            return false;
        };

        self.state.is_busy = true;
        self.state.error_message = None;
        self.state.transcript_text.clear();

        let request = TranscriptionRequest {
            source,
            speaker_labels: true,
        };
        tracing::info!("Submitting transcription request: {:?}", request.source);

        let transcriber = Arc::clone(&self.transcriber);
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = match transcriber.transcribe(request).await {
                Ok(result) => Outcome::Completed(result),
                Err(cause) => Outcome::Failed(cause),
            };
            // A closed channel means the form is gone; nothing left to update.
            let _ = outcome_tx.send(outcome);
        });

        true
    }

    /// Applies any outcomes that arrived since the last tick.
    ///
    /// Returns `true` when the state changed and the screen should redraw.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply(outcome);
            changed = true;
        }
        changed
    }

    /// Waits for the in-flight request to finish and applies its outcome.
    /// Resolves immediately when nothing is in flight.
    pub async fn wait_idle(&mut self) {
        while self.state.is_busy {
            match self.outcome_rx.recv().await {
                Some(outcome) => self.apply(outcome),
                None => break,
            }
        }
    }

    fn apply(&mut self, outcome: Outcome) {
        self.state.is_busy = false;
        match outcome {
            Outcome::Completed(result) => {
                tracing::info!("Transcription completed: {} utterances", result.utterances.len());
                self.state.transcript_text = if result.is_empty() {
                    EMPTY_RESULT_MESSAGE.to_string()
                } else {
                    result.display_text()
                };
            }
            Outcome::Failed(cause) => {
                tracing::error!("Transcription failed: {cause:#}");
                self.state.error_message = Some(FAILURE_MESSAGE.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::TranscribeFuture;

    /// Guard tests never reach the adapter; this double makes sure of it.
    struct UnreachableTranscriber;

    impl Transcriber for UnreachableTranscriber {
        fn transcribe(&self, _request: TranscriptionRequest) -> TranscribeFuture {
            panic!("guard should have prevented this call");
        }
    }

    fn controller() -> FormController {
        FormController::new(Arc::new(UnreachableTranscriber))
    }

    #[test]
    fn initial_state_is_url_mode_at_rest() {
        let controller = controller();
        let state = controller.state();
        assert_eq!(state.mode, InputMode::Url);
        assert!(state.url_text.is_empty());
        assert!(state.selected_file.is_none());
        assert!(state.transcript_text.is_empty());
        assert!(!state.is_busy);
        assert!(state.error_message.is_none());
    }

    #[test]
    fn submit_is_disabled_without_a_source() {
        let mut controller = controller();
        assert!(!controller.can_submit());
        assert!(!controller.submit());

        controller.select_mode(InputMode::File);
        assert!(!controller.can_submit());
        assert!(!controller.submit());
    }

    #[test]
    fn submit_enables_once_a_source_is_present() {
        let mut controller = controller();
        controller.set_url_text("https://example.com/audio.mp3");
        assert!(controller.can_submit());

        controller.select_mode(InputMode::File);
        assert!(!controller.can_submit());
        controller.set_file(PathBuf::from("meeting.mp3"));
        assert!(controller.can_submit());
    }

    #[test]
    fn inputs_are_isolated_per_mode() {
        let mut controller = controller();

        // A URL typed while file mode is active does not make file mode
        // submittable, and survives the mode switches untouched.
        controller.select_mode(InputMode::File);
        controller.set_url_text("https://example.com/audio.mp3");
        assert!(!controller.can_submit());

        controller.select_mode(InputMode::Url);
        assert!(controller.can_submit());
        assert_eq!(controller.state().url_text, "https://example.com/audio.mp3");

        // And the other way around for a selected file.
        controller.set_file(PathBuf::from("meeting.mp3"));
        controller.set_url_text("");
        assert!(!controller.can_submit());
        controller.select_mode(InputMode::File);
        assert!(controller.can_submit());
        assert_eq!(
            controller.state().selected_file,
            Some(PathBuf::from("meeting.mp3"))
        );
    }

    #[test]
    fn clearing_the_file_disables_file_mode() {
        let mut controller = controller();
        controller.select_mode(InputMode::File);
        controller.set_file(PathBuf::from("meeting.mp3"));
        assert!(controller.can_submit());
        controller.clear_file();
        assert!(!controller.can_submit());
    }
}
