//! Interactive transcription form.
//!
//! Split into the state machine ([`controller`]) and the terminal screen
//! that renders it ([`ui`]). The controller is constructed with an injected
//! [`Transcriber`](crate::transcription::Transcriber) so tests can drive it
//! with a double.

pub mod controller;
pub mod ui;

pub use controller::{
    FormController, InputMode, Outcome, UiState, EMPTY_RESULT_MESSAGE, FAILURE_MESSAGE,
};
pub use ui::FormScreen;
