//! Speaker-labeled transcription of remote and local audio.
//!
//! This module defines the request/result types, the [`Transcriber`] seam
//! the form controller is built against, and the AssemblyAI client that
//! implements it.

pub mod api;
pub mod client;
pub mod request;

pub use api::AssemblyAiClient;
pub use client::{TranscribeFuture, Transcriber};
pub use request::{AudioSource, SpeakerId, TranscriptionRequest, TranscriptionResult, Utterance};
