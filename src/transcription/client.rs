//! The `Transcriber` trait: the seam between the form and the API client.
//!
//! The form controller receives its transcriber as an explicitly constructed
//! dependency at creation time, so the real AssemblyAI client and test
//! doubles are interchangeable.

use std::future::Future;
use std::pin::Pin;

use super::request::{TranscriptionRequest, TranscriptionResult};

/// Boxed future returned by [`Transcriber::transcribe`].
pub type TranscribeFuture =
    Pin<Box<dyn Future<Output = anyhow::Result<TranscriptionResult>> + Send>>;

/// A transcription backend performing one logical round trip per request.
pub trait Transcriber: Send + Sync {
    /// Transcribes the request's audio source, resolving to the ordered
    /// utterances or a single opaque error. No partial results are exposed;
    /// the caller either gets the whole transcript or a failure.
    fn transcribe(&self, request: TranscriptionRequest) -> TranscribeFuture;
}
