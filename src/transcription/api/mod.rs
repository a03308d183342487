//! Provider implementations for the transcription API.
//!
//! AssemblyAI is currently the only provider; it implements the
//! [`Transcriber`](crate::transcription::Transcriber) trait so the form
//! never depends on it directly.

pub mod assemblyai;

pub use assemblyai::AssemblyAiClient;
