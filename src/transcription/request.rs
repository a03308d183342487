//! Request and result types for transcription.
//!
//! A request captures the audio source and options at submission time and is
//! never mutated afterwards. Results carry the ordered, speaker-labeled
//! utterances exactly as the service returned them.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// The audio input for a transcription request.
///
/// Exactly one source is active per request, enforced by the variant itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// A reachable URL pointing at an audio file.
    Url(String),
    /// A local audio file, uploaded to the service before transcription.
    File(PathBuf),
}

/// One transcription request, built fresh per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRequest {
    pub source: AudioSource,
    /// Ask the service to diarize the audio and label each utterance.
    pub speaker_labels: bool,
}

/// Speaker identifier as returned by the service.
///
/// Diarization models return either a letter label ("A", "B", ...) or a
/// numeric index; both stringify the same way for display.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SpeakerId {
    Label(String),
    Index(i64),
}

impl fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeakerId::Label(label) => write!(f, "{label}"),
            SpeakerId::Index(index) => write!(f, "{index}"),
        }
    }
}

/// One speaker turn in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Utterance {
    pub speaker: SpeakerId,
    pub text: String,
}

/// An ordered, speaker-labeled transcript. An empty utterance list means the
/// service completed without finding any speech.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptionResult {
    pub utterances: Vec<Utterance>,
}

impl TranscriptionResult {
    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    /// Renders one `Speaker {id}: {text}` line per utterance, in service
    /// order. Never re-sorts.
    pub fn display_text(&self) -> String {
        self.utterances
            .iter()
            .map(|utterance| format!("Speaker {}: {}", utterance.speaker, utterance.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_text_preserves_order() {
        let result = TranscriptionResult {
            utterances: vec![
                Utterance {
                    speaker: SpeakerId::Label("A".to_string()),
                    text: "hi".to_string(),
                },
                Utterance {
                    speaker: SpeakerId::Label("B".to_string()),
                    text: "bye".to_string(),
                },
            ],
        };

        assert_eq!(result.display_text(), "Speaker A: hi\nSpeaker B: bye");
    }

    #[test]
    fn numeric_speakers_stringify_like_labels() {
        let result = TranscriptionResult {
            utterances: vec![Utterance {
                speaker: SpeakerId::Index(2),
                text: "hello".to_string(),
            }],
        };

        assert_eq!(result.display_text(), "Speaker 2: hello");
    }

    #[test]
    fn utterance_deserializes_string_and_numeric_speakers() {
        let labeled: Utterance =
            serde_json::from_str(r#"{"speaker": "A", "text": "hi", "confidence": 0.93}"#).unwrap();
        assert_eq!(labeled.speaker, SpeakerId::Label("A".to_string()));

        let indexed: Utterance = serde_json::from_str(r#"{"speaker": 1, "text": "hi"}"#).unwrap();
        assert_eq!(indexed.speaker, SpeakerId::Index(1));
    }

    #[test]
    fn empty_result_renders_nothing() {
        assert!(TranscriptionResult::default().is_empty());
        assert_eq!(TranscriptionResult::default().display_text(), "");
    }
}
