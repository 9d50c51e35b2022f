//! Command/event protocol between the recorder and its encoder worker
//!
//! Messages are tagged records. On the wire (JSON) the tag lives in the
//! `command` field, e.g. `{"command":"start","bufferSize":4096}`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::config::RecorderOptions;
use crate::domain::encoding::EncodedArtifact;
use crate::domain::recording::{AudioFrame, StreamFormat};

/// Tags accepted by [`WorkerCommand::from_json`]
pub const COMMAND_TAGS: &[&str] = &["init", "options", "start", "record", "cancel", "finish"];

/// Tags accepted by [`WorkerEvent::from_json`]
pub const EVENT_TAGS: &[&str] = &["loaded", "timeout", "progress", "complete", "failed"];

/// Protocol errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Unknown message tag \"{0}\"")]
    UnknownTag(String),

    #[error("Message has no \"command\" tag")]
    MissingTag,

    #[error("Malformed message: {0}")]
    Malformed(String),
}

/// Commands consumed by an encoder worker, in arrival order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum WorkerCommand {
    /// Reset the worker for a new stream format
    Init {
        config: StreamFormat,
        options: RecorderOptions,
    },
    /// Replace the options (ignored while recording)
    Options { options: RecorderOptions },
    /// Begin accepting frames
    Start {
        #[serde(rename = "bufferSize")]
        buffer_size: usize,
    },
    /// Append one frame
    Record { buffer: AudioFrame },
    /// Discard the recording
    Cancel,
    /// Stop recording and encode
    Finish,
}

impl WorkerCommand {
    /// Decode one JSON message
    pub fn from_json(line: &str) -> Result<Self, ProtocolError> {
        decode(line, COMMAND_TAGS)
    }

    /// Get the message tag
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Options { .. } => "options",
            Self::Start { .. } => "start",
            Self::Record { .. } => "record",
            Self::Cancel => "cancel",
            Self::Finish => "finish",
        }
    }
}

/// Events emitted by an encoder worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum WorkerEvent {
    /// Init finished
    Loaded,
    /// Recorded duration reached the time limit
    Timeout,
    /// Encoding progress in percent
    Progress { progress: f64 },
    /// The encoded recording
    Complete {
        #[serde(with = "blob")]
        blob: EncodedArtifact,
    },
    /// The codec could not produce an artifact
    Failed { message: String },
}

impl WorkerEvent {
    /// Decode one JSON message
    pub fn from_json(line: &str) -> Result<Self, ProtocolError> {
        decode(line, EVENT_TAGS)
    }

    /// Encode as a single JSON line
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
}

/// Decode a tagged message, telling unknown tags apart from malformed bodies
fn decode<T>(line: &str, known_tags: &[&str]) -> Result<T, ProtocolError>
where
    T: for<'de> Deserialize<'de>,
{
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

    let tag = value
        .get("command")
        .and_then(serde_json::Value::as_str)
        .ok_or(ProtocolError::MissingTag)?;
    if !known_tags.contains(&tag) {
        return Err(ProtocolError::UnknownTag(tag.to_string()));
    }

    serde_json::from_value(value).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

/// Artifacts travel as `{"type": <mime>, "data": <base64>}`
mod blob {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::domain::encoding::EncodedArtifact;

    #[derive(Serialize, Deserialize)]
    struct Blob {
        #[serde(rename = "type")]
        mime_type: String,
        data: String,
    }

    pub fn serialize<S: Serializer>(artifact: &EncodedArtifact, serializer: S) -> Result<S::Ok, S::Error> {
        Blob {
            mime_type: artifact.mime_type().to_string(),
            data: artifact.to_base64(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EncodedArtifact, D::Error> {
        let blob = Blob::deserialize(deserializer)?;
        let data = base64::engine::general_purpose::STANDARD
            .decode(blob.data)
            .map_err(serde::de::Error::custom)?;
        Ok(EncodedArtifact::new(data, blob.mime_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_init() {
        let cmd = WorkerCommand::from_json(
            r#"{"command":"init","config":{"sampleRate":44100,"numChannels":2},"options":{"timeLimit":30}}"#,
        )
        .unwrap();

        match cmd {
            WorkerCommand::Init { config, options } => {
                assert_eq!(config, StreamFormat::new(44100, 2));
                assert_eq!(options.time_limit, Some(30));
                assert!(options.encode_after_record.is_none());
            }
            other => panic!("Expected init, got {:?}", other),
        }
    }

    #[test]
    fn decode_start_and_unit_commands() {
        assert_eq!(
            WorkerCommand::from_json(r#"{"command":"start","bufferSize":128}"#).unwrap(),
            WorkerCommand::Start { buffer_size: 128 }
        );
        assert_eq!(
            WorkerCommand::from_json(r#"{"command":"finish"}"#).unwrap(),
            WorkerCommand::Finish
        );
        assert_eq!(WorkerCommand::Cancel.tag(), "cancel");
    }

    #[test]
    fn decode_record_frame() {
        let cmd =
            WorkerCommand::from_json(r#"{"command":"record","buffer":[[0.5,0.25],[-0.5,-0.25]]}"#)
                .unwrap();
        let WorkerCommand::Record { buffer } = cmd else {
            panic!("Expected record");
        };
        assert_eq!(buffer.num_channels(), 2);
        assert_eq!(buffer.channel(1), Some(&[-0.5f32, -0.25][..]));
    }

    #[test]
    fn unknown_tag_is_reported() {
        let err = WorkerCommand::from_json(r#"{"command":"exportWAV","type":"audio/wav"}"#)
            .unwrap_err();
        assert_eq!(err, ProtocolError::UnknownTag("exportWAV".to_string()));

        let err = WorkerEvent::from_json(r#"{"command":"record"}"#).unwrap_err();
        assert_eq!(err, ProtocolError::UnknownTag("record".to_string()));
    }

    #[test]
    fn missing_tag_and_bad_bodies() {
        assert_eq!(
            WorkerCommand::from_json(r#"{"bufferSize":1}"#).unwrap_err(),
            ProtocolError::MissingTag
        );
        assert!(matches!(
            WorkerCommand::from_json("not json"),
            Err(ProtocolError::Malformed(_))
        ));
        assert!(matches!(
            WorkerCommand::from_json(r#"{"command":"record","buffer":[[0.1],[]]}"#),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn complete_event_round_trips_blob() {
        let event = WorkerEvent::Complete {
            blob: EncodedArtifact::new(b"RIFF".to_vec(), "audio/wav"),
        };
        let json = event.to_json().unwrap();
        assert!(json.contains(r#""command":"complete""#));
        assert!(json.contains(r#""type":"audio/wav""#));

        assert_eq!(WorkerEvent::from_json(&json).unwrap(), event);
    }

    #[test]
    fn progress_event_json() {
        let json = WorkerEvent::Progress { progress: 50.0 }.to_json().unwrap();
        assert_eq!(json, r#"{"command":"progress","progress":50.0}"#);
        assert_eq!(
            WorkerEvent::Loaded.to_json().unwrap(),
            r#"{"command":"loaded"}"#
        );
    }
}
