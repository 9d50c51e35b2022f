//! Recorder session state machine

use std::fmt;
use thiserror::Error;

/// Recorder session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Finishing,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Finishing => "finishing",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Recorder session entity.
///
/// State machine:
///   IDLE -> RECORDING (start_recording)
///   RECORDING -> IDLE (cancel_recording)
///   RECORDING -> FINISHING (finish_recording)
///   FINISHING -> IDLE (complete_encoding, abandon_encoding)
#[derive(Debug, Default)]
pub struct RecorderSession {
    state: SessionState,
}

impl RecorderSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Check if the worker is encoding the finished recording
    pub fn is_finishing(&self) -> bool {
        self.state == SessionState::Finishing
    }

    /// Transition from IDLE to RECORDING
    pub fn start_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Idle, SessionState::Recording, "start recording")
    }

    /// Transition from RECORDING to IDLE without an artifact
    pub fn cancel_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionState::Recording, SessionState::Idle, "cancel recording")
    }

    /// Transition from RECORDING to FINISHING
    pub fn finish_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(
            SessionState::Recording,
            SessionState::Finishing,
            "finish recording",
        )
    }

    /// Transition from FINISHING to IDLE once the artifact arrived
    pub fn complete_encoding(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(
            SessionState::Finishing,
            SessionState::Idle,
            "complete encoding",
        )
    }

    /// Transition from FINISHING to IDLE when the encode is dropped
    pub fn abandon_encoding(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(
            SessionState::Finishing,
            SessionState::Idle,
            "abandon encoding",
        )
    }

    fn transition(
        &mut self,
        from: SessionState,
        to: SessionState,
        action: &str,
    ) -> Result<(), InvalidStateTransition> {
        if self.state != from {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: action.to_string(),
            });
        }
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = RecorderSession::new();
        assert!(session.is_idle());
        assert!(!session.is_recording());
        assert!(!session.is_finishing());
    }

    #[test]
    fn start_recording_from_recording_fails() {
        let mut session = RecorderSession::new();
        session.start_recording().unwrap();

        let err = session.start_recording().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn cancel_recording_returns_to_idle() {
        let mut session = RecorderSession::new();
        session.start_recording().unwrap();
        session.cancel_recording().unwrap();
        assert!(session.is_idle());
    }

    #[test]
    fn finish_after_cancel_fails() {
        let mut session = RecorderSession::new();
        session.start_recording().unwrap();
        session.cancel_recording().unwrap();

        let err = session.finish_recording().unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
    }

    #[test]
    fn start_while_finishing_fails() {
        let mut session = RecorderSession::new();
        session.start_recording().unwrap();
        session.finish_recording().unwrap();

        let err = session.start_recording().unwrap_err();
        assert_eq!(err.current_state, SessionState::Finishing);
    }

    #[test]
    fn complete_encoding_from_recording_fails() {
        let mut session = RecorderSession::new();
        session.start_recording().unwrap();
        assert!(session.complete_encoding().is_err());
        assert!(session.abandon_encoding().is_err());
    }

    #[test]
    fn full_cycle() {
        let mut session = RecorderSession::new();
        session.start_recording().unwrap();
        session.finish_recording().unwrap();
        assert!(session.is_finishing());
        session.complete_encoding().unwrap();
        assert!(session.is_idle());

        // Can start another cycle
        session.start_recording().unwrap();
        session.finish_recording().unwrap();
        session.abandon_encoding().unwrap();
        assert!(session.is_idle());
    }

    #[test]
    fn state_display() {
        assert_eq!(SessionState::Idle.to_string(), "idle");
        assert_eq!(SessionState::Recording.to_string(), "recording");
        assert_eq!(SessionState::Finishing.to_string(), "finishing");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: SessionState::Finishing,
            action: "start recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start recording"));
        assert!(msg.contains("finishing"));
    }
}
