//! Recording session domain module

mod session;

pub use session::{InvalidStateTransition, RecorderSession, SessionState};
