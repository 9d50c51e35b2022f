//! Stop signal handling for the record runner

use tokio::sync::mpsc;
use tracing::debug;

/// Signals the record runner reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    /// Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
}

/// Forwards OS stop signals into a channel.
///
/// Every delivery is forwarded, so a second Ctrl+C can mean something other
/// than the first.
pub struct StopSignalHandler {
    receiver: mpsc::UnboundedReceiver<StopSignal>,
}

impl StopSignalHandler {
    /// Start listening for stop signals
    #[cfg(unix)]
    pub fn new() -> Result<Self, std::io::Error> {
        use tokio::signal::unix::{signal, SignalKind};

        let (tx, rx) = mpsc::unbounded_channel();

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            while sigint.recv().await.is_some() {
                debug!("Received SIGINT");
                if tx_int.send(StopSignal::Interrupt).is_err() {
                    break;
                }
            }
        });

        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            while sigterm.recv().await.is_some() {
                debug!("Received SIGTERM");
                if tx.send(StopSignal::Terminate).is_err() {
                    break;
                }
            }
        });

        Ok(Self { receiver: rx })
    }

    /// Start listening for stop signals
    #[cfg(not(unix))]
    pub fn new() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                debug!("Received Ctrl+C");
                if tx.send(StopSignal::Interrupt).is_err() {
                    break;
                }
            }
        });
        Ok(Self { receiver: rx })
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<StopSignal> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_signal_equality() {
        assert_eq!(StopSignal::Interrupt, StopSignal::Interrupt);
        assert_ne!(StopSignal::Interrupt, StopSignal::Terminate);
    }
}
