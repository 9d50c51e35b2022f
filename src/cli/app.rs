//! Record runner

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration as StdDuration, SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::application::ports::ConfigStore;
use crate::application::{Recorder, RecorderEvent};
use crate::domain::config::{AppConfig, RecorderConfig};
use crate::domain::encoding::{EncodedArtifact, Encoding};
use crate::domain::session::SessionState;
use crate::infrastructure::{BuiltinCodecs, CpalSource, XdgConfigStore};

use super::presenter::Presenter;
use super::signals::{StopSignal, StopSignalHandler};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// How often the recording display refreshes
const DISPLAY_TICK: StdDuration = StdDuration::from_millis(200);

/// Parsed record options
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub config: RecorderConfig,
    pub output: PathBuf,
}

/// Record from the default input device until stopped or timed out
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let source = match CpalSource::new() {
        Ok(source) => source,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };
    debug!(device = source.device_name(), "Using input device");

    let limit_ms = options.config.options.time_limit_or_default().as_millis();
    let mut recorder = match Recorder::configure(source, BuiltinCodecs, options.config) {
        Ok(recorder) => recorder,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let mut signals = match StopSignalHandler::new() {
        Ok(signals) => signals,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = recorder.start_recording() {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }
    presenter.start_spinner("Recording... (Ctrl+C to stop)");

    let mut ticker = tokio::time::interval(DISPLAY_TICK);
    loop {
        tokio::select! {
            event = recorder.next_event() => {
                let Some(event) = event else {
                    presenter.spinner_fail("Encoder stopped unexpectedly");
                    return ExitCode::from(EXIT_ERROR);
                };
                match event {
                    RecorderEvent::EncoderLoading(encoding) => debug!(%encoding, "Encoder loading"),
                    RecorderEvent::EncoderLoaded(encoding) => debug!(%encoding, "Encoder ready"),
                    RecorderEvent::Timeout => {
                        presenter.update_recording(limit_ms, limit_ms);
                        info!("Time limit reached");
                        if let Some(code) = stop_recording(&mut recorder, &mut presenter) {
                            return code;
                        }
                    }
                    RecorderEvent::EncodingProgress(percent) => presenter.update_encoding(percent),
                    RecorderEvent::Complete(artifact) => {
                        return write_artifact(&mut presenter, &options.output, &artifact).await;
                    }
                    RecorderEvent::EncodingCanceled => {
                        presenter.spinner_fail("Encoding canceled, nothing written");
                        return ExitCode::from(EXIT_ERROR);
                    }
                    RecorderEvent::EncodingFailed(message) => {
                        presenter.spinner_fail(&format!("Encoding failed: {}", message));
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            }
            Some(signal) = signals.recv() => {
                debug!(?signal, "Stop requested");
                match (recorder.state(), signal) {
                    (SessionState::Recording, StopSignal::Interrupt) => {
                        if let Some(code) = stop_recording(&mut recorder, &mut presenter) {
                            return code;
                        }
                    }
                    (SessionState::Recording, StopSignal::Terminate) => {
                        recorder.cancel_recording();
                        presenter.spinner_fail("Recording canceled, nothing written");
                        return ExitCode::from(EXIT_ERROR);
                    }
                    (SessionState::Finishing, _) => recorder.cancel_encoding(),
                    (SessionState::Idle, _) => {
                        presenter.stop_spinner();
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            }
            _ = ticker.tick() => {
                if let Some(elapsed) = recorder.elapsed() {
                    presenter.update_recording(elapsed.as_millis() as u64, limit_ms);
                }
            }
        }
    }
}

/// Finish the recording. Returns an exit code when nothing will be encoded.
fn stop_recording(
    recorder: &mut Recorder<CpalSource, BuiltinCodecs>,
    presenter: &mut Presenter,
) -> Option<ExitCode> {
    recorder.finish_recording();
    if recorder.state() == SessionState::Idle {
        presenter.spinner_success("Recording finished (encoding disabled, nothing written)");
        return Some(ExitCode::from(EXIT_SUCCESS));
    }
    presenter.update_encoding(0.0);
    None
}

async fn write_artifact(
    presenter: &mut Presenter,
    output: &Path,
    artifact: &EncodedArtifact,
) -> ExitCode {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            presenter.spinner_fail(&format!("Failed to create {}: {}", parent.display(), e));
            return ExitCode::from(EXIT_ERROR);
        }
    }

    match tokio::fs::write(output, artifact.data()).await {
        Ok(()) => {
            presenter.spinner_success(&format!(
                "Saved {} ({}, {})",
                output.display(),
                artifact.mime_type(),
                artifact.human_readable_size()
            ));
            presenter.output(&output.to_string_lossy());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail(&format!("Failed to write {}: {}", output.display(), e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Default output file: `<dir>/recording-<unix seconds>.<ext>`
pub fn default_output_path(dir: &Path, encoding: Encoding) -> PathBuf {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dir.join(format!("recording-{}.{}", timestamp, encoding.extension()))
}

/// Load and merge configuration from file and CLI
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: AppConfig) -> AppConfig {
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config file: {}", e);
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Load the merged configuration from the default store
pub async fn load_default_config(cli_config: AppConfig) -> AppConfig {
    load_merged_config(&XdgConfigStore::new(), cli_config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_uses_extension() {
        let path = default_output_path(Path::new("/tmp/takes"), Encoding::Flac);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("recording-"));
        assert!(name.ends_with(".flac"));
        assert_eq!(path.parent(), Some(Path::new("/tmp/takes")));
    }

    #[tokio::test]
    async fn cli_overrides_file_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        store
            .save(&AppConfig {
                encoding: Some("flac".to_string()),
                channels: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();

        let merged = load_merged_config(
            &store,
            AppConfig {
                channels: Some(4),
                ..Default::default()
            },
        )
        .await;
        assert_eq!(merged.encoding, Some("flac".to_string()));
        assert_eq!(merged.channels, Some(4));
        assert_eq!(merged.time_limit, Some("20m".to_string()));
    }
}
