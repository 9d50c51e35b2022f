//! Replay runner
//!
//! Feeds JSON-lines worker commands from a file into an encoder worker and
//! prints every event it emits as one JSON line.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};

use crate::application::ports::CodecProvider;
use crate::application::{WorkerCommand, WorkerEvent, WorkerHandle};
use crate::domain::encoding::Encoding;
use crate::infrastructure::BuiltinCodecs;

use super::app::{EXIT_ERROR, EXIT_SUCCESS};
use super::presenter::Presenter;

/// Parsed replay options
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Command file, `-` for stdin
    pub input: PathBuf,
    pub encoding: Encoding,
    /// Where to write the artifact of `complete`
    pub output: Option<PathBuf>,
}

/// Replay a command file
pub async fn run_replay(options: ReplayOptions) -> ExitCode {
    let presenter = Presenter::new();

    let result = if options.input == Path::new("-") {
        replay(tokio::io::stdin(), &options, &presenter).await
    } else {
        match tokio::fs::File::open(&options.input).await {
            Ok(file) => replay(file, &options, &presenter).await,
            Err(e) => Err(format!("Failed to open {}: {}", options.input.display(), e)),
        }
    };

    match result {
        Ok(code) => code,
        Err(message) => {
            presenter.error(&message);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn replay<R>(input: R, options: &ReplayOptions, presenter: &Presenter) -> Result<ExitCode, String>
where
    R: AsyncRead + Unpin,
{
    let mut worker = WorkerHandle::spawn(BuiltinCodecs.codec(options.encoding));

    let mut lines = BufReader::new(input).lines();
    let mut line_no = 0usize;
    let mut skipped = 0usize;
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| format!("Failed to read commands: {}", e))?
    {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        match WorkerCommand::from_json(&line) {
            Ok(command) => {
                debug!(line = line_no, command = command.tag(), "Replaying command");
                worker.send(command);
            }
            Err(e) => {
                warn!(line = line_no, "Skipping command: {}", e);
                skipped += 1;
            }
        }
    }
    worker.close();

    let mut failed = false;
    let mut completed = false;
    while let Some(event) = worker.next_event().await {
        let json = event.to_json().map_err(|e| e.to_string())?;
        presenter.output(&json);

        match event {
            WorkerEvent::Complete { blob } => {
                completed = true;
                if let Some(path) = &options.output {
                    tokio::fs::write(path, blob.data())
                        .await
                        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
                    presenter.success(&format!(
                        "Saved {} ({})",
                        path.display(),
                        blob.human_readable_size()
                    ));
                }
            }
            WorkerEvent::Failed { .. } => failed = true,
            _ => {}
        }
    }

    if skipped > 0 {
        presenter.warn(&format!("Skipped {} malformed command(s)", skipped));
    }
    if options.output.is_some() && !completed {
        presenter.warn("No recording was completed, nothing written");
    }

    Ok(ExitCode::from(if failed { EXIT_ERROR } else { EXIT_SUCCESS }))
}
