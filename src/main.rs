//! audio-capture CLI entry point

use std::process::ExitCode;

use clap::Parser;

use audio_capture::cli::{
    app::{default_output_path, load_default_config, run_record, RecordOptions},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging::init_logging,
    presenter::Presenter,
    replay::{run_replay, ReplayOptions},
    EXIT_ERROR, EXIT_USAGE_ERROR,
};
use audio_capture::domain::config::AppConfig;
use audio_capture::domain::encoding::Encoding;
use audio_capture::domain::recording::Duration;
use audio_capture::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let presenter = Presenter::new();

    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Reject a bad --time-limit before any subcommand runs
    if let Some(ref limit) = cli.time_limit {
        if let Err(e) = limit.parse::<Duration>() {
            presenter.error(&format!("Invalid time limit: {}", e));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        time_limit: cli.time_limit.clone(),
        limit_removed: if cli.no_limit { Some(true) } else { None },
        encoding: cli.encoding.map(|e| Encoding::from(e).to_string()),
        channels: cli.channels,
        ..Default::default()
    };

    let config = load_default_config(cli_config).await;
    let encoding = match config.encoding() {
        Ok(encoding) => encoding,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    match cli.command {
        Some(Commands::Replay { file }) => {
            run_replay(ReplayOptions {
                input: file,
                encoding,
                output: cli.output,
            })
            .await
        }
        _ => {
            let recorder_config = match config.to_recorder_config() {
                Ok(c) => c,
                Err(e) => {
                    presenter.error(&e.to_string());
                    return ExitCode::from(EXIT_USAGE_ERROR);
                }
            };
            let output = cli
                .output
                .unwrap_or_else(|| default_output_path(&config.output_dir_or_default(), encoding));

            run_record(RecordOptions {
                config: recorder_config,
                output,
            })
            .await
        }
    }
}
