//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::encoding::Encoding;
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    presenter.output(read_value(&config, key).as_deref().unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, read_value(&config, key).as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::invalid_option(
        key,
        format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    ))
}

/// Validate `value` for `key` and store it
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "time_limit" => {
            value
                .parse::<Duration>()
                .map_err(|e| ConfigError::invalid_option(key, e.to_string()))?;
            config.time_limit = Some(value.to_string());
        }
        "limit_removed" => config.limit_removed = Some(parse_bool(key, value)?),
        "encoding" => {
            let encoding: Encoding = value.parse()?;
            config.encoding = Some(encoding.to_string());
        }
        "channels" => {
            let channels: u16 = parse_number(key, value)?;
            if channels == 0 {
                return Err(ConfigError::InvalidChannelCount(channels));
            }
            config.channels = Some(channels);
        }
        "encode_after_record" => config.encode_after_record = Some(parse_bool(key, value)?),
        "progress_interval_ms" => config.progress_interval_ms = Some(parse_number(key, value)?),
        "buffer_size" => {
            let size: u32 = parse_number(key, value)?;
            if size == 0 {
                return Err(ConfigError::invalid_option(key, "must be at least one sample"));
            }
            config.buffer_size = Some(size);
        }
        "output_dir" => config.output_dir = Some(value.to_string()),
        _ => return check_key(key),
    }
    Ok(())
}

fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "time_limit" => config.time_limit.clone(),
        "limit_removed" => config.limit_removed.map(|b| b.to_string()),
        "encoding" => config.encoding.clone(),
        "channels" => config.channels.map(|n| n.to_string()),
        "encode_after_record" => config.encode_after_record.map(|b| b.to_string()),
        "progress_interval_ms" => config.progress_interval_ms.map(|n| n.to_string()),
        "buffer_size" => config.buffer_size.map(|n| n.to_string()),
        "output_dir" => config.output_dir.clone(),
        _ => None,
    }
}

/// Parse a boolean value
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::invalid_option(
            key,
            "Value must be 'true' or 'false'",
        )),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid_option(key, format!("'{}' is not a valid number", value)))
}
