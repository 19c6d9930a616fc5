use std::fmt;
use std::path::PathBuf;

use crate::modes::Mode;

/// Configuration source, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
  File,
  Env,
  Flag,
}

impl fmt::Display for Layer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Layer::File => "config file",
      Layer::Env => "environment",
      Layer::Flag => "command line",
    })
  }
}

/// Everything that stops the agent before its operation loop runs.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
  #[error("config file {}: {reason}", path.display())]
  ConfigFile { path: PathBuf, reason: String },

  #[error("{layer}: invalid value {value:?} for `{key}` (from {origin}): {reason}")]
  InvalidValue {
    layer: Layer,
    key: &'static str,
    origin: String,
    value: String,
    reason: String,
  },

  #[error("command line: {0}")]
  Flags(#[from] clap::Error),

  #[error("{}", unknown_mode_message(.value.as_deref()))]
  UnknownMode { value: Option<String> },

  #[error("{mode} mode: `{key}` {reason}")]
  Validation {
    mode: Mode,
    key: &'static str,
    reason: String,
  },

  #[error(transparent)]
  Startup(#[from] StartupFailure),
}

/// The agent's asynchronous startup returned an error or panicked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{mode} agent startup failed: {reason}")]
pub struct StartupFailure {
  pub mode: Mode,
  pub reason: String,
}

fn unknown_mode_message(value: Option<&str>) -> String {
  match value {
    Some(v) => format!("unknown agent mode {v:?}; expected client, server or gateway"),
    None => "no agent mode specified; set --mod, EC_MOD or `mod` in the config file".to_string(),
  }
}
