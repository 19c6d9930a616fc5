use std::sync::OnceLock;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

struct Installed {
  filter: reload::Handle<EnvFilter, Registry>,
  from_env: bool,
}

static INSTALLED: OnceLock<Installed> = OnceLock::new();

/// Installs the stderr subscriber once, before configuration is resolved.
/// The level comes from `RUST_LOG`, else `info` until [`set_debug`] runs.
pub fn init() -> anyhow::Result<()> {
  if INSTALLED.get().is_some() {
    return Ok(());
  }

  let (filter, from_env) = match EnvFilter::try_from_default_env() {
    Ok(filter) => (filter, true),
    Err(_) => (EnvFilter::new(default_level(false)), false),
  };
  let (filter, handle) = reload::Layer::new(filter);

  let stderr_layer = tracing_subscriber::fmt::layer()
    .with_ansi(false)
    .with_writer(std::io::stderr)
    .with_target(true);

  tracing_subscriber::registry()
    .with(filter)
    .with(stderr_layer)
    .try_init()
    .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))?;

  let _ = INSTALLED.set(Installed {
    filter: handle,
    from_env,
  });
  Ok(())
}

/// Applies the resolved `dbg` setting. An explicit `RUST_LOG` still wins.
pub fn set_debug(debug: bool) -> anyhow::Result<()> {
  let Some(installed) = INSTALLED.get() else {
    return Ok(());
  };
  if !debug || installed.from_env {
    return Ok(());
  }
  installed
    .filter
    .reload(EnvFilter::new(default_level(true)))
    .context("raise log level to debug")
}

pub fn default_level(debug: bool) -> &'static str {
  if debug {
    "debug"
  } else {
    "info"
  }
}
