pub mod agent;
pub mod dispatch;
pub mod error;
pub mod keys;
pub mod lifecycle;
pub mod logging;
pub mod modes;
pub mod paths;
pub mod registry;
pub mod resolved;
pub mod resolver;
pub mod value;

use std::sync::mpsc;

use anyhow::Context;

use crate::keys::Key;
use crate::resolver::Sources;

/// Resolve, dispatch, run. Returns only when the operation loop stops or
/// bootstrap fails.
pub fn run(sources: Sources) -> anyhow::Result<()> {
  logging::init()?;
  let resolved = resolver::resolve(&sources).context("resolve configuration")?;

  logging::set_debug(resolved.flag(Key::Debug))?;
  tracing::debug!(config = %resolved.redacted(), "configuration resolved");

  let handle = dispatch::dispatch(&resolved).context("dispatch agent")?;

  tracing::info!(mode = %handle.mode(), version = env!("CARGO_PKG_VERSION"), "starting EC agent");
  let (stop_tx, stop_rx) = mpsc::channel::<()>();
  ctrlc::set_handler(move || {
    let _ = stop_tx.send(());
  })?;

  lifecycle::run(handle, stop_rx, lifecycle::exit_on_failure)?;
  tracing::info!("agent stopped");
  Ok(())
}
