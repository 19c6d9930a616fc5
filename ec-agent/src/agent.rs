mod client;
mod gateway;
mod server;

pub use client::ClientAgent;
pub use gateway::GatewayAgent;
pub use server::ServerAgent;

use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;

/// Interval at which operation loops check for a stop signal.
pub const TICK: Duration = Duration::from_millis(500);

pub trait Agent: Send + Sync {
  /// Asynchronous startup and registration. Runs on its own thread,
  /// concurrently with [`Agent::run_blocking`].
  fn start(&self) -> anyhow::Result<()>;

  /// Operation loop. Returns once `stop` fires (or its sender goes away) or
  /// the agent hits an unrecoverable failure.
  fn run_blocking(&self, stop: mpsc::Receiver<()>) -> anyhow::Result<()>;
}

pub(crate) fn ensure_readable(what: &str, path: &Path) -> anyhow::Result<()> {
  let md = fs::metadata(path).with_context(|| format!("{what} {} is not readable", path.display()))?;
  if !md.is_file() {
    anyhow::bail!("{what} {} is not a regular file", path.display());
  }
  Ok(())
}

/// `true` when the loop should exit.
pub(crate) fn stop_requested(stop: &mpsc::Receiver<()>, tick: Duration) -> bool {
  match stop.recv_timeout(tick) {
    Ok(()) => true,
    Err(mpsc::RecvTimeoutError::Timeout) => false,
    Err(mpsc::RecvTimeoutError::Disconnected) => {
      tracing::debug!("stop channel closed");
      true
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn readable_files_pass() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("agent.pem");
    std::fs::write(&file, "---").unwrap();
    assert!(ensure_readable("certificate", &file).is_ok());

    let err = ensure_readable("certificate", &dir.path().join("missing.pem")).unwrap_err();
    assert!(err.to_string().contains("missing.pem"));

    let err = ensure_readable("certificate", dir.path()).unwrap_err();
    assert!(err.to_string().contains("not a regular file"));
  }

  #[test]
  fn stop_signal_and_disconnect_both_stop() {
    let (tx, rx) = mpsc::channel();
    assert!(!stop_requested(&rx, Duration::from_millis(1)));
    tx.send(()).unwrap();
    assert!(stop_requested(&rx, Duration::from_millis(1)));
    drop(tx);
    assert!(stop_requested(&rx, Duration::from_millis(1)));
  }
}
