use std::sync::mpsc;

use super::{ensure_readable, stop_requested, Agent, TICK};
use crate::modes::ClientConfig;

/// Listens locally and tunnels connections to a target server agent.
pub struct ClientAgent {
  cfg: ClientConfig,
}

impl ClientAgent {
  pub fn new(cfg: ClientConfig) -> Self {
    Self { cfg }
  }

  pub fn config(&self) -> &ClientConfig {
    &self.cfg
  }
}

impl Agent for ClientAgent {
  fn start(&self) -> anyhow::Result<()> {
    let common = &self.cfg.common;
    if let Some(crt) = &common.certificate {
      ensure_readable("certificate", crt)?;
    }
    tracing::info!(
      target_id = %self.cfg.target_id,
      listen_port = ?self.cfg.listen_port,
      gateway = common.gateway_url.as_ref().map(|u| u.as_str()).unwrap_or("-"),
      "client agent registered"
    );
    Ok(())
  }

  fn run_blocking(&self, stop: mpsc::Receiver<()>) -> anyhow::Result<()> {
    tracing::info!(target_id = %self.cfg.target_id, "client operation loop started");
    loop {
      if stop_requested(&stop, TICK) {
        break;
      }
    }
    tracing::info!("client operation loop exiting");
    Ok(())
  }
}
