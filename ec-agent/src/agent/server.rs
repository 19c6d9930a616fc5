use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;

use super::{ensure_readable, stop_requested, Agent, TICK};
use crate::modes::ServerConfig;

/// Exposes a local resource (host:port) to remote clients through the gateway.
pub struct ServerAgent {
  cfg: ServerConfig,
  ticks: AtomicU64,
}

impl ServerAgent {
  pub fn new(cfg: ServerConfig) -> Self {
    Self {
      cfg,
      ticks: AtomicU64::new(0),
    }
  }

  pub fn config(&self) -> &ServerConfig {
    &self.cfg
  }

  fn resource(&self) -> String {
    match &self.cfg.resource_host {
      Some(host) => format!("{host}:{}", self.cfg.resource_port),
      None => format!("<tls>:{}", self.cfg.resource_port),
    }
  }
}

impl Agent for ServerAgent {
  fn start(&self) -> anyhow::Result<()> {
    let common = &self.cfg.common;
    if let Some(crt) = &common.certificate {
      ensure_readable("certificate", crt)?;
    }
    tracing::info!(
      agent_id = common.agent_id.as_deref().unwrap_or("-"),
      gateway = common.gateway_url.as_ref().map(|u| u.as_str()).unwrap_or("-"),
      resource = %self.resource(),
      plugins = ?common.plugins,
      "server agent registered"
    );
    Ok(())
  }

  fn run_blocking(&self, stop: mpsc::Receiver<()>) -> anyhow::Result<()> {
    tracing::info!(resource = %self.resource(), "server operation loop started");
    while !stop_requested(&stop, TICK) {
      let n = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
      tracing::trace!(tick = n, "server heartbeat");
    }
    tracing::info!("server operation loop exiting");
    Ok(())
  }
}
