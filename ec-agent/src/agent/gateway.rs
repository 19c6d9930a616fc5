use std::sync::mpsc;

use super::{ensure_readable, stop_requested, Agent, TICK};
use crate::modes::GatewayConfig;

/// Relays sessions between client and server agents for one zone.
pub struct GatewayAgent {
  cfg: GatewayConfig,
}

impl GatewayAgent {
  pub fn new(cfg: GatewayConfig) -> Self {
    Self { cfg }
  }

  pub fn config(&self) -> &GatewayConfig {
    &self.cfg
  }
}

impl Agent for GatewayAgent {
  fn start(&self) -> anyhow::Result<()> {
    if let Some(tls) = &self.cfg.tls {
      ensure_readable("TLS key", &tls.key)?;
      ensure_readable("TLS cert", &tls.cert)?;
    }
    if let Some(crt) = &self.cfg.common.certificate {
      ensure_readable("certificate", crt)?;
    }
    tracing::info!(
      zone = %self.cfg.zone,
      listen_port = ?self.cfg.listen_port,
      health_check_port = ?self.cfg.health_check_port,
      tls = self.cfg.tls.is_some(),
      "gateway registered"
    );
    Ok(())
  }

  fn run_blocking(&self, stop: mpsc::Receiver<()>) -> anyhow::Result<()> {
    tracing::info!(zone = %self.cfg.zone, "gateway operation loop started");
    while !stop_requested(&stop, TICK) {}
    tracing::info!(zone = %self.cfg.zone, "gateway operation loop exiting");
    Ok(())
  }
}
