use std::fmt;
use std::sync::Arc;

use crate::agent::{Agent, ClientAgent, GatewayAgent, ServerAgent};
use crate::error::BootstrapError;
use crate::modes::{ClientConfig, GatewayConfig, Mode, ServerConfig};
use crate::resolved::ResolvedConfig;

/// The one agent this process runs.
#[derive(Clone)]
pub struct AgentHandle {
  mode: Mode,
  agent: Arc<dyn Agent>,
}

impl AgentHandle {
  pub fn new(mode: Mode, agent: Arc<dyn Agent>) -> Self {
    Self { mode, agent }
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  pub fn agent(&self) -> &Arc<dyn Agent> {
    &self.agent
  }
}

impl fmt::Debug for AgentHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AgentHandle").field("mode", &self.mode).finish_non_exhaustive()
  }
}

/// Builds the concrete variant for a validated mode config.
pub trait AgentFactory {
  fn server(&self, cfg: ServerConfig) -> Arc<dyn Agent>;
  fn client(&self, cfg: ClientConfig) -> Arc<dyn Agent>;
  fn gateway(&self, cfg: GatewayConfig) -> Arc<dyn Agent>;
}

pub struct Variants;

impl AgentFactory for Variants {
  fn server(&self, cfg: ServerConfig) -> Arc<dyn Agent> {
    Arc::new(ServerAgent::new(cfg))
  }

  fn client(&self, cfg: ClientConfig) -> Arc<dyn Agent> {
    Arc::new(ClientAgent::new(cfg))
  }

  fn gateway(&self, cfg: GatewayConfig) -> Arc<dyn Agent> {
    Arc::new(GatewayAgent::new(cfg))
  }
}

pub fn dispatch(cfg: &ResolvedConfig) -> Result<AgentHandle, BootstrapError> {
  dispatch_with(cfg, &Variants)
}

/// Validates the mode's settings, then constructs exactly one agent.
pub fn dispatch_with(
  cfg: &ResolvedConfig,
  factory: &dyn AgentFactory,
) -> Result<AgentHandle, BootstrapError> {
  let mode = Mode::from_config(cfg)?;

  let agent = match mode {
    Mode::Server => factory.server(ServerConfig::from_resolved(cfg)?),
    Mode::Client => factory.client(ClientConfig::from_resolved(cfg)?),
    Mode::Gateway => factory.gateway(GatewayConfig::from_resolved(cfg)?),
  };

  tracing::info!(%mode, "agent constructed");
  Ok(AgentHandle::new(mode, agent))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::keys::Key;
  use crate::modes::tests::config;
  use std::sync::{mpsc, Mutex};

  struct Idle;

  impl Agent for Idle {
    fn start(&self) -> anyhow::Result<()> {
      Ok(())
    }

    fn run_blocking(&self, _stop: mpsc::Receiver<()>) -> anyhow::Result<()> {
      Ok(())
    }
  }

  #[derive(Default)]
  struct Recording {
    built: Mutex<Vec<String>>,
  }

  impl AgentFactory for Recording {
    fn server(&self, cfg: ServerConfig) -> Arc<dyn Agent> {
      self.built.lock().unwrap().push(format!("server:{}", cfg.resource_port));
      Arc::new(Idle)
    }

    fn client(&self, cfg: ClientConfig) -> Arc<dyn Agent> {
      self.built.lock().unwrap().push(format!("client:{}", cfg.target_id));
      Arc::new(Idle)
    }

    fn gateway(&self, cfg: GatewayConfig) -> Arc<dyn Agent> {
      self.built.lock().unwrap().push(format!("gateway:{}", cfg.zone));
      Arc::new(Idle)
    }
  }

  impl Recording {
    fn built(&self) -> Vec<String> {
      self.built.lock().unwrap().clone()
    }
  }

  #[test]
  fn absent_or_unknown_mode_constructs_nothing() {
    for pairs in [vec![], vec![(Key::Mode, "relay")], vec![(Key::Mode, "CLIENT")]] {
      let factory = Recording::default();
      let err = dispatch_with(&config(&pairs), &factory).unwrap_err();
      assert!(matches!(err, BootstrapError::UnknownMode { .. }), "{err}");
      assert!(factory.built().is_empty());
    }
  }

  #[test]
  fn client_scenario() {
    let factory = Recording::default();
    let handle = dispatch_with(
      &config(&[(Key::Mode, "client"), (Key::TargetServerId, "agent-7")]),
      &factory,
    )
    .unwrap();
    assert_eq!(handle.mode(), Mode::Client);
    assert_eq!(factory.built(), vec!["client:agent-7".to_string()]);
  }

  #[test]
  fn server_uses_default_port() {
    let factory = Recording::default();
    dispatch_with(
      &config(&[(Key::Mode, "server"), (Key::ResourceHost, "localhost")]),
      &factory,
    )
    .unwrap();
    assert_eq!(factory.built(), vec!["server:0".to_string()]);
  }

  #[test]
  fn server_missing_field_is_a_validation_error() {
    let factory = Recording::default();
    let err = dispatch_with(&config(&[(Key::Mode, "server")]), &factory).unwrap_err();
    assert!(matches!(err, BootstrapError::Validation { key: "rht", .. }), "{err}");
    assert!(factory.built().is_empty());
  }

  #[test]
  fn gateway_dispatch() {
    let factory = Recording::default();
    let handle = dispatch_with(&config(&[(Key::Mode, "gateway"), (Key::Zone, "zone-9")]), &factory)
      .unwrap();
    assert_eq!(handle.mode(), Mode::Gateway);
    assert_eq!(factory.built(), vec!["gateway:zone-9".to_string()]);
  }

  #[test]
  fn real_variants_are_built() {
    let handle = dispatch(&config(&[(Key::Mode, "client"), (Key::TargetServerId, "t")])).unwrap();
    assert_eq!(format!("{handle:?}"), "AgentHandle { mode: Client, .. }");
  }
}
