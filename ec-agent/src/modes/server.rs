use super::{CommonConfig, Mode, Validator, TLS_PLUGIN};
use crate::error::BootstrapError;
use crate::keys::Key;
use crate::resolved::ResolvedConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub common: CommonConfig,
  /// `None` when the TLS plugin owns the upstream connection.
  pub resource_host: Option<String>,
  pub resource_port: u16,
}

impl ServerConfig {
  pub fn from_resolved(cfg: &ResolvedConfig) -> Result<Self, BootstrapError> {
    let common = CommonConfig::from_resolved(Mode::Server, cfg)?;
    let v = Validator {
      mode: Mode::Server,
      cfg,
    };

    let resource_port = v.port_or_default(Key::ResourcePort)?;
    let resource_host = if common.has_plugin(TLS_PLUGIN) {
      if let Some(host) = v.text(Key::ResourceHost) {
        tracing::warn!(%host, "resource host discarded: the tls plugin is enabled");
      }
      None
    } else {
      Some(v.require(Key::ResourceHost)?)
    };

    Ok(Self {
      common,
      resource_host,
      resource_port,
    })
  }
}
