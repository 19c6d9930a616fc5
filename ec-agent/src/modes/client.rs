use super::{CommonConfig, Mode, Validator};
use crate::error::BootstrapError;
use crate::keys::Key;
use crate::resolved::ResolvedConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
  pub common: CommonConfig,
  pub target_id: String,
  pub listen_port: Option<u16>,
}

impl ClientConfig {
  pub fn from_resolved(cfg: &ResolvedConfig) -> Result<Self, BootstrapError> {
    let common = CommonConfig::from_resolved(Mode::Client, cfg)?;
    let v = Validator {
      mode: Mode::Client,
      cfg,
    };

    Ok(Self {
      target_id: v.require(Key::TargetServerId)?,
      listen_port: v.port(Key::ListenPort)?,
      common,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::modes::tests::config;

  #[test]
  fn target_id_is_enough() {
    let c = ClientConfig::from_resolved(&config(&[(Key::TargetServerId, "agent-7")])).unwrap();
    assert_eq!(c.target_id, "agent-7");
    assert_eq!(c.listen_port, None);
  }

  #[test]
  fn target_id_is_required() {
    let err = ClientConfig::from_resolved(&config(&[(Key::ListenPort, "7990")])).unwrap_err();
    assert!(matches!(
      err,
      BootstrapError::Validation { mode: Mode::Client, key: "tid", .. }
    ));
  }

  #[test]
  fn listen_port_must_be_numeric() {
    let err = ClientConfig::from_resolved(&config(&[
      (Key::TargetServerId, "agent-7"),
      (Key::ListenPort, "-1"),
    ]))
    .unwrap_err();
    assert!(matches!(err, BootstrapError::Validation { key: "lpt", .. }));
  }
}
