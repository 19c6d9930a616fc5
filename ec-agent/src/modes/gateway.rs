use std::path::PathBuf;

use super::{CommonConfig, Mode, Validator};
use crate::error::BootstrapError;
use crate::keys::Key;
use crate::resolved::ResolvedConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
  pub key: PathBuf,
  pub cert: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
  pub common: CommonConfig,
  pub zone: String,
  pub listen_port: Option<u16>,
  pub tls: Option<TlsFiles>,
  /// Explicit `hca`, else the listen port.
  pub health_check_port: Option<u16>,
}

impl GatewayConfig {
  pub fn from_resolved(cfg: &ResolvedConfig) -> Result<Self, BootstrapError> {
    let common = CommonConfig::from_resolved(Mode::Gateway, cfg)?;
    let v = Validator {
      mode: Mode::Gateway,
      cfg,
    };

    let zone = v.require(Key::Zone)?;
    let listen_port = v.port(Key::ListenPort)?;

    let tls = match (v.text(Key::TlsKey), v.text(Key::TlsCert)) {
      (Some(key), Some(cert)) => Some(TlsFiles {
        key: key.into(),
        cert: cert.into(),
      }),
      (None, None) => None,
      (Some(_), None) => {
        return Err(v.invalid(Key::TlsCert, "is required when `pky` is set".to_string()))
      }
      (None, Some(_)) => {
        return Err(v.invalid(Key::TlsKey, "is required when `pct` is set".to_string()))
      }
    };

    Ok(Self {
      health_check_port: common.health_check_port.or(listen_port),
      common,
      zone,
      listen_port,
      tls,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::modes::tests::config;

  #[test]
  fn zone_is_required() {
    let err = GatewayConfig::from_resolved(&config(&[(Key::ListenPort, "8989")])).unwrap_err();
    assert!(matches!(
      err,
      BootstrapError::Validation { mode: Mode::Gateway, key: "zon", .. }
    ));
  }

  #[test]
  fn health_check_follows_listen_port() {
    let g = GatewayConfig::from_resolved(&config(&[(Key::Zone, "z-1"), (Key::ListenPort, "8989")]))
      .unwrap();
    assert_eq!(g.health_check_port, Some(8989));

    let g = GatewayConfig::from_resolved(&config(&[
      (Key::Zone, "z-1"),
      (Key::ListenPort, "8989"),
      (Key::HealthCheckPort, "9000"),
    ]))
    .unwrap();
    assert_eq!(g.health_check_port, Some(9000));
  }

  #[test]
  fn tls_files_come_in_pairs() {
    let err = GatewayConfig::from_resolved(&config(&[(Key::Zone, "z-1"), (Key::TlsKey, "key.pem")]))
      .unwrap_err();
    assert!(matches!(err, BootstrapError::Validation { key: "pct", .. }));

    let g = GatewayConfig::from_resolved(&config(&[
      (Key::Zone, "z-1"),
      (Key::TlsKey, "key.pem"),
      (Key::TlsCert, "cert.pem"),
    ]))
    .unwrap();
    assert_eq!(g.tls.unwrap().cert, PathBuf::from("cert.pem"));
  }
}
