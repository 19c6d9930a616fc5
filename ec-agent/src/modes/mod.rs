mod client;
mod gateway;
mod server;

pub use client::ClientConfig;
pub use gateway::{GatewayConfig, TlsFiles};
pub use server::ServerConfig;

use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ipnet::IpNet;
use url::Url;

use crate::error::BootstrapError;
use crate::keys::Key;
use crate::registry;
use crate::resolved::ResolvedConfig;

/// A refresh interval of zero means "effectively never".
pub const NEVER_REFRESH: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

pub const TLS_PLUGIN: &str = "tls";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
  Client,
  Server,
  Gateway,
}

impl Mode {
  pub fn as_str(self) -> &'static str {
    match self {
      Mode::Client => "client",
      Mode::Server => "server",
      Mode::Gateway => "gateway",
    }
  }
}

impl fmt::Display for Mode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Mode {
  type Err = BootstrapError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "client" => Ok(Mode::Client),
      "server" => Ok(Mode::Server),
      "gateway" => Ok(Mode::Gateway),
      other => Err(BootstrapError::UnknownMode {
        value: Some(other.to_string()),
      }),
    }
  }
}

impl Mode {
  /// Reads `_md`; absent or unrecognized is an error.
  pub fn from_config(cfg: &ResolvedConfig) -> Result<Mode, BootstrapError> {
    match cfg.get(Key::Mode) {
      None => Err(BootstrapError::UnknownMode { value: None }),
      Some(v) => match v.as_str() {
        Some(s) if s.is_empty() => Err(BootstrapError::UnknownMode { value: None }),
        Some(s) => s.parse(),
        None => Err(BootstrapError::UnknownMode {
          value: Some(v.to_string()),
        }),
      },
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2Refresh {
  pub client_id: String,
  pub client_secret: String,
  pub provisioner: Url,
  pub interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
  None,
  Token(String),
  /// Takes over from any static token.
  OAuth2(OAuth2Refresh),
}

/// One-shot operator requests carried alongside the mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requests {
  pub version: bool,
  pub info: bool,
  pub signing: bool,
  pub verify: bool,
  pub generate_cert: bool,
}

/// Settings every mode understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonConfig {
  pub mode: Mode,
  pub agent_id: Option<String>,
  pub gateway_url: Option<Url>,
  pub service_url: Option<Url>,
  pub proxy: Option<Url>,
  pub credentials: Credentials,
  pub certificate: Option<PathBuf>,
  pub plugins: Vec<String>,
  pub allow_list: Vec<IpNet>,
  pub block_list: Vec<IpAddr>,
  pub health_check_port: Option<u16>,
  pub debug: bool,
  pub requests: Requests,
}

impl CommonConfig {
  pub fn from_resolved(mode: Mode, cfg: &ResolvedConfig) -> Result<Self, BootstrapError> {
    let v = Validator { mode, cfg };

    let allow_list = split_list(&v.text_or_default(Key::AllowList))
      .map(|s| {
        s.parse::<IpNet>()
          .map_err(|e| v.invalid(Key::AllowList, format!("entry {s:?} is not a CIDR network: {e}")))
      })
      .collect::<Result<Vec<_>, _>>()?;

    let block_list = split_list(cfg.str(Key::BlockList).unwrap_or_default())
      .map(|s| {
        s.parse::<IpAddr>()
          .map_err(|e| v.invalid(Key::BlockList, format!("entry {s:?} is not an IP address: {e}")))
      })
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Self {
      mode,
      agent_id: v.text(Key::AgentId),
      gateway_url: v.url(Key::GatewayHost)?,
      service_url: v.url(Key::ServiceHost)?,
      proxy: v.url(Key::Proxy)?,
      credentials: credentials(&v)?,
      certificate: v.text(Key::Certificate).map(PathBuf::from),
      plugins: split_list(cfg.str(Key::Plugins).unwrap_or_default())
        .map(str::to_string)
        .collect(),
      allow_list,
      block_list,
      health_check_port: v.port(Key::HealthCheckPort)?,
      debug: cfg.flag(Key::Debug),
      requests: Requests {
        version: cfg.flag(Key::Version),
        info: cfg.flag(Key::Info),
        signing: cfg.flag(Key::Signing),
        verify: cfg.flag(Key::Verify),
        generate_cert: cfg.flag(Key::GenerateCertRequest),
      },
    })
  }

  pub fn has_plugin(&self, name: &str) -> bool {
    self.plugins.iter().any(|p| p.eq_ignore_ascii_case(name))
  }
}

fn credentials(v: &Validator<'_>) -> Result<Credentials, BootstrapError> {
  let client_id = v.text(Key::ClientId);
  let client_secret = v.text(Key::ClientSecret);
  let provisioner = v.url(Key::OAuth2Url)?;

  match (client_id, client_secret, provisioner) {
    (Some(client_id), Some(client_secret), Some(provisioner)) => {
      let interval = match v.cfg.duration(Key::RefreshDuration) {
        Some(d) if !d.is_zero() => d,
        _ => NEVER_REFRESH,
      };
      Ok(Credentials::OAuth2(OAuth2Refresh {
        client_id,
        client_secret,
        provisioner,
        interval,
      }))
    }
    (None, None, None) => Ok(match v.text(Key::Token) {
      Some(token) => Credentials::Token(token),
      None => Credentials::None,
    }),
    (client_id, client_secret, _) => {
      let missing = if client_id.is_none() {
        Key::ClientId
      } else if client_secret.is_none() {
        Key::ClientSecret
      } else {
        Key::OAuth2Url
      };
      Err(v.invalid(
        missing,
        "is required when any of `cid`, `csc`, `oa2` is set".to_string(),
      ))
    }
  }
}

/// Typed reads of a resolved config on behalf of one mode.
pub(crate) struct Validator<'a> {
  pub mode: Mode,
  pub cfg: &'a ResolvedConfig,
}

impl Validator<'_> {
  pub fn invalid(&self, key: Key, reason: String) -> BootstrapError {
    BootstrapError::Validation {
      mode: self.mode,
      key: key.canonical(),
      reason,
    }
  }

  pub fn text(&self, key: Key) -> Option<String> {
    self.cfg.str(key).map(|s| s.trim().to_string())
  }

  pub fn require(&self, key: Key) -> Result<String, BootstrapError> {
    self
      .text(key)
      .ok_or_else(|| self.invalid(key, "is required".to_string()))
  }

  /// Falls back to the registry default when unset.
  pub fn text_or_default(&self, key: Key) -> String {
    self
      .text(key)
      .unwrap_or_else(|| registry::for_key(key).default.to_string())
  }

  pub fn url(&self, key: Key) -> Result<Option<Url>, BootstrapError> {
    self
      .text(key)
      .map(|raw| {
        Url::parse(&raw).map_err(|e| self.invalid(key, format!("{raw:?} is not a valid URL: {e}")))
      })
      .transpose()
  }

  pub fn port(&self, key: Key) -> Result<Option<u16>, BootstrapError> {
    self.text(key).map(|raw| self.parse_port(key, &raw)).transpose()
  }

  pub fn port_or_default(&self, key: Key) -> Result<u16, BootstrapError> {
    let raw = self.text_or_default(key);
    self.parse_port(key, &raw)
  }

  fn parse_port(&self, key: Key, raw: &str) -> Result<u16, BootstrapError> {
    raw
      .parse::<u16>()
      .map_err(|_| self.invalid(key, format!("must be a port number (0-65535), got {raw:?}")))
  }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
  raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}
