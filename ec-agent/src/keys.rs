//! Short keys used inside the resolved configuration and the canonical
//! setting names they stand for.
//!
//! The table is fixed for compatibility with existing agent deployments.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
  Mode,
  Version,
  ListenPort,
  TargetServerId,
  GatewayHost,
  ServiceHost,
  Signing,
  ResourceHost,
  ResourcePort,
  AgentId,
  Token,
  Proxy,
  ClientId,
  ClientSecret,
  OAuth2Url,
  RefreshDuration,
  Certificate,
  AllowList,
  BlockList,
  Plugins,
  Info,
  Debug,
  Verify,
  Zone,
  TlsKey,
  TlsCert,
  HealthCheckPort,
  GenerateCertRequest,
}

static ALIASES: [(Key, &str, &str); 28] = [
  (Key::Mode, "_md", "mod"),
  (Key::Version, "_v", "ver"),
  (Key::ListenPort, "_lp", "lpt"),
  (Key::TargetServerId, "_ts", "tid"),
  (Key::GatewayHost, "_gh", "hst"),
  (Key::ServiceHost, "_sh", "sst"),
  (Key::Signing, "_sg", "sgn"),
  (Key::ResourceHost, "_rh", "rht"),
  (Key::ResourcePort, "_rp", "rpt"),
  (Key::AgentId, "_id", "aid"),
  (Key::Token, "_tk", "tkn"),
  (Key::Proxy, "_px", "pxy"),
  (Key::ClientId, "_ci", "cid"),
  (Key::ClientSecret, "_cs", "csc"),
  (Key::OAuth2Url, "_oa", "oa2"),
  (Key::RefreshDuration, "_du", "dur"),
  (Key::Certificate, "_ct", "crt"),
  (Key::AllowList, "_wl", "wtl"),
  (Key::BlockList, "_bl", "bkl"),
  (Key::Plugins, "_pg", "plg"),
  (Key::Info, "_if", "inf"),
  (Key::Debug, "_dg", "dbg"),
  (Key::Verify, "_vf", "vfy"),
  (Key::Zone, "_zn", "zon"),
  (Key::TlsKey, "_pk", "pky"),
  (Key::TlsCert, "_pc", "pct"),
  (Key::HealthCheckPort, "_hc", "hca"),
  (Key::GenerateCertRequest, "_gc", "gen"),
];

impl Key {
  pub fn all() -> impl Iterator<Item = Key> {
    ALIASES.iter().map(|(k, _, _)| *k)
  }

  pub fn short(self) -> &'static str {
    self.alias().1
  }

  pub fn canonical(self) -> &'static str {
    self.alias().2
  }

  pub fn from_short(short: &str) -> Option<Key> {
    ALIASES.iter().find(|(_, s, _)| *s == short).map(|(k, _, _)| *k)
  }

  pub fn from_canonical(name: &str) -> Option<Key> {
    ALIASES.iter().find(|(_, _, c)| *c == name).map(|(k, _, _)| *k)
  }

  /// Values for these keys never appear in logs.
  pub fn is_secret(self) -> bool {
    matches!(self, Key::Token | Key::ClientSecret)
  }

  fn alias(self) -> &'static (Key, &'static str, &'static str) {
    // Table order mirrors declaration order.
    &ALIASES[self as usize]
  }
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.short())
  }
}

pub fn to_canonical(short: &str) -> Option<&'static str> {
  Key::from_short(short).map(Key::canonical)
}

pub fn to_short(canonical: &str) -> Option<&'static str> {
  Key::from_canonical(canonical).map(Key::short)
}
