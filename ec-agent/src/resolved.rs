use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::error::Layer;
use crate::keys::Key;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  pub value: Value,
  pub layer: Layer,
}

/// Settings explicitly provided by some layer, keyed by short key.
///
/// Registry defaults never appear here. Built once by the resolver and only
/// read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
  entries: BTreeMap<Key, Entry>,
}

impl ResolvedConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, key: Key, value: Value, layer: Layer) {
    self.entries.insert(key, Entry { value, layer });
  }

  pub fn get(&self, key: Key) -> Option<&Value> {
    self.entries.get(&key).map(|e| &e.value)
  }

  pub fn get_short(&self, short: &str) -> Option<&Value> {
    Key::from_short(short).and_then(|k| self.get(k))
  }

  pub fn layer(&self, key: Key) -> Option<Layer> {
    self.entries.get(&key).map(|e| e.layer)
  }

  pub fn contains(&self, key: Key) -> bool {
    self.entries.contains_key(&key)
  }

  /// String value; empty strings count as unset.
  pub fn str(&self, key: Key) -> Option<&str> {
    self.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
  }

  pub fn flag(&self, key: Key) -> bool {
    self.get(key).and_then(Value::as_bool).unwrap_or(false)
  }

  pub fn int(&self, key: Key) -> Option<i64> {
    self.get(key).and_then(Value::as_int)
  }

  pub fn duration(&self, key: Key) -> Option<Duration> {
    self.get(key).and_then(Value::as_duration)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (Key, &Entry)> {
    self.entries.iter().map(|(k, e)| (*k, e))
  }

  /// Log-safe rendering, secrets masked.
  pub fn redacted(&self) -> Redacted<'_> {
    Redacted(self)
  }
}

pub struct Redacted<'a>(&'a ResolvedConfig);

impl fmt::Display for Redacted<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("{")?;
    for (i, (key, entry)) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      if key.is_secret() {
        write!(f, "{key}: <redacted>")?;
      } else {
        write!(f, "{key}: {:?}", entry.value.to_string())?;
      }
    }
    f.write_str("}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> ResolvedConfig {
    let mut cfg = ResolvedConfig::new();
    cfg.insert(Key::Mode, Value::Str("client".into()), Layer::Flag);
    cfg.insert(Key::Token, Value::Str("s3cret".into()), Layer::Env);
    cfg.insert(Key::Debug, Value::Bool(true), Layer::File);
    cfg.insert(Key::Zone, Value::Str("  ".into()), Layer::File);
    cfg
  }

  #[test]
  fn typed_lookups() {
    let cfg = sample();
    assert_eq!(cfg.str(Key::Mode), Some("client"));
    assert_eq!(cfg.get_short("_md"), Some(&Value::Str("client".into())));
    assert!(cfg.flag(Key::Debug));
    assert!(!cfg.flag(Key::Verify));
    // Wrong kind reads as absent rather than panicking.
    assert_eq!(cfg.str(Key::Debug), None);
    assert_eq!(cfg.str(Key::Zone), None);
    assert!(cfg.contains(Key::Zone));
    assert_eq!(cfg.layer(Key::Token), Some(Layer::Env));
    assert_eq!(cfg.get_short("_nope"), None);
  }

  #[test]
  fn int_and_duration_lookups() {
    let mut cfg = sample();
    cfg.insert(Key::ResourcePort, Value::Int(5432), Layer::Flag);
    cfg.insert(Key::RefreshDuration, Value::Duration(Duration::from_secs(60)), Layer::Env);
    assert_eq!(cfg.int(Key::ResourcePort), Some(5432));
    assert_eq!(cfg.int(Key::Mode), None);
    assert_eq!(cfg.int(Key::ListenPort), None);
    assert_eq!(cfg.duration(Key::RefreshDuration), Some(Duration::from_secs(60)));
    assert_eq!(cfg.duration(Key::Debug), None);
  }

  #[test]
  fn redacted_hides_secrets() {
    let out = sample().redacted().to_string();
    assert!(out.contains("_md: \"client\""));
    assert!(out.contains("_tk: <redacted>"));
    assert!(!out.contains("s3cret"));
  }
}
