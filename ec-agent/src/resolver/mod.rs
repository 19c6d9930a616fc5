pub mod env;
pub mod file;
pub mod flags;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{BootstrapError, Layer};
use crate::keys::Key;
use crate::paths;
use crate::registry::{self, Setting};
use crate::resolved::ResolvedConfig;
use crate::value::Value;

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Where the three layers come from.
pub struct Sources {
  pub config_dir: PathBuf,
  pub env: EnvLookup,
  pub args: Vec<OsString>,
}

impl Sources {
  pub fn from_process() -> Self {
    Self {
      config_dir: paths::search_dir(),
      env: Box::new(|name: &str| std::env::var(name).ok()),
      args: std::env::args_os().collect(),
    }
  }
}

/// Per-name winning value and the layer that supplied it.
#[derive(Debug, Default)]
pub struct Layers {
  set: BTreeMap<&'static str, (Value, Layer)>,
  config_file: Option<PathBuf>,
}

impl Layers {
  fn apply(&mut self, layer: Layer, values: Vec<(&'static Setting, Value)>) {
    for (setting, value) in values {
      if let Some((_, prev)) = self.set.get(setting.name()) {
        tracing::trace!(key = setting.name(), from = %prev, to = %layer, "setting overridden");
      }
      self.set.insert(setting.name(), (value, layer));
    }
  }

  pub fn is_set(&self, name: &str) -> bool {
    self.set.contains_key(name)
  }

  /// Winning value, falling back to the registry default.
  pub fn effective(&self, name: &str) -> Option<Value> {
    match self.set.get(name) {
      Some((v, _)) => Some(v.clone()),
      None => registry::lookup(name).map(Setting::default_value),
    }
  }

  fn config_file(&self) -> Option<&PathBuf> {
    self.config_file.as_ref()
  }

  /// Keeps only names the key translator knows, under their short keys.
  pub fn into_resolved(self) -> ResolvedConfig {
    let mut out = ResolvedConfig::new();
    for (name, (value, layer)) in self.set {
      if let Some(key) = Key::from_canonical(name) {
        out.insert(key, value, layer);
      }
    }
    out
  }
}

/// Applies the config file, then `EC_*` variables, then flags. The highest
/// layer that sets a name wins outright; registry defaults never become
/// entries. A malformed config file aborts before the environment or the
/// command line is looked at.
pub fn merge(sources: &Sources) -> Result<Layers, BootstrapError> {
  let mut layers = Layers::default();

  if let Some(loaded) = file::load(&sources.config_dir)? {
    layers.config_file = Some(loaded.path);
    layers.apply(Layer::File, loaded.values);
  }

  layers.apply(Layer::Env, env::collect(sources.env.as_ref())?);
  layers.apply(Layer::Flag, flags::collect(sources.args.iter().cloned())?);

  Ok(layers)
}

pub fn resolve(sources: &Sources) -> Result<ResolvedConfig, BootstrapError> {
  let layers = merge(sources)?;
  if let Some(path) = layers.config_file() {
    tracing::debug!(path = %path.display(), "config file applied");
  }
  Ok(layers.into_resolved())
}
