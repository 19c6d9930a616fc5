use crate::error::{BootstrapError, Layer};
use crate::registry::{self, Setting};
use crate::value::Value;

pub const ENV_PREFIX: &str = "EC";

/// `mod` -> `EC_MOD`.
pub fn var_name(canonical: &str) -> String {
  format!("{ENV_PREFIX}_{}", canonical.to_ascii_uppercase())
}

/// Reads one variable per registered setting through `lookup`.
///
/// Empty variables count as unset.
pub fn collect(
  lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<Vec<(&'static Setting, Value)>, BootstrapError> {
  let mut values = Vec::new();
  for setting in registry::settings() {
    let var = var_name(setting.name());
    let Some(raw) = lookup(&var).filter(|v| !v.is_empty()) else {
      continue;
    };
    let value = Value::parse(setting.kind, &raw).map_err(|reason| BootstrapError::InvalidValue {
      layer: Layer::Env,
      key: setting.name(),
      origin: var.clone(),
      value: raw.clone(),
      reason,
    })?;
    values.push((setting, value));
  }
  Ok(values)
}
