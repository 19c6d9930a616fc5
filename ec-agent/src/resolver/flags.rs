use std::ffi::OsString;

use clap::parser::ValueSource;

use crate::error::{BootstrapError, Layer};
use crate::registry::{self, Setting};
use crate::value::Value;

/// Parses process arguments (including argv[0]) against the registry.
pub fn collect<I, T>(args: I) -> Result<Vec<(&'static Setting, Value)>, BootstrapError>
where
  I: IntoIterator<Item = T>,
  T: Into<OsString> + Clone,
{
  let matches = registry::command().try_get_matches_from(args)?;

  let mut values = Vec::new();
  for setting in registry::settings() {
    if matches.value_source(setting.name()) != Some(ValueSource::CommandLine) {
      continue;
    }
    let Some(raw) = matches.get_one::<String>(setting.name()) else {
      continue;
    };
    let value = Value::parse(setting.kind, raw).map_err(|reason| BootstrapError::InvalidValue {
      layer: Layer::Flag,
      key: setting.name(),
      origin: format!("--{}", setting.name()),
      value: raw.clone(),
      reason,
    })?;
    values.push((setting, value));
  }
  Ok(values)
}
