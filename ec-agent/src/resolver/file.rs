use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::BootstrapError;
use crate::paths;
use crate::registry::{self, Setting};
use crate::value::{parse_bool, Kind, Value};

/// Top-level document: canonical setting name to scalar. Shared by the YAML
/// and TOML readers.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
struct ConfigFile {
  entries: BTreeMap<String, FileValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileValue {
  Null(()),
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
  List(Vec<FileValue>),
  Other(serde::de::IgnoredAny),
}

#[derive(Debug)]
pub struct FileLayer {
  pub path: PathBuf,
  pub values: Vec<(&'static Setting, Value)>,
}

/// Reads the first `config.*` found in `dir`. No file is not an error.
pub fn load(dir: &Path) -> Result<Option<FileLayer>, BootstrapError> {
  let Some(path) = paths::find_config_file(dir) else {
    tracing::debug!(dir = %dir.display(), "no config file found");
    return Ok(None);
  };

  let raw = fs::read_to_string(&path).map_err(|e| BootstrapError::ConfigFile {
    path: path.clone(),
    reason: format!("read failed: {e}"),
  })?;
  let values = parse(&path, &raw)?;

  tracing::debug!(path = %path.display(), settings = values.len(), "config file loaded");
  Ok(Some(FileLayer { path, values }))
}

pub fn parse(path: &Path, raw: &str) -> Result<Vec<(&'static Setting, Value)>, BootstrapError> {
  let fail = |reason: String| BootstrapError::ConfigFile {
    path: path.to_path_buf(),
    reason,
  };

  let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
  let doc = if is_toml {
    toml::from_str::<ConfigFile>(raw).map_err(|e| fail(format!("malformed TOML: {e}")))?
  } else if is_blank_yaml(raw) {
    ConfigFile::default()
  } else {
    serde_yaml::from_str::<Option<ConfigFile>>(raw)
      .map_err(|e| fail(format!("malformed YAML: {e}")))?
      .unwrap_or_default()
  };

  let mut values = Vec::new();
  for (name, raw_value) in doc.entries {
    // Keys are matched case-insensitively; unrecognized keys are ignored.
    let Some(setting) = registry::lookup(&name.to_ascii_lowercase()) else {
      tracing::trace!(key = %name, "ignoring unrecognized config file key");
      continue;
    };
    match coerce(setting.kind, raw_value) {
      Ok(Some(v)) => values.push((setting, v)),
      Ok(None) => {}
      Err(reason) => return Err(fail(format!("key `{name}`: {reason}"))),
    }
  }

  Ok(values)
}

/// `Ok(None)` means the key is present but null, which leaves it unset.
fn coerce(kind: Kind, value: FileValue) -> Result<Option<Value>, String> {
  let v = match (kind, value) {
    (_, FileValue::Null(())) => return Ok(None),

    (Kind::Str, FileValue::List(items)) => {
      let parts = items
        .into_iter()
        .map(scalar_text)
        .collect::<Result<Vec<_>, _>>()?;
      Value::Str(parts.join(","))
    }
    (Kind::Str, other) => Value::Str(scalar_text(other)?),

    (Kind::Bool, FileValue::Bool(b)) => Value::Bool(b),
    (Kind::Bool, FileValue::Str(s)) => Value::Bool(parse_bool(&s)?),

    (Kind::Int, FileValue::Int(i)) => Value::Int(i),
    (Kind::Int, FileValue::Str(s)) => Value::parse(Kind::Int, &s)?,

    (Kind::Duration, FileValue::Int(i)) if i >= 0 => Value::parse(Kind::Duration, &i.to_string())?,
    (Kind::Duration, FileValue::Str(s)) => Value::parse(Kind::Duration, &s)?,

    (kind, other) => {
      return Err(format!(
        "expected a {} value, found {}",
        kind.as_str(),
        describe(&other)
      ))
    }
  };
  Ok(Some(v))
}

fn scalar_text(value: FileValue) -> Result<String, String> {
  match value {
    FileValue::Str(s) => Ok(s),
    FileValue::Bool(b) => Ok(b.to_string()),
    FileValue::Int(i) => Ok(i.to_string()),
    FileValue::Float(f) => Ok(f.to_string()),
    other => Err(format!("expected a scalar, found {}", describe(&other))),
  }
}

/// Only whitespace, comments and document markers.
fn is_blank_yaml(raw: &str) -> bool {
  raw
    .lines()
    .map(str::trim)
    .all(|l| l.is_empty() || l.starts_with('#') || l == "---" || l == "...")
}

fn describe(value: &FileValue) -> &'static str {
  match value {
    FileValue::Null(()) => "null",
    FileValue::Bool(_) => "a boolean",
    FileValue::Int(_) => "an integer",
    FileValue::Float(_) => "a float",
    FileValue::Str(_) => "a string",
    FileValue::List(_) => "a list",
    FileValue::Other(_) => "a table",
  }
}
