use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
  Str,
  Bool,
  Int,
  /// Whole seconds.
  Duration,
}

impl Kind {
  pub fn as_str(self) -> &'static str {
    match self {
      Kind::Str => "string",
      Kind::Bool => "bool",
      Kind::Int => "int",
      Kind::Duration => "duration",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
  Str(String),
  Bool(bool),
  Int(i64),
  Duration(Duration),
}

impl Value {
  /// Parses textual input (environment, flags, registry defaults) as `kind`.
  pub fn parse(kind: Kind, raw: &str) -> Result<Value, String> {
    match kind {
      Kind::Str => Ok(Value::Str(raw.to_string())),
      Kind::Bool => parse_bool(raw).map(Value::Bool),
      Kind::Int => raw
        .trim()
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|e| format!("expected an integer: {e}")),
      Kind::Duration => raw
        .trim()
        .parse::<u64>()
        .map(|secs| Value::Duration(Duration::from_secs(secs)))
        .map_err(|e| format!("expected a number of seconds: {e}")),
    }
  }

  pub fn kind(&self) -> Kind {
    match self {
      Value::Str(_) => Kind::Str,
      Value::Bool(_) => Kind::Bool,
      Value::Int(_) => Kind::Int,
      Value::Duration(_) => Kind::Duration,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Str(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      Value::Int(i) => Some(*i),
      _ => None,
    }
  }

  pub fn as_duration(&self) -> Option<Duration> {
    match self {
      Value::Duration(d) => Some(*d),
      _ => None,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Str(s) => f.write_str(s),
      Value::Bool(b) => write!(f, "{b}"),
      Value::Int(i) => write!(f, "{i}"),
      Value::Duration(d) => write!(f, "{}s", d.as_secs()),
    }
  }
}

/// Accepts the spellings operators already use in agent scripts.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
  match raw.trim() {
    "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
    "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
    other => Err(format!("expected a boolean, got {other:?}")),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_each_kind() {
    assert_eq!(Value::parse(Kind::Str, " x "), Ok(Value::Str(" x ".into())));
    assert_eq!(Value::parse(Kind::Bool, "T"), Ok(Value::Bool(true)));
    assert_eq!(Value::parse(Kind::Bool, "0"), Ok(Value::Bool(false)));
    assert_eq!(Value::parse(Kind::Int, "-42"), Ok(Value::Int(-42)));
    assert_eq!(
      Value::parse(Kind::Duration, "3600"),
      Ok(Value::Duration(Duration::from_secs(3600)))
    );
  }

  #[test]
  fn rejects_malformed_input() {
    assert!(Value::parse(Kind::Bool, "yes").is_err());
    assert!(Value::parse(Kind::Int, "12a").is_err());
    assert!(Value::parse(Kind::Duration, "-5").is_err());
  }

  #[test]
  fn accessors_check_the_tag() {
    let v = Value::Int(7);
    assert_eq!(v.as_int(), Some(7));
    assert_eq!(v.as_str(), None);
    assert_eq!(v.as_bool(), None);
    assert_eq!(v.kind(), Kind::Int);
  }
}
