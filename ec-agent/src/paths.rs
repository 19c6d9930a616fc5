use std::path::{Path, PathBuf};

pub const CONFIG_STEM: &str = "config";

/// Checked in order; the first existing file wins. A bare `config` is tried
/// last and read as YAML.
pub const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "toml"];

pub fn search_dir() -> PathBuf {
  std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn config_candidates(dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
  CONFIG_EXTENSIONS
    .iter()
    .map(move |ext| dir.join(format!("{CONFIG_STEM}.{ext}")))
    .chain(std::iter::once(dir.join(CONFIG_STEM)))
}

pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
  config_candidates(dir).find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn yaml_wins_over_toml() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(find_config_file(dir.path()), None);

    std::fs::write(dir.path().join("config.toml"), "").unwrap();
    assert_eq!(find_config_file(dir.path()), Some(dir.path().join("config.toml")));

    std::fs::write(dir.path().join("config.yaml"), "").unwrap();
    assert_eq!(find_config_file(dir.path()), Some(dir.path().join("config.yaml")));
  }

  #[test]
  fn extensionless_config_is_found_last() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config"), "mod: server\n").unwrap();
    assert_eq!(find_config_file(dir.path()), Some(dir.path().join("config")));

    std::fs::write(dir.path().join("config.yml"), "").unwrap();
    assert_eq!(find_config_file(dir.path()), Some(dir.path().join("config.yml")));
  }

  #[test]
  fn directories_named_like_config_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("config.yaml")).unwrap();
    assert_eq!(find_config_file(dir.path()), None);
  }
}
