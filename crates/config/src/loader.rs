use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    Result,
    env_subst::substitute_env,
    error::{Context, Error},
    schema::RepriseConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["reprise.toml", "reprise.yaml", "reprise.yml", "reprise.json"];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<RepriseConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Load the config file as an untyped value, with env substitution.
///
/// Used by validation to detect unknown fields before typed parsing drops
/// them.
pub fn load_config_value(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config_value(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./reprise.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/reprise/reprise.{toml,yaml,yml,json}` (user-global)
///
/// Returns `RepriseConfig::default()` if no config file is found.
pub fn discover_and_load() -> RepriseConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    RepriseConfig::default()
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global: ~/.config/reprise/
    if let Some(dir) = config_dir() {
        for name in CONFIG_FILENAMES {
            let p = dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Returns the user-global config directory (`~/.config/reprise/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "reprise").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> Result<RepriseConfig> {
    match extension(path) {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(Error::unsupported_format(other)),
    }
}

fn parse_config_value(raw: &str, path: &Path) -> Result<serde_json::Value> {
    match extension(path) {
        "toml" => {
            let v: toml::Value = toml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "yaml" | "yml" => {
            let v: serde_yaml::Value = serde_yaml::from_str(raw)?;
            Ok(serde_json::to_value(v)?)
        },
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(Error::unsupported_format(other)),
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("toml")
}

#[cfg(test)]
mod tests {
    use {rstest::rstest, std::io::Write};

    use super::*;

    fn write_config(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[rstest]
    #[case::toml("reprise.toml", "[repeater]\nescalation_factor = 1.3\n")]
    #[case::yaml("reprise.yaml", "repeater:\n  escalation_factor: 1.3\n")]
    #[case::json("reprise.json", r#"{"repeater": {"escalation_factor": 1.3}}"#)]
    fn loads_every_supported_format(#[case] name: &str, #[case] contents: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, name, contents);

        let config = load_config(&path).unwrap();
        assert_eq!(config.repeater.escalation_factor, 1.3);
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "reprise.ini", "escalation_factor=1.3");

        assert!(matches!(
            load_config(&path),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_config(Path::new("/nonexistent/reprise.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "reprise.toml", "");

        let config = load_config(&path).unwrap();
        assert_eq!(config.repeater.escalation_factor, 1.6);
    }

    #[test]
    fn untyped_value_preserves_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "reprise.toml",
            "[repeater]\nescalation_factor = 1.3\ntypo_field = true\n",
        );

        let value = load_config_value(&path).unwrap();
        assert!(value["repeater"]["typo_field"].as_bool().unwrap());
    }
}
