use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::AppConfig;

/// Default tasklane data directory: ~/.tasklane
pub fn tasklane_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".tasklane"))
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Load the app config.
///
/// Priority: explicit path (must exist) over `~/.tasklane/config.toml`
/// over `./tasklane.toml` over built-in defaults. `TASKLANE_HOST`,
/// `TASKLANE_PORT` and `TASKLANE_LOG_LEVEL` override the file afterwards.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut cfg = if let Some(path) = explicit {
        read_config(path)?
    } else {
        let home_config = tasklane_data_dir().ok().map(|d| d.join("config.toml"));
        let local_config = Path::new("tasklane.toml");

        match home_config {
            Some(ref path) if path.exists() => read_config(path)?,
            _ if local_config.exists() => read_config(local_config)?,
            _ => AppConfig::default(),
        }
    };

    if let Ok(v) = std::env::var("TASKLANE_HOST") {
        if !v.trim().is_empty() {
            cfg.server.host = v;
        }
    }
    if let Ok(v) = std::env::var("TASKLANE_PORT") {
        if let Ok(port) = v.trim().parse::<u16>() {
            cfg.server.port = port;
        }
    }
    if let Ok(v) = std::env::var("TASKLANE_LOG_LEVEL") {
        if !v.trim().is_empty() {
            cfg.logging.level = v;
        }
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_path_wins_and_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[defaults]\nmode = \"parallel\"\n\n[server]\nport = 4100"
        )
        .unwrap();

        let cfg = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.server.port, 4100);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/tasklane.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "defaults = \"not a table\"").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }
}
