//! Configuration loading and persistence.

use std::fs;
use std::path::Path;

use crate::config::schema::SlbConfig;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load the configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<SlbConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: SlbConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Persist the configuration back to disk as pretty-printed JSON.
///
/// Used by the mode-toggle endpoint so a strategy switch survives both the
/// next reload cycle and a process restart.
pub async fn persist_config(path: &Path, config: &SlbConfig) -> Result<(), ConfigError> {
    let content = serde_json::to_vec_pretty(config)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("slb-loader-{tag}-{}.json", std::process::id()))
    }

    #[test]
    fn loads_full_config() {
        let path = temp_path("full");
        fs::write(
            &path,
            r#"{
                "servers": ["http://10.0.0.1:80", "http://10.0.0.2:80"],
                "routes": [{"route": "/orders", "endpoints": ["http://10.0.0.3:80"]}],
                "port": "9090",
                "mode": "best"
            }"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.routes[0].route, "/orders");
        assert_eq!(config.port, "9090");
        assert_eq!(config.mode, "best");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let path = temp_path("empty");
        fs::write(&path, "{}").unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.servers.is_empty());
        assert!(config.routes.is_empty());
        assert!(config.port.is_empty());
        assert!(config.mode.is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let path = temp_path("broken");
        fs::write(&path, "{not json").unwrap();

        match load_config(&path) {
            Err(ConfigError::Parse(_)) => {}
            other => panic!("expected parse error, got {other:?}"),
        }

        let _ = fs::remove_file(&path);
    }

    #[tokio::test]
    async fn persist_round_trips() {
        let path = temp_path("persist");
        let config = SlbConfig {
            servers: vec!["http://10.0.0.1:80".into()],
            mode: "random".into(),
            ..Default::default()
        };

        persist_config(&path, &config).await.unwrap();
        let reloaded = load_config(&path).unwrap();
        assert_eq!(reloaded, config);

        let _ = fs::remove_file(&path);
    }
}
