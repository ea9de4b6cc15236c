use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub auth: AuthConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub max_request_body_size_kb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub dir: String,
    pub db_url: String,
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub api_key: String,
}

// Keep the key out of startup logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 8000,
                max_request_body_size_kb: 64,
            },
            data: DataConfig {
                dir: "data".to_string(),
                db_url: "sqlite://data/test.sqlite".to_string(),
            },
            auth: AuthConfig {
                api_key: "SECRET_KEY123".to_string(),
            },
            seed: SeedConfig { enabled: true },
        }
    }
}

impl DataConfig {
    /// Filesystem path of the SQLite database, if `db_url` points at a file.
    pub fn sqlite_path(&self) -> Option<&str> {
        let path = self
            .db_url
            .strip_prefix("sqlite://")
            .or_else(|| self.db_url.strip_prefix("sqlite:"))?;
        let path = path.split('?').next().unwrap_or(path);
        if path.is_empty() || path == ":memory:" {
            None
        } else {
            Some(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_container_layout() {
        let config = Config::default();
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.data.dir, "data");
        assert_eq!(config.data.sqlite_path(), Some("data/test.sqlite"));
    }

    #[test]
    fn sqlite_path_handles_url_forms() {
        let mut data = Config::default().data;
        data.db_url = "sqlite:db/dir.sqlite?mode=rwc".to_string();
        assert_eq!(data.sqlite_path(), Some("db/dir.sqlite"));
        data.db_url = "sqlite::memory:".to_string();
        assert_eq!(data.sqlite_path(), None);
        data.db_url = "postgres://localhost/dir".to_string();
        assert_eq!(data.sqlite_path(), None);
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let rendered = format!("{:?}", Config::default());
        assert!(!rendered.contains("SECRET_KEY123"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let value = serde_json::json!({
            "bind": "127.0.0.1",
            "port": 9000,
            "max_request_body_size_kb": 16,
            "workers": 4
        });
        let result: Result<ServerConfig, _> = serde_json::from_value(value);
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }
}
