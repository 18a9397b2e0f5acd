use std::env;
use std::path::PathBuf;

use crate::services::media_objects::MediaStorage;

/// Settings read from the environment at start-up.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Directory uploaded media files are written to.
    pub upload_dir: PathBuf,
    /// Public URL prefix the upload directory is served under.
    pub upload_url_prefix: String,
    /// Directory holding the tera templates.
    pub templates_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "app.db".to_string(),
            address: "127.0.0.1".to_string(),
            port: 8080,
            upload_dir: PathBuf::from("./public/uploads/media"),
            upload_url_prefix: "/uploads/media".to_string(),
            templates_dir: "templates".to_string(),
        }
    }
}

impl ServerConfig {
    /// Read the configuration, falling back to defaults for unset variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Upload location handed to the media object handlers.
    pub fn media_storage(&self) -> MediaStorage {
        MediaStorage {
            upload_dir: self.upload_dir.clone(),
            url_prefix: self.upload_url_prefix.clone(),
        }
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                log::warn!("Invalid PORT `{raw}`, using {}", defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        let upload_url_prefix = lookup("UPLOAD_URL_PREFIX")
            .map(|prefix| format!("/{}", prefix.trim_matches('/')))
            .unwrap_or(defaults.upload_url_prefix);

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            address: lookup("ADDRESS").unwrap_or(defaults.address),
            port,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            upload_url_prefix,
            templates_dir: lookup("TEMPLATES_DIR").unwrap_or(defaults.templates_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_variables_use_defaults() {
        let config = ServerConfig::from_lookup(|_| None);

        assert_eq!(config.database_url, "app.db");
        assert_eq!(config.port, 8080);
        assert_eq!(config.upload_url_prefix, "/uploads/media");
    }

    #[test]
    fn variables_override_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PORT", "9000"),
            ("UPLOAD_DIR", "/tmp/media"),
            ("UPLOAD_URL_PREFIX", "files/"),
        ]);

        let config = ServerConfig::from_lookup(|key| vars.get(key).map(|value| value.to_string()));

        assert_eq!(config.port, 9000);
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/media"));
        assert_eq!(config.upload_url_prefix, "/files");
    }

    #[test]
    fn invalid_port_falls_back() {
        let config = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));

        assert_eq!(config.port, 8080);
    }
}
