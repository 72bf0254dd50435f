use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub rating: RatingConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

/// Connection settings for the content store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(alias = "projectid", rename = "projectId")]
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(alias = "apiversion", rename = "apiVersion")]
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(alias = "usecdn", rename = "useCdn")]
    #[serde(default)]
    pub use_cdn: bool,
    /// Replaces `https://<projectId>.api.sanity.io` when set.
    #[serde(alias = "apihost", rename = "apiHost")]
    #[serde(default)]
    pub api_host: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset: default_dataset(),
            api_version: default_api_version(),
            token: None,
            use_cdn: false,
            api_host: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    #[serde(alias = "apikey", rename = "apiKey")]
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_text_model")]
    pub model: String,
    #[serde(alias = "baseurl", rename = "baseUrl")]
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_text_model(),
            base_url: default_generation_base_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(alias = "apikey", rename = "apiKey")]
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(alias = "baseurl", rename = "baseUrl")]
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    #[serde(alias = "imagebaseurl", rename = "imageBaseUrl")]
    #[serde(default = "default_tmdb_image_base_url")]
    pub image_base_url: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tmdb_base_url(),
            image_base_url: default_tmdb_image_base_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(alias = "adminorigin", rename = "adminOrigin")]
    #[serde(default = "default_admin_origin")]
    pub admin_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            admin_origin: default_admin_origin(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RatingConfig {
    /// Reject the write when the movie changed between read and patch.
    #[serde(alias = "guardrevision", rename = "guardRevision")]
    #[serde(default)]
    pub guard_revision: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(alias = "timeoutsecs", rename = "timeoutSecs")]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_port() -> String {
    "3000".to_string()
}

fn default_dataset() -> String {
    "production".to_string()
}

fn default_api_version() -> String {
    "2022-11-15".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash-preview-05-20".to_string()
}

fn default_generation_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org".to_string()
}

fn default_admin_origin() -> String {
    "https://moviecanon.sanity.studio".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        Ok(config)
    }

    /// Reads the config file if it exists, falls back to defaults otherwise,
    /// then applies environment overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            Config::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Secrets are never validated here; a missing value only fails the
    /// request that needs it.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SANITY_PROJECT_ID") {
            self.store.project_id = Some(v);
        }
        if let Some(v) = get("SANITY_DATASET") {
            self.store.dataset = v;
        }
        if let Some(v) = get("SANITY_API_WRITE_TOKEN") {
            self.store.token = Some(v);
        }
        if let Some(v) = get("GEMINI_API_KEY") {
            self.generation.api_key = Some(v);
        }
        if let Some(v) = get("TMDB_API_KEY") {
            self.tmdb.api_key = Some(v);
        }
        if let Some(v) = get("ADMIN_ORIGIN") {
            self.cors.admin_origin = v;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_parse_with_defaults() {
        let yaml = r#"
            listen:
              port: "8080"
            store:
              projectId: abc123
              token: secret
            rating:
              guardRevision: true
        "#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.listen.port, "8080");
        assert_eq!(config.store.project_id.as_deref(), Some("abc123"));
        assert_eq!(config.store.dataset, "production");
        assert_eq!(config.store.api_version, "2022-11-15");
        assert!(config.rating.guard_revision);
        assert_eq!(config.cors.admin_origin, "https://moviecanon.sanity.studio");
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert!(config.generation.api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SANITY_PROJECT_ID", "proj"),
            ("SANITY_DATASET", "staging"),
            ("GEMINI_API_KEY", "gem"),
            ("TMDB_API_KEY", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.tmdb.api_key = Some("from-file".to_string());
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.store.project_id.as_deref(), Some("proj"));
        assert_eq!(config.store.dataset, "staging");
        assert_eq!(config.generation.api_key.as_deref(), Some("gem"));
        // blank values don't clobber the file
        assert_eq!(config.tmdb.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cors:\n  adminOrigin: https://studio.example").unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.cors.admin_origin, "https://studio.example");
        assert_eq!(config.listen.port, "3000");
    }

    #[test]
    fn test_from_file_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen: [unterminated").unwrap();

        let err = Config::from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(..)));
    }
}
