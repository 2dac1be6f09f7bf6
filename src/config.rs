use crate::{
    backend::{InMemoryBackend, TaskBackend},
    domain::{PageRequest, SortField, SortOrder, SortState},
    error::{Result, TaskboardError},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const ENV_USE_REAL_API: &str = "TASKBOARD_USE_REAL_API";
pub const ENV_API_BASE_URL: &str = "TASKBOARD_API_BASE_URL";
pub const ENV_WEBSOCKET_URL: &str = "TASKBOARD_WEBSOCKET_URL";

/// Application settings, read once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Talk to the REST API instead of the in-memory sample store
    pub use_real_api: bool,
    pub api_base_url: String,
    /// Push endpoint the notification transport connects to; its payloads
    /// are handed to [`crate::domain::NotificationFeed::drain`]
    pub websocket_url: String,
    pub default_page_size: u32,
    pub page_size_options: Vec<u32>,
    pub default_sort_field: SortField,
    pub default_sort_order: SortOrder,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            use_real_api: false,
            api_base_url: "https://api.example.com".to_string(),
            websocket_url: "ws://localhost:8080".to_string(),
            default_page_size: 10,
            page_size_options: vec![5, 10, 20, 50],
            default_sort_field: SortField::DueDate,
            default_sort_order: SortOrder::Descending,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| TaskboardError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file and applies environment overrides
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;

        let mut config = Self::from_toml_str(&content)?;
        config.apply_env();
        config.validate()?;

        tracing::debug!(path = %path.display(), real_api = config.use_real_api, "Loaded config");
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_USE_REAL_API) {
            self.use_real_api = matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(url) = lookup(ENV_API_BASE_URL) {
            self.api_base_url = url;
        }
        if let Some(url) = lookup(ENV_WEBSOCKET_URL) {
            self.websocket_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(TaskboardError::Config(
                "default_page_size must be greater than zero".to_string(),
            ));
        }
        if self.page_size_options.contains(&0) {
            return Err(TaskboardError::Config(
                "page_size_options must not contain zero".to_string(),
            ));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(TaskboardError::Config(
                "api_base_url must not be empty".to_string(),
            ));
        }
        if !(self.websocket_url.starts_with("ws://") || self.websocket_url.starts_with("wss://")) {
            return Err(TaskboardError::Config(format!(
                "websocket_url must be a ws:// or wss:// URL, got '{}'",
                self.websocket_url
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn default_page_request(&self) -> Result<PageRequest> {
        PageRequest::first(self.default_page_size)
    }

    pub fn default_sort(&self) -> SortState {
        SortState::new(self.default_sort_field, self.default_sort_order)
    }

    /// Picks the backend for the whole process lifetime
    pub fn build_backend(&self) -> Result<Arc<dyn TaskBackend>> {
        if self.use_real_api {
            return self.real_backend();
        }

        tracing::info!("Using in-memory sample backend");
        Ok(Arc::new(InMemoryBackend::with_sample_data()))
    }

    #[cfg(feature = "http-backend")]
    fn real_backend(&self) -> Result<Arc<dyn TaskBackend>> {
        tracing::info!(base_url = %self.api_base_url, "Using HTTP backend");
        let backend =
            crate::backend::HttpBackend::new(self.api_base_url.clone(), self.request_timeout())?;
        Ok(Arc::new(backend))
    }

    #[cfg(not(feature = "http-backend"))]
    fn real_backend(&self) -> Result<Arc<dyn TaskBackend>> {
        Err(TaskboardError::Config(
            "use_real_api is set but the http-backend feature is disabled".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ViewTab;
    use crate::query::TaskQuery;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(!config.use_real_api);
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.page_size_options, vec![5, 10, 20, 50]);
        assert_eq!(config.default_sort().to_query_value(), "dueDate,desc");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            use_real_api = true
            default_page_size = 20
            default_sort_field = "title"
            default_sort_order = "asc"
            "#,
        )
        .unwrap();

        assert!(config.use_real_api);
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.default_sort(), SortState::new(SortField::Title, SortOrder::Ascending));
        assert_eq!(config.websocket_url, "ws://localhost:8080");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            AppConfig::from_toml_str("default_page_size = 0"),
            Err(TaskboardError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_toml_str("api_base_url = \"  \""),
            Err(TaskboardError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_toml_str("default_sort_field = \"priority\""),
            Err(TaskboardError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_toml_str("websocket_url = \"http://localhost:8080\""),
            Err(TaskboardError::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            (ENV_USE_REAL_API, "TRUE"),
            (ENV_API_BASE_URL, "http://localhost:9000"),
            (ENV_WEBSOCKET_URL, "wss://push.example.com/ws"),
        ]);

        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert!(config.use_real_api);
        assert_eq!(config.api_base_url, "http://localhost:9000");
        assert_eq!(config.websocket_url, "wss://push.example.com/ws");

        config.apply_overrides(|key| (key == ENV_USE_REAL_API).then(|| "0".to_string()));
        assert!(!config.use_real_api);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("taskboard.toml");
        tokio::fs::write(&path, "default_page_size = 5\nrequest_timeout_secs = 3\n")
            .await
            .unwrap();

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.default_page_size, 5);
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.default_page_request().unwrap().size(), 5);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = AppConfig::load(temp_dir.path().join("missing.toml")).await;
        assert!(matches!(result, Err(TaskboardError::Io(_))));
    }

    #[tokio::test]
    async fn test_mock_backend_has_sample_data() {
        let backend = AppConfig::default().build_backend().unwrap();
        let query = TaskQuery::new(ViewTab::All, PageRequest::first(10).unwrap());

        let page = backend.fetch_tasks(&query).await.unwrap();
        assert_eq!(page.total_elements, 25);
    }
}
