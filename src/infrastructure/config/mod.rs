use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::application::category_cache::RootCategoryRefresh;
use crate::application::providers::{FileProvider, ImageProvider, ProviderPool, ThumbnailFormat};
use crate::infrastructure::storage::FileStorage;

/// Runtime mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Local,
    Production,
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("Invalid runtime mode: {s}. Valid values: local, production")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub mode: RuntimeMode,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub media: MediaConfig,
}

/// File storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub base_path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Full `EnvFilter` directive; overrides `level` when set
    pub filter: Option<String>,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

/// Media contexts and lifecycle behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub default_context: String,
    pub root_category_refresh: RootCategoryRefresh,
    pub contexts: HashMap<String, ContextConfig>,
}

/// One media context: the providers it accepts and its thumbnail formats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    pub providers: Vec<String>,
    #[serde(default)]
    pub formats: HashMap<String, FormatConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    pub width: u32,
    pub height: u32,
}

impl AppConfig {
    /// Load configuration based on runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load() -> Result<Self, config::ConfigError> {
        // Detect runtime mode from environment (default: local)
        let mode = std::env::var("RUN_MODE")
            .unwrap_or_else(|_| "local".to_string())
            .parse::<RuntimeMode>()
            .map_err(config::ConfigError::Message)?;

        Self::load_for_mode(mode)
    }

    /// Load configuration for a specific runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load_for_mode(mode: RuntimeMode) -> Result<Self, config::ConfigError> {
        // Local mode reads .env.local into the environment; production relies on
        // the environment alone
        if mode == RuntimeMode::Local {
            dotenvy::from_filename(".env.local").ok();
        }

        let builder = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("MEDIA_LIFECYCLE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .add_source(config::Environment::default());

        let (storage_base, log_format) = match mode {
            RuntimeMode::Local => ("./media", "pretty"),
            RuntimeMode::Production => ("/app/media", "json"),
        };

        let settings = builder
            .set_default("mode", mode.to_string())?
            .set_default("storage.base_path", storage_base)?
            .set_default("logging.level", "info")?
            .set_default("logging.filter", None::<String>)?
            .set_default("logging.format", log_format)?
            .set_default("media.default_context", "default")?
            .set_default("media.root_category_refresh", "lifetime")?
            .set_default("media.contexts.default.providers", vec!["file", "image"])?
            .set_default("media.contexts.default.formats.small.width", 100)?
            .set_default("media.contexts.default.formats.small.height", 70)?
            .set_default("media.contexts.default.formats.big.width", 500)?
            .set_default("media.contexts.default.formats.big.height", 300)?
            .build()?;

        settings.try_deserialize()
    }
}

impl ContextConfig {
    /// Thumbnail formats, sorted by name
    pub fn thumbnail_formats(&self) -> Vec<ThumbnailFormat> {
        let mut formats: Vec<ThumbnailFormat> = self
            .formats
            .iter()
            .map(|(name, format)| ThumbnailFormat::new(name.clone(), format.width, format.height))
            .collect();
        formats.sort_by(|a, b| a.name.cmp(&b.name));
        formats
    }
}

impl MediaConfig {
    /// Provider pool with the file and image providers and the configured contexts
    pub fn build_pool(&self, storage: Arc<dyn FileStorage>) -> ProviderPool {
        let mut names: Vec<&String> = self.contexts.keys().collect();
        names.sort_unstable();

        let mut image = ImageProvider::new(Arc::clone(&storage));
        for name in &names {
            image = image.with_formats(*name, self.contexts[*name].thumbnail_formats());
        }

        let mut pool = ProviderPool::new(self.default_context.clone())
            .with_provider(Arc::new(FileProvider::new(storage)))
            .with_provider(Arc::new(image));

        for name in names {
            let context = &self.contexts[name];
            for provider in context.providers.iter().filter(|provider| !pool.contains(provider)) {
                warn!(context = %name, provider = %provider, "Context lists unknown provider");
            }
            pool.add_context(name.clone(), context.providers.clone());
        }

        if !pool.has_context(&self.default_context) {
            warn!(context = %self.default_context, "Default context is not configured");
        }

        pool
    }
}
