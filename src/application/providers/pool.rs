use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::MediaProvider;

/// Thumbnail size generated for a context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailFormat {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl ThumbnailFormat {
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self { name: name.into(), width, height }
    }
}

/// Providers configured for a context. Thumbnail formats belong to `ImageProvider`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaContext {
    pub providers: Vec<String>,
}

/// Registry of media providers, filled at startup and read-only afterwards
pub struct ProviderPool {
    providers: HashMap<String, Arc<dyn MediaProvider>>,
    contexts: HashMap<String, MediaContext>,
    default_context: String,
}

impl ProviderPool {
    #[must_use]
    pub fn new(default_context: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            contexts: HashMap::new(),
            default_context: default_context.into(),
        }
    }

    /// Register a provider under its own name, replacing any previous one
    pub fn register(&mut self, provider: Arc<dyn MediaProvider>) {
        let name = provider.name().to_string();
        if self.providers.insert(name.clone(), provider).is_some() {
            warn!(provider = %name, "Replacing already registered media provider");
        } else {
            info!(provider = %name, "Registered media provider");
        }
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn MediaProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn get_provider(&self, name: &str) -> Option<Arc<dyn MediaProvider>> {
        self.providers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered provider names, sorted
    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn add_context(&mut self, name: impl Into<String>, providers: Vec<String>) {
        self.contexts.insert(name.into(), MediaContext { providers });
    }

    pub fn context(&self, name: &str) -> Option<&MediaContext> {
        self.contexts.get(name)
    }

    pub fn has_context(&self, name: &str) -> bool {
        self.contexts.contains_key(name)
    }

    pub fn default_context(&self) -> &str {
        &self.default_context
    }

    /// Registered providers allowed in `context`, in configured order
    pub fn providers_for_context(&self, context: &str) -> Vec<Arc<dyn MediaProvider>> {
        self.contexts
            .get(context)
            .map(|ctx| ctx.providers.iter().filter_map(|name| self.get_provider(name)).collect())
            .unwrap_or_default()
    }
}

impl Default for ProviderPool {
    fn default() -> Self {
        Self::new("default")
    }
}

impl fmt::Debug for ProviderPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut contexts: Vec<&String> = self.contexts.keys().collect();
        contexts.sort_unstable();

        f.debug_struct("ProviderPool")
            .field("providers", &self.provider_names())
            .field("contexts", &contexts)
            .field("default_context", &self.default_context)
            .finish()
    }
}
