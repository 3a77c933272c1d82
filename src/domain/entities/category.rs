use serde::{Deserialize, Serialize};

use super::Entity;

/// Identifier for classification categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(uuid::Uuid);

impl CategoryId {
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub fn as_uuid(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hierarchical classification node, scoped to a media context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub context: String,
    pub parent: Option<CategoryId>,
    pub enabled: bool,
    pub position: i32,
}

impl Category {
    /// Create a root category for a context
    #[must_use]
    pub fn root(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            context: context.into(),
            parent: None,
            enabled: true,
            position: 0,
        }
    }

    /// Create a child category under `parent`, inheriting its context
    #[must_use]
    pub fn child_of(parent: &Category, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            context: parent.context.clone(),
            parent: Some(parent.id),
            enabled: true,
            position: 0,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl Entity for Category {
    fn entity_name(&self) -> &'static str {
        "category"
    }
}
