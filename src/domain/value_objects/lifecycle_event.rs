use serde::{Deserialize, Serialize};
use std::fmt;

/// Persistence lifecycle notification kinds the media subscriber listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    PrePersist,
    PreUpdate,
    PreRemove,
    PostPersist,
    PostUpdate,
    PostRemove,
}

impl LifecycleEvent {
    /// Every event, in subscription order
    pub const ALL: [Self; 6] = [
        Self::PrePersist,
        Self::PreUpdate,
        Self::PreRemove,
        Self::PostUpdate,
        Self::PostRemove,
        Self::PostPersist,
    ];

    /// Fired before the write reaches the store
    #[must_use]
    pub fn is_pre(&self) -> bool {
        matches!(self, Self::PrePersist | Self::PreUpdate | Self::PreRemove)
    }

    /// Fired once the write is durable
    #[must_use]
    pub fn is_post(&self) -> bool {
        !self.is_pre()
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrePersist => "pre_persist",
            Self::PreUpdate => "pre_update",
            Self::PreRemove => "pre_remove",
            Self::PostPersist => "post_persist",
            Self::PostUpdate => "post_update",
            Self::PostRemove => "post_remove",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
