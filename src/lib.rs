#![deny(clippy::all)]
#![deny(clippy::pedantic)]
// Allow some overly strict pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]

//! Media Lifecycle
//!
//! Forwards persistence lifecycle notifications (pre/post persist, update and
//! remove) for media entities to the provider that owns each media kind, and
//! assigns each media the root category of its context when it has none.
//!
//! The persistence side is modelled by a small in-process session
//! ([`infrastructure::persistence::MediaSession`]) that emits the notifications
//! in flush order around each write.

pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use application::{
    LifecycleError, LifecycleEventArgs, MediaEventSubscriber, RootCategoryCache,
    RootCategoryRefresh,
};
pub use domain::entities::*;
pub use domain::value_objects::{LifecycleEvent, ProviderStatus};
