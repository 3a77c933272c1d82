pub mod category_cache;
pub mod dispatcher;
pub mod error;
pub mod providers;

pub use category_cache::{RootCategoryCache, RootCategoryRefresh};
pub use dispatcher::{LifecycleEventArgs, MediaEventSubscriber};
pub use error::LifecycleError;
