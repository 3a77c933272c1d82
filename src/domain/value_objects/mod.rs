pub mod content_hash;
pub mod lifecycle_event;
pub mod provider_status;

pub use content_hash::*;
pub use lifecycle_event::*;
pub use provider_status::*;
