/// Last-search-per-user result cache.
pub mod cache;
/// Deferred, best-effort deletion of rendered messages.
pub mod cleanup;
/// Transport-free inline keyboard descriptors.
pub mod keyboard;
/// Navigation state machine: decoded intent + cached session -> next view.
pub mod navigate;
/// Pure pagination math and the navigation token codec.
pub mod pagination;
/// HTML text rendering for search views.
pub mod render;

pub use cache::{SearchCache, SearchSession, SessionKey};
pub use cleanup::{DeleteOutcome, DeletionQueue, MessageDeleter};
pub use navigate::{NavOutcome, ViewUpdate};
