/// Pansou API client with retry and local result filtering.
pub mod client;
/// Search error taxonomy surfaced as inline message text.
pub mod error;
/// Result data model shared with the navigation runtime.
pub mod types;

pub use client::{PansouClient, SearchOptions};
pub use error::SearchError;
pub use types::{CloudType, ResourceLink, SearchData};
