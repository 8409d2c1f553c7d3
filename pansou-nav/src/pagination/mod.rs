//! Stable facade for pagination math and the token codec.

mod page;
pub mod token;

pub use page::{Page, clamp_page, page_window, paginate, total_pages};
