pub mod extract;
pub mod paged;
pub mod static_page;

pub use extract::{extract_items, extract_label};
pub use paged::PagedHtmlSource;
pub use static_page::StaticPageSource;
