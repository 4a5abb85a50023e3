pub mod common;
pub mod count;

pub use common::{health, root};
pub use count::count_since;
