pub mod selector;
pub use selector::*;

pub mod store;
pub use store::*;
