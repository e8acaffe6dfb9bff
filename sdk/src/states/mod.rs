pub mod asset_record;
pub use asset_record::*;

pub mod events;
pub use events::*;

pub mod global_config;
pub use global_config::*;

pub mod layout;

pub mod position;
pub use position::*;

pub mod reward;
pub use reward::*;

pub mod summary;
pub use summary::*;
