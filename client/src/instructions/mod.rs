pub mod admin_instructions;
pub mod staking_instructions;
pub mod utils;
