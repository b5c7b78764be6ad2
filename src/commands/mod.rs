pub mod caption;
pub mod prompts;
