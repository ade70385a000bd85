pub mod context;
pub mod export;
pub mod generator;
pub mod handlers;
pub mod prompts;
