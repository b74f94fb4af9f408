pub mod client;
pub mod codec;
pub mod config;
pub mod decode;
pub mod error;
pub mod image;
pub mod llm;
pub mod mock;
pub mod plan;
pub mod planner;
pub mod profile;
pub mod prompt;
pub mod render;
pub mod schema;
pub mod server;
