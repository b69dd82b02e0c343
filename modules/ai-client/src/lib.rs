pub mod client;
pub mod error;
pub mod schema;
pub(crate) mod wire;

pub use client::AiClient;
pub use error::{AiError, Result};
pub use schema::ToolSchema;
