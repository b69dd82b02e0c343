pub mod config;
pub mod embed;
pub mod error;
pub mod types;

pub use config::Config;
pub use embed::TextEmbedder;
pub use error::NewswireError;
pub use types::*;
