//! The polling workers, one tokio task each. Every worker follows the same
//! shape: claim a small batch of rows in its input state (oldest first),
//! process each to completion, sleep the configured interval. Tick-level
//! errors are logged and the next tick retries; per-row scoring failures
//! record safe defaults so rows never wedge in a non-terminal state.

pub mod analyzer;
pub mod commentator;
pub mod embedder;
pub mod finalizer;
pub mod raw_finisher;
pub mod shortener;
pub mod tagger;

pub use analyzer::Analyzer;
pub use commentator::Commentator;
pub use embedder::Embedder;
pub use finalizer::Finalizer;
pub use raw_finisher::RawFinisher;
pub use shortener::Shortener;
pub use tagger::Tagger;
