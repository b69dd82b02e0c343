//! Postgres store for the three tier tables. Workers coordinate purely
//! through row state; claim queries select non-terminal states oldest
//! first, so a crashed batch is re-polled on the next tick.

pub mod migrate;
pub mod raw;
pub mod top;
pub mod top_top;
