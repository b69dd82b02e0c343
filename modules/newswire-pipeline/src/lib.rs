//! Content-curation pipeline: raw posts flow through a three-stage filter
//! funnel, facet tagging, embedding/novelty scoring, shortening, final
//! aggregation, and commentary generation, coordinated entirely through
//! row state in three Postgres tier tables.

pub mod aggregate;
pub mod embedding;
pub mod gateway;
pub mod novelty;
pub mod prompts;
pub mod stages;
pub mod store;
pub mod workers;
