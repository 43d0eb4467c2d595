//! Marketplace search pipeline.
//!
//! Parameters decoded from a URL flow through the [`SearchOrchestrator`],
//! which normalizes them and hands them to the composer for the requested
//! entity type. Composers push filters, ordering and pagination to a
//! [`SearchStore`] and apply distance ranking in process.

pub mod cache;
pub mod composer;
pub mod memory;
pub mod orchestrator;
pub mod session;
pub mod store;

pub use cache::{cache_key, SearchCache};
pub use memory::MemoryStore;
pub use orchestrator::{SearchOrchestrator, SearchOutcome};
pub use session::{SearchRequest, SearchSession};
pub use store::SearchStore;
