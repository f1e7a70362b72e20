//! Candidate-pool retrieval
//!
//! The engine never owns data. It asks a [`CandidateRepository`] for the four
//! pools on every call and treats each pool independently: a pool that fails
//! or times out degrades to empty while the others proceed.
//!
//! ## Implementations
//!
//! - **InMemoryRepository**: keeps everything in memory; for embedding,
//!   tests and demos
//! - Anything else implementing [`CandidateRepository`] (database, HTTP
//!   service, cache front)

pub mod errors;
pub mod filters;
pub mod memory;
pub mod traits;

pub use errors::StorageError;
pub use filters::SearchFilters;
pub use memory::InMemoryRepository;
pub use traits::CandidateRepository;
