//! The engine facade

pub mod engine;

pub use engine::SearchEngine;
