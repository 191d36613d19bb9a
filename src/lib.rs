//! KISAN MITRA — AI-assisted farming companion.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod normalize;
pub mod parser;
pub mod fallback;
pub mod llm;
pub mod weather;
pub mod flows;
pub mod server;
