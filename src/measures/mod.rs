pub mod chunker;
pub mod dump;
pub mod error;
pub mod fetcher;
pub mod orchestrator;
pub mod reshape;
