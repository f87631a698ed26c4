pub mod ai;
pub mod checkpoint;
pub mod chunker;
pub mod config;
pub mod digest;
pub mod error;
pub mod message;
pub mod summarizer;

#[cfg(test)]
pub(crate) mod testing;
