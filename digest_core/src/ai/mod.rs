pub mod dto;
pub mod handler;
pub mod ollama;
pub mod openai;
pub mod prompt;
