pub mod dto;
pub mod handler;
pub mod map_reduce;
