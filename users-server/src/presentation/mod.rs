pub mod body;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod middleware;
