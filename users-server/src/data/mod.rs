#[cfg(test)]
pub mod memory;
pub mod store_probe;
pub mod user_repository;
