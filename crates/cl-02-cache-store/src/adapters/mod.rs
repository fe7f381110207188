//! # Adapters Layer (Hexagonal Architecture)

mod memory;

pub use memory::InMemoryCacheStore;
