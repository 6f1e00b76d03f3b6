// src/repositories/mod.rs

pub mod memory;
pub mod postgres;

pub use lavamusic_common::traits::repository_traits::SetupRepository;
pub use memory::InMemorySetupRepository;
pub use postgres::PostgresSetupRepository;
