// crates/rollcall-cli/src/services/mod.rs - Infrastructure services

mod storage;

pub use storage::StorageService;
