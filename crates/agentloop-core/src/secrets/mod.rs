//! Secret storage
//!
//! - `SecretStore` trait, read by the configuration layer
//! - `EnvSecretStore` for the process environment
//! - `MemorySecretStore` for tests

mod env_store;
mod memory_store;
mod traits;

pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
pub use traits::SecretStore;
