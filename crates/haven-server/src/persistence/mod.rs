//! Persistence layer for the Haven server.
//!
//! The persistent incident store talks to a remote key-value service over
//! authenticated HTTP and keeps a write-through DashMap mirror so backend
//! outages degrade to in-memory behavior instead of failing requests.

pub mod kv;
pub mod remote;

pub use kv::{KvClient, StorageError};
pub use remote::PersistentIncidentStore;
