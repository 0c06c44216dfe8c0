//! Storage backend abstraction for graphbr.
//!
//! Presents one polymorphic contract ([`ExternalStorage`]) for moving backup
//! artifacts to and from heterogeneous backends: local filesystem,
//! S3-compatible object storage, OSS, and HDFS. The layer performs no I/O —
//! every operation generates backend-specific command-line text for an
//! external process runner. Retry, scheduling, and execution belong to the
//! orchestrator and runner, not here.

pub mod backend;
pub mod config;
pub mod error;

pub use backend::{from_location, ExternalStorage};
pub use config::BackendConfig;
pub use error::StorageError;
