//! Backend adapters and the storage contract they implement.
//!
//! Each adapter handles command generation for one target type (local
//! directory, S3, OSS, HDFS). The orchestrator is responsible for
//! sequencing, executing, and retrying the generated commands; the adapter
//! is responsible only for producing correct, backend-appropriate command
//! text.

pub mod hdfs;
pub mod local;
pub mod oss;
pub mod s3;

use tracing::info;
use url::Url;

use crate::error::StorageError;

use self::hdfs::HdfsAdapter;
use self::local::LocalAdapter;
use self::oss::OssAdapter;
use self::s3::S3Adapter;

/// Contract implemented by all storage backend adapters.
///
/// Every operation is a pure function of the adapter's configuration plus
/// the backup name set via [`set_backup_name`](ExternalStorage::set_backup_name):
/// it returns command-line text and performs no I/O. The backup name starts
/// empty; commands generated before it is set address the backend root
/// directly, so callers must set it before any session-scoped operation.
/// One adapter instance serves one session — the name mutation is not
/// synchronized for concurrent writers.
pub trait ExternalStorage: Send + Sync {
    /// Record the backup name scoping all session paths generated afterwards.
    fn set_backup_name(&mut self, name: &str);

    /// Setup commands to run before any backup transfer (namespace creation
    /// and the like). May be empty for backends that need none.
    fn backup_pre_command(&self) -> Vec<String>;

    /// Transfer one host's storage-engine data for one space to the backend.
    fn backup_storage_command(&self, src: &str, host: &str, space_id: &str) -> String;

    /// Transfer the metadata snapshot, given as a list of source paths.
    fn backup_meta_command(&self, src: &[String]) -> String;

    /// Transfer a single metadata file.
    fn backup_meta_file_command(&self, src: &str) -> Vec<String>;

    /// Fetch one metadata file (named relative to the session meta
    /// directory) to a local destination.
    fn restore_meta_file_command(&self, file: &str, dst: &str) -> Vec<String>;

    /// Fetch metadata back to `dst`. Returns the primary restore command
    /// plus auxiliary commands to run after it, in order.
    fn restore_meta_command(&self, files: &[String], dst: &str) -> (String, Vec<String>);

    /// Fetch storage-engine data for the given spaces on `host` back to
    /// `dst`. An empty space list fetches everything under the host.
    fn restore_storage_command(&self, host: &str, space_ids: &[String], dst: &str) -> String;

    /// Preparation step before a metadata restore (destination creation).
    fn restore_meta_pre_command(&self, dst: &str) -> String;

    /// Preparation step before a storage restore (destination creation).
    fn restore_storage_pre_command(&self, dst: &str) -> String;

    /// Health probe: verifies the backend is reachable and credentials work.
    fn check_command(&self) -> String;

    /// Commands enumerating existing backup names under this backend.
    fn list_backup_command(&self) -> Result<Vec<String>, StorageError>;

    /// Canonical location of this backend, for logging and audit.
    fn uri(&self) -> String;
}

/// Construct a backend adapter from a storage location URI.
///
/// `max_concurrent` bounds parallel transfer workers where the backend tool
/// supports it; `args` is an opaque extra-arguments string passed through to
/// the tool verbatim (endpoint overrides, credential files, regions).
pub fn from_location(
    location: &str,
    max_concurrent: usize,
    args: &str,
) -> Result<Box<dyn ExternalStorage>, StorageError> {
    let url = Url::parse(location)?;

    info!(scheme = url.scheme(), path = url.path(), "parsed storage backend location");

    match url.scheme() {
        "local" => Ok(Box::new(LocalAdapter::new(url.path(), max_concurrent, args))),
        "s3" => Ok(Box::new(S3Adapter::new(&url, max_concurrent, args))),
        "oss" => Ok(Box::new(OssAdapter::new(&url, max_concurrent, args))),
        "hdfs" => Ok(Box::new(HdfsAdapter::new(&url, max_concurrent, args))),
        other => Err(StorageError::UnsupportedBackend { scheme: other.to_string() }),
    }
}

/// Session root for one backup run: `{root}/{backup_name}`.
pub(crate) fn backup_dir(root: &str, name: &str) -> String {
    format!("{}/{}", root.trim_end_matches('/'), name)
}

/// Storage-engine data location for one host and space:
/// `{root}/{backup_name}/data/{host}/{space_id}`.
///
/// Backup and restore both resolve through here, so what the backup command
/// writes is exactly what the restore command reads back.
pub(crate) fn data_dir(root: &str, name: &str, host: &str, space_id: &str) -> String {
    format!("{}/data/{}/{}", backup_dir(root, name), host, space_id)
}

/// Metadata snapshot location: `{root}/{backup_name}/meta`.
pub(crate) fn meta_dir(root: &str, name: &str) -> String {
    format!("{}/meta", backup_dir(root, name))
}

/// Join command fragments with single spaces, skipping empty ones so an
/// empty extra-arguments string leaves no gap in the generated text.
pub(crate) fn join_cmd(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
