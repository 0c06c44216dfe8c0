//! HDFS backend adapter.
//!
//! Generates `hadoop fs` command lines against an `hdfs://namenode/path`
//! location; remote paths are full HDFS URIs, which the client resolves
//! itself. Generic client options (`-D`, `-conf`) travel in the opaque
//! extra-arguments string, inserted between `fs` and the subcommand.
//! `hadoop fs` has no parallel-transfer flag, so the concurrency limit is
//! accepted and ignored.

use url::Url;

use crate::error::StorageError;

use super::{backup_dir, data_dir, join_cmd, meta_dir, ExternalStorage};

pub struct HdfsAdapter {
    location: String,
    namenode: String,
    backup_name: String,
    args: String,
}

impl HdfsAdapter {
    pub fn new(url: &Url, _max_concurrent: usize, args: &str) -> Self {
        Self {
            location: url.as_str().trim_end_matches('/').to_string(),
            namenode: url.host_str().unwrap_or_default().to_string(),
            backup_name: String::new(),
            args: args.to_string(),
        }
    }

    fn meta_dir(&self) -> String {
        meta_dir(&self.location, &self.backup_name)
    }

    fn fs(&self, subcommand: &str) -> String {
        join_cmd(&["hadoop", "fs", &self.args, subcommand])
    }
}

impl ExternalStorage for HdfsAdapter {
    fn set_backup_name(&mut self, name: &str) {
        self.backup_name = name.to_string();
    }

    fn backup_pre_command(&self) -> Vec<String> {
        let dir = backup_dir(&self.location, &self.backup_name);
        vec![self.fs(&format!("-mkdir -p {dir}"))]
    }

    fn backup_storage_command(&self, src: &str, host: &str, space_id: &str) -> String {
        let dir = data_dir(&self.location, &self.backup_name, host, space_id);
        format!(
            "{} && {}",
            self.fs(&format!("-mkdir -p {dir}")),
            self.fs(&format!("-copyFromLocal -f {src}/* {dir}"))
        )
    }

    fn backup_meta_command(&self, src: &[String]) -> String {
        let dir = self.meta_dir();
        format!(
            "{} && {}",
            self.fs(&format!("-mkdir -p {dir}")),
            self.fs(&format!("-copyFromLocal -f {} {dir}", src.join(" ")))
        )
    }

    fn backup_meta_file_command(&self, src: &str) -> Vec<String> {
        let dir = self.meta_dir();
        vec![
            self.fs(&format!("-mkdir -p {dir}")),
            self.fs(&format!("-copyFromLocal -f {src} {dir}")),
        ]
    }

    fn restore_meta_file_command(&self, file: &str, dst: &str) -> Vec<String> {
        vec![self.fs(&format!("-copyToLocal {}/{} {dst}", self.meta_dir(), file))]
    }

    fn restore_meta_command(&self, files: &[String], dst: &str) -> (String, Vec<String>) {
        let dir = self.meta_dir();
        let srcs: Vec<String> = files.iter().map(|f| format!("{dir}/{f}")).collect();
        let primary = self.fs(&format!("-copyToLocal {} {dst}", srcs.join(" ")));
        (primary, Vec::new())
    }

    fn restore_storage_command(&self, host: &str, space_ids: &[String], dst: &str) -> String {
        if space_ids.is_empty() {
            let src = format!("{}/data/{}/*", backup_dir(&self.location, &self.backup_name), host);
            return self.fs(&format!("-copyToLocal {src} {dst}"));
        }
        space_ids
            .iter()
            .map(|id| {
                let src = data_dir(&self.location, &self.backup_name, host, id);
                self.fs(&format!("-copyToLocal {src} {dst}"))
            })
            .collect::<Vec<_>>()
            .join(" && ")
    }

    fn restore_meta_pre_command(&self, dst: &str) -> String {
        format!("mkdir -p {dst}")
    }

    fn restore_storage_pre_command(&self, dst: &str) -> String {
        format!("mkdir -p {dst}")
    }

    fn check_command(&self) -> String {
        self.fs(&format!("-test -d {}", self.location))
    }

    fn list_backup_command(&self) -> Result<Vec<String>, StorageError> {
        if self.namenode.is_empty() {
            return Err(StorageError::Listing("hdfs location has no namenode host".to_string()));
        }
        Ok(vec![self.fs(&format!("-ls {}", self.location))])
    }

    fn uri(&self) -> String {
        self.location.clone()
    }
}
