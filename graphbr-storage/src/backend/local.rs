//! Local filesystem backend adapter.
//!
//! Generates plain `mkdir`/`cp`/`ls` command lines rooted at a directory on
//! the node running the transfer. Filesystem copy is single-stream, so the
//! concurrency limit is accepted and ignored.

use crate::error::StorageError;

use super::{backup_dir, data_dir, join_cmd, meta_dir, ExternalStorage};

pub struct LocalAdapter {
    root: String,
    backup_name: String,
    args: String,
}

impl LocalAdapter {
    pub fn new(root: &str, _max_concurrent: usize, args: &str) -> Self {
        Self {
            root: root.trim_end_matches('/').to_string(),
            backup_name: String::new(),
            args: args.to_string(),
        }
    }

    fn meta_dir(&self) -> String {
        meta_dir(&self.root, &self.backup_name)
    }
}

impl ExternalStorage for LocalAdapter {
    fn set_backup_name(&mut self, name: &str) {
        self.backup_name = name.to_string();
    }

    fn backup_pre_command(&self) -> Vec<String> {
        vec![format!("mkdir -p {}", backup_dir(&self.root, &self.backup_name))]
    }

    fn backup_storage_command(&self, src: &str, host: &str, space_id: &str) -> String {
        let dir = data_dir(&self.root, &self.backup_name, host, space_id);
        format!(
            "mkdir -p {} && {}",
            dir,
            join_cmd(&["cp", "-rf", &self.args, &format!("{src}/."), &dir])
        )
    }

    fn backup_meta_command(&self, src: &[String]) -> String {
        let dir = self.meta_dir();
        if src.is_empty() {
            return format!("mkdir -p {dir}");
        }
        let srcs = src.join(" ");
        format!("mkdir -p {} && {}", dir, join_cmd(&["cp", "-rf", &self.args, &srcs, &dir]))
    }

    fn backup_meta_file_command(&self, src: &str) -> Vec<String> {
        let dir = self.meta_dir();
        vec![
            format!("mkdir -p {dir}"),
            join_cmd(&["cp", "-f", &self.args, src, &dir]),
        ]
    }

    fn restore_meta_file_command(&self, file: &str, dst: &str) -> Vec<String> {
        let src = format!("{}/{}", self.meta_dir(), file);
        vec![join_cmd(&["cp", "-f", &self.args, &src, dst])]
    }

    fn restore_meta_command(&self, files: &[String], dst: &str) -> (String, Vec<String>) {
        let dir = self.meta_dir();
        let srcs: Vec<String> = files.iter().map(|f| format!("{dir}/{f}")).collect();
        let primary = join_cmd(&["cp", "-rf", &self.args, &srcs.join(" "), dst]);
        (primary, Vec::new())
    }

    fn restore_storage_command(&self, host: &str, space_ids: &[String], dst: &str) -> String {
        let srcs = if space_ids.is_empty() {
            format!("{}/data/{}/.", backup_dir(&self.root, &self.backup_name), host)
        } else {
            space_ids
                .iter()
                .map(|id| data_dir(&self.root, &self.backup_name, host, id))
                .collect::<Vec<_>>()
                .join(" ")
        };
        join_cmd(&["cp", "-rf", &self.args, &srcs, dst])
    }

    fn restore_meta_pre_command(&self, dst: &str) -> String {
        format!("mkdir -p {dst}")
    }

    fn restore_storage_pre_command(&self, dst: &str) -> String {
        format!("mkdir -p {dst}")
    }

    fn check_command(&self) -> String {
        format!("test -d {}", self.root)
    }

    fn list_backup_command(&self) -> Result<Vec<String>, StorageError> {
        if self.root.is_empty() {
            return Err(StorageError::Listing("local backend has no root path".to_string()));
        }
        Ok(vec![format!("ls -1 {}", self.root)])
    }

    fn uri(&self) -> String {
        format!("local://{}", self.root)
    }
}
