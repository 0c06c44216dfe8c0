//! OSS backend adapter.
//!
//! Generates `ossutil` command lines against an `oss://bucket/prefix`
//! location. Mirrors the S3 adapter: the opaque extra-arguments string
//! (endpoint, credentials config) is passed through verbatim and the
//! concurrency limit maps to `--jobs` on recursive copies.

use url::Url;

use crate::error::StorageError;

use super::{backup_dir, data_dir, join_cmd, meta_dir, ExternalStorage};

pub struct OssAdapter {
    location: String,
    bucket: String,
    backup_name: String,
    max_concurrent: usize,
    args: String,
}

impl OssAdapter {
    pub fn new(url: &Url, max_concurrent: usize, args: &str) -> Self {
        Self {
            location: url.as_str().trim_end_matches('/').to_string(),
            bucket: url.host_str().unwrap_or_default().to_string(),
            backup_name: String::new(),
            max_concurrent,
            args: args.to_string(),
        }
    }

    fn meta_dir(&self) -> String {
        meta_dir(&self.location, &self.backup_name)
    }

    fn cp(&self, src: &str, dst: &str) -> String {
        join_cmd(&["ossutil", "cp", "-f", &self.args, src, dst])
    }

    fn cp_recursive(&self, src: &str, dst: &str) -> String {
        let jobs = format!("--jobs {}", self.max_concurrent);
        join_cmd(&["ossutil", "cp", "-r", "-f", &jobs, &self.args, src, dst])
    }
}

impl ExternalStorage for OssAdapter {
    fn set_backup_name(&mut self, name: &str) {
        self.backup_name = name.to_string();
    }

    fn backup_pre_command(&self) -> Vec<String> {
        Vec::new()
    }

    fn backup_storage_command(&self, src: &str, host: &str, space_id: &str) -> String {
        let dir = data_dir(&self.location, &self.backup_name, host, space_id);
        self.cp_recursive(src, &format!("{dir}/"))
    }

    fn backup_meta_command(&self, src: &[String]) -> String {
        let dir = self.meta_dir();
        src.iter()
            .map(|s| self.cp(s, &format!("{dir}/")))
            .collect::<Vec<_>>()
            .join(" && ")
    }

    fn backup_meta_file_command(&self, src: &str) -> Vec<String> {
        vec![self.cp(src, &format!("{}/", self.meta_dir()))]
    }

    fn restore_meta_file_command(&self, file: &str, dst: &str) -> Vec<String> {
        let src = format!("{}/{}", self.meta_dir(), file);
        vec![self.cp(&src, &format!("{dst}/"))]
    }

    fn restore_meta_command(&self, files: &[String], dst: &str) -> (String, Vec<String>) {
        let dir = self.meta_dir();
        let primary = files
            .iter()
            .map(|f| self.cp(&format!("{dir}/{f}"), &format!("{dst}/")))
            .collect::<Vec<_>>()
            .join(" && ");
        (primary, Vec::new())
    }

    fn restore_storage_command(&self, host: &str, space_ids: &[String], dst: &str) -> String {
        if space_ids.is_empty() {
            let src = format!("{}/data/{}/", backup_dir(&self.location, &self.backup_name), host);
            return self.cp_recursive(&src, &format!("{dst}/"));
        }
        space_ids
            .iter()
            .map(|id| {
                let src = format!("{}/", data_dir(&self.location, &self.backup_name, host, id));
                self.cp_recursive(&src, &format!("{dst}/{id}/"))
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
        join_cmd(&["ossutil", "ls", &self.args, &format!("oss://{}", self.bucket)])
    }

    fn list_backup_command(&self) -> Result<Vec<String>, StorageError> {
        if self.bucket.is_empty() {
            return Err(StorageError::Listing("oss location has no bucket".to_string()));
        }
        Ok(vec![join_cmd(&[
            "ossutil",
            "ls",
            "-d",
            &self.args,
            &format!("{}/", self.location),
        ])])
    }

    fn uri(&self) -> String {
        self.location.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(args: &str) -> OssAdapter {
        let url = Url::parse("oss://graph-backups/cluster-a").unwrap();
        let mut a = OssAdapter::new(&url, 6, args);
        a.set_backup_name("BK_1");
        a
    }

    #[test]
    fn test_storage_backup_restore_symmetry() {
        let a = adapter("");
        let backup = a.backup_storage_command("/var/nebula/data", "host-2", "9");
        let restore = a.restore_storage_command("host-2", &["9".to_string()], "/restore");

        assert_eq!(
            backup,
            "ossutil cp -r -f --jobs 6 /var/nebula/data \
             oss://graph-backups/cluster-a/BK_1/data/host-2/9/"
        );
        assert_eq!(
            restore,
            "ossutil cp -r -f --jobs 6 oss://graph-backups/cluster-a/BK_1/data/host-2/9/ \
             /restore/9/"
        );
    }

    #[test]
    fn test_args_placed_before_paths() {
        let a = adapter("-c /etc/oss/config");
        let cmd = a.backup_meta_file_command("/meta/a");
        assert_eq!(
            cmd,
            vec![
                "ossutil cp -f -c /etc/oss/config /meta/a \
                 oss://graph-backups/cluster-a/BK_1/meta/"
            ]
        );
    }

    #[test]
    fn test_check_and_list() {
        let a = adapter("");
        assert_eq!(a.check_command(), "ossutil ls oss://graph-backups");
        assert_eq!(
            a.list_backup_command().unwrap(),
            vec!["ossutil ls -d oss://graph-backups/cluster-a/"]
        );
    }

    #[test]
    fn test_list_fails_without_bucket() {
        let url = Url::parse("oss:///no-bucket").unwrap();
        let a = OssAdapter::new(&url, 6, "");
        assert!(matches!(a.list_backup_command(), Err(StorageError::Listing(_))));
    }
}
