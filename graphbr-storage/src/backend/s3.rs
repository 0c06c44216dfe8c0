//! S3-compatible backend adapter.
//!
//! Generates `s5cmd` command lines against an `s3://bucket/prefix` location.
//! Endpoint, region, and credential overrides travel in the opaque
//! extra-arguments string, inserted verbatim right after the binary name;
//! the concurrency limit maps to `--numworkers` on data transfers.

use url::Url;

use crate::error::StorageError;

use super::{backup_dir, data_dir, join_cmd, meta_dir, ExternalStorage};

pub struct S3Adapter {
    location: String,
    bucket: String,
    backup_name: String,
    max_concurrent: usize,
    args: String,
}

impl S3Adapter {
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

    /// `s5cmd {args} cp {src} {dst}` — single-stream copy.
    fn cp(&self, src: &str, dst: &str) -> String {
        join_cmd(&["s5cmd", &self.args, "cp", src, dst])
    }

    /// `s5cmd {args} --numworkers {n} cp {src} {dst}` — parallel data copy.
    fn cp_concurrent(&self, src: &str, dst: &str) -> String {
        let workers = format!("--numworkers {}", self.max_concurrent);
        join_cmd(&["s5cmd", &self.args, &workers, "cp", src, dst])
    }
}

impl ExternalStorage for S3Adapter {
    fn set_backup_name(&mut self, name: &str) {
        self.backup_name = name.to_string();
    }

    fn backup_pre_command(&self) -> Vec<String> {
        // Object stores have no directories to create up front.
        Vec::new()
    }

    fn backup_storage_command(&self, src: &str, host: &str, space_id: &str) -> String {
        let dir = data_dir(&self.location, &self.backup_name, host, space_id);
        self.cp_concurrent(&format!("{src}/"), &format!("{dir}/"))
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
            let src = format!("'{}/data/{}/*'", backup_dir(&self.location, &self.backup_name), host);
            return self.cp_concurrent(&src, &format!("{dst}/"));
        }
        space_ids
            .iter()
            .map(|id| {
                let src = format!("'{}/*'", data_dir(&self.location, &self.backup_name, host, id));
                self.cp_concurrent(&src, &format!("{dst}/{id}/"))
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
        join_cmd(&["s5cmd", &self.args, "ls", &format!("s3://{}", self.bucket)])
    }

    fn list_backup_command(&self) -> Result<Vec<String>, StorageError> {
        if self.bucket.is_empty() {
            return Err(StorageError::Listing("s3 location has no bucket".to_string()));
        }
        Ok(vec![join_cmd(&[
            "s5cmd",
            &self.args,
            "ls",
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

    fn adapter(max_concurrent: usize, args: &str) -> S3Adapter {
        let url = Url::parse("s3://my-bucket/prefix").unwrap();
        let mut a = S3Adapter::new(&url, max_concurrent, args);
        a.set_backup_name("20240101");
        a
    }

    #[test]
    fn test_storage_command_carries_concurrency() {
        let a = adapter(8, "");
        let cmd = a.backup_storage_command("/var/nebula/data", "host-1", "3");
        assert_eq!(
            cmd,
            "s5cmd --numworkers 8 cp /var/nebula/data/ \
             s3://my-bucket/prefix/20240101/data/host-1/3/"
        );
    }

    #[test]
    fn test_meta_command_embeds_backup_name() {
        let a = adapter(8, "");
        let cmd = a.backup_meta_command(&["/meta/a".to_string(), "/meta/b".to_string()]);
        assert_eq!(
            cmd,
            "s5cmd cp /meta/a s3://my-bucket/prefix/20240101/meta/ && \
             s5cmd cp /meta/b s3://my-bucket/prefix/20240101/meta/"
        );
    }

    #[test]
    fn test_args_pass_through_verbatim() {
        let a = adapter(4, "--endpoint-url http://minio:9000 --profile backup");
        let cmd = a.backup_meta_file_command("/meta/a");
        assert_eq!(
            cmd,
            vec![
                "s5cmd --endpoint-url http://minio:9000 --profile backup \
                 cp /meta/a s3://my-bucket/prefix/20240101/meta/"
            ]
        );
        assert!(a.check_command().starts_with("s5cmd --endpoint-url http://minio:9000"));
    }

    #[test]
    fn test_restore_storage_per_space_and_all() {
        let a = adapter(8, "");
        let cmd = a.restore_storage_command(
            "host-1",
            &["3".to_string(), "4".to_string()],
            "/restore",
        );
        assert_eq!(
            cmd,
            "s5cmd --numworkers 8 cp 's3://my-bucket/prefix/20240101/data/host-1/3/*' /restore/3/ \
             && s5cmd --numworkers 8 cp 's3://my-bucket/prefix/20240101/data/host-1/4/*' /restore/4/"
        );

        let all = a.restore_storage_command("host-1", &[], "/restore");
        assert_eq!(
            all,
            "s5cmd --numworkers 8 cp 's3://my-bucket/prefix/20240101/data/host-1/*' /restore/"
        );
    }

    #[test]
    fn test_restore_meta_primary_and_aux() {
        let a = adapter(8, "");
        let (primary, aux) = a.restore_meta_command(&["a.sst".to_string()], "/restore");
        assert_eq!(primary, "s5cmd cp s3://my-bucket/prefix/20240101/meta/a.sst /restore/");
        assert!(aux.is_empty());
    }

    #[test]
    fn test_check_targets_bucket_root() {
        assert_eq!(adapter(8, "").check_command(), "s5cmd ls s3://my-bucket");
    }

    #[test]
    fn test_list_backup() {
        let a = adapter(8, "");
        assert_eq!(
            a.list_backup_command().unwrap(),
            vec!["s5cmd ls s3://my-bucket/prefix/"]
        );
    }

    #[test]
    fn test_list_fails_without_bucket() {
        let url = Url::parse("s3:///prefix-only").unwrap();
        let a = S3Adapter::new(&url, 8, "");
        assert!(matches!(a.list_backup_command(), Err(StorageError::Listing(_))));
    }

    #[test]
    fn test_no_pre_commands_for_object_store() {
        assert!(adapter(8, "").backup_pre_command().is_empty());
    }
}
