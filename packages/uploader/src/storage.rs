//! Storage backend abstraction and the S3 implementation.
//!
//! [`StorageBackend`] is the seam between the uploader and the object
//! store: two capabilities (put in-memory bytes, upload a local file), both
//! taking an explicit bucket, key, and access policy. Tests substitute an
//! in-memory backend; production uses [`S3Backend`] built from the AWS
//! SDK's default credential/region chain.

use std::path::Path;

use aws_config::BehaviorVersion;
use aws_sdk_s3::types::ObjectCannedAcl;

use crate::UploadError;

/// Per-object access policy applied at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Anyone holding the object's URL can fetch it.
    PublicRead,
    /// Bucket-owner access only.
    Private,
}

impl AccessPolicy {
    /// The canned ACL header value (`public-read` / `private`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PublicRead => "public-read",
            Self::Private => "private",
        }
    }

    fn to_canned(self) -> ObjectCannedAcl {
        match self {
            Self::PublicRead => ObjectCannedAcl::PublicRead,
            Self::Private => ObjectCannedAcl::Private,
        }
    }
}

impl std::fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object-store capabilities the uploader needs.
///
/// One remote request per call; implementations hold no state across calls
/// beyond their client handle.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Writes `bytes` to `bucket` under `key` with the given access policy.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Upload`] if the remote call fails (network,
    /// permissions, missing bucket). The write is atomic: it either
    /// completes or the object is untouched.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        acl: AccessPolicy,
    ) -> Result<(), UploadError>;

    /// Uploads the file at `local_path` to `bucket` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Io`] if the file cannot be read and
    /// [`UploadError::Upload`] if the remote call fails.
    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        acl: AccessPolicy,
    ) -> Result<(), UploadError>;
}

/// S3 backend using the AWS SDK's default configuration chain.
pub struct S3Backend {
    client: aws_sdk_s3::Client,
}

impl S3Backend {
    /// Creates a backend from the SDK default chain (env vars, shared
    /// config/credentials files, IAM role).
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Config`] if no region or no credentials
    /// provider can be resolved.
    pub async fn from_default_chain() -> Result<Self, UploadError> {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        if config.region().is_none() {
            return Err(UploadError::Config {
                message: "no AWS region resolved (set AWS_REGION or a profile region)".to_string(),
            });
        }
        if config.credentials_provider().is_none() {
            return Err(UploadError::Config {
                message: "no AWS credentials provider resolved".to_string(),
            });
        }

        Ok(Self {
            client: aws_sdk_s3::Client::new(&config),
        })
    }
}

#[async_trait::async_trait]
impl StorageBackend for S3Backend {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        acl: AccessPolicy,
    ) -> Result<(), UploadError> {
        let body = aws_sdk_s3::primitives::ByteStream::from(bytes);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .acl(acl.to_canned())
            .send()
            .await
            .map_err(|e| UploadError::Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source: Box::new(e),
            })?;

        Ok(())
    }

    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        acl: AccessPolicy,
    ) -> Result<(), UploadError> {
        let data = tokio::fs::read(local_path).await?;
        self.put_object(bucket, key, data, acl).await
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory recording backend for tests.

    use std::path::Path;
    use std::sync::Mutex;

    use super::{AccessPolicy, StorageBackend};
    use crate::UploadError;

    /// One recorded upload.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct StoredObject {
        pub bucket: String,
        pub key: String,
        pub acl: AccessPolicy,
        pub bytes: Vec<u8>,
    }

    /// Records every put instead of talking to a network.
    #[derive(Debug, Default)]
    pub struct MemoryBackend {
        objects: Mutex<Vec<StoredObject>>,
    }

    impl MemoryBackend {
        pub fn objects(&self) -> Vec<StoredObject> {
            self.objects.lock().unwrap().clone()
        }

        fn record(&self, bucket: &str, key: &str, acl: AccessPolicy, bytes: Vec<u8>) {
            self.objects.lock().unwrap().push(StoredObject {
                bucket: bucket.to_string(),
                key: key.to_string(),
                acl,
                bytes,
            });
        }
    }

    #[async_trait::async_trait]
    impl StorageBackend for MemoryBackend {
        async fn put_object(
            &self,
            bucket: &str,
            key: &str,
            bytes: Vec<u8>,
            acl: AccessPolicy,
        ) -> Result<(), UploadError> {
            self.record(bucket, key, acl, bytes);
            Ok(())
        }

        async fn upload_file(
            &self,
            bucket: &str,
            key: &str,
            local_path: &Path,
            acl: AccessPolicy,
        ) -> Result<(), UploadError> {
            let data = tokio::fs::read(local_path).await?;
            self.record(bucket, key, acl, data);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acl_header_values() {
        assert_eq!(AccessPolicy::PublicRead.as_str(), "public-read");
        assert_eq!(AccessPolicy::Private.as_str(), "private");
        assert_eq!(AccessPolicy::PublicRead.to_string(), "public-read");
        assert_eq!(AccessPolicy::Private.to_string(), "private");
    }
}
