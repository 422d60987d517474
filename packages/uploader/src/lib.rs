#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Uploads tabular reports and ERA 835 files to S3 with public-read ACLs.
//!
//! Object keys are `{environment}/{category}/{name}`: the environment
//! prefix (`dev` vs `prod`) comes from the uploader's config, `reports/`
//! holds CSV summaries, and `835/` holds remittance files uploaded by
//! local path. Every upload returns the object's public URL
//! (`https://s3.amazonaws.com/{bucket}/{key}`).
//!
//! # Environment Variables
//!
//! | Variable | Required | Description |
//! |---|---|---|
//! | `LOCAL` | No | Set to any non-empty value selects the `dev` key prefix; unset/empty selects `prod` |
//!
//! AWS credentials and region come from the SDK's default chain
//! (`AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_REGION`, shared
//! config files, or an IAM role).
//!
//! ```no_run
//! # async fn run() -> Result<(), alp_reports_uploader::UploadError> {
//! use alp_reports_uploader::{DataTable, ReportUploader};
//!
//! let uploader = ReportUploader::from_env().await?;
//! let table = DataTable::new(vec!["claim".to_string(), "amount".to_string()]);
//! let url = uploader
//!     .upload_table_as_csv(&table, "PaymentPosting_Summary_09_24_2018.csv", false)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod storage;
pub mod table;

use std::path::{Path, PathBuf};

pub use alp_reports_uploader_models::{
    DEFAULT_BUCKET, Environment, InvalidKeyError, LOCAL_ENV_VAR, ObjectKey, ReportCategory,
    UploaderConfig,
};

pub use crate::storage::{AccessPolicy, S3Backend, StorageBackend};
pub use crate::table::{CsvError, CsvTable, DataTable};

/// Errors that can occur during report uploads.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// AWS region or credentials could not be resolved.
    #[error("AWS configuration incomplete: {message}")]
    Config {
        /// What was missing.
        message: String,
    },

    /// Table-to-CSV conversion failed.
    #[error("Failed to serialize table to CSV: {0}")]
    Serialize(#[from] CsvError),

    /// The object name produced an invalid key.
    #[error("Invalid object key: {0}")]
    Key(#[from] InvalidKeyError),

    /// The local file to upload is missing or unreadable.
    #[error("File not found or unreadable: {}", path.display())]
    FileNotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// S3 `PutObject` failed.
    #[error("Failed to upload s3://{bucket}/{key}: {source}")]
    Upload {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
        /// Underlying SDK error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// I/O error reading local files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Diagnostic: verifies an S3 client can be constructed from the default
/// configuration chain.
///
/// Makes no remote call; it resolves the region and credentials provider
/// and builds the client handle.
///
/// # Errors
///
/// Returns [`UploadError::Config`] if region or credentials cannot be
/// resolved.
pub async fn probe_connection() -> Result<(), UploadError> {
    let _backend = S3Backend::from_default_chain().await?;
    log::info!("S3 configuration resolved, client handle created");
    Ok(())
}

/// Uploads reports to an S3 bucket under environment-scoped keys.
///
/// Generic over its [`StorageBackend`] so tests can substitute an
/// in-memory fake for the real S3 client. Each operation is a single
/// request; no state is shared across calls and failures propagate
/// directly with no retry.
pub struct ReportUploader<B: StorageBackend> {
    config: UploaderConfig,
    backend: B,
}

impl ReportUploader<S3Backend> {
    /// Creates an uploader targeting the default bucket, resolving the
    /// environment from the `LOCAL` flag and S3 access from the SDK
    /// default chain.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Config`] if AWS region or credentials cannot
    /// be resolved.
    pub async fn from_env() -> Result<Self, UploadError> {
        let backend = S3Backend::from_default_chain().await?;
        Ok(Self::with_backend(UploaderConfig::from_env(), backend))
    }
}

impl<B: StorageBackend> ReportUploader<B> {
    /// Creates an uploader with an explicit config and backend.
    pub const fn with_backend(config: UploaderConfig, backend: B) -> Self {
        Self { config, backend }
    }

    /// The uploader's configuration.
    #[must_use]
    pub const fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// Serializes `table` to CSV in memory and uploads it under
    /// `{environment}/reports/{file_name}` with a public-read ACL.
    ///
    /// `with_index` writes row index labels as the first column. Returns
    /// the object's public URL.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Serialize`] if CSV conversion fails,
    /// [`UploadError::Key`] if `file_name` is empty or contains `/`, and
    /// [`UploadError::Upload`] if the storage call fails.
    pub async fn upload_table_as_csv(
        &self,
        table: &impl CsvTable,
        file_name: &str,
        with_index: bool,
    ) -> Result<String, UploadError> {
        let bytes = table.to_csv_bytes(with_index)?;
        let key = ObjectKey::new(self.config.environment, ReportCategory::Reports, file_name)?;

        log::info!(
            "Pushing {file_name} -> s3://{}/{key} ({} bytes)",
            self.config.bucket,
            bytes.len()
        );

        self.backend
            .put_object(
                &self.config.bucket,
                &key.to_string(),
                bytes,
                AccessPolicy::PublicRead,
            )
            .await?;

        Ok(key.public_url(&self.config.bucket))
    }

    /// Uploads the file at `file_path` under `{environment}/835/{name}`
    /// with a public-read ACL, where `name` is the path's final segment.
    ///
    /// Returns the object's public URL. On Lambda the path is typically in
    /// a temporary directory.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::FileNotFound`] if the path is missing or
    /// unreadable (checked before any remote call) and
    /// [`UploadError::Upload`] if the storage call fails.
    pub async fn upload_file_by_path(&self, file_path: &Path) -> Result<String, UploadError> {
        if tokio::fs::metadata(file_path).await.is_err() {
            return Err(UploadError::FileNotFound {
                path: file_path.to_path_buf(),
            });
        }

        let name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(InvalidKeyError::EmptyName)?;
        let key = ObjectKey::new(self.config.environment, ReportCategory::Era835, name)?;

        log::info!(
            "Pushing {} -> s3://{}/{key}",
            file_path.display(),
            self.config.bucket
        );

        self.backend
            .upload_file(
                &self.config.bucket,
                &key.to_string(),
                file_path,
                AccessPolicy::PublicRead,
            )
            .await?;

        Ok(key.public_url(&self.config.bucket))
    }
}
