#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Environment, category, and object key types for report uploads.
//!
//! Object keys have the shape `{environment}/{category}/{name}` where the
//! environment prefix separates dev uploads from prod uploads in the same
//! bucket. All types here are pure data; the upload machinery lives in
//! `alp_reports_uploader`.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default S3 bucket for report uploads.
pub const DEFAULT_BUCKET: &str = "alp-reports-lambda";

/// Environment variable that switches uploads to the `dev` prefix.
pub const LOCAL_ENV_VAR: &str = "LOCAL";

/// Deployment environment selecting the top-level key prefix.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    /// Local development; keys are prefixed `dev/`.
    Dev,
    /// Deployed (Lambda); keys are prefixed `prod/`.
    #[default]
    Prod,
}

impl Environment {
    /// Resolves the environment from the `LOCAL` process flag.
    ///
    /// Any non-empty `LOCAL` value selects [`Environment::Dev`] — including
    /// `0` and `false`; only an unset or empty variable selects
    /// [`Environment::Prod`]. Reads the variable fresh on every call.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(LOCAL_ENV_VAR) {
            Ok(value) if is_truthy(&value) => Self::Dev,
            _ => Self::Prod,
        }
    }

    /// Returns the key prefix segment (`"dev"` or `"prod"`).
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
        }
    }
}

/// Interprets an environment variable value as a boolean flag: set and
/// non-empty means true, nothing else is inspected.
fn is_truthy(value: &str) -> bool {
    !value.is_empty()
}

/// Kind of report being uploaded, selecting the second key segment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum ReportCategory {
    /// Tabular summary reports, stored under `reports/`.
    #[serde(rename = "reports")]
    #[strum(serialize = "reports")]
    Reports,
    /// ERA 835 remittance files, stored under `835/`.
    #[serde(rename = "835")]
    #[strum(serialize = "835")]
    Era835,
}

impl ReportCategory {
    /// Returns the key segment for this category.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Reports => "reports",
            Self::Era835 => "835",
        }
    }
}

/// Error constructing an [`ObjectKey`] from an invalid name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidKeyError {
    /// The object name segment was empty.
    #[error("Object name must not be empty")]
    EmptyName,
    /// The object name segment contained a path separator.
    #[error("Object name must not contain '/': {name}")]
    NameContainsSlash {
        /// The offending name.
        name: String,
    },
}

/// A validated object key of the shape `{environment}/{category}/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    environment: Environment,
    category: ReportCategory,
    name: String,
}

impl ObjectKey {
    /// Builds a key, validating the name segment.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidKeyError::EmptyName`] if `name` is empty and
    /// [`InvalidKeyError::NameContainsSlash`] if it contains `/` (a name is
    /// a single segment, never a nested path).
    pub fn new(
        environment: Environment,
        category: ReportCategory,
        name: &str,
    ) -> Result<Self, InvalidKeyError> {
        if name.is_empty() {
            return Err(InvalidKeyError::EmptyName);
        }
        if name.contains('/') {
            return Err(InvalidKeyError::NameContainsSlash {
                name: name.to_string(),
            });
        }
        Ok(Self {
            environment,
            category,
            name: name.to_string(),
        })
    }

    /// The environment segment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// The category segment.
    #[must_use]
    pub const fn category(&self) -> ReportCategory {
        self.category
    }

    /// The final (name) segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The public HTTPS URL for this key in `bucket`.
    ///
    /// Every upload returns a URL of this fixed shape; with a public-read
    /// ACL the object is fetchable by anyone holding it.
    #[must_use]
    pub fn public_url(&self, bucket: &str) -> String {
        format!("https://s3.amazonaws.com/{bucket}/{self}")
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.environment.prefix(),
            self.category.segment(),
            self.name
        )
    }
}

/// Configuration for a report uploader: target bucket and environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploaderConfig {
    /// Target S3 bucket. Defaults to [`DEFAULT_BUCKET`].
    pub bucket: String,
    /// Environment selecting the key prefix.
    pub environment: Environment,
}

impl UploaderConfig {
    /// Creates a config for `environment` targeting the default bucket.
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            environment,
        }
    }

    /// Creates a config from the `LOCAL` process flag, targeting the
    /// default bucket.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(Environment::from_env())
    }

    /// Overrides the target bucket.
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_prefixes() {
        assert_eq!(Environment::Dev.prefix(), "dev");
        assert_eq!(Environment::Prod.prefix(), "prod");
        assert_eq!(Environment::Dev.to_string(), "dev");
    }

    #[test]
    fn prod_is_the_default_environment() {
        assert_eq!(Environment::default(), Environment::Prod);
    }

    #[test]
    fn any_nonempty_value_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("anything"));
        // LOCAL=0 and LOCAL=false still mean "local is set": the flag
        // tests presence, not boolean parsing.
        assert!(is_truthy("0"));
        assert!(is_truthy("false"));
        assert!(is_truthy("no"));
        assert!(is_truthy("off"));
        assert!(is_truthy(" "));
    }

    #[test]
    fn only_empty_is_falsy() {
        assert!(!is_truthy(""));
    }

    #[test]
    fn category_segments() {
        assert_eq!(ReportCategory::Reports.segment(), "reports");
        assert_eq!(ReportCategory::Era835.segment(), "835");
        assert_eq!(ReportCategory::Era835.to_string(), "835");
    }

    #[test]
    fn key_renders_all_three_segments() {
        let key = ObjectKey::new(Environment::Prod, ReportCategory::Reports, "X.csv").unwrap();
        assert_eq!(key.to_string(), "prod/reports/X.csv");
    }

    #[test]
    fn key_public_url_shape() {
        let key = ObjectKey::new(Environment::Dev, ReportCategory::Era835, "claim123.835").unwrap();
        assert_eq!(
            key.public_url("alp-reports-lambda"),
            "https://s3.amazonaws.com/alp-reports-lambda/dev/835/claim123.835"
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(
            ObjectKey::new(Environment::Prod, ReportCategory::Reports, ""),
            Err(InvalidKeyError::EmptyName)
        );
    }

    #[test]
    fn nested_name_is_rejected() {
        let err = ObjectKey::new(Environment::Prod, ReportCategory::Reports, "a/b.csv");
        assert!(matches!(err, Err(InvalidKeyError::NameContainsSlash { .. })));
    }

    #[test]
    fn config_defaults_to_fixed_bucket() {
        let config = UploaderConfig::new(Environment::Prod);
        assert_eq!(config.bucket, "alp-reports-lambda");
    }

    #[test]
    fn config_bucket_override() {
        let config = UploaderConfig::new(Environment::Dev).with_bucket("test-bucket");
        assert_eq!(config.bucket, "test-bucket");
    }
}
