//! Upload acceptance policy.
//!
//! A [`ValidationPolicy`] is an explicit value held by a [`crate::validation::Validator`], so
//! callers with different limits can each keep their own.
//!
//! Policies can be loaded from a JSON document; omitted keys keep their defaults:
//!
//! ```rust
//! use rust_file_ingestion::config::ValidationPolicy;
//!
//! # fn main() -> Result<(), rust_file_ingestion::IngestionError> {
//! let policy = ValidationPolicy::from_json_str(r#"{ "maxSizeBytes": 1048576 }"#)?;
//! assert_eq!(policy.max_size_bytes, 1024 * 1024);
//! assert!(policy.allows_extension("fasta"));
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, IngestionResult};

/// Default upload size limit (10 MiB).
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Default maximum file name length, in UTF-16 code units.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 255;

/// Extensions accepted by the default policy.
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 4] = ["csv", "fasta", "json", "txt"];

/// Acceptance policy for uploaded files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationPolicy {
    /// Files strictly larger than this are rejected.
    pub max_size_bytes: u64,
    /// Lowercase extensions without the leading dot.
    pub allowed_extensions: BTreeSet<String>,
    /// Names longer than this many UTF-16 code units are rejected.
    pub max_name_length: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl ValidationPolicy {
    /// Replace the size limit.
    pub fn with_max_size_bytes(mut self, max_size_bytes: u64) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    /// Replace the allowed extension set. Entries are normalized (leading dot removed,
    /// lowercased).
    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions.into_iter().map(|e| normalize_extension(e.as_ref())).collect();
        self
    }

    /// Replace the maximum name length.
    pub fn with_max_name_length(mut self, max_name_length: usize) -> Self {
        self.max_name_length = max_name_length;
        self
    }

    /// Whether `extension` (any case, with or without leading dot) is allowed.
    ///
    /// Surrounding whitespace is significant: `"csv "` is not `"csv"`.
    pub fn allows_extension(&self, extension: &str) -> bool {
        let ext = extension.strip_prefix('.').unwrap_or(extension).to_lowercase();
        self.allowed_extensions.contains(&ext)
    }

    /// Load a policy from a JSON object. Missing keys fall back to [`Default`].
    pub fn from_json_str(input: &str) -> IngestionResult<Self> {
        let policy: Self = serde_json::from_str(input).map_err(|e| IngestionError::InvalidPolicy {
            message: e.to_string(),
        })?;
        Ok(policy.normalized())
    }

    fn normalized(mut self) -> Self {
        self.allowed_extensions = self
            .allowed_extensions
            .iter()
            .map(|e| normalize_extension(e))
            .collect();
        self
    }
}

// Policy entries only; descriptor extensions are never trimmed.
fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
