//! Upload acceptance checks.
//!
//! Every check runs independently and appends its message; a caller always sees every
//! violation of a file, not just the first.

use crate::config::ValidationPolicy;
use crate::types::{FileDescriptor, ValidationResult};

/// Message returned when no descriptor was supplied.
pub const NO_FILE_MESSAGE: &str = "No file provided";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Checks file descriptors against a [`ValidationPolicy`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    policy: ValidationPolicy,
}

impl Validator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate a descriptor.
    ///
    /// Checks, in order: presence, size, extension, name length. Presence short-circuits;
    /// the rest accumulate.
    pub fn validate(&self, descriptor: Option<&FileDescriptor>) -> ValidationResult {
        let Some(file) = descriptor else {
            return ValidationResult {
                valid: false,
                errors: vec![NO_FILE_MESSAGE.to_string()],
                file_info: None,
            };
        };

        let mut errors = Vec::new();

        if file.size_bytes > self.policy.max_size_bytes {
            errors.push(format!(
                "File size exceeds maximum of {}MB",
                self.policy.max_size_bytes as f64 / BYTES_PER_MB
            ));
        }

        if !self.policy.allows_extension(&file.extension) {
            errors.push(format!("Invalid file type. Allowed types: {}", self.allowed_list()));
        }

        if name_length(&file.name) > self.policy.max_name_length {
            errors.push(format!(
                "File name too long (max {} characters)",
                self.policy.max_name_length
            ));
        }

        ValidationResult {
            valid: errors.is_empty(),
            errors,
            file_info: Some(file.clone()),
        }
    }

    fn allowed_list(&self) -> String {
        self.policy
            .allowed_extensions
            .iter()
            .map(|e| format!(".{e}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Name length in UTF-16 code units, the unit browsers report for `File.name.length`.
fn name_length(name: &str) -> usize {
    name.encode_utf16().count()
}

/// Validate a descriptor against the default policy.
pub fn validate_file(descriptor: Option<&FileDescriptor>) -> ValidationResult {
    Validator::default().validate(descriptor)
}
