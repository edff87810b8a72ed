//! Storage configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Where inforequests and the contact directory live
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory of inforequest documents for the file backend
    #[serde(default = "default_path")]
    pub path: String,

    /// YAML file seeding the applicant and obligee directory
    pub directory_file: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.path.trim().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__PATH"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_path(),
            directory_file: None,
        }
    }
}

fn default_path() -> String {
    "./data/inforequests".to_string()
}
