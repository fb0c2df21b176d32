//! Spreadsheet import limits.

use serde::{Deserialize, Serialize};

/// Default upload size cap in bytes (10 MiB).
const fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Upper bound on the uploaded file size, checked before any parsing.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ImportConfig {
    /// Whether an upload of `len` bytes is within the configured cap.
    pub fn accepts_size(&self, len: u64) -> bool {
        len <= self.max_upload_bytes
    }
}
