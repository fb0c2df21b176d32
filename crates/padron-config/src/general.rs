//! Paging defaults for the query surface.

use serde::{Deserialize, Serialize};

/// Default page size for pending-voter listings.
const fn default_page_size() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Page size used when a listing request does not specify one.
    /// Requests may override it within the clamp enforced at query time.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}
