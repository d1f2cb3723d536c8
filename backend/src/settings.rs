//! Repository configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_LIMIT, MAX_LIMIT};
use serde::Deserialize;

fn default_error_map_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("error-map.json")
}

/// Settings for the repository layer.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TENANT_BACKEND")]
pub struct RepositorySettings {
    /// Path to the error-mapping JSON table.
    pub error_map_path: Option<PathBuf>,
    /// Page size used when a caller does not request one.
    pub default_page_size: Option<usize>,
    /// Upper bound applied to requested page sizes.
    #[ortho_config(default = MAX_LIMIT)]
    pub max_page_size: usize,
}

impl RepositorySettings {
    /// Configured mapping path, falling back to the bundled fixture.
    pub fn error_map_path(&self) -> PathBuf {
        self.error_map_path
            .clone()
            .unwrap_or_else(default_error_map_path)
    }

    /// Largest page any repository returns; never below one.
    pub fn max_page_size(&self) -> usize {
        self.max_page_size.max(1)
    }

    /// Default page size, capped at [`RepositorySettings::max_page_size`].
    pub fn default_page_size(&self) -> usize {
        self.default_page_size
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, self.max_page_size())
    }
}
