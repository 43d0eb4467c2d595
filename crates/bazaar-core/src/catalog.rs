//! Seed catalog of categories and product types, loaded from YAML.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CatalogEntry {
    /// Generate a URL-safe slug from the entry name.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub categories: Vec<CatalogEntry>,
    #[serde(default)]
    pub product_types: Vec<CatalogEntry>,
}

/// Lowercase, keep ASCII alphanumerics, collapse whitespace and dashes into single dashes.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c.is_whitespace() {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Load and validate the catalog seed file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    validate_entries("category", &catalog.categories)?;
    validate_entries("product type", &catalog.product_types)?;

    Ok(catalog)
}

fn validate_entries(kind: &str, entries: &[CatalogEntry]) -> Result<(), ConfigError> {
    let mut seen_slugs = HashSet::new();

    for entry in entries {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{kind} name must be non-empty"
            )));
        }

        let slug = entry.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{kind} '{}' produces an empty slug",
                entry.name
            )));
        }

        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate {kind} slug: '{slug}' (from '{}')",
                entry.name
            )));
        }
    }

    Ok(())
}
