//! Schema describer configuration.

use crate::catalog::SchemaCatalog;
use crate::render::DEFAULT_RENDERER;
use crate::Result;
use std::path::PathBuf;

/// Configuration for documentation generation.
///
/// # Example
/// ```rust
/// use bankdocs_core::config::ErdConfig;
///
/// let config = ErdConfig::new("docs".into()).without_images();
/// assert!(config.validate().is_ok());
/// assert!(!config.render_images);
/// ```
#[derive(Debug, Clone)]
pub struct ErdConfig {
    /// Directory receiving erd.mmd, erd.md and the images
    pub output_dir: PathBuf,
    /// Optional JSON catalog replacing the built-in one
    pub catalog_path: Option<PathBuf>,
    /// External renderer program
    pub renderer_program: String,
    /// Whether to invoke the renderer at all
    pub render_images: bool,
}

impl Default for ErdConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("docs"),
            catalog_path: None,
            renderer_program: DEFAULT_RENDERER.to_string(),
            render_images: true,
        }
    }
}

impl ErdConfig {
    /// Creates a config writing into `output_dir`.
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            ..Default::default()
        }
    }

    /// Validates configuration values.
    ///
    /// # Errors
    /// Returns `Configuration` for an empty output directory or renderer name.
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(crate::error::BankDocsError::configuration(
                "output directory cannot be empty",
            ));
        }

        if self.render_images && self.renderer_program.trim().is_empty() {
            return Err(crate::error::BankDocsError::configuration(
                "renderer program cannot be empty when image rendering is enabled",
            ));
        }

        Ok(())
    }

    /// Loads the configured catalog, falling back to the built-in one.
    pub fn load_catalog(&self) -> Result<SchemaCatalog> {
        match &self.catalog_path {
            Some(path) => SchemaCatalog::from_json_file(path),
            None => Ok(SchemaCatalog::mobile_banking()),
        }
    }

    /// Builder method to use a catalog file.
    pub fn with_catalog(mut self, path: PathBuf) -> Self {
        self.catalog_path = Some(path);
        self
    }

    /// Builder method to set the renderer program.
    pub fn with_renderer(mut self, program: String) -> Self {
        self.renderer_program = program;
        self
    }

    /// Builder method to skip image rendering.
    pub const fn without_images(mut self) -> Self {
        self.render_images = false;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_erd_config_default() {
        let config = ErdConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("docs"));
        assert_eq!(config.renderer_program, "mmdc");
        assert!(config.render_images);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_erd_config_validation() {
        assert!(ErdConfig::default().validate().is_ok());
        assert!(ErdConfig::new(PathBuf::new()).validate().is_err());

        let blank = ErdConfig::default().with_renderer("  ".to_string());
        assert!(blank.validate().is_err());
        assert!(blank.without_images().validate().is_ok());
    }

    #[test]
    fn test_erd_config_builtin_catalog() {
        let catalog = ErdConfig::default().load_catalog().unwrap();
        assert_eq!(catalog, SchemaCatalog::mobile_banking());
    }

    #[test]
    fn test_erd_config_missing_catalog_file() {
        let config = ErdConfig::default().with_catalog(PathBuf::from("no/such/catalog.json"));
        assert!(matches!(
            config.load_catalog(),
            Err(crate::error::BankDocsError::Io { .. })
        ));
    }
}
