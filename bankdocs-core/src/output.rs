//! File output for rendered documentation.
//!
//! Both files are rewritten on every run; unchanged input produces
//! byte-identical output.

use crate::catalog::SchemaCatalog;
use crate::erd::render_diagram;
use crate::error::BankDocsError;
use crate::markdown::render_markdown;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the Mermaid diagram definition
pub const DIAGRAM_FILE_NAME: &str = "erd.mmd";

/// File name of the markdown documentation
pub const MARKDOWN_FILE_NAME: &str = "erd.md";

/// Paths of the text artifacts written by [`render_and_persist`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErdArtifacts {
    /// Written diagram definition
    pub diagram_path: PathBuf,
    /// Written markdown document
    pub markdown_path: PathBuf,
}

/// Renders the diagram and markdown and writes them into `output_dir`.
///
/// Creates `output_dir` (and parents) when absent.
///
/// # Errors
/// Returns `Io` if the directory cannot be created or a file cannot be written.
pub fn render_and_persist(catalog: &SchemaCatalog, output_dir: &Path) -> Result<ErdArtifacts> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| BankDocsError::io("create directory", output_dir, e))?;

    let diagram_path = output_dir.join(DIAGRAM_FILE_NAME);
    write_file(&diagram_path, &render_diagram(catalog))?;
    info!("✓ Wrote diagram definition: {}", diagram_path.display());

    let markdown_path = output_dir.join(MARKDOWN_FILE_NAME);
    write_file(&markdown_path, &render_markdown(catalog))?;
    info!("✓ Wrote documentation: {}", markdown_path.display());

    Ok(ErdArtifacts {
        diagram_path,
        markdown_path,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| BankDocsError::io("write", path, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_are_fixed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let artifacts = render_and_persist(&SchemaCatalog::mobile_banking(), dir.path()).unwrap();
        assert_eq!(artifacts.diagram_path, dir.path().join("erd.mmd"));
        assert_eq!(artifacts.markdown_path, dir.path().join("erd.md"));
    }

    #[test]
    fn test_file_write_into_missing_parent_fails_cleanly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = render_and_persist(&SchemaCatalog::mobile_banking(), &blocker.join("docs"))
            .unwrap_err();
        assert!(matches!(err, BankDocsError::Io { .. }));
    }
}
