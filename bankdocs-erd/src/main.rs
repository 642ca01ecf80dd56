//! Schema documentation generator.
//!
//! Renders the mobile banking schema catalog into a Mermaid ER diagram
//! (`erd.mmd`) and a markdown document (`erd.md`), then asks the Mermaid CLI
//! for PNG and SVG images. Image rendering is best effort: a missing or
//! failing renderer is reported but never fails the run.

use anyhow::Context;
use bankdocs_core::{
    ErdConfig, ImageArtifacts, MermaidCli, init_logging, render_and_persist, render_images,
};
use clap::{Args, Parser};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bankdocs-erd")]
#[command(about = "Generate ER diagram and schema documentation")]
#[command(version)]
#[command(long_about = "
BankDocs ERD - Schema documentation generator

Writes into the output directory:
- erd.mmd   Mermaid erDiagram definition
- erd.md    Markdown documentation with the embedded diagram
- erd.png   Rendered image (requires the Mermaid CLI)
- erd.svg   Rendered image (requires the Mermaid CLI)

EXAMPLES:
  bankdocs-erd
  bankdocs-erd --output-dir site/docs --skip-images
  bankdocs-erd --catalog ledger.json --renderer npx-mmdc
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Output directory
    #[arg(
        short,
        long,
        default_value = "docs",
        help = "Directory receiving the generated files (created if absent)"
    )]
    pub output_dir: PathBuf,

    /// Alternative catalog file
    #[arg(long, help = "JSON catalog to document instead of the built-in one")]
    pub catalog: Option<PathBuf>,

    /// Diagram renderer program
    #[arg(
        long,
        env = "MERMAID_CLI",
        default_value = "mmdc",
        help = "Mermaid CLI program used to render images"
    )]
    pub renderer: String,

    /// Skip image rendering
    #[arg(long, help = "Only write erd.mmd and erd.md")]
    pub skip_images: bool,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

impl Cli {
    fn to_config(&self) -> ErdConfig {
        let mut config =
            ErdConfig::new(self.output_dir.clone()).with_renderer(self.renderer.clone());
        if let Some(catalog) = &self.catalog {
            config = config.with_catalog(catalog.clone());
        }
        if self.skip_images {
            config = config.without_images();
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let config = cli.to_config();
    config.validate()?;
    generate(&config, cli.global.quiet)
}

/// Writes the text artifacts and, when enabled, the images
fn generate(config: &ErdConfig, quiet: bool) -> anyhow::Result<()> {
    let catalog = config.load_catalog().with_context(|| match &config.catalog_path {
        Some(path) => format!("Failed to load catalog {}", path.display()),
        None => "Failed to load built-in catalog".to_string(),
    })?;

    for finding in catalog.lint() {
        warn!("Catalog: {}", finding);
    }

    info!("Generating documentation for '{}'", catalog.title);
    let artifacts = render_and_persist(&catalog, &config.output_dir)?;

    if !quiet {
        println!("✓ ERD diagram saved to {}", artifacts.diagram_path.display());
        println!("✓ Documentation saved to {}", artifacts.markdown_path.display());
    }

    if !config.render_images {
        info!("Image rendering skipped");
        return Ok(());
    }

    let renderer = MermaidCli::new(config.renderer_program.as_str());
    let images = render_images(&renderer, &artifacts.diagram_path, &config.output_dir);

    if images.is_complete() && quiet {
        return Ok(());
    }
    for line in image_report(&images, &renderer.program(), &artifacts.diagram_path) {
        println!("{}", line);
    }

    Ok(())
}

/// User-facing lines describing the image outcome. Failures are warnings.
fn image_report(images: &ImageArtifacts, program: &str, diagram_path: &Path) -> Vec<String> {
    if images.is_complete() {
        return vec![
            format!("✓ PNG image saved to {}", images.png_path.display()),
            format!("✓ SVG image saved to {}", images.svg_path.display()),
        ];
    }

    if images.renderer_missing() {
        return vec![
            format!("⚠️  Could not render images: '{}' was not found", program),
            "   Install the Mermaid CLI: npm install -g @mermaid-js/mermaid-cli".to_string(),
            format!("   Or paste {} into https://mermaid.live", diagram_path.display()),
        ];
    }

    images
        .failures
        .iter()
        .map(|failure| format!("⚠️  {} rendering failed: {}", failure.format, failure.error))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bankdocs_core::render::{ImageFailure, ImageFormat};
    use bankdocs_core::RenderError;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["bankdocs-erd"]).unwrap();
        let config = cli.to_config();

        assert_eq!(config.output_dir, PathBuf::from("docs"));
        assert!(config.catalog_path.is_none());
        assert!(config.render_images);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "bankdocs-erd",
            "--output-dir",
            "out",
            "--catalog",
            "ledger.json",
            "--renderer",
            "custom-mmdc",
            "--skip-images",
            "-vv",
        ])
        .unwrap();
        let config = cli.to_config();

        assert_eq!(cli.global.verbose, 2);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("ledger.json")));
        assert_eq!(config.renderer_program, "custom-mmdc");
        assert!(!config.render_images);
    }

    fn artifacts_with(failures: Vec<ImageFailure>) -> ImageArtifacts {
        ImageArtifacts {
            png_path: PathBuf::from("docs/erd.png"),
            svg_path: PathBuf::from("docs/erd.svg"),
            failures,
        }
    }

    #[test]
    fn test_output_report_for_rendered_images() {
        let lines = image_report(&artifacts_with(Vec::new()), "mmdc", Path::new("docs/erd.mmd"));
        assert_eq!(
            lines,
            [
                "✓ PNG image saved to docs/erd.png",
                "✓ SVG image saved to docs/erd.svg"
            ]
        );
    }

    #[test]
    fn test_output_report_for_missing_renderer() {
        let images = artifacts_with(vec![ImageFailure {
            format: ImageFormat::Png,
            error: RenderError::NotFound {
                program: "mmdc".to_string(),
            },
        }]);

        let lines = image_report(&images, "mmdc", Path::new("docs/erd.mmd"));
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("'mmdc' was not found"));
        assert!(lines[1].contains("@mermaid-js/mermaid-cli"));
        assert!(lines[2].contains("docs/erd.mmd"));
    }

    #[test]
    fn test_output_report_for_failed_render() {
        let images = artifacts_with(vec![ImageFailure {
            format: ImageFormat::Svg,
            error: RenderError::Failed {
                status: "exit status: 1".to_string(),
                stderr: "parse error".to_string(),
            },
        }]);

        let lines = image_report(&images, "mmdc", Path::new("docs/erd.mmd"));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("⚠️  SVG rendering failed"));
        assert!(lines[0].contains("parse error"));
    }

    #[test]
    fn test_generation_without_images_writes_text_files() {
        let temp = tempfile::tempdir().unwrap();
        let config = ErdConfig::new(temp.path().join("docs")).without_images();

        generate(&config, true).unwrap();

        assert!(temp.path().join("docs").join("erd.mmd").exists());
        assert!(temp.path().join("docs").join("erd.md").exists());
        assert!(!temp.path().join("docs").join("erd.png").exists());
    }

    #[test]
    fn test_generation_with_missing_renderer_succeeds() {
        let temp = tempfile::tempdir().unwrap();
        let config = ErdConfig::new(temp.path().to_path_buf())
            .with_renderer("bankdocs-no-such-renderer".to_string());

        generate(&config, true).unwrap();

        assert!(temp.path().join("erd.mmd").exists());
        assert!(temp.path().join("erd.md").exists());
    }
}
