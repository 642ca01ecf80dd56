//! Image rendering through an external diagram renderer.
//!
//! Rendering is advisory: the diagram text and markdown are already on disk
//! when images are requested, so every failure here is downgraded to a
//! warning and recorded in the returned [`ImageArtifacts`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{info, warn};

/// Default renderer program (mermaid-cli).
pub const DEFAULT_RENDERER: &str = "mmdc";

/// File name of the rendered PNG image
pub const PNG_FILE_NAME: &str = "erd.png";

/// File name of the rendered SVG image
pub const SVG_FILE_NAME: &str = "erd.svg";

/// Why a single image could not be rendered
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer program is not installed or not on PATH
    #[error("renderer '{program}' not found")]
    NotFound {
        /// Program that was looked up
        program: String,
    },

    /// The renderer could not be started
    #[error("failed to start renderer '{program}': {source}")]
    Spawn {
        /// Program that was started
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The renderer ran and exited unsuccessfully
    #[error("renderer exited with {status}: {stderr}")]
    Failed {
        /// Exit status description
        status: String,
        /// Captured diagnostic output
        stderr: String,
    },
}

/// Capability that turns a diagram file into an image file.
///
/// The output format is inferred from the output path's extension.
pub trait DiagramRenderer {
    /// Renders `input` into `output`.
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError>;
}

/// Renders diagrams by invoking mermaid-cli as a subprocess.
#[derive(Debug, Clone)]
pub struct MermaidCli {
    program: OsString,
}

impl MermaidCli {
    /// Uses the given program instead of `mmdc`.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program name used for invocations.
    pub fn program(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new(DEFAULT_RENDERER)
    }
}

impl DiagramRenderer for MermaidCli {
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError> {
        let result = Command::new(&self.program)
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RenderError::NotFound {
                        program: self.program(),
                    }
                } else {
                    RenderError::Spawn {
                        program: self.program(),
                        source: e,
                    }
                }
            })?;

        if result.status.success() {
            return Ok(());
        }

        let mut diagnostics = String::from_utf8_lossy(&result.stderr).trim().to_string();
        if diagnostics.is_empty() {
            diagnostics = String::from_utf8_lossy(&result.stdout).trim().to_string();
        }

        Err(RenderError::Failed {
            status: result.status.to_string(),
            stderr: diagnostics,
        })
    }
}

/// Image formats produced for the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Raster image
    Png,
    /// Vector image
    Svg,
}

impl ImageFormat {
    /// Output file name for this format.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Png => PNG_FILE_NAME,
            Self::Svg => SVG_FILE_NAME,
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => write!(f, "PNG"),
            Self::Svg => write!(f, "SVG"),
        }
    }
}

/// A format that failed to render, with the reason
#[derive(Debug)]
pub struct ImageFailure {
    /// Format that failed
    pub format: ImageFormat,
    /// Reason reported by the renderer
    pub error: RenderError,
}

/// Outcome of rendering the diagram images
#[derive(Debug)]
pub struct ImageArtifacts {
    /// Target path of the PNG image
    pub png_path: PathBuf,
    /// Target path of the SVG image
    pub svg_path: PathBuf,
    /// Formats that could not be rendered
    pub failures: Vec<ImageFailure>,
}

impl ImageArtifacts {
    /// Whether both images were rendered.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether any failure was caused by the renderer being absent.
    pub fn renderer_missing(&self) -> bool {
        self.failures
            .iter()
            .any(|f| matches!(f.error, RenderError::NotFound { .. }))
    }
}

/// Renders the PNG and SVG images for `diagram_path` into `output_dir`.
///
/// Never fails: each render error is logged as a warning and recorded.
pub fn render_images(
    renderer: &dyn DiagramRenderer,
    diagram_path: &Path,
    output_dir: &Path,
) -> ImageArtifacts {
    let png_path = output_dir.join(ImageFormat::Png.file_name());
    let svg_path = output_dir.join(ImageFormat::Svg.file_name());
    let mut failures = Vec::new();

    for (format, target) in [(ImageFormat::Png, &png_path), (ImageFormat::Svg, &svg_path)] {
        info!("Rendering {} image to {}", format, target.display());
        match renderer.render(diagram_path, target) {
            Ok(()) => info!("✓ Rendered {}: {}", format, target.display()),
            Err(error) => {
                warn!("Failed to render {}: {}", format, error);
                failures.push(ImageFailure { format, error });
            }
        }
    }

    ImageArtifacts {
        png_path,
        svg_path,
        failures,
    }
}
