//! Core library for the mobile banking documentation and data tooling.
//!
//! This crate backs two independent binaries:
//! - `bankdocs-erd` renders the declarative schema catalog into a Mermaid
//!   ER diagram, markdown documentation and (optionally) images
//! - `bankdocs-import` writes a JSON seed file into Cloud Firestore
//!
//! # Security Guarantees
//! - Service-account private keys are zeroized on drop and never logged
//! - Access tokens never appear in logs or error messages
//! - Import writes replace whole documents; nothing is merged or retried
//!
//! # Architecture
//! - The catalog is immutable data; renderers contain no entity-specific logic
//! - External capabilities sit behind traits (`DiagramRenderer`,
//!   `DocumentStore`) so tests run without subprocesses or network access
//! - A single error type with a crate-wide `Result` alias

pub mod catalog;
pub mod config;
pub mod erd;
pub mod error;
pub mod firestore;
pub mod import;
pub mod logging;
pub mod markdown;
pub mod models;
pub mod output;
pub mod render;
pub mod validation;

// Re-export commonly used types
pub use catalog::SchemaCatalog;
pub use config::{ErdConfig, ImportConfig};
pub use erd::render_diagram;
pub use error::{BankDocsError, Result};
pub use firestore::{ClientSlot, DocumentStore, DryRunStore, FirestoreClient};
pub use import::{ImportSummary, import_file};
pub use logging::init_logging;
pub use markdown::render_markdown;
pub use models::{Cardinality, Constraint, EntityDefinition, Field, FieldType, Relationship};
pub use output::{ErdArtifacts, render_and_persist};
pub use render::{DiagramRenderer, ImageArtifacts, MermaidCli, RenderError, render_images};
