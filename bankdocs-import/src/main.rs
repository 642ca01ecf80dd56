//! Firestore seed data loader.
//!
//! Reads a JSON file with `users` and `accounts` objects and writes every
//! entry as a document in the same-named collection, keyed by its JSON key.
//!
//! # Security Guarantees
//! - The service-account key is read from disk and never logged
//! - Access tokens are held in memory only
//! - Writes replace whole documents and are never retried

use bankdocs_core::{
    BankDocsError, ClientSlot, DocumentStore, DryRunStore, ImportConfig, ImportSummary, Result,
    config::{DEFAULT_CREDENTIAL_FILE, DEFAULT_DATABASE_ID, DEFAULT_IMPORT_FILE},
    import_file, init_logging,
};
use clap::{Args, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "bankdocs-import")]
#[command(about = "Import JSON seed data into Cloud Firestore")]
#[command(version)]
#[command(long_about = "
BankDocs Import - Firestore seed data loader

The input file holds one object per collection, keyed by document id:

  {
    \"users\":    { \"<uid>\": { ... } },
    \"accounts\": { \"<accountId>\": { ... } }
  }

Each entry overwrites the document with the same id. Other top-level keys
are ignored unless listed with --collections.

EXAMPLES:
  bankdocs-import
  bankdocs-import --credentials key.json seed.json
  bankdocs-import --dry-run seed.json
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Import file
    #[arg(default_value = DEFAULT_IMPORT_FILE, help = "JSON file to import")]
    pub input: PathBuf,

    /// Service-account key file
    #[arg(
        long,
        env = "GOOGLE_APPLICATION_CREDENTIALS",
        default_value = DEFAULT_CREDENTIAL_FILE,
        help = "Service-account key file (never logged)"
    )]
    pub credentials: PathBuf,

    /// Project override
    #[arg(
        long,
        env = "FIRESTORE_PROJECT_ID",
        help = "Target project (defaults to the key's project_id)"
    )]
    pub project_id: Option<String>,

    /// Firestore database
    #[arg(long, default_value = DEFAULT_DATABASE_ID, help = "Target Firestore database")]
    pub database_id: String,

    /// Collections to import
    #[arg(
        long,
        value_delimiter = ',',
        help = "Comma-separated top-level keys to import (default: users,accounts)"
    )]
    pub collections: Vec<String>,

    /// Dry run
    #[arg(long, help = "Validate and count documents without writing")]
    pub dry_run: bool,
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
    fn to_config(&self) -> ImportConfig {
        let mut config = ImportConfig::new(self.input.clone())
            .with_credential_path(self.credentials.clone())
            .with_database_id(self.database_id.clone())
            .with_dry_run(self.dry_run);
        if let Some(project_id) = &self.project_id {
            config = config.with_project_id(project_id.clone());
        }
        if !self.collections.is_empty() {
            config = config.with_collections(self.collections.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let config = cli.to_config();
    config.validate()?;
    info!("Starting import: {}", config);

    let mut slot = ClientSlot::new();
    let store = match connect(&mut slot, &config) {
        Ok(store) => store,
        Err(e) if e.is_missing_credential() => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            eprintln!("Download a service-account key from the Firebase console and pass it with --credentials");
            std::process::exit(1);
        }
        Err(e) => {
            error!("Failed to initialize Firestore client: {}", e);
            return Err(e);
        }
    };

    let summary = import_file(&config.input_path, store.as_ref(), &config.collections)
        .await
        .map_err(|e| {
            error!("Import failed: {}", e);
            e
        })?;

    if !cli.global.quiet {
        print_summary(&summary, config.dry_run)?;
    }

    Ok(())
}

/// Picks the store for this run; dry runs never touch the credential
fn connect(slot: &mut ClientSlot, config: &ImportConfig) -> Result<Arc<dyn DocumentStore>> {
    if config.dry_run {
        info!("Dry run: no documents will be written");
        return slot.initialize_with(|| Ok(Arc::new(DryRunStore)));
    }
    slot.initialize(config)
}

fn print_summary(summary: &ImportSummary, dry_run: bool) -> Result<()> {
    let verb = if dry_run { "Validated" } else { "Imported" };
    for (collection, count) in summary.iter() {
        println!("✓ {} {} document(s) into '{}'", verb, count, collection);
    }

    let json = serde_json::to_string(summary).map_err(|e| BankDocsError::Serialization {
        context: "Failed to serialize import summary".to_string(),
        source: e,
    })?;
    info!("Summary: {}", json);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["bankdocs-import"]).unwrap();
        let config = cli.to_config();

        assert_eq!(config.input_path, PathBuf::from("test_account.json"));
        assert_eq!(config.database_id, "(default)");
        assert_eq!(config.collections, ["users", "accounts"]);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "bankdocs-import",
            "--credentials",
            "keys/sa.json",
            "--project-id",
            "ibanking-ffbb9",
            "--collections",
            "users,branches",
            "--dry-run",
            "seed.json",
        ])
        .unwrap();
        let config = cli.to_config();

        assert_eq!(config.input_path, PathBuf::from("seed.json"));
        assert_eq!(config.credential_path, PathBuf::from("keys/sa.json"));
        assert_eq!(config.project_id.as_deref(), Some("ibanking-ffbb9"));
        assert_eq!(config.collections, ["users", "branches"]);
        assert!(config.dry_run);
    }

    #[test]
    fn test_cli_rejects_duplicate_collections() {
        let cli =
            Cli::try_parse_from(["bankdocs-import", "--collections", "users,users"]).unwrap();
        assert!(cli.to_config().validate().is_err());
    }

    #[test]
    fn test_missing_credential_is_reported_before_import() {
        let temp = tempfile::tempdir().unwrap();
        let config = ImportConfig::new(temp.path().join("seed.json"))
            .with_credential_path(temp.path().join("serviceAccountKey.json"));
        let mut slot = ClientSlot::new();

        let err = connect(&mut slot, &config).err().unwrap();
        assert!(err.is_missing_credential());
        assert!(!slot.is_initialized());
    }

    #[test]
    fn test_dry_run_needs_no_credential() {
        let config = ImportConfig::new(PathBuf::from("seed.json"))
            .with_credential_path("does/not/exist.json")
            .with_dry_run(true);
        let mut slot = ClientSlot::new();

        let store = connect(&mut slot, &config).unwrap();
        assert!(slot.is_initialized());
        assert!(store.describe().contains("dry run"));
    }
}
