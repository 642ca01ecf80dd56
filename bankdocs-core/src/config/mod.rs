//! Configuration types for the describer and the loader.
//!
//! - `ErdConfig`: Where documentation is written and how images are rendered
//! - `ImportConfig`: Credential, input file and target database for imports
//!
//! # Security
//! These structs hold the credential file *path* only; key material is read
//! by the `firestore` module and never stored here.

mod erd;
mod import;

pub use erd::ErdConfig;
pub use import::{
    DEFAULT_COLLECTIONS, DEFAULT_CREDENTIAL_FILE, DEFAULT_DATABASE_ID, DEFAULT_IMPORT_FILE,
    ImportConfig,
};
