pub mod json_backend;

use std::path::PathBuf;

use crate::{domain::FamilyLedger, errors::StoreError};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Outcome of loading one family, including any repairs applied on the way in.
#[derive(Debug)]
pub struct LoadReport {
    pub family: FamilyLedger,
    pub migrations: Vec<String>,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing family ledgers.
pub trait FamilyStore: Send + Sync {
    fn load(&self, name: &str) -> Result<LoadReport>;
    fn save(&self, family: &FamilyLedger, name: &str) -> Result<PathBuf>;
    fn exists(&self, name: &str) -> bool;
    fn list(&self) -> Result<Vec<String>>;
}

pub use json_backend::JsonStorage;
